//! Analysis gateway client
//!
//! Every capability is a `POST {base}/v1/{capability}` with a JSON input.
//! The gateway answers with the raw model text and its token usage:
//!
//! ```json
//! { "output": "Here is the analysis: {...}", "usage": { "total_tokens": 812 } }
//! ```
//!
//! The raw text goes through the tolerant extractor and, for checked calls,
//! through [`Validate`] before any stage sees it.

use intervue_core::domain::analysis::Validate;
use intervue_core::extract::extract_json;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::service::pipeline::{Metered, StageError};

/// Raw gateway response
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayResponse {
    pub output: String,
    #[serde(default)]
    pub usage: Usage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub total_tokens: u64,
}

/// HTTP client for the analysis gateway
#[derive(Debug, Clone)]
pub struct GatewayClient {
    /// Base URL of the gateway (e.g., "http://localhost:9000")
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl GatewayClient {
    /// Create a gateway client with a per-request timeout
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, api_key, client))
    }

    /// Create a gateway client with a custom HTTP client
    pub fn with_client(base_url: impl Into<String>, api_key: Option<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Invoke a capability and parse its output without schema checks
    pub async fn invoke<I, T>(&self, capability: &str, input: &I) -> Result<Metered<T>, StageError>
    where
        I: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.call(capability, input).await?;
        decode(capability, &response)
    }

    /// Invoke a capability, parse its output and validate it
    pub async fn invoke_checked<I, T>(
        &self,
        capability: &str,
        input: &I,
    ) -> Result<Metered<T>, StageError>
    where
        I: Serialize + ?Sized,
        T: DeserializeOwned + Validate,
    {
        let response = self.call(capability, input).await?;
        decode_checked(capability, &response)
    }

    async fn call<I>(&self, capability: &str, input: &I) -> Result<GatewayResponse, StageError>
    where
        I: Serialize + ?Sized,
    {
        let url = format!("{}/v1/{}", self.base_url, capability);
        tracing::debug!(capability, "Calling analysis gateway");

        let mut request = self.client.post(&url).json(input);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let transport = |source: reqwest::Error| StageError::Transport {
            capability: capability.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StageError::Api {
                capability: capability.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(transport)
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Extract the typed value from a gateway response
pub fn decode<T: DeserializeOwned>(
    capability: &str,
    response: &GatewayResponse,
) -> Result<Metered<T>, StageError> {
    let value = extract_json(&response.output).map_err(|source| StageError::MalformedOutput {
        capability: capability.to_string(),
        source,
    })?;

    Ok(Metered::new(value, response.usage.total_tokens))
}

/// Extract and validate the typed value from a gateway response
pub fn decode_checked<T: DeserializeOwned + Validate>(
    capability: &str,
    response: &GatewayResponse,
) -> Result<Metered<T>, StageError> {
    let decoded: Metered<T> = decode(capability, response)?;

    decoded
        .value
        .validate()
        .map_err(|reason| StageError::InvalidOutput {
            capability: capability.to_string(),
            reason,
        })?;

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use intervue_core::domain::analysis::{FlowAnalysis, JdRelevance};

    fn response(output: &str, tokens: u64) -> GatewayResponse {
        GatewayResponse {
            output: output.to_string(),
            usage: Usage {
                total_tokens: tokens,
            },
        }
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = GatewayClient::with_client("http://localhost:9000/", None, Client::new());
        assert_eq!(client.base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_decode_fenced_output() {
        let raw = "Sure, here is the flow analysis:\n```json\n{\"continuityScore\": 81, \"flowBreaks\": [], \"insights\": [\"steady pace\",]}\n```";

        let decoded: Metered<FlowAnalysis> = decode_checked("flow", &response(raw, 640)).unwrap();
        assert_eq!(decoded.value.continuity_score, 81.0);
        assert_eq!(decoded.value.insights, vec!["steady pace"]);
        assert_eq!(decoded.tokens, 640);
    }

    #[test]
    fn test_decode_rejects_out_of_range_score() {
        let raw = r#"{"continuityScore": 130}"#;

        let result: Result<Metered<FlowAnalysis>, _> = decode_checked("flow", &response(raw, 0));
        assert!(matches!(
            result,
            Err(StageError::InvalidOutput { ref capability, .. }) if capability == "flow"
        ));
    }

    #[test]
    fn test_decode_without_json_is_malformed() {
        let result: Result<Metered<JdRelevance>, _> =
            decode("jd-relevance", &response("I cannot help with that.", 12));
        assert!(matches!(result, Err(StageError::MalformedOutput { .. })));
    }

    #[test]
    fn test_usage_defaults_to_zero() {
        let parsed: GatewayResponse = serde_json::from_str(r#"{"output": "[]"}"#).unwrap();
        assert_eq!(parsed.usage.total_tokens, 0);
    }
}

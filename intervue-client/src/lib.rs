//! Intervue HTTP Client
//!
//! A typed HTTP client for the Intervue orchestrator API.
//!
//! # Example
//!
//! ```no_run
//! use intervue_client::OrchestratorClient;
//! use intervue_core::dto::interview::CreateInterview;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OrchestratorClient::new("http://localhost:8080");
//!
//!     let interview = client.create_interview(CreateInterview {
//!         candidate_name: Some("Dana Reyes".to_string()),
//!         audio_path: "s3://interviews/dana.wav".to_string(),
//!         resume_text: None,
//!         job_description: "Senior backend engineer".to_string(),
//!     }).await?;
//!
//!     let accepted = client.process_interview(interview.id, true).await?;
//!     println!("Run {} started", accepted.run_id);
//!     Ok(())
//! }
//! ```

pub mod error;
mod interviews;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the Intervue orchestrator API
#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    /// Base URL of the orchestrator (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl OrchestratorClient {
    /// Create a new orchestrator client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new orchestrator client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the orchestrator
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

//! Vault encryption adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::service::pipeline::{Encryptor, StageError};

const CAPABILITY: &str = "encrypt";

#[derive(Debug, Serialize)]
struct EncryptRequest<'a> {
    plaintext: &'a str,
}

#[derive(Debug, Deserialize)]
struct EncryptResponse {
    ciphertext: String,
}

/// [`Encryptor`] backed by the vault's `POST /v1/encrypt`
#[derive(Debug, Clone)]
pub struct HttpEncryptor {
    base_url: String,
    client: Client,
}

impl HttpEncryptor {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl Encryptor for HttpEncryptor {
    async fn encrypt(&self, plaintext: &str) -> Result<String, StageError> {
        let url = format!("{}/v1/encrypt", self.base_url);

        let transport = |source: reqwest::Error| StageError::Transport {
            capability: CAPABILITY.to_string(),
            source,
        };

        let response = self
            .client
            .post(&url)
            .json(&EncryptRequest { plaintext })
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StageError::Api {
                capability: CAPABILITY.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body: EncryptResponse = response.json().await.map_err(transport)?;

        if body.ciphertext.is_empty() {
            return Err(StageError::InvalidOutput {
                capability: CAPABILITY.to_string(),
                reason: "vault returned an empty ciphertext".to_string(),
            });
        }

        Ok(body.ciphertext)
    }
}

//! Gateway-backed semantic embeddings

use async_trait::async_trait;
use intervue_core::domain::analysis::EmbeddingAnalysis;
use intervue_core::domain::transcript::TranscriptSegment;
use serde::Serialize;

use crate::gateway::client::GatewayClient;
use crate::service::pipeline::{EmbeddingCapability, Metered, StageError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddingsInput<'a> {
    segments: &'a [TranscriptSegment],
    job_description: &'a str,
}

/// Enabled [`EmbeddingCapability`]; selected at startup when
/// `ENABLE_EMBEDDINGS` is set
#[derive(Debug, Clone)]
pub struct GatewayEmbeddings {
    client: GatewayClient,
}

impl GatewayEmbeddings {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EmbeddingCapability for GatewayEmbeddings {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn analyze(
        &self,
        segments: &[TranscriptSegment],
        job_description: &str,
    ) -> Result<Metered<EmbeddingAnalysis>, StageError> {
        let input = EmbeddingsInput {
            segments,
            job_description,
        };
        self.client.invoke_checked("embeddings", &input).await
    }
}

//! Gateway Module
//!
//! HTTP adapters for the external capabilities the pipeline consumes: the
//! analysis gateway (model-backed stages, embeddings) and the vault
//! (encryption at rest).

pub mod analysis;
pub mod client;
pub mod embeddings;
pub mod vault;

pub use analysis::GatewayAnalysis;
pub use client::GatewayClient;
pub use embeddings::GatewayEmbeddings;
pub use vault::HttpEncryptor;

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intervue_orchestrator::api::{self, AppState};
use intervue_orchestrator::config::{Config, StorageBackend};
use intervue_orchestrator::db;
use intervue_orchestrator::gateway::{
    GatewayAnalysis, GatewayClient, GatewayEmbeddings, HttpEncryptor,
};
use intervue_orchestrator::repository::{InterviewStore, MemoryStore, PgInterviewStore};
use intervue_orchestrator::service::pipeline::{
    DisabledEmbeddings, EmbeddingCapability, PipelineOrchestrator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intervue_orchestrator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Intervue Orchestrator...");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let store: Arc<dyn InterviewStore> = match config.storage {
        StorageBackend::Postgres => {
            tracing::info!("Connecting to database...");

            let pool = db::create_pool(&config.database_url)
                .await
                .context("Failed to create database pool")?;

            tracing::info!("Database connection pool created");

            db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;

            Arc::new(PgInterviewStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let gateway = GatewayClient::new(
        &config.gateway_url,
        config.gateway_api_key.clone(),
        config.gateway_timeout,
    )
    .context("Failed to build gateway client")?;

    let encryptor = HttpEncryptor::new(&config.vault_url, config.gateway_timeout)
        .context("Failed to build vault client")?;

    let embeddings: Arc<dyn EmbeddingCapability> = if config.enable_embeddings {
        tracing::info!("Semantic embeddings enabled");
        Arc::new(GatewayEmbeddings::new(gateway.clone()))
    } else {
        Arc::new(DisabledEmbeddings)
    };

    let orchestrator = PipelineOrchestrator::new(
        store.clone(),
        Arc::new(GatewayAnalysis::new(gateway)),
        Arc::new(encryptor),
        embeddings,
    )
    .with_lease_ttl(config.lease_ttl);

    // Build router with all API endpoints
    let app = api::create_router(AppState::new(store, Arc::new(orchestrator)));

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

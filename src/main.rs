use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use innkeeper::api::{AccessTokens, AppState, create_router};
use innkeeper::config::{AppSettings, ConfigLoader};
use innkeeper::llm::GeminiClient;
use innkeeper::messenger::MessengerClient;
use innkeeper::store::MemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let settings = AppSettings::from_env()?;
    let config = ConfigLoader::load(&settings.config_dir)
        .with_context(|| format!("loading {}", settings.config_dir.display()))?;
    let store = MemoryStore::from_seed_file(&settings.knowledge_seed)
        .with_context(|| format!("seeding from {}", settings.knowledge_seed.display()))?;

    let http = reqwest::Client::new();
    let generator = GeminiClient::new(http.clone(), settings.gemini.clone());
    let sender = MessengerClient::new(http, settings.messenger.clone());

    let state = AppState::new(
        config,
        AccessTokens {
            verify_token: settings.verify_token.clone(),
            admin_token: settings.admin_token.clone(),
        },
        Arc::new(store),
        Arc::new(generator),
        Arc::new(sender),
    );

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("binding {}", settings.bind_addr))?;
    info!(addr = %settings.bind_addr, "Listening");

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

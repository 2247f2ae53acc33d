mod catalog;
mod chatbot;
mod config;
mod error;
mod fallback;
mod index;
mod matcher;
mod model;
mod server;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use assistant_common::embedding::{Embed, Embedder};
use assistant_common::openai::{OpenAiClient, OpenAiClientConfig};

use chatbot::HealthChatbot;
use config::Config;
use fallback::FallbackResponder;
use index::SymptomContext;
use matcher::Matcher;
use server::SymptomAssistantServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting symptom-assistant MCP server");

    let config = Config::from_env()?;
    info!(
        catalog_path = %config.catalog_path,
        match_mode = %config.match_mode,
        model = %config.model,
        "configuration loaded"
    );

    let catalog = catalog::load_catalog(&config.catalog_file_path())?;
    info!(records = catalog.len(), "catalog loaded");

    info!("initializing embedding model (may download on first run)");
    let embedder: Arc<dyn Embed> = Arc::new(Embedder::new().await?);
    info!(dimensions = embedder.dimensions(), "embedding model ready");

    let context = Arc::new(SymptomContext::build(catalog, embedder.as_ref()).await?);
    let matcher = Arc::new(Matcher::new(context, embedder));

    let openai_config = OpenAiClientConfig::from_env();
    info!(
        base_url = %openai_config.base_url,
        api_key = openai_config.api_key.is_some(),
        "openai client configured"
    );
    let openai = Arc::new(OpenAiClient::new(openai_config)?);
    let fallback = FallbackResponder::new(openai, config.model.clone());

    let chatbot = HealthChatbot::new(matcher, fallback, config.match_mode);
    let server = SymptomAssistantServer::new(chatbot);

    if let Ok(addr) = std::env::var("MCP_TCP_LISTEN_ADDR") {
        let listener = TcpListener::bind(&addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.clone();
            tokio::spawn(async move {
                tracing::info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                tracing::info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}

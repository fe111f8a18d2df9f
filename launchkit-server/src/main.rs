use std::sync::Arc;

use clap::Parser;
use launchkit_server::{build_router, ServerConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,launchkit=debug")),
        )
        .init();

    let config = ServerConfig::parse();
    let state = config.build_state();

    if !state.providers.openai {
        warn!("OPENAI_API_KEY not set; OpenAI adapter disabled");
    }
    if !state.providers.gemini {
        warn!("GEMINI_API_KEY not set; Gemini adapter and market analysis disabled");
    }
    info!(
        generate_provider = ?config.generate_provider,
        summary = !config.skip_summary,
        "providers configured"
    );

    let app = build_router(Arc::new(state), config.body_limit);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(bind = %listener.local_addr()?, "launchkit server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

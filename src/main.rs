use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use recipe_suggest::api::{create_router, AppState};
use recipe_suggest::cli::parse_args;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args();

    tracing::info!(recipes = ?args.recipes_file, "initializing service context (model load may take a moment)");
    let state = AppState::initialize(&args.recipes_file)
        .context("Failed to initialize service context")?;

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", args.bind))?;
    tracing::info!("server running on http://{}", args.bind);
    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

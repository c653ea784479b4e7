/// indieglue service entry point
use indieglue::config::GlueConfig;
use indieglue::context::AppContext;
use indieglue::error::GlueResult;
use indieglue::server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> GlueResult<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "indieglue=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = GlueConfig::from_env();

    // Create application context (cache backend is chosen here)
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await
}

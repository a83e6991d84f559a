use mozello_zenopay_relay::{api, config, AppState};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    let config = config::Config::from_env()?;

    tracing::info!("Starting Mozello ZenoPay relay");
    tracing::info!("Environment: {}", config.server.environment);
    tracing::info!("ZenoPay API: {}", config.zenopay.base_url);
    tracing::info!("Signature order: {:?}", config.mozello.signature_order);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = api::router(AppState::from_config(config)?);

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

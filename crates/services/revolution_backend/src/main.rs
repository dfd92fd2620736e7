// File: services/revolution_backend/src/main.rs
use revolution_backend::app::build_app;
use revolution_backend::service_factory::RevolutionServiceFactory;
use revolution_common::init_with_config;
use revolution_config::load_config;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    // Keeps the file writer flushing until shutdown.
    let _log_guard = init_with_config(&config.logging);

    let factory = RevolutionServiceFactory::new(&config)?;
    let app = build_app(&config, factory.scheduling_state());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

use link_bundler::{Bundler, Config};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        address = %config.service.address,
        port = config.service.port,
        max_links = config.tasks.max_links,
        max_tasks = config.tasks.max_tasks,
        allowed_extensions = ?config.tasks.allowed_extensions,
        "configuration loaded"
    );

    let bundler = Arc::new(Bundler::new(config.clone())?);
    link_bundler::api::start_api_server(bundler, Arc::new(config), link_bundler::shutdown_signal())
        .await?;

    Ok(())
}

//! Cutscene host entry point.

use std::error::Error;
use std::sync::Arc;

use cutscene_core::clock::SystemClock;
use cutscene_host::config::{ContentFile, HostConfig};
use cutscene_host::context::AppContext;
use cutscene_host::runtime;
use cutscene_store::JsonFileStore;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting cutscene host");

    // Read configuration from environment.
    let config = HostConfig::from_env()?;
    let content = ContentFile::load(&config.content_path)?;
    let store = JsonFileStore::open(&config.save_path)?;
    tracing::info!(
        content = %config.content_path.display(),
        save = %config.save_path.display(),
        tick_hz = config.tick_hz,
        "configuration loaded"
    );

    // Build application context.
    let mut context = AppContext::new(&content, Box::new(store), Arc::new(SystemClock))?;
    context.start();

    // Console commands.
    let (tx, rx) = mpsc::channel(32);
    let reader = runtime::spawn_command_reader(BufReader::new(tokio::io::stdin()), tx);

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };
    runtime::run(context, rx, config.tick_interval(), shutdown).await;
    reader.abort();

    Ok(())
}

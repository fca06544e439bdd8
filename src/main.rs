use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pizzeria_backend::{config, db, observability, HttpServer, Shutdown};

#[derive(Debug, Parser)]
#[command(name = "pizzeria-backend", about = "Pizza ordering API with primary/replica routing")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pizzeria_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("pizzeria-backend v0.1.0 starting");

    let config = config::load_config(&args.config)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        replicas = config.database.replicas.len(),
        pool_size = config.database.pool_size,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Pools connect eagerly; a bad node descriptor aborts startup here and
    // the service never accepts traffic.
    let db = Arc::new(db::connect(&config.database).await?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, db.clone());
    let server_shutdown = shutdown.subscribe();
    let server_task = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    shutdown.trigger_on_ctrl_c();
    server_task.await??;

    // All handles are back in their pools once the server has drained.
    db.close().await;

    tracing::info!("Shutdown complete");
    Ok(())
}

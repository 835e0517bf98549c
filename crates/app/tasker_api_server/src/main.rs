//! Tasker API server binary.
//!
//! Serves the signup/login/refresh and task routes over HTTP, backed by
//! PostgreSQL or, with `--in-memory` / no database URL, by in-process stores.

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tasker_api::AppState;
use tasker_api::config::ApiConfig;
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "tasker_api_server", about = "Tasker API server")]
struct Args {
    /// Port to listen on. Overrides the port in `BIND_ADDR`.
    #[arg(long)]
    port: Option<u16>,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Keep all data in process memory, ignoring any database URL.
    #[arg(long, default_value_t = false)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tasker_api=debug,tasker_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env()?;
    if let Some(port) = args.port {
        let host = config
            .bind_addr
            .rsplit_once(':')
            .map_or("127.0.0.1", |(host, _)| host);
        config.bind_addr = format!("{host}:{port}");
    }
    config.database_url = if args.in_memory {
        None
    } else {
        args.database_url.or(config.database_url)
    };
    config.validate()?;

    let state = match config.database_url.clone() {
        Some(database_url) => {
            info!(max_connections = args.max_connections, "connecting to PostgreSQL");
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .acquire_timeout(std::time::Duration::from_secs(30))
                .connect(&database_url)
                .await?;

            info!("running database migrations");
            tasker_api::migrate(&pool).await?;
            AppState::postgres(pool, config.clone())
        }
        None => {
            warn!("no database configured, using in-memory stores");
            AppState::in_memory(config.clone())
        }
    };

    let app = tasker_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}

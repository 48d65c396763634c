//! Tickler server binary.

mod auth;
mod config;
mod error;
mod routes;
mod state;

use axum::http::HeaderValue;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "tickler-server", about = "Reminder service HTTP server")]
struct Args {
    /// Bind host (overrides TICKLER_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides TICKLER_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database path (overrides TICKLER_DATABASE_PATH)
    #[arg(long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    run().await?;
    Ok(())
}

async fn run() -> ServerResult<()> {
    let args = Args::parse();
    let mut config = ServerConfig::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database) = args.database {
        config.database_path = database;
    }

    let addr = config.bind_addr();
    let cors = cors_layer(&config)?;
    let state = AppState::new(config).await?;

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(config: &ServerConfig) -> ServerResult<CorsLayer> {
    if config.cors_origins.is_empty() {
        return Ok(CorsLayer::new());
    }
    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| ServerError::InvalidConfig {
                    name: "TICKLER_CORS_ORIGINS",
                    value: origin.clone(),
                })
        })
        .collect::<ServerResult<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any))
}

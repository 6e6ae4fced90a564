//! Jiwar API server binary.
//!
//! Hosts the Telegram webhook and the magic-link claim endpoints.

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use jiwar_api::config::ApiConfig;
use jiwar_core::provider::http::HttpAccountProvider;
use jiwar_core::telegram::BotTransport;
use jiwar_core::telegram::http::HttpBotTransport;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "jiwar_server", about = "Jiwar API server")]
struct Args {
    /// Address to bind (overrides BIND_ADDR).
    #[arg(long)]
    bind_addr: Option<String>,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/jiwar"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,jiwar_api=debug,jiwar_core=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    config.database_url = args.database_url.clone();
    if let Some(bind_addr) = args.bind_addr {
        config.bind_addr = bind_addr;
    }

    info!(database_url = %config.database_url, bind_addr = %config.bind_addr, "starting jiwar_server");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.database_url)
        .await?;

    // Run database migrations.
    info!("running database migrations");
    jiwar_api::migrate(&pool).await?;

    let provider = Arc::new(HttpAccountProvider::new(
        &config.provider_endpoint,
        &config.provider_project_id,
        &config.provider_api_key,
    ));
    let bot = Arc::new(HttpBotTransport::new(&config.bot_token));

    // Register the command menu; a failure here must not stop the server.
    if let Err(e) = bot.set_my_commands(&jiwar_api::messages::bot_commands()).await {
        warn!(error = %e, "could not register bot commands");
    }

    let state = jiwar_api::AppState {
        pool,
        config: config.clone(),
        provider,
        bot,
    };

    let app = jiwar_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app).await?;

    Ok(())
}

//! query_server - HTTP front end for natural-language SQL dispatch.
//!
//! Configuration comes from the environment (or `.env`), see
//! `nl_query::config`. Listens on BIND_ADDR (default: 0.0.0.0:9000).

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nl_query::api::create_query_router;
use nl_query::{
    create_llm_client, DatabaseConfig, OperationRouter, PgStore, SchemaDocument, ServerConfig,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nl_query=info,query_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().context("failed to load configuration")?;
    let schema = SchemaDocument::load(&config.schema_path).context("failed to load schema")?;

    let pool = DatabaseConfig::from_server_config(&config)
        .connect()
        .await
        .context("failed to connect to database")?;
    tracing::info!("Connected to database");

    let llm = create_llm_client(&config.llm);
    let router = OperationRouter::new(schema, llm, Arc::new(PgStore::new(pool)));
    let app = create_query_router(Arc::new(router));

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("query_server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

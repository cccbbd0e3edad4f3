// src/main.rs
use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pollbot::config::Config;
use pollbot::db::{self, PgStore};
use pollbot::routes::build_router;
use pollbot::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pollbot=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to the database");
    db::init_schema(&pool)
        .await
        .expect("Failed to initialize the database schema");

    let store = Arc::new(PgStore::new(pool, config.store_timeout));
    let app = build_router(AppState::new(store));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "starting poll bot server");
    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .expect("server error");
}

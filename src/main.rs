mod config;
mod database;
mod error;
mod filters;
mod handlers;
mod metrics;
mod models;
mod seed;

use axum::{
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use log::info;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::AppConfig;
use database::{create_database_pool, run_migrations};
use error::AppError;
use handlers::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    let config = AppConfig::from_env()?;

    let db = create_database_pool(&config.database_url, config.max_connections).await?;
    if config.run_migrations {
        run_migrations(&db).await?;
    }

    let app = create_router(AppState {
        db,
        seed_user_count: config.seed_user_count,
    });

    let addr = config.bind_address();
    info!("Metrics API starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/analytics", get(handlers::analytics::analytics))
        .route("/seed-data", post(handlers::seed::seed_data))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

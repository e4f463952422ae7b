use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::{Method, StatusCode, header},
    response::Json,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    infrastructure::{
        config::AppConfig,
        persistence::{Database, ReconnectingMovieRepository},
        storage::{FileStorage, FilesystemStorage},
    },
    presentation::{
        handlers::{AppState, movie::SharedMovieRepository},
        routes,
    },
};

/// Create the main application router
#[allow(deprecated)] // TimeoutLayer::new
pub fn create_app(config: &AppConfig, state: AppState) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(create_cors_layer())
        .layer(DefaultBodyLimit::max(
            usize::try_from(config.server.max_upload_size).unwrap_or(100_000_000),
        ));

    routes::create_routes(state).fallback(not_found_handler).layer(middleware_stack)
}

/// Health check endpoint for Kubernetes liveness probe
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "movie-catalog-service"
    }))
}

/// Readiness check covering the database and the poster directory
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database = state.repository.health_check().await;
    let storage = state.storage.health_check().await;

    if let Err(e) = &database {
        warn!("Readiness: database check failed: {}", e);
    }
    if let Err(e) = &storage {
        warn!("Readiness: storage check failed: {}", e);
    }

    let ready = database.is_ok() && storage.is_ok();
    let status = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (
        status,
        Json(json!({
            "status": if ready { "ready" } else { "not_ready" },
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "checks": {
                "database": if database.is_ok() { "ok" } else { "unavailable" },
                "storage": if storage.is_ok() { "ok" } else { "unavailable" }
            }
        })),
    )
}

/// Handler for 404 not found
async fn not_found_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not Found",
            "message": "The requested resource was not found"
        })),
    )
}

/// Create CORS layer with appropriate settings
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Connect the repository, falling back to a disconnected one
///
/// The reconnection task runs in either case, so a connection lost after
/// startup is also restored.
async fn connect_repository(config: &AppConfig) -> ReconnectingMovieRepository {
    let repository = match Database::new(&config.database).await {
        Ok(database) => {
            ReconnectingMovieRepository::with_connection(config.database.clone(), &database)
        }
        Err(e) => {
            warn!("Failed to connect to database: {}", e);
            info!("Starting server without database connection, will retry in the background");

            ReconnectingMovieRepository::new(config.database.clone(), e.to_string())
        }
    };

    let _reconnection = repository.clone().start_reconnection_task();
    repository
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

/// Start the HTTP server
///
/// # Errors
/// Returns an error if the server fails to start
pub async fn start_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage = FilesystemStorage::new(&config.storage.poster_path);
    storage.health_check().await?;
    info!("Serving posters from {}", storage.base_path().display());

    let repository: SharedMovieRepository = Arc::new(connect_repository(&config).await);
    let state = AppState::new(repository, Arc::new(storage), &config);

    let app = create_app(&config, state);
    let addr = config.server.socket_addr();

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}

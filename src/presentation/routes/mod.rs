use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::{
    infrastructure::http::{health_check, readiness_check},
    presentation::handlers::{self, AppState},
};

/// Create all application routes with application state
pub fn create_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .nest("/api/v1/movie", movie_routes())
        .route("/file/{file_name}", get(handlers::file::serve_poster))
        .with_state(app_state)
}

/// Movie catalog routes; writes require the admin authority
fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/add-movie", post(handlers::movie::add_movie))
        .route("/all", get(handlers::movie::get_all_movies))
        .route("/allMoviesPage", get(handlers::movie::get_movies_page))
        .route("/allMoviesPageSort", get(handlers::movie::get_movies_page_sorted))
        .route("/update/{movie_id}", put(handlers::movie::update_movie))
        .route("/delete/{movie_id}", delete(handlers::movie::delete_movie))
        .route("/{movie_id}", get(handlers::movie::get_movie))
}

use axum::{
    extract::{FromRef, Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use crate::{
    application::{
        dto::{MovieDto, MoviePageResponse, PaginationQuery, PosterFile, SortedPaginationQuery},
        services::MovieService,
    },
    domain::{entities::MovieId, repositories::MovieRepository},
    infrastructure::{
        config::AppConfig,
        storage::{FilesystemStorage, validate_file_size},
    },
    presentation::middleware::{
        auth::{AdminUser, JwtService},
        error::AppError,
    },
};

/// Repository as seen by the HTTP layer
pub type SharedMovieRepository = Arc<dyn MovieRepository<Error = AppError>>;

/// Movie service wired to the repository and storage the server runs with
pub type CatalogService = MovieService<dyn MovieRepository<Error = AppError>, FilesystemStorage>;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub movie_service: CatalogService,
    pub repository: SharedMovieRepository,
    pub storage: Arc<FilesystemStorage>,
    pub jwt_service: JwtService,
    pub max_file_size: u64,
}

impl AppState {
    pub fn new(
        repository: SharedMovieRepository,
        storage: Arc<FilesystemStorage>,
        config: &AppConfig,
    ) -> Self {
        let movie_service =
            MovieService::new(Arc::clone(&repository), Arc::clone(&storage), &config.app.base_url);

        Self {
            movie_service,
            repository,
            storage,
            jwt_service: JwtService::from_config(&config.auth),
            max_file_size: config.storage.max_file_size,
        }
    }
}

impl FromRef<AppState> for JwtService {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_service.clone()
    }
}

/// Parts of a movie multipart request
#[derive(Debug, Default)]
struct MovieForm {
    movie_json: Option<String>,
    poster: Option<PosterFile>,
}

impl MovieForm {
    /// Collect the `file` part and the movie JSON part (`movieDto` or `movieDtoObject`)
    async fn read(mut multipart: Multipart, max_file_size: u64) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest { message: format!("Invalid multipart body: {e}") })?
        {
            let name = field.name().map(str::to_string);

            match name.as_deref() {
                Some("file") => {
                    let filename = field.file_name().map(str::to_string).unwrap_or_default();
                    let data = field.bytes().await.map_err(|e| AppError::BadRequest {
                        message: format!("Failed to read file part: {e}"),
                    })?;

                    validate_file_size(data.len() as u64, max_file_size)
                        .map_err(|message| AppError::PayloadTooLarge { message })?;

                    form.poster = Some(PosterFile::new(filename, data));
                }
                Some("movieDto" | "movieDtoObject") => {
                    let text = field.text().await.map_err(|e| AppError::BadRequest {
                        message: format!("Failed to read movie part: {e}"),
                    })?;
                    form.movie_json = Some(text);
                }
                other => {
                    tracing::debug!("Ignoring unexpected multipart field: {:?}", other);
                }
            }
        }

        Ok(form)
    }

    fn movie_dto(&self) -> Result<MovieDto, AppError> {
        let json = self
            .movie_json
            .as_deref()
            .ok_or_else(|| AppError::validation("movieDto", "Required part 'movieDto' is missing"))?;

        Ok(serde_json::from_str(json)?)
    }
}

/// Add a movie together with its poster
pub async fn add_movie(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MovieDto>), AppError> {
    let form = MovieForm::read(multipart, state.max_file_size).await?;
    let dto = form.movie_dto()?;
    let poster = form.poster.ok_or_else(|| AppError::EmptyFile {
        message: "File is empty! Please send another file!".to_string(),
    })?;

    tracing::info!(subject = %user.subject, poster = %poster.filename, "Adding movie");

    let movie = state.movie_service.add_movie(dto, poster).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
) -> Result<Json<MovieDto>, AppError> {
    Ok(Json(state.movie_service.get_movie(movie_id).await?))
}

pub async fn get_all_movies(State(state): State<AppState>) -> Result<Json<Vec<MovieDto>>, AppError> {
    Ok(Json(state.movie_service.get_all_movies().await?))
}

/// Overwrite a movie, replacing its poster when a non-empty file is sent
pub async fn update_movie(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(movie_id): Path<MovieId>,
    multipart: Multipart,
) -> Result<Json<MovieDto>, AppError> {
    let form = MovieForm::read(multipart, state.max_file_size).await?;
    let dto = form.movie_dto()?;
    let poster = form.poster.filter(|poster| !poster.is_empty());

    tracing::info!(subject = %user.subject, %movie_id, new_poster = poster.is_some(), "Updating movie");

    Ok(Json(state.movie_service.update_movie(movie_id, dto, poster).await?))
}

pub async fn delete_movie(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(movie_id): Path<MovieId>,
) -> Result<String, AppError> {
    tracing::info!(subject = %user.subject, %movie_id, "Deleting movie");

    state.movie_service.delete_movie(movie_id).await
}

pub async fn get_movies_page(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<MoviePageResponse>, AppError> {
    let page = state
        .movie_service
        .get_all_movies_with_pagination(query.page_number, query.page_size)
        .await?;
    Ok(Json(page))
}

pub async fn get_movies_page_sorted(
    State(state): State<AppState>,
    Query(query): Query<SortedPaginationQuery>,
) -> Result<Json<MoviePageResponse>, AppError> {
    let page = state
        .movie_service
        .get_all_movies_with_pagination_and_sorting(
            query.page_number,
            query.page_size,
            &query.sort_by,
            &query.dir,
        )
        .await?;
    Ok(Json(page))
}

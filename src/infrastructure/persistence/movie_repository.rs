use crate::presentation::middleware::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::domain::entities::{Movie, MovieId};
use crate::domain::repositories::MovieRepository;
use crate::domain::value_objects::{MovieSortField, Page, PageRequest};

const MOVIE_COLUMNS: &str = "movie_id, title, director, studio, movie_cast, release_year, poster";

/// `PostgreSQL` implementation of `MovieRepository`
#[derive(Clone)]
pub struct PostgreSqlMovieRepository {
    pool: PgPool,
}

impl PostgreSqlMovieRepository {
    /// Create a new `PostgreSQL` movie repository
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, movie: &Movie) -> Result<Movie, AppError> {
        let row = sqlx::query(
            r"
            INSERT INTO movies (title, director, studio, movie_cast, release_year, poster)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING movie_id
            ",
        )
        .bind(&movie.title)
        .bind(&movie.director)
        .bind(&movie.studio)
        .bind(&movie.movie_cast)
        .bind(movie.release_year)
        .bind(&movie.poster)
        .fetch_one(&self.pool)
        .await?;

        let movie_id = MovieId::new(row.try_get("movie_id")?);
        Ok(movie.clone().with_id(movie_id))
    }

    async fn update(&self, movie: &Movie) -> Result<Movie, AppError> {
        let result = sqlx::query(
            r"
            UPDATE movies
            SET title = $2, director = $3, studio = $4, movie_cast = $5,
                release_year = $6, poster = $7
            WHERE movie_id = $1
            ",
        )
        .bind(movie.id.as_i64())
        .bind(&movie.title)
        .bind(&movie.director)
        .bind(&movie.studio)
        .bind(&movie.movie_cast)
        .bind(movie.release_year)
        .bind(&movie.poster)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound { resource: format!("Movie with id = {}", movie.id) });
        }

        Ok(movie.clone())
    }
}

#[async_trait]
impl MovieRepository for PostgreSqlMovieRepository {
    type Error = AppError;

    async fn save(&self, movie: &Movie) -> Result<Movie, Self::Error> {
        if movie.is_persisted() { self.update(movie).await } else { self.insert(movie).await }
    }

    async fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, Self::Error> {
        let query = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE movie_id = $1");

        let row = sqlx::query(&query).bind(id.as_i64()).fetch_optional(&self.pool).await?;

        row.as_ref().map(map_row_to_movie).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Movie>, Self::Error> {
        let query = format!("SELECT {MOVIE_COLUMNS} FROM movies ORDER BY movie_id ASC");

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        rows.iter().map(map_row_to_movie).collect()
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<Movie>, Self::Error> {
        let order_by = order_by_clause(request)?;
        let limit = i64::from(request.page_size());
        let offset = i64::try_from(request.offset())
            .map_err(|_| AppError::validation("pageNumber", "Page offset out of range"))?;

        let query = format!(
            "SELECT {MOVIE_COLUMNS} FROM movies ORDER BY {order_by} LIMIT $1 OFFSET $2"
        );

        let rows = sqlx::query(&query).bind(limit).bind(offset).fetch_all(&self.pool).await?;
        let total: i64 = sqlx::query("SELECT COUNT(*) AS total FROM movies")
            .fetch_one(&self.pool)
            .await?
            .try_get("total")?;

        let movies = rows.iter().map(map_row_to_movie).collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "Page {} (size {}) returned {} of {} movies",
            request.page_number(),
            request.page_size(),
            movies.len(),
            total
        );

        Ok(Page::new(movies, request, total.max(0) as u64))
    }

    async fn delete(&self, id: MovieId) -> Result<bool, Self::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE movie_id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), Self::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database { message: format!("Health check failed: {e}") })?;
        Ok(())
    }
}

/// Build the ORDER BY clause for a page request.
///
/// Only whitelisted columns ever reach the SQL text; ties are broken by ID so
/// that consecutive pages never overlap.
fn order_by_clause(request: &PageRequest) -> Result<String, AppError> {
    let Some(sort) = request.sort() else {
        return Ok("movie_id ASC".to_string());
    };

    let field = sort
        .property
        .parse::<MovieSortField>()
        .map_err(|message| AppError::validation("sortBy", message))?;

    if field == MovieSortField::MovieId {
        return Ok(format!("movie_id {}", sort.direction));
    }

    Ok(format!("{} {}, movie_id ASC", field.column(), sort.direction))
}

fn map_row_to_movie(row: &PgRow) -> Result<Movie, AppError> {
    let movie = Movie::new(
        row.try_get("title")?,
        row.try_get("director")?,
        row.try_get("studio")?,
        row.try_get("movie_cast")?,
        row.try_get("release_year")?,
        row.try_get("poster")?,
    );

    Ok(movie.with_id(MovieId::new(row.try_get("movie_id")?)))
}

/// A disconnected repository implementation for when database is unavailable
///
/// Every operation fails, so the service can start and report its state
/// through the readiness endpoint.
#[derive(Clone)]
pub struct DisconnectedMovieRepository {
    error_message: String,
}

impl DisconnectedMovieRepository {
    /// Create a new disconnected repository with an error message
    #[must_use]
    pub fn new(error_message: String) -> Self {
        Self { error_message }
    }

    fn unavailable(&self) -> AppError {
        AppError::ServiceUnavailable {
            message: format!("Database unavailable: {}", self.error_message),
        }
    }
}

#[async_trait]
impl MovieRepository for DisconnectedMovieRepository {
    type Error = AppError;

    async fn save(&self, _movie: &Movie) -> Result<Movie, Self::Error> {
        Err(self.unavailable())
    }

    async fn find_by_id(&self, _id: MovieId) -> Result<Option<Movie>, Self::Error> {
        Err(self.unavailable())
    }

    async fn find_all(&self) -> Result<Vec<Movie>, Self::Error> {
        Err(self.unavailable())
    }

    async fn find_page(&self, _request: &PageRequest) -> Result<Page<Movie>, Self::Error> {
        Err(self.unavailable())
    }

    async fn delete(&self, _id: MovieId) -> Result<bool, Self::Error> {
        Err(self.unavailable())
    }

    async fn health_check(&self) -> Result<(), Self::Error> {
        Err(self.unavailable())
    }
}

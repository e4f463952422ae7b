use std::io::Cursor;
use std::sync::Arc;

use crate::{
    application::dto::{MovieDto, MoviePageResponse, PosterFile},
    domain::{
        entities::{Movie, MovieId},
        repositories::MovieRepository,
        value_objects::{PageRequest, Sort, SortDirection},
    },
    infrastructure::storage::FileStorage,
    presentation::middleware::error::AppError,
};

const EMPTY_FILE_MESSAGE: &str = "File is empty! Please send another file!";
const DUPLICATE_FILE_MESSAGE: &str = "File already exists! Please enter another file name!";

/// Movie catalog operations, keeping each movie row and its poster file in step
pub struct MovieService<R, S>
where
    R: MovieRepository + ?Sized,
    S: FileStorage,
{
    repository: Arc<R>,
    storage: Arc<S>,
    base_url: String,
}

impl<R, S> Clone for MovieService<R, S>
where
    R: MovieRepository + ?Sized,
    S: FileStorage,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            storage: Arc::clone(&self.storage),
            base_url: self.base_url.clone(),
        }
    }
}

impl<R, S> MovieService<R, S>
where
    R: MovieRepository + ?Sized,
    R::Error: Into<AppError>,
    S: FileStorage,
{
    /// Create a new movie service
    pub fn new(repository: Arc<R>, storage: Arc<S>, base_url: impl Into<String>) -> Self {
        Self { repository, storage, base_url: base_url.into() }
    }

    /// Upload the poster, then store the movie pointing at it.
    ///
    /// The upload is removed again if the movie cannot be saved.
    pub async fn add_movie(&self, dto: MovieDto, poster: PosterFile) -> Result<MovieDto, AppError> {
        if poster.is_empty() {
            return Err(AppError::EmptyFile { message: EMPTY_FILE_MESSAGE.to_string() });
        }

        if self.storage.exists(&poster.filename).await? {
            tracing::warn!(poster = %poster.filename, "Rejecting movie with duplicate poster name");
            return Err(AppError::Conflict { message: DUPLICATE_FILE_MESSAGE.to_string() });
        }

        let uploaded = self.upload(&poster).await?;

        let movie = dto.into_movie(uploaded.clone());
        let saved = match self.repository.save(&movie).await {
            Ok(saved) => saved,
            Err(e) => {
                self.discard_upload(&uploaded).await;
                return Err(e.into());
            }
        };

        tracing::info!(movie_id = %saved.id, poster = %saved.poster, "Movie added");
        Ok(self.to_dto(saved))
    }

    pub async fn get_movie(&self, id: MovieId) -> Result<MovieDto, AppError> {
        let movie = self.find(id).await?;
        Ok(self.to_dto(movie))
    }

    /// Every movie, ordered by ID
    pub async fn get_all_movies(&self) -> Result<Vec<MovieDto>, AppError> {
        let movies = self.repository.find_all().await.map_err(Into::into)?;
        Ok(movies.into_iter().map(|movie| self.to_dto(movie)).collect())
    }

    /// Overwrite every field of a movie from `dto`, optionally replacing its poster.
    ///
    /// Fields missing from `dto` become null. Without a new poster the stored
    /// file name is kept.
    ///
    /// A poster under a new name is uploaded before the save and the previous
    /// file is removed only once the row points at the new one. A poster under
    /// the current name replaces the file in place and is kept even if the
    /// save fails, since the row still names it.
    pub async fn update_movie(
        &self,
        id: MovieId,
        dto: MovieDto,
        poster: Option<PosterFile>,
    ) -> Result<MovieDto, AppError> {
        let existing = self.find(id).await?;

        let mut poster_name = existing.poster.clone();
        let mut replaced = None;

        if let Some(poster) = poster.filter(|poster| !poster.is_empty()) {
            if poster.filename == existing.poster {
                let removed = self.storage.delete(&existing.poster).await?;
                tracing::debug!(poster = %existing.poster, removed, "Replacing poster in place");
                self.upload(&poster).await?;
            } else {
                if self.storage.exists(&poster.filename).await? {
                    return Err(AppError::Conflict {
                        message: DUPLICATE_FILE_MESSAGE.to_string(),
                    });
                }
                poster_name = self.upload(&poster).await?;
                replaced = Some(existing.poster.clone());
            }
        }

        let movie = dto.into_movie(poster_name).with_id(existing.id);
        let saved = match self.repository.save(&movie).await {
            Ok(saved) => saved,
            Err(e) => {
                if replaced.is_some() {
                    self.discard_upload(&movie.poster).await;
                }
                return Err(e.into());
            }
        };

        if let Some(previous) = replaced {
            self.discard_upload(&previous).await;
        }

        tracing::info!(movie_id = %saved.id, poster = %saved.poster, "Movie updated");
        Ok(self.to_dto(saved))
    }

    /// Remove the poster file, then the movie.
    ///
    /// A failed file deletion aborts before the row is touched.
    pub async fn delete_movie(&self, id: MovieId) -> Result<String, AppError> {
        let movie = self.find(id).await?;

        self.storage.delete(&movie.poster).await?;
        self.repository.delete(movie.id).await.map_err(Into::into)?;

        tracing::info!(movie_id = %movie.id, poster = %movie.poster, "Movie deleted");
        Ok(format!("Movie deleted with id = {}", movie.id))
    }

    pub async fn get_all_movies_with_pagination(
        &self,
        page_number: i64,
        page_size: i64,
    ) -> Result<MoviePageResponse, AppError> {
        let request = PageRequest::of(page_number, page_size)?;
        self.fetch_page(&request).await
    }

    /// As [`Self::get_all_movies_with_pagination`], ordered by `sort_by`.
    ///
    /// `dir` is ascending for any letter case of `"asc"`, descending otherwise.
    pub async fn get_all_movies_with_pagination_and_sorting(
        &self,
        page_number: i64,
        page_size: i64,
        sort_by: &str,
        dir: &str,
    ) -> Result<MoviePageResponse, AppError> {
        let sort = Sort::by(sort_by, SortDirection::from_dir(dir));
        let request = PageRequest::of(page_number, page_size)?.with_sort(sort);
        self.fetch_page(&request).await
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<MoviePageResponse, AppError> {
        let page = self.repository.find_page(request).await.map_err(Into::into)?;
        Ok(page.map(|movie| self.to_dto(movie)).into())
    }

    async fn find(&self, id: MovieId) -> Result<Movie, AppError> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(Into::into)?
            .ok_or_else(|| AppError::NotFound { resource: format!("Movie with id = {id}") })
    }

    async fn upload(&self, poster: &PosterFile) -> Result<String, AppError> {
        let stored = self.storage.store(&poster.filename, Cursor::new(poster.data.clone())).await?;
        tracing::debug!(poster = %stored, size = poster.len(), "Poster uploaded");
        Ok(stored)
    }

    async fn discard_upload(&self, filename: &str) {
        if let Err(e) = self.storage.delete(filename).await {
            tracing::warn!(poster = %filename, "Failed to remove orphaned poster: {}", e);
        }
    }

    fn to_dto(&self, movie: Movie) -> MovieDto {
        MovieDto::from_movie(movie, &self.base_url)
    }
}

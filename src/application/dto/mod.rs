use crate::domain::{
    entities::{Movie, MovieId},
    value_objects::Page,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Data Transfer Object for movie information
///
/// Every field is optional on input; whatever the caller leaves out
/// deserializes to null (or an empty cast).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MovieDto {
    pub movie_id: Option<MovieId>,
    pub title: Option<String>,
    pub director: Option<String>,
    pub studio: Option<String>,
    pub movie_cast: Vec<String>,
    pub release_year: Option<i32>,
    pub poster: Option<String>,
    /// Derived from `poster` on every read, never stored
    pub poster_url: Option<String>,
}

impl MovieDto {
    /// Build the outgoing representation of a stored movie
    #[must_use]
    pub fn from_movie(movie: Movie, base_url: &str) -> Self {
        let poster_url = poster_url(base_url, &movie.poster);

        Self {
            movie_id: Some(movie.id),
            title: movie.title,
            director: movie.director,
            studio: movie.studio,
            movie_cast: movie.movie_cast,
            release_year: movie.release_year,
            poster: Some(movie.poster),
            poster_url: Some(poster_url),
        }
    }

    /// Turn caller supplied fields into an unsaved movie pointing at `poster`.
    ///
    /// `movie_id`, `poster` and `poster_url` from the caller are ignored.
    #[must_use]
    pub fn into_movie(self, poster: String) -> Movie {
        Movie::new(
            self.title,
            self.director,
            self.studio,
            self.movie_cast,
            self.release_year,
            poster,
        )
    }
}

/// Public URL of a stored poster
#[must_use]
pub fn poster_url(base_url: &str, poster: &str) -> String {
    format!("{base_url}/file/{poster}")
}

/// One page of movies as returned by the listing endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePageResponse {
    pub movie_dtos: Vec<MovieDto>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub is_last: bool,
}

impl From<Page<MovieDto>> for MoviePageResponse {
    fn from(page: Page<MovieDto>) -> Self {
        let total_pages = page.total_pages();
        let is_last = page.is_last();

        Self {
            movie_dtos: page.content,
            page_number: page.page_number,
            page_size: page.page_size,
            total_elements: page.total_elements,
            total_pages,
            is_last,
        }
    }
}

/// An uploaded poster held in memory
#[derive(Debug, Clone)]
pub struct PosterFile {
    pub filename: String,
    pub data: Bytes,
}

impl PosterFile {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self { filename: filename.into(), data: data.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }
}

fn default_page_number() -> i64 {
    0
}

fn default_page_size() -> i64 {
    10
}

fn default_sort_by() -> String {
    "movieId".to_string()
}

fn default_dir() -> String {
    "asc".to_string()
}

/// Query parameters for the paginated listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    #[serde(default = "default_page_number", alias = "page")]
    pub page_number: i64,
    #[serde(default = "default_page_size", alias = "size")]
    pub page_size: i64,
}

/// Query parameters for the paginated and sorted listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortedPaginationQuery {
    #[serde(default = "default_page_number", alias = "page")]
    pub page_number: i64,
    #[serde(default = "default_page_size", alias = "size")]
    pub page_size: i64,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_dir")]
    pub dir: String,
}

use crate::domain::entities::{Movie, MovieId};
use crate::domain::value_objects::{Page, PageRequest};
use async_trait::async_trait;

/// Repository trait for movie persistence
#[async_trait]
pub trait MovieRepository: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert a movie without an ID, or overwrite the stored row of one that has an ID.
    ///
    /// Returns the movie as stored, carrying its assigned ID.
    async fn save(&self, movie: &Movie) -> Result<Movie, Self::Error>;

    /// Find a movie by ID
    async fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, Self::Error>;

    /// Every stored movie, ordered by ID
    async fn find_all(&self) -> Result<Vec<Movie>, Self::Error>;

    /// One page of movies.
    ///
    /// Fails with a validation error when the request sorts by a property
    /// the repository does not know.
    async fn find_page(&self, request: &PageRequest) -> Result<Page<Movie>, Self::Error>;

    /// Delete a movie by ID, returning whether a row was removed
    async fn delete(&self, id: MovieId) -> Result<bool, Self::Error>;

    /// Health check for repository connectivity
    async fn health_check(&self) -> Result<(), Self::Error>;
}

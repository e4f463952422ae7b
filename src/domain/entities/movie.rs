use serde::{Deserialize, Serialize};

/// Core movie entity as persisted in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: Option<String>,
    pub director: Option<String>,
    pub studio: Option<String>,
    pub movie_cast: Vec<String>,
    pub release_year: Option<i32>,
    /// Filename of the poster inside the poster directory
    pub poster: String,
}

/// Unique identifier for movies (database BIGSERIAL)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(i64);

impl MovieId {
    /// Placeholder carried by movies that have not been saved yet
    pub const UNASSIGNED: MovieId = MovieId(0);

    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    #[must_use]
    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MovieId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl Movie {
    /// Create a new movie (without database ID - will be assigned on save)
    #[must_use]
    pub fn new(
        title: Option<String>,
        director: Option<String>,
        studio: Option<String>,
        movie_cast: Vec<String>,
        release_year: Option<i32>,
        poster: String,
    ) -> Self {
        Self { id: MovieId::UNASSIGNED, title, director, studio, movie_cast, release_year, poster }
    }

    /// Return a copy of this movie carrying the given database ID
    #[must_use]
    pub fn with_id(mut self, id: MovieId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.is_assigned()
    }
}

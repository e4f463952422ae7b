use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction applied to a sort property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Interpret a caller supplied direction.
    ///
    /// `"asc"` in any letter case means ascending, every other value descending.
    #[must_use]
    pub fn from_dir(dir: &str) -> Self {
        if dir.eq_ignore_ascii_case("asc") { Self::Asc } else { Self::Desc }
    }

    #[must_use]
    pub fn is_ascending(&self) -> bool {
        matches!(self, Self::Asc)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "ASC"),
            Self::Desc => write!(f, "DESC"),
        }
    }
}

/// A requested ordering: a property name plus a direction.
///
/// The property is kept as the raw caller string; whether it names a real
/// attribute is decided by the repository executing the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub property: String,
    pub direction: SortDirection,
}

impl Sort {
    #[must_use]
    pub fn by(property: impl Into<String>, direction: SortDirection) -> Self {
        Self { property: property.into(), direction }
    }
}

/// Movie attributes a repository knows how to order by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieSortField {
    MovieId,
    Title,
    Director,
    Studio,
    ReleaseYear,
    Poster,
}

impl MovieSortField {
    pub const ALL: [Self; 6] =
        [Self::MovieId, Self::Title, Self::Director, Self::Studio, Self::ReleaseYear, Self::Poster];

    /// Property name as exposed in the API
    #[must_use]
    pub fn property(&self) -> &'static str {
        match self {
            Self::MovieId => "movieId",
            Self::Title => "title",
            Self::Director => "director",
            Self::Studio => "studio",
            Self::ReleaseYear => "releaseYear",
            Self::Poster => "poster",
        }
    }

    /// Column backing this property in the `movies` table
    #[must_use]
    pub fn column(&self) -> &'static str {
        match self {
            Self::MovieId => "movie_id",
            Self::Title => "title",
            Self::Director => "director",
            Self::Studio => "studio",
            Self::ReleaseYear => "release_year",
            Self::Poster => "poster",
        }
    }
}

impl FromStr for MovieSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.property() == s)
            .ok_or_else(|| format!("No property '{s}' found for type 'Movie'"))
    }
}

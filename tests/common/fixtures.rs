use async_trait::async_trait;
use movie_catalog_service::{
    AppError,
    domain::{
        entities::{Movie, MovieId},
        repositories::MovieRepository,
        value_objects::{MovieSortField, Page, PageRequest},
    },
};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Repository backed by a map, ordered by ID like the `PostgreSQL` one
#[derive(Clone)]
pub struct InMemoryMovieRepository {
    movies: Arc<Mutex<BTreeMap<MovieId, Movie>>>,
    next_id: Arc<Mutex<i64>>,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self { movies: Arc::default(), next_id: Arc::new(Mutex::new(1)) }
    }

    pub fn count(&self) -> usize {
        self.movies.lock().unwrap().len()
    }
}

fn compare(a: &Movie, b: &Movie, field: MovieSortField) -> Ordering {
    match field {
        MovieSortField::MovieId => a.id.cmp(&b.id),
        MovieSortField::Title => a.title.cmp(&b.title),
        MovieSortField::Director => a.director.cmp(&b.director),
        MovieSortField::Studio => a.studio.cmp(&b.studio),
        MovieSortField::ReleaseYear => a.release_year.cmp(&b.release_year),
        MovieSortField::Poster => a.poster.cmp(&b.poster),
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    type Error = AppError;

    async fn save(&self, movie: &Movie) -> Result<Movie, Self::Error> {
        let mut movies = self.movies.lock().unwrap();

        let saved = if movie.is_persisted() {
            if !movies.contains_key(&movie.id) {
                return Err(AppError::NotFound { resource: format!("Movie with id = {}", movie.id) });
            }
            movie.clone()
        } else {
            let mut next_id = self.next_id.lock().unwrap();
            let id = MovieId::new(*next_id);
            *next_id += 1;
            movie.clone().with_id(id)
        };

        movies.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, Self::Error> {
        Ok(self.movies.lock().unwrap().get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Movie>, Self::Error> {
        Ok(self.movies.lock().unwrap().values().cloned().collect())
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<Movie>, Self::Error> {
        let mut movies: Vec<Movie> = self.movies.lock().unwrap().values().cloned().collect();

        if let Some(sort) = request.sort() {
            let field: MovieSortField = sort
                .property
                .parse()
                .map_err(|message: String| AppError::validation("sortBy", message))?;
            let ascending = sort.direction.is_ascending();

            movies.sort_by(|a, b| {
                let ordering = compare(a, b, field);
                let ordering = if ascending { ordering } else { ordering.reverse() };
                ordering.then(a.id.cmp(&b.id))
            });
        }

        let total = movies.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content =
            movies.into_iter().skip(offset).take(request.page_size() as usize).collect();

        Ok(Page::new(content, request, total))
    }

    async fn delete(&self, id: MovieId) -> Result<bool, Self::Error> {
        Ok(self.movies.lock().unwrap().remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
pub mod mocks {
    use async_trait::async_trait;
    use std::cmp::Ordering;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
    use std::sync::{Arc, Mutex};
    use tokio::io::AsyncRead;

    use crate::domain::{
        entities::{Movie, MovieId},
        repositories::MovieRepository,
        value_objects::{MovieSortField, Page, PageRequest},
    };
    use crate::infrastructure::storage::{
        FileMetadata, FileStorage, FilesystemStorage, StorageError,
    };
    use crate::presentation::middleware::error::AppError;

    /// Simple in-memory mock repository for testing
    #[derive(Clone)]
    pub struct InMemoryMovieRepository {
        storage: Arc<Mutex<BTreeMap<MovieId, Movie>>>,
        next_id: Arc<Mutex<i64>>,
        fail_saves: Arc<AtomicBool>,
    }

    impl Default for InMemoryMovieRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    impl InMemoryMovieRepository {
        pub fn new() -> Self {
            Self {
                storage: Arc::new(Mutex::new(BTreeMap::new())),
                next_id: Arc::new(Mutex::new(1)),
                fail_saves: Arc::new(AtomicBool::new(false)),
            }
        }

        /// Make every subsequent `save` fail with a database error
        #[must_use]
        pub fn with_failing_saves(self) -> Self {
            self.fail_saves();
            self
        }

        /// Make every subsequent `save` fail, including on clones sharing this store
        pub fn fail_saves(&self) {
            self.fail_saves.store(true, AtomicOrdering::SeqCst);
        }

        pub fn count(&self) -> usize {
            self.storage.lock().unwrap().len()
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
            if self.fail_saves.load(AtomicOrdering::SeqCst) {
                return Err(AppError::Database { message: "simulated write failure".to_string() });
            }

            let mut storage = self.storage.lock().unwrap();
            let mut next_id = self.next_id.lock().unwrap();

            let mut movie_to_save = movie.clone();
            if movie_to_save.is_persisted() {
                if !storage.contains_key(&movie_to_save.id) {
                    return Err(AppError::NotFound {
                        resource: format!("Movie with id = {}", movie_to_save.id),
                    });
                }
            } else {
                movie_to_save.id = MovieId::new(*next_id);
                *next_id += 1;
            }

            storage.insert(movie_to_save.id, movie_to_save.clone());
            Ok(movie_to_save)
        }

        async fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, Self::Error> {
            let storage = self.storage.lock().unwrap();
            Ok(storage.get(&id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Movie>, Self::Error> {
            let storage = self.storage.lock().unwrap();
            Ok(storage.values().cloned().collect())
        }

        async fn find_page(&self, request: &PageRequest) -> Result<Page<Movie>, Self::Error> {
            let mut movies: Vec<Movie> = self.storage.lock().unwrap().values().cloned().collect();

            if let Some(sort) = request.sort() {
                let field = sort
                    .property
                    .parse::<MovieSortField>()
                    .map_err(|message| AppError::validation("sortBy", message))?;
                let ascending = sort.direction.is_ascending();

                movies.sort_by(|a, b| {
                    let ordering = compare(a, b, field);
                    let ordering = if ascending { ordering } else { ordering.reverse() };
                    ordering.then(a.id.cmp(&b.id))
                });
            }

            let total = movies.len() as u64;
            let content = movies
                .into_iter()
                .skip(request.offset() as usize)
                .take(request.page_size() as usize)
                .collect();

            Ok(Page::new(content, request, total))
        }

        async fn delete(&self, id: MovieId) -> Result<bool, Self::Error> {
            let mut storage = self.storage.lock().unwrap();
            Ok(storage.remove(&id).is_some())
        }

        async fn health_check(&self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    /// Filesystem storage whose deletes can be made to fail
    #[derive(Clone)]
    pub struct FlakyStorage {
        inner: Arc<FilesystemStorage>,
        fail_deletes: Arc<AtomicBool>,
    }

    impl FlakyStorage {
        pub fn new(inner: FilesystemStorage) -> Self {
            Self { inner: Arc::new(inner), fail_deletes: Arc::new(AtomicBool::new(false)) }
        }

        pub fn fail_deletes(&self) {
            self.fail_deletes.store(true, AtomicOrdering::SeqCst);
        }
    }

    #[async_trait]
    impl FileStorage for FlakyStorage {
        async fn store<R>(&self, filename: &str, reader: R) -> Result<String, StorageError>
        where
            R: AsyncRead + Send + Unpin,
        {
            self.inner.store(filename, reader).await
        }

        async fn retrieve(
            &self,
            filename: &str,
        ) -> Result<Box<dyn AsyncRead + Send + Unpin>, StorageError> {
            self.inner.retrieve(filename).await
        }

        async fn exists(&self, filename: &str) -> Result<bool, StorageError> {
            self.inner.exists(filename).await
        }

        async fn delete(&self, filename: &str) -> Result<bool, StorageError> {
            if self.fail_deletes.load(AtomicOrdering::SeqCst) {
                return Err(StorageError::IoError { message: "permission denied".to_string() });
            }
            self.inner.delete(filename).await
        }

        async fn metadata(&self, filename: &str) -> Result<FileMetadata, StorageError> {
            self.inner.metadata(filename).await
        }

        async fn health_check(&self) -> Result<(), StorageError> {
            self.inner.health_check().await
        }
    }
}

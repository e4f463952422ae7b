use crate::domain::entities::{Movie, MovieId};
use crate::domain::repositories::MovieRepository;
use crate::domain::value_objects::{Page, PageRequest};
use crate::infrastructure::config::DatabaseConfig;
use crate::infrastructure::persistence::{
    Database, DisconnectedMovieRepository, PostgreSqlMovieRepository,
};
use crate::presentation::middleware::error::AppError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Interval between reconnection attempts while disconnected
const RECONNECT_INTERVAL: Duration = Duration::from_secs(30);

/// A repository wrapper that handles database reconnection automatically
///
/// Starts either connected or disconnected. While disconnected a background
/// task retries the connection; once it succeeds calls go to `PostgreSQL`
/// again. A connection-level failure on a call switches back to disconnected.
#[derive(Clone)]
pub struct ReconnectingMovieRepository {
    current_repo: Arc<RwLock<RepositoryState>>,
    database_config: DatabaseConfig,
}

#[derive(Clone)]
enum RepositoryState {
    Connected(PostgreSqlMovieRepository),
    Disconnected(DisconnectedMovieRepository),
}

impl ReconnectingMovieRepository {
    /// Create a new reconnecting repository starting in disconnected state
    pub fn new(database_config: DatabaseConfig, initial_error: String) -> Self {
        let disconnected_repo = DisconnectedMovieRepository::new(initial_error);
        let current_repo = Arc::new(RwLock::new(RepositoryState::Disconnected(disconnected_repo)));

        Self { current_repo, database_config }
    }

    /// Create a new reconnecting repository starting with an existing database connection
    pub fn with_connection(database_config: DatabaseConfig, database: &Database) -> Self {
        let connected_repo = PostgreSqlMovieRepository::new(database.pool().clone());
        let current_repo = Arc::new(RwLock::new(RepositoryState::Connected(connected_repo)));

        Self { current_repo, database_config }
    }

    /// Attempt to establish database connection
    ///
    /// Returns true if connection was successful and repository was updated
    pub async fn attempt_reconnection(&self) -> bool {
        debug!("Attempting database reconnection...");

        match Database::new(&self.database_config).await {
            Ok(database) => {
                info!("Database reconnection successful");
                let connected_repo = PostgreSqlMovieRepository::new(database.pool().clone());
                *self.current_repo.write().await = RepositoryState::Connected(connected_repo);
                true
            }
            Err(e) => {
                debug!("Database reconnection failed: {}", e);
                false
            }
        }
    }

    /// Check if the repository is currently connected
    pub async fn is_connected(&self) -> bool {
        matches!(*self.current_repo.read().await, RepositoryState::Connected(_))
    }

    /// Start background reconnection task
    pub fn start_reconnection_task(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(RECONNECT_INTERVAL);

            loop {
                interval.tick().await;

                if !self.is_connected().await {
                    if self.attempt_reconnection().await {
                        info!("Database connection restored");
                    } else {
                        debug!(
                            "Database still unavailable, will retry in {} seconds",
                            RECONNECT_INTERVAL.as_secs()
                        );
                    }
                }
            }
        })
    }

    /// Snapshot of the active repository; the lock is released before any query runs
    async fn current(&self) -> RepositoryState {
        self.current_repo.read().await.clone()
    }

    /// Fall back to disconnected mode when a call failed at the connection level
    async fn observe<T>(&self, result: Result<T, AppError>) -> Result<T, AppError> {
        let Err(error) = result else {
            return result;
        };

        if let AppError::Database { ref message } = error {
            if is_connection_failure(message) {
                warn!(
                    "Database connection error detected, switching to disconnected mode: {}",
                    message
                );

                let disconnected_repo =
                    DisconnectedMovieRepository::new(format!("Connection lost: {message}"));
                *self.current_repo.write().await = RepositoryState::Disconnected(disconnected_repo);
            }
        }

        Err(error)
    }
}

fn is_connection_failure(message: &str) -> bool {
    let message = message.to_lowercase();
    ["connection", "timed out", "timeout", "network", "pool closed"]
        .iter()
        .any(|needle| message.contains(needle))
}

#[async_trait]
impl MovieRepository for ReconnectingMovieRepository {
    type Error = AppError;

    async fn save(&self, movie: &Movie) -> Result<Movie, Self::Error> {
        let result = match self.current().await {
            RepositoryState::Connected(repo) => repo.save(movie).await,
            RepositoryState::Disconnected(repo) => repo.save(movie).await,
        };
        self.observe(result).await
    }

    async fn find_by_id(&self, id: MovieId) -> Result<Option<Movie>, Self::Error> {
        let result = match self.current().await {
            RepositoryState::Connected(repo) => repo.find_by_id(id).await,
            RepositoryState::Disconnected(repo) => repo.find_by_id(id).await,
        };
        self.observe(result).await
    }

    async fn find_all(&self) -> Result<Vec<Movie>, Self::Error> {
        let result = match self.current().await {
            RepositoryState::Connected(repo) => repo.find_all().await,
            RepositoryState::Disconnected(repo) => repo.find_all().await,
        };
        self.observe(result).await
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Page<Movie>, Self::Error> {
        let result = match self.current().await {
            RepositoryState::Connected(repo) => repo.find_page(request).await,
            RepositoryState::Disconnected(repo) => repo.find_page(request).await,
        };
        self.observe(result).await
    }

    async fn delete(&self, id: MovieId) -> Result<bool, Self::Error> {
        let result = match self.current().await {
            RepositoryState::Connected(repo) => repo.delete(id).await,
            RepositoryState::Disconnected(repo) => repo.delete(id).await,
        };
        self.observe(result).await
    }

    async fn health_check(&self) -> Result<(), Self::Error> {
        let result = match self.current().await {
            RepositoryState::Connected(repo) => repo.health_check().await,
            RepositoryState::Disconnected(repo) => repo.health_check().await,
        };
        self.observe(result).await
    }
}

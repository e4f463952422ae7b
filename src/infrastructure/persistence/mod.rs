pub mod connection;
pub mod movie_repository;
pub mod reconnecting_repository;

pub use connection::Database;
pub use movie_repository::{DisconnectedMovieRepository, PostgreSqlMovieRepository};
pub use reconnecting_repository::ReconnectingMovieRepository;

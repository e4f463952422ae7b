mod movie_service;

pub use movie_service::MovieService;

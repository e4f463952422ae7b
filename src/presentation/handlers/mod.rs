pub mod file;
pub mod movie;

pub use movie::AppState;

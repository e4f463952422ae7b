//! Middleware modules for HTTP request processing
//!
//! - Bearer token verification and the admin authority check
//! - Application errors and their HTTP rendering

pub mod auth;
pub mod error;

// Re-export commonly used types
pub use auth::{AdminUser, Claims, JwtService, UserContext};
pub use error::{AppError, ErrorResponse};

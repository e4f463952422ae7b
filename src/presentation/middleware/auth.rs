use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::error::AppError;
use crate::infrastructure::config::AuthConfig;

/// JWT token claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,              // Subject (user name)
    pub authorities: Vec<String>, // Granted authorities, e.g. "ADMIN"
    pub exp: usize,               // Expiration time
    pub iat: usize,               // Issued at
}

impl Claims {
    #[must_use]
    pub fn new(subject: String, authorities: Vec<String>, expires_in_hours: u64) -> Self {
        let now = chrono::Utc::now().timestamp().max(0) as u64 as usize;
        let exp = now + (expires_in_hours * 3600) as usize;

        Self { sub: subject, authorities, exp, iat: now }
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

/// Caller identity taken from a verified bearer token
#[derive(Debug, Clone)]
pub struct UserContext {
    pub subject: String,
    pub authorities: Vec<String>,
}

impl UserContext {
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

impl From<Claims> for UserContext {
    fn from(claims: Claims) -> Self {
        Self { subject: claims.sub, authorities: claims.authorities }
    }
}

impl fmt::Display for UserContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserContext(subject={}, authorities={:?})", self.subject, self.authorities)
    }
}

/// JWT service for token operations
///
/// Tokens are issued elsewhere; this service only has to verify them.
/// Encoding is kept for tests and local tooling.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    admin_authority: String,
}

impl JwtService {
    /// Create new JWT service with secret, requiring `ADMIN` for admin routes
    pub fn new(secret: &str) -> Self {
        Self::with_admin_authority(secret, "ADMIN")
    }

    pub fn with_admin_authority(secret: &str, admin_authority: impl Into<String>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            validation,
            admin_authority: admin_authority.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::with_admin_authority(&config.jwt_secret, config.admin_authority.clone())
    }

    /// Authority a caller must hold to modify the catalog
    pub fn admin_authority(&self) -> &str {
        &self.admin_authority
    }

    /// Encode claims into JWT token
    pub fn encode_claims(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(|e| {
            error!("Failed to encode JWT: {}", e);
            JwtError::EncodingError(e.to_string())
        })
    }

    /// Decode JWT token and extract claims
    pub fn decode_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| {
                debug!("Failed to decode JWT: {}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                    jsonwebtoken::errors::ErrorKind::InvalidToken => JwtError::InvalidToken,
                    _ => JwtError::DecodingError(e.to_string()),
                }
            })
    }

    /// Issue a token for `subject` holding `authorities`
    pub fn create_token(
        &self,
        subject: impl Into<String>,
        authorities: Vec<String>,
        expires_in_hours: u64,
    ) -> Result<String, JwtError> {
        let claims = Claims::new(subject.into(), authorities, expires_in_hours);
        self.encode_claims(&claims)
    }
}

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Invalid authorization header format")]
    InvalidHeaderFormat,

    #[error("Token encoding error: {0}")]
    EncodingError(String),

    #[error("Token decoding error: {0}")]
    DecodingError(String),
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => {
                AppError::Authentication { message: "Token has expired".to_string() }
            }
            JwtError::InvalidSignature | JwtError::InvalidToken | JwtError::DecodingError(_) => {
                AppError::Authentication { message: "Invalid token".to_string() }
            }
            JwtError::InvalidHeaderFormat => AppError::Authentication {
                message: "Invalid Authorization header format".to_string(),
            },
            JwtError::MissingHeader => {
                AppError::Authentication { message: "Authorization header required".to_string() }
            }
            JwtError::EncodingError(msg) => {
                AppError::Internal { message: format!("JWT processing error: {msg}") }
            }
        }
    }
}

/// Extract user context from the bearer token in the request
impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
    JwtService: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await.map_err(
                |rejection| {
                    if rejection.is_missing() {
                        JwtError::MissingHeader
                    } else {
                        JwtError::InvalidHeaderFormat
                    }
                },
            )?;

        let jwt_service = JwtService::from_ref(state);
        let claims = jwt_service.decode_token(bearer.token())?;
        let user = UserContext::from(claims);

        debug!("Authenticated user: {}", user);
        Ok(user)
    }
}

/// A caller holding the admin authority
#[derive(Debug, Clone)]
pub struct AdminUser(pub UserContext);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    JwtService: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = UserContext::from_request_parts(parts, state).await?;
        let jwt_service = JwtService::from_ref(state);

        if !user.has_authority(jwt_service.admin_authority()) {
            warn!(subject = %user.subject, "Rejected caller without admin authority");
            return Err(AppError::Authorization {
                message: format!(
                    "Access denied. Required authority: {}, user authorities: {:?}",
                    jwt_service.admin_authority(),
                    user.authorities
                ),
            });
        }

        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header::AUTHORIZATION},
        routing::get,
    };
    use rstest::rstest;
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    async fn whoami(user: UserContext) -> String {
        user.subject
    }

    async fn admin_only(AdminUser(user): AdminUser) -> String {
        format!("admin {}", user.subject)
    }

    fn app() -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route("/admin", get(admin_only))
            .with_state(JwtService::new(SECRET))
    }

    async fn status_for(path: &str, authorization: Option<String>) -> StatusCode {
        let mut request = Request::builder().uri(path);
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }

        app().oneshot(request.body(Body::empty()).unwrap()).await.unwrap().status()
    }

    fn bearer(authorities: &[&str]) -> String {
        let token = JwtService::new(SECRET)
            .create_token("alice", authorities.iter().map(ToString::to_string).collect(), 1)
            .unwrap();
        format!("Bearer {token}")
    }

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("alice".to_string(), vec!["ADMIN".to_string()], 24);

        assert_eq!(claims.sub, "alice");
        assert!(claims.has_authority("ADMIN"));
        assert!(!claims.has_authority("USER"));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_round_trip() {
        let service = JwtService::new(SECRET);
        let token = service.create_token("alice", vec!["USER".to_string()], 1).unwrap();

        let claims = service.decode_token(&token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.authorities, vec!["USER"]);
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let token = JwtService::new("other").create_token("alice", Vec::new(), 1).unwrap();

        let result = JwtService::new(SECRET).decode_token(&token);

        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_decode_expired_token() {
        let service = JwtService::new(SECRET);
        let mut claims = Claims::new("alice".to_string(), Vec::new(), 1);
        claims.exp = claims.iat.saturating_sub(3600);
        let token = service.encode_claims(&claims).unwrap();

        assert!(matches!(service.decode_token(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_jwt_error_conversion() {
        assert!(matches!(AppError::from(JwtError::Expired), AppError::Authentication { .. }));
        assert!(matches!(
            AppError::from(JwtError::EncodingError("boom".to_string())),
            AppError::Internal { .. }
        ));
    }

    #[tokio::test]
    async fn test_user_context_extraction() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(AUTHORIZATION, bearer(&["USER"]))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[rstest]
    #[case(None, StatusCode::UNAUTHORIZED)]
    #[case(Some("Basic dXNlcjpwYXNz".to_string()), StatusCode::UNAUTHORIZED)]
    #[case(Some("Bearer not-a-jwt".to_string()), StatusCode::UNAUTHORIZED)]
    #[case(Some(bearer(&["USER"])), StatusCode::FORBIDDEN)]
    #[case(Some(bearer(&["USER", "ADMIN"])), StatusCode::OK)]
    #[tokio::test]
    async fn test_admin_extractor(
        #[case] authorization: Option<String>,
        #[case] expected: StatusCode,
    ) {
        assert_eq!(status_for("/admin", authorization).await, expected);
    }

    #[test]
    fn test_custom_admin_authority() {
        let service = JwtService::with_admin_authority(SECRET, "ROLE_ADMIN");

        assert_eq!(service.admin_authority(), "ROLE_ADMIN");
    }
}

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use movie_catalog_service::{
    infrastructure::{
        config::{
            AppConfig, AuthConfig, DatabaseConfig, LogFormat, LoggingConfig, PublicConfig,
            RuntimeMode, ServerConfig, StorageConfig,
        },
        http::create_app,
        storage::FilesystemStorage,
    },
    presentation::{handlers::AppState, middleware::JwtService},
};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use super::fixtures::InMemoryMovieRepository;

pub const BASE_URL: &str = "http://localhost:8080";
pub const JWT_SECRET: &str = "integration-secret";

pub fn test_config(poster_dir: &Path) -> AppConfig {
    AppConfig {
        mode: RuntimeMode::Local,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_upload_size: 1_000_000,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_seconds: 1,
            host: "localhost".to_string(),
            port: 5432,
            database: "movies_test".to_string(),
            user: "test".to_string(),
            password: "test".to_string(),
        },
        storage: StorageConfig {
            poster_path: poster_dir.display().to_string(),
            max_file_size: 64 * 1024,
        },
        app: PublicConfig { base_url: BASE_URL.to_string() },
        auth: AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            admin_authority: "ADMIN".to_string(),
        },
        logging: LoggingConfig { level: "debug".to_string(), format: LogFormat::Compact },
    }
}

/// The full router over an in-memory repository and a temporary poster directory
pub struct TestApp {
    pub router: Router,
    pub repository: InMemoryMovieRepository,
    pub poster_dir: TempDir,
    jwt_service: JwtService,
}

impl TestApp {
    pub fn new() -> Self {
        let poster_dir = TempDir::new().unwrap();
        let config = test_config(poster_dir.path());
        let repository = InMemoryMovieRepository::new();

        let state = AppState::new(
            Arc::new(repository.clone()),
            Arc::new(FilesystemStorage::new(poster_dir.path())),
            &config,
        );

        Self {
            router: create_app(&config, state),
            repository,
            poster_dir,
            jwt_service: JwtService::new(JWT_SECRET),
        }
    }

    pub fn admin_token(&self) -> String {
        self.jwt_service
            .create_token("admin@example.com", vec!["ADMIN".to_string(), "USER".to_string()], 1)
            .unwrap()
    }

    pub fn user_token(&self) -> String {
        self.jwt_service.create_token("user@example.com", vec!["USER".to_string()], 1).unwrap()
    }

    pub fn poster_exists(&self, name: &str) -> bool {
        self.poster_dir.path().join(name).exists()
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(Request::builder().uri(path).method("GET").body(Body::empty()).unwrap()).await
    }

    pub async fn multipart(
        &self,
        method: &str,
        path: &str,
        form: (Vec<u8>, String),
        token: Option<&str>,
    ) -> TestResponse {
        let (body, content_type) = form;
        let mut request =
            Request::builder().uri(path).method(method).header(header::CONTENT_TYPE, content_type);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        self.send(request.body(Body::from(body)).unwrap()).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        let mut request = Request::builder().uri(path).method("DELETE");
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        self.send(request.body(Body::empty()).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        TestResponse::new(response).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    async fn new(response: axum::response::Response) -> Self {
        let status = response.status();
        let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8_lossy(&body_bytes).into_owned();

        Self { status, body }
    }

    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(self.status, expected, "Response body: {}", self.body);
    }

    pub fn json<T>(&self) -> T
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_str(&self.body).unwrap()
    }
}

use serde_json::Value;

const BOUNDARY: &str = "----movie-catalog-test-boundary";

/// Builds `multipart/form-data` bodies the way browser clients send them
pub struct MultipartBuilder {
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    /// Add the movie JSON as a text part
    pub fn json_part(self, name: &str, value: &Value) -> Self {
        self.text_part(name, &value.to_string())
    }

    pub fn text_part(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\
                 Content-Type: application/json\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file_part(mut self, name: &str, filename: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Finish the body, returning it with its content type
    pub fn build(mut self) -> (Vec<u8>, String) {
        self.body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        (self.body, format!("multipart/form-data; boundary={BOUNDARY}"))
    }
}

/// Movie JSON as a client would send it
pub fn movie_json(title: &str, release_year: i32) -> Value {
    serde_json::json!({
        "title": title,
        "director": "Christopher Nolan",
        "studio": "Warner Bros",
        "movieCast": ["Leonardo DiCaprio", "Elliot Page"],
        "releaseYear": release_year
    })
}

/// A complete add-movie request body
pub fn add_movie_form(title: &str, release_year: i32, poster: &str) -> (Vec<u8>, String) {
    MultipartBuilder::new()
        .file_part("file", poster, b"\xFF\xD8\xFF\xE0 fake jpeg")
        .json_part("movieDto", &movie_json(title, release_year))
        .build()
}

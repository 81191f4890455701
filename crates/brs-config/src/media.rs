//! Public URLs for stored media files.

use std::env;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaConfig {
    /// Absolute base URL under which uploaded files are served,
    /// e.g. `https://brs.example.org/media`.
    pub base_url: String,
}

impl MediaConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("MEDIA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000/media".to_string()),
        }
    }

    /// Builds the public URL of a stored file. Links are always served over
    /// https, whatever scheme the base URL was configured with.
    pub fn absolute_url(&self, path: &str) -> String {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        match url.strip_prefix("http:") {
            Some(rest) => format!("https:{}", rest),
            None => url,
        }
    }
}

//! CORS configuration.
//!
//! `CORS_ALLOWED_ORIGINS` is a comma-separated list of origins
//! (default: `http://localhost:3000,http://localhost:5173`).

use std::env;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let raw = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string());
        Self::from_list(&raw)
    }

    pub fn from_list(raw: &str) -> Self {
        Self {
            allowed_origins: raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_list_trims_and_skips_empty() {
        let config = CorsConfig::from_list(" https://brs.example.org , ,http://localhost:5173");
        assert_eq!(
            config.allowed_origins,
            vec!["https://brs.example.org", "http://localhost:5173"]
        );
    }
}

//! # BRS Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: JWT signing secret and token lifetimes
//! - [`cors`]: allowed browser origins
//! - [`media`]: public base URL for uploaded files (profile photos)
//! - [`internal`]: shared key for service-to-service calls
//! - [`server`]: listen address
//!
//! ```ignore
//! use brs_config::{JwtConfig, CorsConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod internal;
pub mod jwt;
pub mod media;
pub mod server;

pub use cors::CorsConfig;
pub use internal::InternalApiConfig;
pub use jwt::JwtConfig;
pub use media::MediaConfig;
pub use server::ServerConfig;

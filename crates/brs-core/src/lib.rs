//! # BRS Core
//!
//! Core types, errors, and utilities shared by every crate of the BRS
//! identity service.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination utilities for list endpoints
//! - [`password`]: Password hashing and verification
//! - [`serde`]: Query-string friendly serde helpers
//!
//! # Example
//!
//! ```ignore
//! use brs_core::errors::AppError;
//! use brs_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Profile not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};

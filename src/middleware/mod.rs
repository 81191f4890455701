//! Authentication and authorization for request handlers.
//!
//! - [`auth`]: Bearer-token extractor and permission extractors
//! - [`role`]: Permission predicates and the staff route layer
//! - [`api_key`]: `X-API-KEY` authentication for internal callers
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::{AuthUser, IsEmployee};
//!
//! // Any valid token
//! async fn get_profile(auth_user: AuthUser) -> impl IntoResponse { /* ... */ }
//!
//! // Employee, admin or staff only
//! async fn department_users(IsEmployee(auth_user): IsEmployee) -> impl IntoResponse { /* ... */ }
//! ```

pub mod api_key;
pub mod auth;
pub mod role;

//! # BRS Auth
//!
//! JWT claims and token utilities.
//!
//! Tokens carry the user's role names, admin department and staff flag so
//! permission checks need no database round trip. Role changes take effect
//! on the next token refresh.
//!
//! ```ignore
//! use brs_auth::{TokenSubject, create_access_token, verify_token};
//!
//! let token = create_access_token(&subject, &jwt_config)?;
//! let claims = verify_token(&token, &jwt_config)?;
//! ```

pub mod claims;
pub mod jwt;

pub use claims::{Claims, TokenSubject};
pub use jwt::{create_access_token, refresh_access_token, verify_token};

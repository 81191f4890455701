//! JWT claim structures.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims for access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub username: String,
    /// Role names, e.g. `["employee", "teacher"]`
    pub roles: Vec<String>,
    /// Admin department code, if the user belongs to one
    pub admin_dep: Option<i16>,
    pub is_staff: bool,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
    /// Issued-at of the login that started this refresh chain
    pub orig_iat: usize,
}

/// Everything about a user that goes into a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: i64,
    pub username: String,
    pub roles: Vec<String>,
    pub admin_dep: Option<i16>,
    pub is_staff: bool,
}

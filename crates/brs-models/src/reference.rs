//! Reference data kept next to the identity tables.
//!
//! Academic degrees and titles are plain name lists maintained by staff.
//! Profiles store the degree and title as free text, so the catalogs only
//! feed pickers on the client side.

use crate::ids::{AcademicDegreeId, AcademicTitleId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AcademicDegree {
    pub id: AcademicDegreeId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AcademicTitle {
    pub id: AcademicTitleId,
    pub name: String,
}

/// Body for creating or renaming a catalog entry.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CatalogEntryDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Alternative login-independent name of a user. Each user has at most one
/// and aliases are unique across users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserAlias {
    pub id: i64,
    #[serde(rename = "user")]
    pub user_id: UserId,
    pub alias: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetAliasDto {
    #[validate(length(min = 1, max = 255))]
    pub alias: String,
}

//! User domain models and DTOs.

use crate::ids::UserId;
use crate::roles::{AdminDepartment, RoleKind, RoleSet};
use brs_core::serde::{deserialize_nullable, deserialize_optional_bool, deserialize_optional_string};
use brs_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A user account.
///
/// Name parts are never null; an unset part is the empty string.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub admin_dep: Option<AdminDepartment>,
    pub telegram_id: Option<i64>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: chrono::DateTime<chrono::Utc>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
}

impl User {
    /// `"middle first last"`, or an empty string when every part is blank.
    pub fn full_name(&self) -> String {
        full_name(&self.middle_name, &self.first_name, &self.last_name)
    }
}

pub fn full_name(middle_name: &str, first_name: &str, last_name: &str) -> String {
    if middle_name.is_empty() && first_name.is_empty() && last_name.is_empty() {
        return String::new();
    }
    format!("{} {} {}", middle_name, first_name, last_name)
}

/// Login lookup row; carries the password hash, so never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: UserId,
    pub password_hash: String,
    pub is_active: bool,
}

/// Compact user entry used by department listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub roles: Vec<RoleKind>,
}

/// Which profile rows currently exist for a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProfileFlags {
    pub user_profile: bool,
    pub student_profile: bool,
    pub brs_admin_profile: bool,
}

/// A user together with its roles and profile rows.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserWithRoles {
    #[serde(flatten)]
    pub user: User,
    pub full_name: String,
    pub roles: Vec<RoleKind>,
    pub profiles: ProfileFlags,
}

impl UserWithRoles {
    pub fn new(user: User, roles: &RoleSet, profiles: ProfileFlags) -> Self {
        Self {
            full_name: user.full_name(),
            user,
            roles: roles.to_vec(),
            profiles,
        }
    }
}

fn default_true() -> bool {
    true
}

/// DTO for creating a user from the admin surface.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub middle_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    pub admin_dep: Option<AdminDepartment>,
    pub telegram_id: Option<i64>,
    /// Initial role set; profile rows are created to match.
    #[serde(default)]
    pub roles: Vec<RoleKind>,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Partial update of a user. `null` clears nullable fields.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub middle_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<AdminDepartment>)]
    pub admin_dep: Option<Option<AdminDepartment>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>)]
    pub telegram_id: Option<Option<i64>>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

/// Role list body for the role mutation endpoints.
#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct RolesDto {
    pub roles: Vec<RoleKind>,
}

/// Query parameters for the admin user listing.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserFilterParams {
    /// Case-insensitive match on username or any name part
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    /// Role name, e.g. `teacher`
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl UserFilterParams {
    pub fn role_filter(&self) -> Result<Option<RoleKind>, String> {
        self.role.as_deref().map(str::parse).transpose()
    }
}

/// Paginated response containing users with roles.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<UserWithRoles>,
    pub meta: PaginationMeta,
}

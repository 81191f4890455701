use anyhow::Context;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use brs_auth::{Claims, verify_token};
use brs_core::AppError;
use brs_models::ids::UserId;
use brs_models::roles::{AdminDepartment, RoleKind, RoleSet};
use sqlx::{FromRow, PgPool};
use tracing::warn;

use crate::middleware::role;
use crate::state::AppState;

/// Extractor that validates the bearer JWT and provides the caller.
///
/// The token only identifies the user. Roles, `admin_dep` and `is_staff`
/// are reloaded from the database on every request, so disabling an account
/// or taking a role away applies to tokens already issued.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

/// The account state permission checks are evaluated against.
#[derive(Debug, Clone, FromRow)]
pub struct AccountState {
    pub username: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub admin_dep: Option<AdminDepartment>,
    pub role_ids: Vec<i16>,
}

impl AccountState {
    pub async fn load(db: &PgPool, user_id: UserId) -> Result<Option<Self>, AppError> {
        let state = sqlx::query_as::<_, AccountState>(
            "SELECT u.username, u.is_active, u.is_staff, u.admin_dep,
                    ARRAY(SELECT ur.role_id FROM user_roles ur
                          WHERE ur.user_id = u.id ORDER BY ur.role_id) AS role_ids
             FROM users u
             WHERE u.id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to load account state")
        .map_err(AppError::database)?;

        Ok(state)
    }

    /// Replaces the authorization fields of `claims` with the stored ones.
    /// Inactive accounts are rejected.
    pub fn apply(self, mut claims: Claims) -> Result<Claims, AppError> {
        if !self.is_active {
            return Err(AppError::unauthorized("User account is disabled".to_string()));
        }

        let roles = RoleSet::new(self.role_ids.into_iter().filter_map(RoleKind::from_id));
        claims.roles = roles.display_names(self.admin_dep);
        claims.admin_dep = self.admin_dep.map(|dep| dep.code());
        claims.is_staff = self.is_staff;
        claims.username = self.username;
        Ok(claims)
    }
}

impl AuthUser {
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .sub
            .parse::<UserId>()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }

    pub fn roles(&self) -> RoleSet {
        RoleSet::from_names(&self.0.roles)
    }

    pub fn admin_dep(&self) -> Option<AdminDepartment> {
        self.0.admin_dep.and_then(AdminDepartment::from_code)
    }

    pub fn is_staff(&self) -> bool {
        self.0.is_staff
    }

    pub fn username(&self) -> &str {
        &self.0.username
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format".to_string())
        })?;

        let token_user = AuthUser(verify_token(token, &state.jwt_config)?);
        let user_id = token_user.user_id()?;

        let account = AccountState::load(&state.db, user_id).await?.ok_or_else(|| {
            warn!(user.id = %user_id, "Token for a user that no longer exists");
            AppError::unauthorized("User not found".to_string())
        })?;

        Ok(AuthUser(account.apply(token_user.0)?))
    }
}

/// Declares an extractor that authenticates the caller and then applies a
/// permission check from [`crate::middleware::role`], rejecting with 403 and
/// `$message` when it fails.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $check:path, $message:literal) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = brs_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                if !$check(&auth_user) {
                    return Err(brs_core::AppError::forbidden($message.to_string()));
                }

                Ok($name(auth_user))
            }
        }
    };
}

require_permission!(IsEmployee, role::is_employee, "You are not an employee");
require_permission!(IsStudent, role::is_student, "You are not a student");
require_permission!(IsTeacher, role::is_teacher, "You are not a teacher");
require_permission!(IsBrsAdmin, role::is_brs_admin, "You are not a brs admin");
require_permission!(IsDeccan, role::is_deccan, "You are not a deccan");
require_permission!(IsStaff, role::is_staff, "Staff access required");

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            username: "petrova".to_string(),
            roles: vec!["teacher".to_string(), "dumr".to_string()],
            admin_dep: Some(1),
            is_staff: false,
            exp: 9999999999,
            iat: 1234567890,
            orig_iat: 1234567890,
        }
    }

    #[test]
    fn test_user_id_parses_subject() {
        let auth_user = AuthUser(claims("15"));
        assert_eq!(auth_user.user_id().unwrap(), UserId::new(15));
    }

    #[test]
    fn test_invalid_subject_is_unauthorized() {
        let auth_user = AuthUser(claims("not-a-number"));
        let err = auth_user.user_id().unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }

    fn account(is_active: bool, is_staff: bool, role_ids: Vec<i16>) -> AccountState {
        AccountState {
            username: "petrova_new".to_string(),
            is_active,
            is_staff,
            admin_dep: None,
            role_ids,
        }
    }

    #[test]
    fn test_stored_state_overrides_token() {
        let refreshed = account(true, true, vec![1, 6]).apply(claims("1")).unwrap();
        assert_eq!(refreshed.roles, vec!["employee", "student"]);
        assert_eq!(refreshed.admin_dep, None);
        assert!(refreshed.is_staff);
        assert_eq!(refreshed.username, "petrova_new");
        assert_eq!(refreshed.sub, "1");
    }

    #[test]
    fn test_inactive_account_is_unauthorized() {
        let err = account(false, true, vec![1]).apply(claims("1")).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(err.error.to_string(), "User account is disabled");
    }

    #[test]
    fn test_roles_skip_dumr_marker() {
        let auth_user = AuthUser(claims("1"));
        assert!(auth_user.roles().is_teacher());
        assert_eq!(auth_user.roles().to_vec().len(), 1);
        assert_eq!(auth_user.admin_dep(), Some(AdminDepartment::Dumr));
    }
}

//! Permission checks.
//!
//! The predicates read an [`AuthUser`] whose roles and flags were reloaded
//! from the database when the request was authenticated.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use brs_core::AppError;
use brs_models::ids::UserId;
use brs_models::roles::AdminDepartment;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Employee, admin, or staff.
pub fn is_employee(user: &AuthUser) -> bool {
    let roles = user.roles();
    roles.is_employee() || roles.is_admin() || user.is_staff()
}

pub fn is_student(user: &AuthUser) -> bool {
    user.roles().is_student()
}

pub fn is_teacher(user: &AuthUser) -> bool {
    user.roles().is_teacher()
}

pub fn is_brs_admin(user: &AuthUser) -> bool {
    user.roles().is_brs_admin()
}

/// DUMR staff, deccan, or staff.
pub fn is_deccan(user: &AuthUser) -> bool {
    user.admin_dep() == Some(AdminDepartment::Dumr) || user.roles().is_deccan() || user.is_staff()
}

pub fn is_staff(user: &AuthUser) -> bool {
    user.is_staff()
}

/// Rejects with 403 unless `owner` is the requester.
pub fn ensure_owner(requester: UserId, owner: UserId) -> Result<(), AppError> {
    if requester != owner {
        return Err(AppError::forbidden(
            "You don't have access to this object".to_string(),
        ));
    }
    Ok(())
}

/// Route layer for the admin surface.
///
/// ```rust,ignore
/// let admin_routes = init_admin_router()
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_staff));
/// ```
pub async fn require_staff(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let auth_user = match AuthUser::from_request_parts(&mut parts, &state).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    if !is_staff(&auth_user) {
        return AppError::forbidden("Staff access required".to_string()).into_response();
    }

    next.run(Request::from_parts(parts, body)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use brs_auth::Claims;

    fn user(roles: &[&str], admin_dep: Option<i16>, is_staff: bool) -> AuthUser {
        AuthUser(Claims {
            sub: "3".to_string(),
            username: "user".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            admin_dep,
            is_staff,
            exp: 9999999999,
            iat: 1234567890,
            orig_iat: 1234567890,
        })
    }

    #[test]
    fn test_is_employee() {
        assert!(is_employee(&user(&["employee"], None, false)));
        assert!(is_employee(&user(&["admin"], None, false)));
        assert!(is_employee(&user(&[], None, true)));
        assert!(!is_employee(&user(&["teacher", "student"], None, false)));
    }

    #[test]
    fn test_is_deccan() {
        assert!(is_deccan(&user(&["deccan"], None, false)));
        assert!(is_deccan(&user(&[], Some(1), false)));
        assert!(is_deccan(&user(&[], None, true)));
        assert!(!is_deccan(&user(&["brs_admin"], Some(2), false)));
    }

    #[test]
    fn test_single_role_checks() {
        let student = user(&["student"], None, true);
        assert!(is_student(&student));
        assert!(!is_teacher(&student));
        assert!(!is_brs_admin(&student));
        assert!(is_brs_admin(&user(&["brs_admin"], None, false)));
        assert!(is_teacher(&user(&["teacher"], None, false)));
    }

    #[test]
    fn test_ensure_owner() {
        assert!(ensure_owner(UserId::new(3), UserId::new(3)).is_ok());
        let err = ensure_owner(UserId::new(3), UserId::new(4)).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }
}

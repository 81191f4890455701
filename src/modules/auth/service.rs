use sqlx::PgPool;
use tracing::{info, instrument, warn};

use brs_auth::{Claims, TokenSubject, create_access_token, refresh_access_token, verify_token};
use brs_config::JwtConfig;
use brs_core::{AppError, verify_password};
use brs_models::auth::{LoginRequest, TokenResponse};
use brs_models::ids::UserId;
use brs_models::roles::RoleSet;
use brs_models::users::{UserCredentials, UserWithRoles};

use crate::modules::users::service::UserService;

pub struct AuthService;

fn token_subject(user: &UserWithRoles) -> TokenSubject {
    let roles = RoleSet::new(user.roles.iter().copied());
    TokenSubject {
        user_id: user.user.id.into_inner(),
        username: user.user.username.clone(),
        roles: roles.display_names(user.user.admin_dep),
        admin_dep: user.user.admin_dep.map(|dep| dep.code()),
        is_staff: user.user.is_staff,
    }
}

fn token_response(token: String, user: &UserWithRoles, subject: TokenSubject) -> TokenResponse {
    TokenResponse {
        token,
        user_id: user.user.id,
        role: subject.roles,
        full_name: user.full_name.clone(),
    }
}

impl AuthService {
    #[instrument(skip(db, dto, jwt_config), fields(user.username = %dto.username))]
    pub async fn obtain_token(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<TokenResponse, AppError> {
        let invalid = || AppError::unauthorized("Invalid username or password".to_string());

        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, password_hash, is_active FROM users WHERE username = $1",
        )
        .bind(&dto.username)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            warn!("Login attempt for unknown username");
            invalid()
        })?;

        if !verify_password(&dto.password, &credentials.password_hash)? {
            warn!(user.id = %credentials.id, "Login attempt with wrong password");
            return Err(invalid());
        }

        if !credentials.is_active {
            warn!(user.id = %credentials.id, "Login attempt for inactive user");
            return Err(AppError::unauthorized("User account is disabled".to_string()));
        }

        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(credentials.id)
            .execute(db)
            .await?;

        let user = UserService::get_user(db, credentials.id).await?;
        let subject = token_subject(&user);
        let token = create_access_token(&subject, jwt_config)?;

        info!(user.id = %credentials.id, "Token issued");

        Ok(token_response(token, &user, subject))
    }

    /// Exchanges a valid token for a fresh one carrying the current roles.
    #[instrument(skip(db, token, jwt_config))]
    pub async fn refresh_token(
        db: &PgPool,
        token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<TokenResponse, AppError> {
        let claims: Claims = verify_token(token, jwt_config)?;
        let user_id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))?;

        let user = UserService::fetch(db, user_id)
            .await?
            .filter(|user| user.user.is_active)
            .ok_or_else(|| AppError::unauthorized("User not found or disabled".to_string()))?;

        let subject = token_subject(&user);
        let token = refresh_access_token(&claims, &subject, jwt_config)?;

        info!(user.id = %user_id, "Token refreshed");

        Ok(token_response(token, &user, subject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brs_models::roles::{AdminDepartment, RoleKind};
    use brs_models::users::{ProfileFlags, User};
    use chrono::Utc;

    fn user(admin_dep: Option<AdminDepartment>) -> UserWithRoles {
        let user = User {
            id: UserId::new(5),
            username: "sidorov".to_string(),
            email: String::new(),
            first_name: "Petr".to_string(),
            middle_name: "Sidorov".to_string(),
            last_name: "Ilyich".to_string(),
            admin_dep,
            telegram_id: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            date_joined: Utc::now(),
            last_login: None,
        };
        let roles = RoleSet::new([RoleKind::Teacher, RoleKind::Employee]);
        UserWithRoles::new(user, &roles, ProfileFlags::default())
    }

    #[test]
    fn test_token_subject_orders_roles_and_adds_dumr() {
        let subject = token_subject(&user(Some(AdminDepartment::Dumr)));
        assert_eq!(subject.user_id, 5);
        assert_eq!(subject.roles, vec!["employee", "teacher", "dumr"]);
        assert_eq!(subject.admin_dep, Some(1));
    }

    #[test]
    fn test_token_response_uses_full_name() {
        let user = user(None);
        let subject = token_subject(&user);
        let response = token_response("t".to_string(), &user, subject);
        assert_eq!(response.full_name, "Sidorov Petr Ilyich");
        assert_eq!(response.role, vec!["employee", "teacher"]);
    }
}

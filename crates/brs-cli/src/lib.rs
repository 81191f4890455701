//! # BRS CLI
//!
//! Administrative commands for the BRS identity database: seeding the role
//! catalog, creating superusers and assigning roles outside the HTTP API.
//!
//! ```ignore
//! use brs_cli::{assign_roles, seed_roles};
//!
//! seed_roles(&pool).await?;
//! assign_roles(&pool, "jdoe", &[RoleKind::Teacher], false).await?;
//! ```

use brs_core::hash_password;
use brs_models::ids::UserId;
use brs_models::profiles::ProfilePlan;
use brs_models::roles::RoleKind;
use sqlx::PgPool;

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Inserts any missing catalog role. Returns how many rows were added.
pub async fn seed_roles(db: &PgPool) -> CliResult<u64> {
    let mut inserted = 0;
    for role in RoleKind::ALL {
        inserted += sqlx::query(
            "INSERT INTO roles (id, name) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING",
        )
        .bind(role.id())
        .bind(role.name())
        .execute(db)
        .await?
        .rows_affected();
    }
    Ok(inserted)
}

pub struct NewSuperuser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub middle_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
}

/// Creates an active staff superuser with no roles.
pub async fn create_superuser(db: &PgPool, new: NewSuperuser<'_>) -> CliResult<UserId> {
    let password_hash = hash_password(new.password)
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let user_id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users
            (username, email, first_name, middle_name, last_name, password_hash,
             is_active, is_staff, is_superuser)
         VALUES ($1, $2, $3, $4, $5, $6, TRUE, TRUE, TRUE)
         ON CONFLICT (username) DO NOTHING
         RETURNING id",
    )
    .bind(new.username)
    .bind(new.email)
    .bind(new.first_name)
    .bind(new.middle_name)
    .bind(new.last_name)
    .bind(&password_hash)
    .fetch_optional(db)
    .await?;

    user_id.ok_or_else(|| format!("User {:?} already exists", new.username).into())
}

/// Adds (or with `replace`, sets) roles of a user and synchronises its
/// profile rows in one transaction.
pub async fn assign_roles(
    db: &PgPool,
    username: &str,
    roles: &[RoleKind],
    replace: bool,
) -> CliResult<ProfilePlan> {
    let mut tx = db.begin().await?;

    let user_id = sqlx::query_scalar::<_, UserId>("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| format!("User {:?} not found", username))?;

    let plan = if replace {
        brs_db::roles::replace_roles(&mut *tx, user_id, roles).await?
    } else {
        brs_db::roles::add_roles(&mut *tx, user_id, roles).await?
    };

    tx.commit().await?;

    plan.ok_or_else(|| format!("User {:?} not found", username).into())
}

/// Parses role names given on the command line.
pub fn parse_roles(names: &[String]) -> CliResult<Vec<RoleKind>> {
    names
        .iter()
        .map(|name| name.parse::<RoleKind>().map_err(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roles() {
        let roles = parse_roles(&["teacher".to_string(), "brs_admin".to_string()]).unwrap();
        assert_eq!(roles, vec![RoleKind::Teacher, RoleKind::BrsAdmin]);
    }

    #[test]
    fn test_parse_roles_rejects_unknown() {
        assert!(parse_roles(&["janitor".to_string()]).is_err());
    }
}

//! Role-set reads and mutations.
//!
//! Every mutation re-synchronises the user's profile rows on the same
//! connection, so callers running inside a transaction get the role change
//! and its profile side-effects committed together.

use brs_models::ids::UserId;
use brs_models::profiles::ProfilePlan;
use brs_models::roles::{RoleKind, RoleSet};
use sqlx::PgConnection;
use tracing::instrument;

use crate::profiles::sync_profiles;

fn role_ids(roles: &[RoleKind]) -> Vec<i16> {
    roles.iter().map(|r| r.id()).collect()
}

/// The user's current roles, or `None` when the user does not exist.
///
/// Locks the user row so concurrent role mutations of one user serialise.
#[instrument(skip(conn))]
pub async fn load_role_set(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<Option<RoleSet>, sqlx::Error> {
    let exists = sqlx::query_scalar::<_, UserId>("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

    if exists.is_none() {
        return Ok(None);
    }

    let roles = sqlx::query_scalar::<_, RoleKind>(
        "SELECT role_id FROM user_roles WHERE user_id = $1 ORDER BY role_id",
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(RoleSet::new(roles)))
}

#[instrument(skip(conn))]
pub async fn add_roles(
    conn: &mut PgConnection,
    user_id: UserId,
    roles: &[RoleKind],
) -> Result<Option<ProfilePlan>, sqlx::Error> {
    sqlx::query(
        "INSERT INTO user_roles (user_id, role_id)
         SELECT u.id, r.role_id
         FROM users u, UNNEST($2::smallint[]) AS r(role_id)
         WHERE u.id = $1
         ON CONFLICT (user_id, role_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(role_ids(roles))
    .execute(&mut *conn)
    .await?;

    sync_profiles(conn, user_id).await
}

#[instrument(skip(conn))]
pub async fn remove_roles(
    conn: &mut PgConnection,
    user_id: UserId,
    roles: &[RoleKind],
) -> Result<Option<ProfilePlan>, sqlx::Error> {
    sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = ANY($2)")
        .bind(user_id)
        .bind(role_ids(roles))
        .execute(&mut *conn)
        .await?;

    sync_profiles(conn, user_id).await
}

#[instrument(skip(conn))]
pub async fn clear_roles(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<Option<ProfilePlan>, sqlx::Error> {
    sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    sync_profiles(conn, user_id).await
}

/// Replaces the role set wholesale.
#[instrument(skip(conn))]
pub async fn replace_roles(
    conn: &mut PgConnection,
    user_id: UserId,
    roles: &[RoleKind],
) -> Result<Option<ProfilePlan>, sqlx::Error> {
    sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND NOT (role_id = ANY($2))")
        .bind(user_id)
        .bind(role_ids(roles))
        .execute(&mut *conn)
        .await?;

    add_roles(conn, user_id, roles).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ids_follow_catalog() {
        assert_eq!(
            role_ids(&[RoleKind::Employee, RoleKind::Deccan, RoleKind::Student]),
            vec![1, 8, 6]
        );
    }
}

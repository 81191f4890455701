//! Profile synchronisation.
//!
//! A user owns a profile row of a variant exactly when its role set
//! satisfies the variant's predicate (see [`ProfileVariant::is_required_by`]).
//! [`sync_profiles`] restores that after any role change.

use brs_models::ids::UserId;
use brs_models::profiles::{ProfilePlan, ProfileVariant};
use brs_models::users::ProfileFlags;
use sqlx::PgConnection;
use tracing::{debug, instrument};

use crate::roles::load_role_set;

/// Deletes the profile rows the user's roles no longer call for and creates
/// the missing ones. Returns `None` when the user does not exist.
///
/// Creation uses `ON CONFLICT (user_id) DO NOTHING`, so a row created
/// concurrently by another transaction is left as is.
#[instrument(skip(conn))]
pub async fn sync_profiles(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<Option<ProfilePlan>, sqlx::Error> {
    let Some(roles) = load_role_set(conn, user_id).await? else {
        debug!(%user_id, "User vanished before profile sync");
        return Ok(None);
    };

    let plan = ProfilePlan::for_roles(&roles);

    for variant in &plan.remove {
        let sql = format!("DELETE FROM {} WHERE user_id = $1", variant.table_name());
        sqlx::query(&sql).bind(user_id).execute(&mut *conn).await?;
    }

    for variant in &plan.ensure {
        let sql = format!(
            "INSERT INTO {} (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING",
            variant.table_name()
        );
        sqlx::query(&sql).bind(user_id).execute(&mut *conn).await?;
    }

    debug!(%user_id, ensure = ?plan.ensure, remove = ?plan.remove, "Profiles synchronised");

    Ok(Some(plan))
}

/// Which profile rows exist for the user.
pub async fn profile_flags(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<ProfileFlags, sqlx::Error> {
    sqlx::query_as::<_, ProfileFlags>(
        "SELECT
            EXISTS(SELECT 1 FROM user_profiles WHERE user_id = $1) AS user_profile,
            EXISTS(SELECT 1 FROM student_profiles WHERE user_id = $1) AS student_profile,
            EXISTS(SELECT 1 FROM brs_admin_profiles WHERE user_id = $1) AS brs_admin_profile",
    )
    .bind(user_id)
    .fetch_one(conn)
    .await
}

/// Whether a row of `variant` exists for the user.
pub async fn has_profile(
    conn: &mut PgConnection,
    user_id: UserId,
    variant: ProfileVariant,
) -> Result<bool, sqlx::Error> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE user_id = $1)",
        variant.table_name()
    );
    sqlx::query_scalar::<_, bool>(&sql)
        .bind(user_id)
        .fetch_one(conn)
        .await
}

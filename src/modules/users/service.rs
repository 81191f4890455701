use anyhow::Context;
use brs_core::{AppError, PaginationMeta, hash_password};
use brs_db::{is_unique_violation, roles};
use brs_models::ids::UserId;
use brs_models::roles::{RoleKind, RoleSet};
use brs_models::users::{
    CreateUserDto, PaginatedUsersResponse, ProfileFlags, UpdateUserDto, User, UserFilterParams,
    UserWithRoles,
};
use sqlx::{FromRow, PgConnection, PgExecutor, PgPool};
use tracing::{debug, error, info, instrument, warn};

/// Every user column plus role ids and profile flags.
const USER_SELECT: &str = "SELECT u.id, u.username, u.email, u.first_name, u.middle_name,
        u.last_name, u.admin_dep, u.telegram_id, u.is_active, u.is_staff, u.is_superuser,
        u.date_joined, u.last_login,
        ARRAY(SELECT ur.role_id FROM user_roles ur WHERE ur.user_id = u.id ORDER BY ur.role_id)
            AS role_ids,
        EXISTS(SELECT 1 FROM user_profiles p WHERE p.user_id = u.id) AS user_profile,
        EXISTS(SELECT 1 FROM student_profiles p WHERE p.user_id = u.id) AS student_profile,
        EXISTS(SELECT 1 FROM brs_admin_profiles p WHERE p.user_id = u.id) AS brs_admin_profile
    FROM users u";

const USER_FILTERS: &str = " WHERE ($1::text IS NULL
        OR u.username ILIKE $1 OR u.first_name ILIKE $1
        OR u.middle_name ILIKE $1 OR u.last_name ILIKE $1)
    AND ($2::smallint IS NULL
        OR EXISTS(SELECT 1 FROM user_roles ur WHERE ur.user_id = u.id AND ur.role_id = $2))
    AND ($3::boolean IS NULL OR u.is_active = $3)";

#[derive(Debug, FromRow)]
struct UserRow {
    #[sqlx(flatten)]
    user: User,
    role_ids: Vec<i16>,
    #[sqlx(flatten)]
    profiles: ProfileFlags,
}

impl From<UserRow> for UserWithRoles {
    fn from(row: UserRow) -> Self {
        let roles: RoleSet = row.role_ids.into_iter().filter_map(RoleKind::from_id).collect();
        UserWithRoles::new(row.user, &roles, row.profiles)
    }
}

/// `%term%` for ILIKE, with the pattern metacharacters of `term` escaped.
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn map_user_write_error(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        let on_telegram = matches!(&e, sqlx::Error::Database(db_err)
            if db_err.constraint().is_some_and(|c| c.contains("telegram")));
        let message = if on_telegram {
            "This Telegram account is already linked to another user"
        } else {
            "A user with that username already exists"
        };
        warn!(error = %e, "Rejected duplicate user data");
        return AppError::bad_request(anyhow::anyhow!(message));
    }
    error!(error = %e, "Database error writing user");
    AppError::database(e)
}

/// A mutation of a user's role set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleChange {
    Replace(Vec<RoleKind>),
    Add(Vec<RoleKind>),
    Remove(Vec<RoleKind>),
    Clear,
}

pub struct UserService;

impl UserService {
    /// Loads a user with roles and profile flags.
    pub async fn fetch<'e, E>(executor: E, id: UserId) -> Result<Option<UserWithRoles>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!("{} WHERE u.id = $1", USER_SELECT);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row.map(UserWithRoles::from))
    }

    async fn fetch_existing(conn: &mut PgConnection, id: UserId) -> Result<UserWithRoles, AppError> {
        Self::fetch(conn, id)
            .await
            .context("Failed to load user")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: UserId) -> Result<UserWithRoles, AppError> {
        Self::fetch(db, id)
            .await
            .context("Failed to load user")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    #[instrument(skip(db, dto), fields(user.username = %dto.username, db.operation = "INSERT", db.table = "users"))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<UserWithRoles, AppError> {
        let password_hash = hash_password(&dto.password)?;

        let mut tx = db.begin().await?;

        let user_id = sqlx::query_scalar::<_, UserId>(
            "INSERT INTO users
                (username, password_hash, email, first_name, middle_name, last_name,
                 admin_dep, telegram_id, is_active, is_staff)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING id",
        )
        .bind(&dto.username)
        .bind(&password_hash)
        .bind(dto.email.as_deref().unwrap_or_default())
        .bind(&dto.first_name)
        .bind(&dto.middle_name)
        .bind(&dto.last_name)
        .bind(dto.admin_dep)
        .bind(dto.telegram_id)
        .bind(dto.is_active)
        .bind(dto.is_staff)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_user_write_error)?;

        roles::replace_roles(&mut tx, user_id, &dto.roles).await?;
        let user = Self::fetch_existing(&mut tx, user_id).await?;

        tx.commit().await?;

        info!(user.id = %user_id, roles = ?user.roles, "User created");

        Ok(user)
    }

    #[instrument(skip(db, filters), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn list_users(
        db: &PgPool,
        filters: UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let role = filters
            .role_filter()
            .map_err(|e| AppError::bad_request(anyhow::anyhow!(e)))?;
        let search = filters.search.as_deref().map(like_pattern);
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let count_sql = format!("SELECT COUNT(*) FROM users u{}", USER_FILTERS);
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(&search)
            .bind(role.map(RoleKind::id))
            .bind(filters.is_active)
            .fetch_one(db)
            .await
            .context("Failed to count users")
            .map_err(AppError::database)?;

        let data_sql = format!(
            "{}{} ORDER BY u.middle_name, u.id LIMIT $4 OFFSET $5",
            USER_SELECT, USER_FILTERS
        );
        let rows = sqlx::query_as::<_, UserRow>(&data_sql)
            .bind(&search)
            .bind(role.map(RoleKind::id))
            .bind(filters.is_active)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await
            .context("Failed to fetch users")
            .map_err(AppError::database)?;

        debug!(total, returned = rows.len(), "Users fetched");

        Ok(PaginatedUsersResponse {
            data: rows.into_iter().map(UserWithRoles::from).collect(),
            meta: PaginationMeta::new(&filters.pagination, total),
        })
    }

    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "users"))]
    pub async fn update_user(
        db: &PgPool,
        id: UserId,
        dto: UpdateUserDto,
    ) -> Result<UserWithRoles, AppError> {
        let mut tx = db.begin().await?;

        let mut user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, first_name, middle_name, last_name, admin_dep,
                    telegram_id, is_active, is_staff, is_superuser, date_joined, last_login
             FROM users WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        if let Some(first_name) = dto.first_name {
            user.first_name = first_name;
        }
        if let Some(middle_name) = dto.middle_name {
            user.middle_name = middle_name;
        }
        if let Some(last_name) = dto.last_name {
            user.last_name = last_name;
        }
        if let Some(email) = dto.email {
            user.email = email;
        }
        if let Some(admin_dep) = dto.admin_dep {
            user.admin_dep = admin_dep;
        }
        if let Some(telegram_id) = dto.telegram_id {
            user.telegram_id = telegram_id;
        }
        if let Some(is_active) = dto.is_active {
            user.is_active = is_active;
        }
        if let Some(is_staff) = dto.is_staff {
            user.is_staff = is_staff;
        }

        sqlx::query(
            "UPDATE users SET first_name = $2, middle_name = $3, last_name = $4, email = $5,
                admin_dep = $6, telegram_id = $7, is_active = $8, is_staff = $9
             WHERE id = $1",
        )
        .bind(id)
        .bind(&user.first_name)
        .bind(&user.middle_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(user.admin_dep)
        .bind(user.telegram_id)
        .bind(user.is_active)
        .bind(user.is_staff)
        .execute(&mut *tx)
        .await
        .map_err(map_user_write_error)?;

        if let Some(password) = dto.password {
            let password_hash = hash_password(&password)?;
            sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
                .bind(id)
                .bind(&password_hash)
                .execute(&mut *tx)
                .await?;
            info!(user.id = %id, "Password changed");
        }

        let updated = Self::fetch_existing(&mut tx, id).await?;
        tx.commit().await?;

        info!(user.id = %id, "User updated");

        Ok(updated)
    }

    #[instrument(skip(db))]
    pub async fn change_roles(
        db: &PgPool,
        id: UserId,
        change: RoleChange,
    ) -> Result<UserWithRoles, AppError> {
        let mut tx = db.begin().await?;

        let plan = match &change {
            RoleChange::Replace(new_roles) => roles::replace_roles(&mut tx, id, new_roles).await,
            RoleChange::Add(new_roles) => roles::add_roles(&mut tx, id, new_roles).await,
            RoleChange::Remove(old_roles) => roles::remove_roles(&mut tx, id, old_roles).await,
            RoleChange::Clear => roles::clear_roles(&mut tx, id).await,
        }
        .context("Failed to change roles")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        let user = Self::fetch_existing(&mut tx, id).await?;
        tx.commit().await?;

        info!(
            user.id = %id,
            change = ?change,
            roles = ?user.roles,
            profiles.ensured = ?plan.ensure,
            profiles.removed = ?plan.remove,
            "User roles changed"
        );

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ivan"), "%ivan%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}

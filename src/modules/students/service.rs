use anyhow::Context;
use brs_core::AppError;
use brs_models::ids::{GroupId, UserId};
use brs_models::profiles::{StudentProfile, UpdateStudentProfileDto};
use brs_models::tracking::needs_group_transfer;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crate::modules::students::transfer::GroupTransferService;

const STUDENT_COLUMNS: &str = "id, user_id, number_id, group_id, allowed, distance_education";

fn student_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("Student profile not found"))
}

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, user_id: UserId) -> Result<StudentProfile, AppError> {
        let sql = format!("SELECT {} FROM student_profiles WHERE user_id = $1", STUDENT_COLUMNS);
        sqlx::query_as::<_, StudentProfile>(&sql)
            .bind(user_id)
            .fetch_optional(db)
            .await
            .context("Failed to load student profile")
            .map_err(AppError::database)?
            .ok_or_else(student_not_found)
    }

    /// Partial update; a changed, non-null group moves the student's
    /// grade-tracking rows in the same transaction.
    #[instrument(skip(db), fields(db.operation = "UPDATE", db.table = "student_profiles"))]
    pub async fn update_student(
        db: &PgPool,
        user_id: UserId,
        dto: UpdateStudentProfileDto,
    ) -> Result<StudentProfile, AppError> {
        let mut tx = db.begin().await?;

        let sql = format!(
            "SELECT {} FROM student_profiles WHERE user_id = $1 FOR UPDATE",
            STUDENT_COLUMNS
        );
        let mut student = sqlx::query_as::<_, StudentProfile>(&sql)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(student_not_found)?;

        if let Some(Some(group_id)) = dto.group_id {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM groups WHERE id = $1)",
            )
            .bind(group_id)
            .fetch_one(&mut *tx)
            .await?;

            if !exists {
                warn!(group.id = %group_id, "Student update references a missing group");
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "group_id: object with id {} does not exist",
                    group_id
                )));
            }
        }

        let previous_group: Option<GroupId> = student.group_id;

        if let Some(number_id) = dto.number_id {
            student.number_id = number_id;
        }
        if let Some(group_id) = dto.group_id {
            student.group_id = group_id;
        }
        if let Some(allowed) = dto.allowed {
            student.allowed = allowed;
        }
        if let Some(distance_education) = dto.distance_education {
            student.distance_education = distance_education;
        }

        sqlx::query(
            "UPDATE student_profiles
             SET number_id = $2, group_id = $3, allowed = $4, distance_education = $5
             WHERE id = $1",
        )
        .bind(student.id)
        .bind(&student.number_id)
        .bind(student.group_id)
        .bind(student.allowed)
        .bind(student.distance_education)
        .execute(&mut *tx)
        .await?;

        if needs_group_transfer(previous_group, student.group_id)
            && let Some(group_id) = student.group_id
        {
            GroupTransferService::run(&mut tx, user_id, group_id)
                .await
                .context("Failed to transfer student to group")
                .map_err(AppError::database)?;
        }

        tx.commit().await?;

        info!(user.id = %user_id, "Student profile updated");

        Ok(student)
    }
}

//! Moves a student's grade-tracking rows to a new group.
//!
//! Grade sums and journal logs of disciplines outside the new group are
//! deleted, then one row per discipline (grade sums) or journal (journal
//! logs) of the new group is created. Existing rows are left alone, so a
//! repeated transfer to the same group is a no-op.

use brs_models::ids::{GroupId, UserId};
use brs_models::tracking::GroupTransferSummary;
use sqlx::PgConnection;
use tracing::{info, instrument};

pub struct GroupTransferService;

impl GroupTransferService {
    /// Runs on the caller's connection so it commits with the profile update.
    #[instrument(skip(conn))]
    pub async fn run(
        conn: &mut PgConnection,
        student_id: UserId,
        group_id: GroupId,
    ) -> Result<GroupTransferSummary, sqlx::Error> {
        let grade_sums_removed = sqlx::query(
            "DELETE FROM grade_sums
             WHERE student_id = $1
               AND discipline_id NOT IN (SELECT id FROM disciplines WHERE group_id = $2)",
        )
        .bind(student_id)
        .bind(group_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        let grade_sums_created = sqlx::query(
            "INSERT INTO grade_sums (student_id, discipline_id)
             SELECT $1, d.id FROM disciplines d WHERE d.group_id = $2
             ON CONFLICT (student_id, discipline_id) DO NOTHING",
        )
        .bind(student_id)
        .bind(group_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        let journal_logs_removed = sqlx::query(
            "DELETE FROM journal_logs
             WHERE student_id = $1
               AND discipline_id NOT IN (SELECT id FROM disciplines WHERE group_id = $2)",
        )
        .bind(student_id)
        .bind(group_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        let journal_logs_created = sqlx::query(
            "INSERT INTO journal_logs (journal_id, discipline_id, group_id, student_id, date)
             SELECT j.id, j.discipline_id, j.group_id, $1, j.date
             FROM journals j WHERE j.group_id = $2
             ON CONFLICT (journal_id, student_id) DO NOTHING",
        )
        .bind(student_id)
        .bind(group_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        let summary = GroupTransferSummary {
            grade_sums_removed,
            grade_sums_created,
            journal_logs_removed,
            journal_logs_created,
        };

        info!(
            student.id = %student_id,
            group.id = %group_id,
            grade_sums.removed = summary.grade_sums_removed,
            grade_sums.created = summary.grade_sums_created,
            journal_logs.removed = summary.journal_logs_removed,
            journal_logs.created = summary.journal_logs_created,
            "Group transfer applied"
        );

        Ok(summary)
    }
}

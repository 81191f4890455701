use anyhow::Context;
use brs_core::AppError;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};

/// Tables holding a plain list of names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    AcademicDegrees,
    AcademicTitles,
}

impl Catalog {
    pub const fn table(self) -> &'static str {
        match self {
            Catalog::AcademicDegrees => "academic_degrees",
            Catalog::AcademicTitles => "academic_titles",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Catalog::AcademicDegrees => "Academic degree",
            Catalog::AcademicTitles => "Academic title",
        }
    }

    fn not_found(self) -> AppError {
        AppError::not_found(anyhow::anyhow!("{} not found", self.label()))
    }
}

pub struct CatalogService;

impl CatalogService {
    #[instrument(skip(db))]
    pub async fn list<T>(db: &PgPool, catalog: Catalog) -> Result<Vec<T>, AppError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = format!("SELECT id, name FROM {} ORDER BY name, id", catalog.table());
        let entries = sqlx::query_as::<_, T>(&sql)
            .fetch_all(db)
            .await
            .with_context(|| format!("Failed to fetch {}", catalog.table()))
            .map_err(AppError::database)?;

        Ok(entries)
    }

    #[instrument(skip(db))]
    pub async fn create<T>(db: &PgPool, catalog: Catalog, name: &str) -> Result<T, AppError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = format!(
            "INSERT INTO {} (name) VALUES ($1) RETURNING id, name",
            catalog.table()
        );
        let entry = sqlx::query_as::<_, T>(&sql).bind(name).fetch_one(db).await?;

        info!(table = catalog.table(), "Catalog entry created");
        Ok(entry)
    }

    #[instrument(skip(db))]
    pub async fn rename<T>(db: &PgPool, catalog: Catalog, id: i64, name: &str) -> Result<T, AppError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = format!(
            "UPDATE {} SET name = $2 WHERE id = $1 RETURNING id, name",
            catalog.table()
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .bind(name)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| catalog.not_found())
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, catalog: Catalog, id: i64) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", catalog.table());
        let result = sqlx::query(&sql).bind(id).execute(db).await?;

        if result.rows_affected() == 0 {
            return Err(catalog.not_found());
        }

        info!(table = catalog.table(), id, "Catalog entry deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_tables() {
        assert_eq!(Catalog::AcademicDegrees.table(), "academic_degrees");
        assert_eq!(Catalog::AcademicTitles.table(), "academic_titles");
        let err = Catalog::AcademicTitles.not_found();
        assert_eq!(err.error.to_string(), "Academic title not found");
    }
}

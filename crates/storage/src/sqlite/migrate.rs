use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs the versioned migrations for the current schema.
///
/// Version 1 creates the active and completed areas, the per-user history
/// index, and their indexes.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        for table in ["active_assessments", "completed_assessments"] {
            sqlx::query(&format!(
                r"
                    CREATE TABLE IF NOT EXISTS {table} (
                        id TEXT PRIMARY KEY,
                        user_id TEXT NOT NULL,
                        state_json TEXT NOT NULL,
                        saved_at TEXT NOT NULL
                    );
                "
            ))
            .execute(&mut *tx)
            .await?;

            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_user ON {table}(user_id);"
            ))
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS assessment_history (
                    user_id TEXT NOT NULL,
                    assessment_id TEXT NOT NULL,
                    business_name TEXT NOT NULL,
                    industry TEXT NOT NULL,
                    completion_percentage REAL NOT NULL
                        CHECK (completion_percentage BETWEEN 0 AND 100),
                    area TEXT NOT NULL CHECK (area IN ('active', 'completed')),
                    started_at TEXT NOT NULL,
                    last_saved_at TEXT NOT NULL,
                    total_score INTEGER NOT NULL CHECK (total_score >= 0),
                    readiness_level TEXT,
                    PRIMARY KEY (user_id, assessment_id)
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_history_user_saved
                    ON assessment_history (user_id, last_saved_at, assessment_id);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_history_assessment
                    ON assessment_history (assessment_id);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}

use readiness_core::model::{AssessmentId, UserId};

use super::SqliteRepository;
use super::mapping::{conn, map_history_row};
use crate::repository::{HistoryEntry, HistoryRepository, StorageError};

const HISTORY_COLUMNS: &str = r"
    user_id, assessment_id, business_name, industry, completion_percentage,
    area, started_at, last_saved_at, total_score, readiness_level
";

#[async_trait::async_trait]
impl HistoryRepository for SqliteRepository {
    async fn list_history(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>, StorageError> {
        let sql = format!(
            r"
                SELECT {HISTORY_COLUMNS}
                FROM assessment_history
                WHERE user_id = ?1
                ORDER BY last_saved_at DESC, assessment_id DESC
                LIMIT ?2
            "
        );
        let rows = sqlx::query(&sql)
            .bind(user_id.as_str())
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_history_row(&row)?);
        }
        Ok(out)
    }

    async fn history_entry(&self, id: AssessmentId) -> Result<HistoryEntry, StorageError> {
        let sql = format!(
            r"
                SELECT {HISTORY_COLUMNS}
                FROM assessment_history
                WHERE assessment_id = ?1
            "
        );
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?
            .ok_or(StorageError::NotFound)?;

        map_history_row(&row)
    }
}

use chrono::{DateTime, Utc};
use readiness_core::model::{AssessmentId, AssessmentState};
use sqlx::Row;
use tracing::debug;

use super::SqliteRepository;
use super::mapping::{conn, decode_state, encode_state, ser, table_for};
use crate::repository::{AssessmentArea, AssessmentRepository, HistoryEntry, StorageError};

impl SqliteRepository {
    async fn find_in(
        &self,
        area: AssessmentArea,
        id: AssessmentId,
    ) -> Result<Option<String>, StorageError> {
        let sql = format!("SELECT state_json FROM {} WHERE id = ?1", table_for(area));
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        row.map(|r| r.try_get::<String, _>("state_json").map_err(ser))
            .transpose()
    }
}

#[async_trait::async_trait]
impl AssessmentRepository for SqliteRepository {
    async fn save(
        &self,
        state: &AssessmentState,
        saved_at: DateTime<Utc>,
    ) -> Result<AssessmentArea, StorageError> {
        let area = AssessmentArea::for_state(state);
        let entry = HistoryEntry::from_state(state, saved_at);
        let state_json = encode_state(state)?;
        let id = state.id().to_string();

        let mut tx = self.pool.begin().await.map_err(conn)?;

        let remove = format!("DELETE FROM {} WHERE id = ?1", table_for(area.other()));
        sqlx::query(&remove)
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        let upsert = format!(
            r"
                INSERT INTO {} (id, user_id, state_json, saved_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(id) DO UPDATE SET
                    user_id = excluded.user_id,
                    state_json = excluded.state_json,
                    saved_at = excluded.saved_at
            ",
            table_for(area)
        );
        sqlx::query(&upsert)
            .bind(&id)
            .bind(state.user_id().as_str())
            .bind(&state_json)
            .bind(saved_at)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        sqlx::query(
            r"
                INSERT INTO assessment_history (
                    user_id, assessment_id, business_name, industry,
                    completion_percentage, area, started_at, last_saved_at,
                    total_score, readiness_level
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                ON CONFLICT(user_id, assessment_id) DO UPDATE SET
                    business_name = excluded.business_name,
                    industry = excluded.industry,
                    completion_percentage = excluded.completion_percentage,
                    area = excluded.area,
                    started_at = excluded.started_at,
                    last_saved_at = excluded.last_saved_at,
                    total_score = excluded.total_score,
                    readiness_level = excluded.readiness_level
            ",
        )
        .bind(entry.user_id.as_str())
        .bind(&id)
        .bind(entry.business_name.as_str())
        .bind(entry.industry.as_str())
        .bind(entry.completion_percentage)
        .bind(entry.area.as_str())
        .bind(entry.started_at)
        .bind(entry.last_saved_at)
        .bind(i64::from(entry.total_score))
        .bind(entry.readiness_level.map(|level| level.label()))
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        tx.commit().await.map_err(conn)?;

        debug!(assessment_id = %id, %area, "saved assessment");
        Ok(area)
    }

    async fn load(&self, id: AssessmentId) -> Result<AssessmentState, StorageError> {
        for area in [AssessmentArea::Active, AssessmentArea::Completed] {
            if let Some(raw) = self.find_in(area, id).await? {
                let state = decode_state(&raw)?;
                if state.id() != id {
                    return Err(StorageError::Serialization(format!(
                        "row {id} holds state for {}",
                        state.id()
                    )));
                }
                return Ok(state);
            }
        }
        Err(StorageError::NotFound)
    }

    async fn locate(&self, id: AssessmentId) -> Result<AssessmentArea, StorageError> {
        for area in [AssessmentArea::Active, AssessmentArea::Completed] {
            if self.find_in(area, id).await?.is_some() {
                return Ok(area);
            }
        }
        Err(StorageError::NotFound)
    }
}

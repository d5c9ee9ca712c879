use readiness_core::model::{
    AssessmentId, AssessmentState, BusinessName, Industry, ReadinessLevel, UserId,
};
use sqlx::Row;

use crate::repository::{AssessmentArea, HistoryEntry, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn table_for(area: AssessmentArea) -> &'static str {
    match area {
        AssessmentArea::Active => "active_assessments",
        AssessmentArea::Completed => "completed_assessments",
    }
}

pub(crate) fn assessment_id_from_str(raw: &str) -> Result<AssessmentId, StorageError> {
    raw.parse().map_err(ser)
}

pub(crate) fn encode_state(state: &AssessmentState) -> Result<String, StorageError> {
    serde_json::to_string(state).map_err(ser)
}

pub(crate) fn decode_state(raw: &str) -> Result<AssessmentState, StorageError> {
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn map_history_row(row: &sqlx::sqlite::SqliteRow) -> Result<HistoryEntry, StorageError> {
    let assessment_id =
        assessment_id_from_str(row.try_get::<&str, _>("assessment_id").map_err(ser)?)?;
    let business_name =
        BusinessName::new(row.try_get::<&str, _>("business_name").map_err(ser)?).map_err(ser)?;
    let industry = Industry::parse(row.try_get::<&str, _>("industry").map_err(ser)?).map_err(ser)?;
    let area = AssessmentArea::parse(row.try_get::<&str, _>("area").map_err(ser)?)?;

    let total_score_i64: i64 = row.try_get("total_score").map_err(ser)?;
    let total_score = u32::try_from(total_score_i64).map_err(|_| {
        StorageError::Serialization(format!("invalid total_score: {total_score_i64}"))
    })?;

    let readiness_level = row
        .try_get::<Option<String>, _>("readiness_level")
        .map_err(ser)?
        .map(|label| {
            ReadinessLevel::from_label(&label).ok_or_else(|| {
                StorageError::Serialization(format!("invalid readiness_level: {label}"))
            })
        })
        .transpose()?;

    Ok(HistoryEntry {
        assessment_id,
        user_id: UserId::new(row.try_get::<String, _>("user_id").map_err(ser)?),
        business_name,
        industry,
        completion_percentage: row.try_get("completion_percentage").map_err(ser)?,
        area,
        started_at: row.try_get("started_at").map_err(ser)?,
        last_saved_at: row.try_get("last_saved_at").map_err(ser)?,
        total_score,
        readiness_level,
    })
}

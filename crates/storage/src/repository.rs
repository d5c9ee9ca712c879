use async_trait::async_trait;
use chrono::{DateTime, Utc};
use readiness_core::model::{
    AssessmentId, AssessmentState, BusinessName, Industry, ReadinessLevel, UserId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── AREAS ─────────────────────────────────────────────────────────────────────
//

/// Storage partition an assessment lives in. An id is in exactly one area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentArea {
    Active,
    Completed,
}

impl AssessmentArea {
    /// `Completed` iff every section of the assessment is complete.
    #[must_use]
    pub fn for_state(state: &AssessmentState) -> Self {
        if state.is_complete() {
            AssessmentArea::Completed
        } else {
            AssessmentArea::Active
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AssessmentArea::Active => "active",
            AssessmentArea::Completed => "completed",
        }
    }

    /// Parses the stored representation.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for unknown values.
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        match raw {
            "active" => Ok(AssessmentArea::Active),
            "completed" => Ok(AssessmentArea::Completed),
            other => Err(StorageError::Serialization(format!(
                "invalid area: {other}"
            ))),
        }
    }

    #[must_use]
    pub fn other(self) -> Self {
        match self {
            AssessmentArea::Active => AssessmentArea::Completed,
            AssessmentArea::Completed => AssessmentArea::Active,
        }
    }
}

impl fmt::Display for AssessmentArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── HISTORY ───────────────────────────────────────────────────────────────────
//

/// Per-user summary row for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub assessment_id: AssessmentId,
    pub user_id: UserId,
    pub business_name: BusinessName,
    pub industry: Industry,
    pub completion_percentage: f64,
    pub area: AssessmentArea,
    pub started_at: DateTime<Utc>,
    pub last_saved_at: DateTime<Utc>,
    pub total_score: u32,
    /// Only known once every section is answered.
    pub readiness_level: Option<ReadinessLevel>,
}

impl HistoryEntry {
    #[must_use]
    pub fn from_state(state: &AssessmentState, saved_at: DateTime<Utc>) -> Self {
        let area = AssessmentArea::for_state(state);
        Self {
            assessment_id: state.id(),
            user_id: state.user_id().clone(),
            business_name: state.business_name().clone(),
            industry: state.industry(),
            completion_percentage: state.completion_percentage(),
            area,
            started_at: state.started_at(),
            last_saved_at: saved_at,
            total_score: state.total_score(),
            readiness_level: (area == AssessmentArea::Completed)
                .then(|| state.readiness_level()),
        }
    }
}

/// Most recent first, ties broken by descending id.
pub(crate) fn sort_history(entries: &mut [HistoryEntry]) {
    entries.sort_by(|a, b| {
        b.last_saved_at
            .cmp(&a.last_saved_at)
            .then_with(|| b.assessment_id.cmp(&a.assessment_id))
    });
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Repository contract for assessment state.
#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    /// Persist the state into the area its completion implies, remove it
    /// from the other area, and upsert the owner's history entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the state cannot be stored.
    async fn save(
        &self,
        state: &AssessmentState,
        saved_at: DateTime<Utc>,
    ) -> Result<AssessmentArea, StorageError>;

    /// Fetch a state by id, looking in the active area first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn load(&self, id: AssessmentId) -> Result<AssessmentState, StorageError>;

    /// Report which area holds the assessment.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn locate(&self, id: AssessmentId) -> Result<AssessmentArea, StorageError>;
}

#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// List a user's assessments, most recently saved first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on query or decoding failures.
    async fn list_history(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>, StorageError>;

    /// Fetch the history entry for one assessment.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn history_entry(&self, id: AssessmentId) -> Result<HistoryEntry, StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct Areas {
    active: HashMap<AssessmentId, AssessmentState>,
    completed: HashMap<AssessmentId, AssessmentState>,
    history: HashMap<(UserId, AssessmentId), HistoryEntry>,
}

impl Areas {
    fn area_mut(&mut self, area: AssessmentArea) -> &mut HashMap<AssessmentId, AssessmentState> {
        match area {
            AssessmentArea::Active => &mut self.active,
            AssessmentArea::Completed => &mut self.completed,
        }
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    areas: Arc<Mutex<Areas>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Areas>, StorageError> {
        self.areas
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl AssessmentRepository for InMemoryRepository {
    async fn save(
        &self,
        state: &AssessmentState,
        saved_at: DateTime<Utc>,
    ) -> Result<AssessmentArea, StorageError> {
        let area = AssessmentArea::for_state(state);
        let entry = HistoryEntry::from_state(state, saved_at);
        let mut guard = self.lock()?;
        guard.area_mut(area.other()).remove(&state.id());
        guard.area_mut(area).insert(state.id(), state.clone());
        guard
            .history
            .insert((state.user_id().clone(), state.id()), entry);
        debug!(assessment_id = %state.id(), %area, "saved assessment");
        Ok(area)
    }

    async fn load(&self, id: AssessmentId) -> Result<AssessmentState, StorageError> {
        let guard = self.lock()?;
        guard
            .active
            .get(&id)
            .or_else(|| guard.completed.get(&id))
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn locate(&self, id: AssessmentId) -> Result<AssessmentArea, StorageError> {
        let guard = self.lock()?;
        if guard.active.contains_key(&id) {
            Ok(AssessmentArea::Active)
        } else if guard.completed.contains_key(&id) {
            Ok(AssessmentArea::Completed)
        } else {
            Err(StorageError::NotFound)
        }
    }
}

#[async_trait]
impl HistoryRepository for InMemoryRepository {
    async fn list_history(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>, StorageError> {
        let guard = self.lock()?;
        let mut entries: Vec<HistoryEntry> = guard
            .history
            .iter()
            .filter(|((owner, _), _)| owner == user_id)
            .map(|(_, entry)| entry.clone())
            .collect();
        sort_history(&mut entries);
        entries.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(entries)
    }

    async fn history_entry(&self, id: AssessmentId) -> Result<HistoryEntry, StorageError> {
        let guard = self.lock()?;
        guard
            .history
            .values()
            .find(|entry| entry.assessment_id == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub assessments: Arc<dyn AssessmentRepository>,
    pub history: Arc<dyn HistoryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let assessments: Arc<dyn AssessmentRepository> = Arc::new(repo.clone());
        let history: Arc<dyn HistoryRepository> = Arc::new(repo);
        Self {
            assessments,
            history,
        }
    }
}

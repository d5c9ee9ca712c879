#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    AssessmentArea, AssessmentRepository, HistoryEntry, HistoryRepository, InMemoryRepository,
    Storage, StorageError,
};
pub use sqlite::{SqliteInitError, SqliteRepository};

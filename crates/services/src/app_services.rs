use std::sync::Arc;

use readiness_core::ContentCatalog;
use readiness_storage::repository::Storage;
use tracing::info;

use crate::Clock;
use crate::assessments::AssessmentService;
use crate::error::AppServicesError;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<ContentCatalog>,
    assessments: Arc<AssessmentService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the reference catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// catalog does not validate.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let services = Self::with_storage(clock, &storage)?;
        info!(
            sections = services.catalog.section_count(),
            questions = services.catalog.question_count(),
            "services ready"
        );
        Ok(services)
    }

    /// Build services over throwaway in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Catalog` if the reference catalog does not
    /// validate.
    pub fn in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        Self::with_storage(clock, &Storage::in_memory())
    }

    fn with_storage(clock: Clock, storage: &Storage) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(ContentCatalog::reference()?);
        let assessments = Arc::new(AssessmentService::from_storage(
            clock,
            Arc::clone(&catalog),
            storage,
        ));
        Ok(Self {
            catalog,
            assessments,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<ContentCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn assessments(&self) -> Arc<AssessmentService> {
        Arc::clone(&self.assessments)
    }
}

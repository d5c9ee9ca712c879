use serde::Serialize;
use tracing::warn;

/// Consecutive failures tolerated before the caller is told to start over.
pub const MAX_CONSECUTIVE_ERRORS: u32 = 3;

/// A failure annotated with the tracker's view of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedFailure<E> {
    pub error: E,
    pub consecutive_failures: u32,
    pub fallback_available: bool,
    /// Set once the limit is reached; the session should be restarted.
    pub terminal: bool,
}

/// Per-session consecutive-failure counter.
///
/// Nothing retries automatically; the count only decides whether a caller
/// is offered a fallback or told the session is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorTracker {
    consecutive: u32,
    limit: u32,
}

impl Default for ErrorTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(MAX_CONSECUTIVE_ERRORS)
    }

    #[must_use]
    pub fn with_limit(limit: u32) -> Self {
        Self {
            consecutive: 0,
            limit,
        }
    }

    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive
    }

    #[must_use]
    pub fn fallback_available(&self) -> bool {
        self.consecutive < self.limit
    }

    pub fn record_success(&mut self) {
        self.consecutive = 0;
    }

    pub fn record_failure<E: std::fmt::Display>(&mut self, error: E) -> TrackedFailure<E> {
        self.consecutive = self.consecutive.saturating_add(1);
        let fallback_available = self.fallback_available();
        if fallback_available {
            warn!(consecutive = self.consecutive, %error, "operation failed");
        } else {
            warn!(
                consecutive = self.consecutive,
                limit = self.limit,
                %error,
                "consecutive error limit reached"
            );
        }
        TrackedFailure {
            error,
            consecutive_failures: self.consecutive,
            fallback_available,
            terminal: !fallback_available,
        }
    }

    /// Feeds an operation result through the counter.
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped in a `TrackedFailure`.
    pub fn observe<T, E: std::fmt::Display>(
        &mut self,
        result: Result<T, E>,
    ) -> Result<T, TrackedFailure<E>> {
        match result {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(error) => Err(self.record_failure(error)),
        }
    }
}

use crate::utils::error::{AppError, AppResult};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Tracks booking submissions that are still being processed, so a second
/// click on "book" cannot start a second insert.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGuard {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

/// Held for the lifetime of one submission; releases its key on drop.
#[derive(Debug)]
pub struct SubmissionTicket {
    key: String,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, key: String) -> AppResult<SubmissionTicket> {
        let mut in_flight = self
            .in_flight
            .lock()
            .map_err(|_| AppError::Conflict("submission tracking is unavailable".into()))?;

        if !in_flight.insert(key.clone()) {
            tracing::warn!(submission = %key, "duplicate booking submission rejected");
            return Err(AppError::Conflict(
                "This booking is already being submitted".into(),
            ));
        }

        Ok(SubmissionTicket {
            key,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.in_flight
            .lock()
            .map(|set| set.contains(key))
            .unwrap_or(false)
    }
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.remove(&self.key);
        }
    }
}

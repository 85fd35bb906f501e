//! Mock implementations of the pipeline's injected traits.

use composable_restful_core::{IdGenerationError, IdGenerator, RequestLog, Status};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Predictable identifiers: `{prefix}-1`, `{prefix}-2`, ...
///
/// # Example
///
/// ```
/// use composable_restful_testing::mocks::SequentialIdGenerator;
/// use composable_restful_core::IdGenerator;
///
/// let ids = SequentialIdGenerator::new("req");
/// assert_eq!(ids.generate().ok().as_deref(), Some("req-1"));
/// assert_eq!(ids.generate().ok().as_deref(), Some("req-2"));
/// ```
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Start counting at 1 under `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate(&self) -> Result<String, IdGenerationError> {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{}-{n}", self.prefix))
    }
}

/// Generator whose randomness source is always unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingIdGenerator;

impl IdGenerator for FailingIdGenerator {
    fn generate(&self) -> Result<String, IdGenerationError> {
        Err(IdGenerationError("entropy source unavailable".to_string()))
    }
}

/// One recorded log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    /// [`RequestLog::request_received`]
    Received {
        /// Request identifier
        request_id: String,
        /// HTTP method
        method: String,
        /// Request target
        target: String,
    },
    /// [`RequestLog::response_sent`]
    Sent {
        /// Request identifier
        request_id: String,
        /// Status written to the transport
        status: Status,
    },
}

/// [`RequestLog`] that keeps every event in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingRequestLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingRequestLog {
    /// Empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All events in the order they were recorded.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// `(request_id, method, target)` of every received event.
    #[must_use]
    pub fn received(&self) -> Vec<(String, String, String)> {
        self.lock()
            .iter()
            .filter_map(|entry| match entry {
                LogEntry::Received {
                    request_id,
                    method,
                    target,
                } => Some((request_id.clone(), method.clone(), target.clone())),
                LogEntry::Sent { .. } => None,
            })
            .collect()
    }

    /// `(request_id, status)` of every sent event.
    #[must_use]
    pub fn sent(&self) -> Vec<(String, Status)> {
        self.lock()
            .iter()
            .filter_map(|entry| match entry {
                LogEntry::Sent { request_id, status } => Some((request_id.clone(), *status)),
                LogEntry::Received { .. } => None,
            })
            .collect()
    }
}

impl RequestLog for RecordingRequestLog {
    fn request_received(&self, request_id: &str, method: &str, target: &str) {
        self.lock().push(LogEntry::Received {
            request_id: request_id.to_string(),
            method: method.to_string(),
            target: target.to_string(),
        });
    }

    fn response_sent(&self, request_id: &str, status: Status) {
        self.lock().push(LogEntry::Sent {
            request_id: request_id.to_string(),
            status,
        });
    }
}

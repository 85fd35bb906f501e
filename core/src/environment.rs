//! Injected dependencies of the request pipeline.
//!
//! The pipeline never reaches for a global: identifier generation and the
//! request log sink are traits handed to it at construction, so tests can swap
//! in deterministic or recording implementations.

use crate::response::Status;
use rand::RngCore;
use rand::rngs::OsRng;
use thiserror::Error;
use uuid::{Builder, Uuid};

/// The randomness source behind an [`IdGenerator`] was unavailable.
#[derive(Debug, Error)]
#[error("Failed to generate request identifier: {0}")]
pub struct IdGenerationError(pub String);

/// Produces an opaque, effectively unique identifier per call.
pub trait IdGenerator: Send + Sync {
    /// Generate the next identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdGenerationError`] when no identifier can be produced.
    fn generate(&self) -> Result<String, IdGenerationError>;
}

/// Random (version 4) UUIDs drawn from the operating system RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> Result<String, IdGenerationError> {
        let mut bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| IdGenerationError(e.to_string()))?;

        let uuid: Uuid = Builder::from_random_bytes(bytes).into_uuid();
        Ok(uuid.to_string())
    }
}

/// Sink for the two events recorded around every dispatched request.
pub trait RequestLog: Send + Sync {
    /// A request was received and bound to `request_id`.
    fn request_received(&self, request_id: &str, method: &str, target: &str);

    /// The response for `request_id` is about to be written.
    fn response_sent(&self, request_id: &str, status: Status);
}

/// [`RequestLog`] that emits structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRequestLog;

impl RequestLog for TracingRequestLog {
    fn request_received(&self, request_id: &str, method: &str, target: &str) {
        tracing::info!(request_id, method, target, "Request");
    }

    fn response_sent(&self, request_id: &str, status: Status) {
        tracing::info!(request_id, status = status.code(), "Response");
    }
}

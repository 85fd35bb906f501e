//! # Composable Restful Testing
//!
//! Testing utilities and helpers for composable-restful services.
//!
//! This crate provides:
//! - Deterministic and failing implementations of the pipeline's injected traits
//! - A recording request log for asserting on the per-request log events
//! - An in-process HTTP client driving an `axum::Router` without a socket
//!
//! ## Example
//!
//! ```ignore
//! use composable_restful_testing::{RecordingRequestLog, SequentialIdGenerator, TestClient};
//!
//! #[tokio::test]
//! async fn test_create_widget() {
//!     let log = Arc::new(RecordingRequestLog::new());
//!     let pipeline = RequestPipeline::new(Arc::new(Store::default()))
//!         .with_id_generator(Arc::new(SequentialIdGenerator::new("req")))
//!         .with_request_log(log.clone());
//!     let router = RestService::with_pipeline(pipeline)
//!         .register(Arc::new(Widgets))?
//!         .into_router();
//!
//!     let response = TestClient::new(router).post("/widgets/", r#"{"name":"a"}"#).await;
//!     assert_eq!(response.status, StatusCode::CREATED);
//!     assert_eq!(log.sent()[0].0, "req-1");
//! }
//! ```

pub mod client;
pub mod mocks;

// Re-export commonly used items
pub use client::{TestClient, TestResponse};
pub use mocks::{FailingIdGenerator, LogEntry, RecordingRequestLog, SequentialIdGenerator};

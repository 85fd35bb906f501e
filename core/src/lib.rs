//! # Composable Restful Core
//!
//! Transport-free building blocks for convention-driven REST controllers.
//!
//! A resource is served at two URL shapes derived from one root path:
//!
//! ```text
//! {root}/        collection   GET → list, POST → create
//! {root}/{uuid}  item         GET → get, PUT → update, DELETE → delete
//! ```
//!
//! This crate owns the parts of that contract that do not depend on an HTTP
//! library:
//!
//! - [`path`]: collection path normalization
//! - [`response`]: the response envelope and its factory constructors
//! - [`environment`]: identifier generation and the request log sink
//!
//! The axum binding lives in `composable-restful-web`.
//!
//! ## Example
//!
//! ```
//! use composable_restful_core::{Response, Status};
//!
//! let response = Response::created("42", "/widgets/42");
//! assert_eq!(response.status(), Status::Created);
//! assert_eq!(response.location(), Some("/widgets/42"));
//! ```

pub mod environment;
pub mod path;
pub mod response;

pub use environment::{IdGenerationError, IdGenerator, RequestLog, TracingRequestLog, UuidGenerator};
pub use path::normalize_collection_path;
pub use response::{ContentType, IDENTIFIER_HEADER, LOCATION_HEADER, Response, Status};

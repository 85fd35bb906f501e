//! Axum dispatch layer for convention-driven REST controllers.
//!
//! A controller names a root path and implements any of five operations.
//! Registering it installs two routes, and optionally a third:
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | GET | `R/` | `list` |
//! | POST | `R/` | `create` |
//! | GET | `R/{uuid}` | `get` |
//! | PUT | `R/{uuid}` | `update` |
//! | DELETE | `R/{uuid}` | `delete` |
//! | GET | `R/invoke` | `list` (action route) |
//! | POST | `R/invoke` | `create` (action route) |
//! | anything else | | 405, empty body |
//!
//! # Request Flow
//!
//! 1. **axum** matches the path and hands the request to the route's handler
//! 2. **Pipeline** generates a request id, buffers the body, builds a [`RequestContext`]
//! 3. **Entry log**: request id, method, target
//! 4. **Dispatch** through the `(route kind, method)` table to the controller
//! 5. **Exit log**: request id, status
//! 6. **Write** the [`Response`] envelope onto the HTTP response
//!
//! # Example
//!
//! ```ignore
//! use composable_restful_web::{Controller, RequestContext, Response, RestService, ServerConfig};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct Ping;
//!
//! #[async_trait]
//! impl Controller<()> for Ping {
//!     fn root_path(&self) -> &str {
//!         "/ping"
//!     }
//!
//!     async fn list(&self, _request: &RequestContext<()>) -> Response {
//!         Response::plain("pong")
//!     }
//! }
//!
//! let config = ServerConfig::from_env();
//! RestService::from_config((), &config)
//!     .register(Arc::new(Ping))?
//!     .serve(&config)
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod pipeline;
pub mod router;
pub mod server;

// Re-export key types for convenience
pub use async_trait::async_trait;
pub use composable_restful_core::{ContentType, Response, Status};
pub use config::ServerConfig;
pub use context::{RequestContext, UUID_VARIABLE};
pub use controller::{Controller, Operation, RouteKind};
pub use error::{DecodeError, RegistrationError, ServeError};
pub use pipeline::{RequestPipeline, write_response};
pub use router::{RestService, RouteRecord};

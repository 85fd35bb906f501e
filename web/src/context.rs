//! Per-request context handed to controllers.
//!
//! A [`RequestContext`] is built once at the start of the pipeline and is
//! read-only afterwards. It bundles:
//!
//! - the generated request identifier
//! - the service-wide shared context (`C`, one value for the process lifetime)
//! - the inbound request head, the matched path variables, and the buffered body
//!
//! # Example
//!
//! ```ignore
//! async fn update(&self, request: &RequestContext<Db>) -> Response {
//!     let id = request.resource_identifier();
//!     match request.decode_body::<WidgetPatch>() {
//!         Ok(patch) => request.context().apply(id, patch),
//!         Err(e) => Response::unprocessable_entity(e.to_string()),
//!     }
//! }
//! ```

use crate::error::DecodeError;
use axum::body::Bytes;
use http::{HeaderMap, Method, Uri, request::Parts};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::StreamDeserializer;
use serde_json::de::SliceRead;
use std::collections::HashMap;
use std::sync::Arc;

/// Placeholder name used by item routes for the resource identifier.
pub const UUID_VARIABLE: &str = "uuid";

/// Everything a controller can see about one request.
#[derive(Debug)]
pub struct RequestContext<C> {
    id: String,
    shared: Arc<C>,
    parts: Parts,
    variables: HashMap<String, String>,
    body: Result<Bytes, String>,
}

impl<C> RequestContext<C> {
    /// Create a context with no path variables and an empty body.
    #[must_use]
    pub fn new(id: impl Into<String>, shared: Arc<C>, parts: Parts) -> Self {
        Self {
            id: id.into(),
            shared,
            parts,
            variables: HashMap::new(),
            body: Ok(Bytes::new()),
        }
    }

    /// Attach the variables extracted from the matched path template.
    #[must_use]
    pub fn with_variables(mut self, variables: HashMap<String, String>) -> Self {
        self.variables = variables;
        self
    }

    /// Attach the buffered request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Ok(body.into());
        self
    }

    /// Record that the body could not be read; decoding will report `reason`.
    #[must_use]
    pub(crate) fn with_body_error(mut self, reason: impl Into<String>) -> Self {
        self.body = Err(reason.into());
        self
    }

    /// Identifier generated for this request.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The service-wide shared context.
    #[must_use]
    pub fn context(&self) -> &C {
        &self.shared
    }

    /// Shared handle to the service-wide context, for moving into spawned work.
    #[must_use]
    pub const fn shared(&self) -> &Arc<C> {
        &self.shared
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.parts.method
    }

    /// Request target.
    #[must_use]
    pub const fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Full request head, including extensions installed by outer layers.
    #[must_use]
    pub const fn parts(&self) -> &Parts {
        &self.parts
    }

    /// Value bound to the path placeholder `name`, or `""` when absent.
    #[must_use]
    pub fn variable(&self, name: &str) -> &str {
        self.variables.get(name).map_or("", String::as_str)
    }

    /// All path variables of the matched route.
    #[must_use]
    pub const fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }

    /// Shorthand for `variable("uuid")`.
    #[must_use]
    pub fn resource_identifier(&self) -> &str {
        self.variable(UUID_VARIABLE)
    }

    /// Raw body bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Body`] if the body could not be read.
    pub fn body(&self) -> Result<&[u8], DecodeError> {
        self.body
            .as_deref()
            .map_err(|reason| DecodeError::Body(reason.clone()))
    }

    /// Decode the body as a single JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Body`] if the body could not be read and
    /// [`DecodeError::Json`] if it is not valid JSON for `T`.
    pub fn decode_body<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        Ok(serde_json::from_slice(self.body()?)?)
    }

    /// Incremental decoder over a body holding zero or more JSON values.
    ///
    /// Each item is decoded on demand; errors are yielded per item and the
    /// caller decides what to do with them.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Body`] if the body could not be read.
    pub fn body_decoder<'a, T: Deserialize<'a>>(
        &'a self,
    ) -> Result<StreamDeserializer<'a, SliceRead<'a>, T>, DecodeError> {
        Ok(serde_json::Deserializer::from_slice(self.body()?).into_iter::<T>())
    }
}

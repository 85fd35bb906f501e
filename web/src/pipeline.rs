//! The per-request pipeline.
//!
//! Every routed request walks the same four states:
//!
//! ```text
//! Received ──► ContextBuilt ──► Dispatched ──► ResponseSent
//!    id        entry log, body     controller    exit log + write
//! ```
//!
//! The entry event is emitted before the body is buffered. A request whose
//! path variables cannot be extracted skips dispatch and answers 400.
//!
//! There are no retries and no partial responses: each request yields exactly
//! one [`Response`] envelope, one exit log event carrying its status, and one
//! HTTP response with that same status.
//!
//! # Identifier failure
//!
//! A request cannot be dispatched without an identifier. When the generator
//! fails the pipeline does not halt the process; it logs an error, records the
//! exit event under [`UNASSIGNED_REQUEST_ID`], and answers 500 without calling
//! the controller.

use crate::context::RequestContext;
use crate::controller::{Controller, RouteKind, dispatch};
use axum::body::Body;
use axum::extract::Request;
use composable_restful_core::{
    IDENTIFIER_HEADER, IdGenerator, LOCATION_HEADER, RequestLog, Response, TracingRequestLog,
    UuidGenerator,
};
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::StatusCode;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Request id recorded when the identifier generator failed.
pub const UNASSIGNED_REQUEST_ID: &str = "unassigned";

/// Default cap on buffered request bodies (2 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Builds the request context, dispatches, logs, and writes the response.
///
/// One pipeline is shared by every route of a service.
pub struct RequestPipeline<C> {
    shared: Arc<C>,
    ids: Arc<dyn IdGenerator>,
    log: Arc<dyn RequestLog>,
    body_limit: usize,
}

impl<C> RequestPipeline<C>
where
    C: Send + Sync + 'static,
{
    /// Pipeline with random UUID request ids and `tracing` request logging.
    #[must_use]
    pub fn new(shared: Arc<C>) -> Self {
        Self {
            shared,
            ids: Arc::new(UuidGenerator),
            log: Arc::new(TracingRequestLog),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Replace the request identifier generator.
    #[must_use]
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Replace the request log sink.
    #[must_use]
    pub fn with_request_log(mut self, log: Arc<dyn RequestLog>) -> Self {
        self.log = log;
        self
    }

    /// Cap on buffered request bodies, in bytes.
    #[must_use]
    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }

    /// The service-wide shared context.
    #[must_use]
    pub const fn shared(&self) -> &Arc<C> {
        &self.shared
    }

    /// Cap on buffered request bodies, in bytes.
    #[must_use]
    pub const fn body_limit(&self) -> usize {
        self.body_limit
    }

    /// Run one request through the pipeline.
    pub async fn handle(
        &self,
        kind: RouteKind,
        controller: &dyn Controller<C>,
        variables: HashMap<String, String>,
        request: Request,
    ) -> axum::response::Response {
        let started = Instant::now();
        let (context, body) = match self.begin(request) {
            Ok(begun) => begun,
            Err(response) => return self.send(UNASSIGNED_REQUEST_ID, response, started),
        };

        let context = match axum::body::to_bytes(body, self.body_limit).await {
            Ok(bytes) => context.with_variables(variables).with_body(bytes),
            Err(e) => {
                tracing::debug!(request_id = %context.id(), error = %e, "Request body unreadable");
                context.with_variables(variables).with_body_error(e.to_string())
            }
        };

        let response = dispatch(kind, controller, &context).await;

        self.send(context.id(), response, started)
    }

    /// Answer 400 without dispatching, for a request whose path variables
    /// could not be extracted (for example a segment that is not UTF-8 once
    /// percent-decoded).
    ///
    /// The request still gets an identifier and both log events.
    pub async fn reject_path_variables(&self, request: Request, reason: &str) -> axum::response::Response {
        let started = Instant::now();
        let (context, _body) = match self.begin(request) {
            Ok(begun) => begun,
            Err(response) => return self.send(UNASSIGNED_REQUEST_ID, response, started),
        };

        tracing::debug!(
            request_id = %context.id(),
            target = %context.uri(),
            reason,
            "Path variables rejected"
        );

        self.send(context.id(), Response::bad_request(), started)
    }

    /// Assign the identifier, build the context and emit the entry event.
    ///
    /// The body is handed back untouched, so the entry event never waits on
    /// the upload. On identifier failure the 500 envelope comes back for the
    /// caller to send.
    fn begin(&self, request: Request) -> Result<(RequestContext<C>, Body), Response> {
        let (parts, body) = request.into_parts();

        let id = match self.ids.generate() {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    method = %parts.method,
                    target = %parts.uri,
                    "Request rejected without identifier"
                );
                return Err(Response::internal_server_error(e.to_string()));
            }
        };

        let context = RequestContext::new(id, Arc::clone(&self.shared), parts);
        self.log.request_received(
            context.id(),
            context.method().as_str(),
            &context.uri().to_string(),
        );

        Ok((context, body))
    }

    fn send(&self, request_id: &str, response: Response, started: Instant) -> axum::response::Response {
        let status = response.status();
        self.log.response_sent(request_id, status);

        metrics::counter!("http.responses.total", "status" => status.code().to_string()).increment(1);
        metrics::histogram!("http.request.duration_seconds").record(started.elapsed().as_secs_f64());

        write_response(response)
    }
}

/// Serialize an envelope onto an HTTP response.
///
/// Headers are written in a fixed order: `Content-Type`, `Location`, `X-UUID`,
/// then any extra headers. A header value that is not valid header text is
/// skipped with a warning; status and body are written regardless.
#[must_use]
pub fn write_response(response: Response) -> axum::response::Response {
    let status =
        StatusCode::from_u16(response.status().code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut headers: Vec<(HeaderName, HeaderValue)> = Vec::with_capacity(3 + response.headers().len());
    if let Some(content_type) = response.content_type() {
        headers.push((CONTENT_TYPE, HeaderValue::from_static(content_type.as_str())));
    }
    if let Some(location) = response.location() {
        push_header(&mut headers, LOCATION_HEADER, location);
    }
    if let Some(identifier) = response.identifier() {
        push_header(&mut headers, IDENTIFIER_HEADER, identifier);
    }
    for (name, value) in response.headers() {
        push_header(&mut headers, name, value);
    }

    let body = response.into_body();
    let mut out = if body.is_empty() {
        axum::response::Response::new(Body::empty())
    } else {
        axum::response::Response::new(Body::from(body))
    };

    *out.status_mut() = status;
    for (name, value) in headers {
        out.headers_mut().append(name, value);
    }
    out
}

fn push_header(headers: &mut Vec<(HeaderName, HeaderValue)>, name: &str, value: &str) {
    match (HeaderName::try_from(name), HeaderValue::from_str(value)) {
        (Ok(name), Ok(value)) => headers.push((name, value)),
        _ => tracing::warn!(header = name, "Skipping header that is not valid HTTP header text"),
    }
}

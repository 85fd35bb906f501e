//! Response envelope and the taxonomy of standard outcomes.
//!
//! Controllers never touch the transport. They return a [`Response`] value built
//! with one of the factories below, and the web layer writes it to the wire.
//!
//! | Factory | Status | Content-Type | Body | Extra headers |
//! |---|---|---|---|---|
//! | [`Response::created`] | 201 | none | empty | `Location`, `X-UUID` |
//! | [`Response::updated`] | 201 | none | empty | none |
//! | [`Response::deleted`] | 201 | none | empty | none |
//! | [`Response::bad_request`] | 400 | none | empty | none |
//! | [`Response::internal_server_error`] | 500 | text/plain | info | none |
//! | [`Response::not_found`] | 404 | none | empty | none |
//! | [`Response::conflict`] | 409 | none | empty | none |
//! | [`Response::method_not_allowed`] | 405 | none | empty | none |
//! | [`Response::unprocessable_entity`] | 422 | none | message | none |
//! | [`Response::plain`] | 200 | text/plain | text | none |
//! | [`Response::json`] | 200 / 500 | application/json / text/plain | JSON / error text | none |

use serde::Serialize;
use std::fmt;

/// Header carrying the identifier of a newly created resource.
pub const IDENTIFIER_HEADER: &str = "X-UUID";

/// Header carrying the URL of a newly created resource.
pub const LOCATION_HEADER: &str = "Location";

/// The fixed set of status codes a [`Response`] can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// 200
    Ok,
    /// 201
    Created,
    /// 204
    NoContent,
    /// 400
    BadRequest,
    /// 404
    NotFound,
    /// 405
    MethodNotAllowed,
    /// 409
    Conflict,
    /// 422
    UnprocessableEntity,
    /// 500
    InternalServerError,
}

impl Status {
    /// Numeric HTTP status code.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::NoContent => 204,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::Conflict => 409,
            Self::UnprocessableEntity => 422,
            Self::InternalServerError => 500,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Body media types a [`Response`] can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// `application/json`
    Json,
    /// `text/plain`
    PlainText,
}

impl ContentType {
    /// MIME string written to the `Content-Type` header.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::PlainText => "text/plain",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete HTTP response, described before it is written to the transport.
///
/// Built through the factory constructors; fields are read-only afterwards
/// except for [`Response::with_header`], which returns a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: Status,
    content_type: Option<ContentType>,
    location: Option<String>,
    identifier: Option<String>,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    const fn bare(status: Status) -> Self {
        Self {
            status,
            content_type: None,
            location: None,
            identifier: None,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    fn with_body(status: Status, content_type: Option<ContentType>, body: Vec<u8>) -> Self {
        Self {
            content_type,
            body,
            ..Self::bare(status)
        }
    }

    /// 201 with `Location` and `X-UUID` headers pointing at the new resource.
    #[must_use]
    pub fn created(id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            identifier: Some(id.into()),
            ..Self::bare(Status::Created)
        }
    }

    /// 201, empty body.
    ///
    /// Kept at 201 rather than 200/204: existing clients match on it.
    #[must_use]
    pub const fn updated() -> Self {
        Self::bare(Status::Created)
    }

    /// 201, empty body. Same status as [`Response::updated`].
    #[must_use]
    pub const fn deleted() -> Self {
        Self::bare(Status::Created)
    }

    /// 400, empty body.
    #[must_use]
    pub const fn bad_request() -> Self {
        Self::bare(Status::BadRequest)
    }

    /// 500 with the error description as a plain-text body.
    #[must_use]
    pub fn internal_server_error(info: impl Into<String>) -> Self {
        Self::with_body(
            Status::InternalServerError,
            Some(ContentType::PlainText),
            info.into().into_bytes(),
        )
    }

    /// 404, empty body.
    #[must_use]
    pub const fn not_found() -> Self {
        Self::bare(Status::NotFound)
    }

    /// 409, empty body.
    #[must_use]
    pub const fn conflict() -> Self {
        Self::bare(Status::Conflict)
    }

    /// 405, empty body.
    #[must_use]
    pub const fn method_not_allowed() -> Self {
        Self::bare(Status::MethodNotAllowed)
    }

    /// 422 carrying `message` as the body, with no declared content type.
    #[must_use]
    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        Self::with_body(
            Status::UnprocessableEntity,
            None,
            message.into().into_bytes(),
        )
    }

    /// 200 with a plain-text body.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::with_body(Status::Ok, Some(ContentType::PlainText), text.into().into_bytes())
    }

    /// 200 with `value` serialized as JSON.
    ///
    /// A serialization failure never escapes: it becomes
    /// [`Response::internal_server_error`] carrying the serializer's message.
    #[must_use]
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::with_body(Status::Ok, Some(ContentType::Json), body),
            Err(e) => {
                tracing::warn!(error = %e, "JSON response serialization failed");
                Self::internal_server_error(e.to_string())
            }
        }
    }

    /// Append an extra header written after the standard ones.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Status code.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Declared body media type, if any.
    #[must_use]
    pub const fn content_type(&self) -> Option<ContentType> {
        self.content_type
    }

    /// Value for the `Location` header, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Value for the `X-UUID` header, if any.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Extra headers in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Raw body bytes; empty means no body is written.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consume the envelope, yielding the body bytes.
    #[must_use]
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

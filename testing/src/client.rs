//! In-process HTTP client for router tests.
//!
//! Requests go straight into the `axum::Router` through `tower::ServiceExt::oneshot`;
//! no socket is opened.

#![allow(clippy::expect_used)] // Test helper: failures should abort the test

use axum::Router;
use axum::body::{Body, Bytes};
use http::{HeaderMap, Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

/// Drives a router with synthetic requests.
#[derive(Debug, Clone)]
pub struct TestClient {
    router: Router,
}

/// Fully buffered response.
#[derive(Debug, Clone)]
pub struct TestResponse {
    /// Status line
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
}

impl TestResponse {
    /// Header value as text, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body as UTF-8 text (lossy).
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body decoded as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON for `T`.
    #[must_use]
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("response body should be valid JSON")
    }
}

impl TestClient {
    /// Wrap a finished router.
    #[must_use]
    pub const fn new(router: Router) -> Self {
        Self { router }
    }

    /// Send one request and buffer the whole response.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send(&self, method: Method, uri: &str, body: impl Into<Body>) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(body.into())
            .expect("test request should build");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .expect("response body should be readable");

        TestResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }

    /// `GET uri`
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, Body::empty()).await
    }

    /// `POST uri` with `body`
    pub async fn post(&self, uri: &str, body: impl Into<Body>) -> TestResponse {
        self.send(Method::POST, uri, body).await
    }

    /// `PUT uri` with `body`
    pub async fn put(&self, uri: &str, body: impl Into<Body>) -> TestResponse {
        self.send(Method::PUT, uri, body).await
    }

    /// `DELETE uri`
    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, Body::empty()).await
    }
}

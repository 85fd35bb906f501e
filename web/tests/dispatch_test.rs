//! End-to-end dispatch tests.
//!
//! Drives a real `axum::Router` built by `RestService` in-process and checks
//! routing precedence, default-deny, action reuse, the response envelope on the
//! wire, and that the logged status always matches the written one.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Integration tests can use unwrap/expect

use axum::http::StatusCode;
use composable_restful_testing::{RecordingRequestLog, SequentialIdGenerator, TestClient};
use composable_restful_web::{
    Controller, RequestContext, RequestPipeline, Response, RestService, Status, async_trait,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Widget {
    name: String,
}

/// Shared service context: the widget table.
#[derive(Default)]
struct Store {
    widgets: RwLock<HashMap<String, Widget>>,
}

struct Widgets;

#[async_trait]
impl Controller<Store> for Widgets {
    fn root_path(&self) -> &str {
        "/widgets"
    }

    async fn create(&self, request: &RequestContext<Store>) -> Response {
        let widget: Widget = match request.decode_body() {
            Ok(widget) => widget,
            Err(e) => return Response::unprocessable_entity(e.to_string()),
        };
        let id = request.id().to_string();
        let mut widgets = request.context().widgets.write().unwrap();
        if widgets.values().any(|w| w.name == widget.name) {
            return Response::conflict();
        }
        widgets.insert(id.clone(), widget);
        Response::created(id.clone(), self.location(&id))
    }

    async fn get(&self, request: &RequestContext<Store>) -> Response {
        let widgets = request.context().widgets.read().unwrap();
        match widgets.get(request.resource_identifier()) {
            Some(widget) => Response::json(widget),
            None => Response::not_found(),
        }
    }

    async fn update(&self, request: &RequestContext<Store>) -> Response {
        let Ok(widget) = request.decode_body::<Widget>() else {
            return Response::bad_request();
        };
        let mut widgets = request.context().widgets.write().unwrap();
        match widgets.get_mut(request.resource_identifier()) {
            Some(existing) => {
                *existing = widget;
                Response::updated()
            }
            None => Response::not_found(),
        }
    }

    async fn delete(&self, request: &RequestContext<Store>) -> Response {
        let mut widgets = request.context().widgets.write().unwrap();
        match widgets.remove(request.resource_identifier()) {
            Some(_) => Response::deleted(),
            None => Response::not_found(),
        }
    }

    async fn list(&self, request: &RequestContext<Store>) -> Response {
        let widgets = request.context().widgets.read().unwrap();
        let mut names: Vec<&str> = widgets.values().map(|w| w.name.as_str()).collect();
        names.sort_unstable();
        Response::json(&names)
    }
}

/// Overrides only `list`; counts every invocation of any operation.
#[derive(Default)]
struct Reports {
    calls: AtomicUsize,
}

#[async_trait]
impl Controller<Store> for Reports {
    fn root_path(&self) -> &str {
        "/reports/"
    }

    async fn list(&self, _request: &RequestContext<Store>) -> Response {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Response::plain("no reports")
    }
}

/// Action endpoint: echoes the submitted job back.
struct Jobs;

#[async_trait]
impl Controller<Store> for Jobs {
    fn root_path(&self) -> &str {
        "/jobs"
    }

    async fn create(&self, request: &RequestContext<Store>) -> Response {
        match request.decode_body::<Value>() {
            Ok(job) => Response::json(&json!({ "accepted": job })),
            Err(_) => Response::bad_request(),
        }
    }
}

struct Harness {
    client: TestClient,
    log: Arc<RecordingRequestLog>,
    reports: Arc<Reports>,
}

fn harness() -> Harness {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let log = Arc::new(RecordingRequestLog::new());
    let pipeline = RequestPipeline::new(Arc::new(Store::default()))
        .with_id_generator(Arc::new(SequentialIdGenerator::new("req")))
        .with_request_log(log.clone());

    let reports = Arc::new(Reports::default());
    let jobs: Arc<dyn Controller<Store>> = Arc::new(Jobs);

    let router = RestService::with_pipeline(pipeline)
        .register(Arc::new(Widgets))
        .unwrap()
        .register(reports.clone())
        .unwrap()
        .register(Arc::clone(&jobs))
        .unwrap()
        .register_action(jobs)
        .unwrap()
        .into_router();

    Harness {
        client: TestClient::new(router),
        log,
        reports,
    }
}

#[tokio::test]
async fn test_collection_and_item_routes() {
    let h = harness();

    let created = h.client.post("/widgets/", r#"{"name":"sprocket"}"#).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.header("location"), Some("/widgets/req-1"));
    assert_eq!(created.header("x-uuid"), Some("req-1"));
    assert!(created.body.is_empty());
    assert!(created.header("content-type").is_none());

    let listed = h.client.get("/widgets/").await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.header("content-type"), Some("application/json"));
    assert_eq!(listed.json::<Vec<String>>(), vec!["sprocket"]);

    let fetched = h.client.get("/widgets/req-1").await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(
        fetched.json::<Widget>(),
        Widget {
            name: "sprocket".to_string()
        }
    );
}

#[tokio::test]
async fn test_update_and_delete_answer_201() {
    let h = harness();
    h.client.post("/widgets/", r#"{"name":"a"}"#).await;

    let updated = h.client.put("/widgets/req-1", r#"{"name":"b"}"#).await;
    assert_eq!(updated.status, StatusCode::CREATED);
    assert!(updated.body.is_empty());

    let deleted = h.client.delete("/widgets/req-1").await;
    assert_eq!(deleted.status, StatusCode::CREATED);

    let gone = h.client.get("/widgets/req-1").await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert!(gone.body.is_empty());
    assert!(gone.header("content-type").is_none());
}

#[tokio::test]
async fn test_client_error_envelopes() {
    let h = harness();
    h.client.post("/widgets/", r#"{"name":"a"}"#).await;

    let conflict = h.client.post("/widgets/", r#"{"name":"a"}"#).await;
    assert_eq!(conflict.status, StatusCode::CONFLICT);

    let malformed = h.client.post("/widgets/", "{").await;
    assert_eq!(malformed.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(malformed.text().starts_with("Invalid JSON body"));

    let bad = h.client.put("/widgets/req-1", "not json").await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_put_on_collection_is_405_without_invocation() {
    let h = harness();

    let response = h.client.put("/reports/", "").await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.body.is_empty());
    assert_eq!(h.reports.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_default_deny_for_unoverridden_operations() {
    let h = harness();

    assert_eq!(h.client.post("/reports/", "{}").await.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(h.client.get("/reports/r1").await.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(h.client.put("/reports/r1", "{}").await.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(h.client.delete("/reports/r1").await.status, StatusCode::METHOD_NOT_ALLOWED);

    let listed = h.client.get("/reports/").await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.header("content-type"), Some("text/plain"));
    assert_eq!(listed.text(), "no reports");
    assert_eq!(h.reports.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unlisted_methods_are_405() {
    let h = harness();

    let patch = h.client.send(axum::http::Method::PATCH, "/widgets/x", "{}").await;
    assert_eq!(patch.status, StatusCode::METHOD_NOT_ALLOWED);

    let options = h.client.send(axum::http::Method::OPTIONS, "/widgets/", "").await;
    assert_eq!(options.status, StatusCode::METHOD_NOT_ALLOWED);

    let delete_collection = h.client.delete("/widgets/").await;
    assert_eq!(delete_collection.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_action_route_reuses_collection_dispatch() {
    let h = harness();
    let body = r#"{"task":"reindex"}"#;

    let via_collection = h.client.post("/jobs/", body).await;
    let via_action = h.client.post("/jobs/invoke", body).await;

    assert_eq!(via_action.status, StatusCode::OK);
    assert_eq!(via_action.status, via_collection.status);
    assert_eq!(via_action.body, via_collection.body);
    assert_eq!(
        via_action.header("content-type"),
        via_collection.header("content-type")
    );
    assert_eq!(via_action.json::<Value>()["accepted"]["task"], "reindex");

    // GET on the action route reaches `list`, which Jobs does not override.
    assert_eq!(h.client.get("/jobs/invoke").await.status, StatusCode::METHOD_NOT_ALLOWED);
    // Other items under the same root still reach the item table.
    assert_eq!(h.client.get("/jobs/other").await.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_path_shape_is_exact() {
    let h = harness();

    assert_eq!(h.client.get("/widgets").await.status, StatusCode::NOT_FOUND);
    assert_eq!(h.client.get("/widgets/a/b").await.status, StatusCode::NOT_FOUND);
    assert_eq!(h.client.get("/unknown/").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logged_target_is_the_raw_request_uri() {
    let h = harness();
    h.client.post("/widgets/", r#"{"name":"x"}"#).await;

    let missing = h.client.get("/widgets/no%20such").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let received = h.log.received();
    assert_eq!(received.last().unwrap().2, "/widgets/no%20such");
}

#[tokio::test]
async fn test_every_request_logs_the_status_it_wrote() {
    let h = harness();

    let mut written = Vec::new();
    written.push(h.client.post("/widgets/", r#"{"name":"a"}"#).await.status);
    written.push(h.client.get("/widgets/req-1").await.status);
    written.push(h.client.get("/widgets/zzz").await.status);
    written.push(h.client.put("/reports/", "").await.status);
    written.push(h.client.post("/widgets/", "{").await.status);
    written.push(h.client.post("/jobs/invoke", "{}").await.status);

    let sent = h.log.sent();
    assert_eq!(sent.len(), written.len());
    for ((_, logged), wire) in sent.iter().zip(&written) {
        assert_eq!(logged.code(), wire.as_u16());
    }

    let received = h.log.received();
    assert_eq!(received.len(), written.len());
    for ((received_id, _, _), (sent_id, _)) in received.iter().zip(&sent) {
        assert_eq!(received_id, sent_id);
    }
    assert_eq!(received[0], ("req-1".to_string(), "POST".to_string(), "/widgets/".to_string()));
    assert_eq!(sent[3].1, Status::MethodNotAllowed);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_controller() {
    let h = harness();

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let client = h.client.clone();
            tokio::spawn(async move { client.post("/widgets/", format!(r#"{{"name":"w{i}"}}"#)).await })
        })
        .collect();
    let responses: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.expect("task panicked"))
        .collect();

    assert!(responses.iter().all(|r| r.status == StatusCode::CREATED));
    let ids: std::collections::HashSet<_> = responses
        .iter()
        .map(|r| r.header("x-uuid").unwrap().to_string())
        .collect();
    assert_eq!(ids.len(), 32);
    assert_eq!(h.client.get("/widgets/").await.json::<Vec<String>>().len(), 32);
}

#[tokio::test]
async fn test_undecodable_item_segment_is_bad_request() {
    let h = harness();
    h.client.post("/widgets/", r#"{"name":"sprocket"}"#).await;

    let response = h.client.get("/widgets/%FF").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.is_empty());

    let sent = h.log.sent();
    assert_eq!(sent.last(), Some(&("req-2".to_string(), Status::BadRequest)));
    assert_eq!(
        h.log.received().last(),
        Some(&("req-2".to_string(), "GET".to_string(), "/widgets/%FF".to_string()))
    );

    // Collection routes carry no variables and are unaffected.
    assert_eq!(h.client.get("/widgets/").await.status, StatusCode::OK);
}

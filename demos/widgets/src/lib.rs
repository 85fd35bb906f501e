//! Widgets demo service.
//!
//! An in-memory `widgets` resource with full CRUD, and a `jobs` action endpoint
//! (`POST /jobs/invoke`) that accepts work without storing it.

use composable_restful_core::{IdGenerator, UuidGenerator};
use composable_restful_web::{
    Controller, RegistrationError, RequestContext, Response, RestService, async_trait,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// A stored widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    /// Display name, unique across the store
    pub name: String,
    /// Number of teeth
    #[serde(default)]
    pub teeth: u32,
}

/// Widget as returned by the API.
#[derive(Debug, Clone, Serialize)]
struct WidgetView<'a> {
    id: &'a str,
    #[serde(flatten)]
    widget: &'a Widget,
}

/// Shared service context.
#[derive(Debug, Default)]
pub struct AppContext {
    widgets: RwLock<BTreeMap<String, Widget>>,
    ids: UuidGenerator,
}

impl AppContext {
    /// Number of stored widgets.
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.widgets.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// CRUD over the widget store.
#[derive(Debug, Default)]
pub struct Widgets;

#[async_trait]
impl Controller<AppContext> for Widgets {
    fn root_path(&self) -> &str {
        "/widgets"
    }

    async fn create(&self, request: &RequestContext<AppContext>) -> Response {
        let widget: Widget = match request.decode_body() {
            Ok(widget) => widget,
            Err(e) => return Response::unprocessable_entity(e.to_string()),
        };
        if widget.name.trim().is_empty() {
            return Response::unprocessable_entity("name must not be empty");
        }

        let ctx = request.context();
        let id = match ctx.ids.generate() {
            Ok(id) => id,
            Err(e) => return Response::internal_server_error(e.to_string()),
        };

        let mut widgets = ctx.widgets.write().unwrap_or_else(PoisonError::into_inner);
        if widgets.values().any(|w| w.name == widget.name) {
            return Response::conflict();
        }
        widgets.insert(id.clone(), widget);
        tracing::debug!(request_id = %request.id(), widget_id = %id, "Widget created");

        let location = self.location(&id);
        Response::created(id, location)
    }

    async fn get(&self, request: &RequestContext<AppContext>) -> Response {
        let id = request.resource_identifier();
        let widgets = request
            .context()
            .widgets
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        match widgets.get(id) {
            Some(widget) => Response::json(&WidgetView { id, widget }),
            None => Response::not_found(),
        }
    }

    async fn update(&self, request: &RequestContext<AppContext>) -> Response {
        let Ok(widget) = request.decode_body::<Widget>() else {
            return Response::bad_request();
        };

        let mut widgets = request
            .context()
            .widgets
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match widgets.get_mut(request.resource_identifier()) {
            Some(existing) => {
                *existing = widget;
                Response::updated()
            }
            None => Response::not_found(),
        }
    }

    async fn delete(&self, request: &RequestContext<AppContext>) -> Response {
        let mut widgets = request
            .context()
            .widgets
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match widgets.remove(request.resource_identifier()) {
            Some(_) => Response::deleted(),
            None => Response::not_found(),
        }
    }

    async fn list(&self, request: &RequestContext<AppContext>) -> Response {
        let widgets = request
            .context()
            .widgets
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let views: Vec<WidgetView<'_>> = widgets
            .iter()
            .map(|(id, widget)| WidgetView { id, widget })
            .collect();
        Response::json(&views)
    }
}

/// A job submitted to the action endpoint.
#[derive(Debug, Deserialize)]
struct Job {
    task: String,
}

/// Accepts jobs at `POST /jobs/invoke`.
#[derive(Debug, Default)]
pub struct Jobs;

#[async_trait]
impl Controller<AppContext> for Jobs {
    fn root_path(&self) -> &str {
        "/jobs"
    }

    async fn create(&self, request: &RequestContext<AppContext>) -> Response {
        match request.decode_body::<Job>() {
            Ok(job) => {
                tracing::info!(request_id = %request.id(), task = %job.task, "Job accepted");
                Response::plain(format!("accepted {}", job.task))
            }
            Err(e) => Response::unprocessable_entity(e.to_string()),
        }
    }
}

/// Register every demo controller on `service`.
///
/// # Errors
///
/// Returns [`RegistrationError`] if a route collides with one already installed.
pub fn register_all(service: RestService<AppContext>) -> Result<RestService<AppContext>, RegistrationError> {
    service
        .register(Arc::new(Widgets))?
        .register_action(Arc::new(Jobs))
}

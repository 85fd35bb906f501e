//! Route registration.
//!
//! [`RestService`] turns controllers into axum routes. Each registration
//! installs handlers that accept every HTTP method; the method table in
//! [`crate::controller`] decides what runs.
//!
//! | Call | Path template | Route kind |
//! |---|---|---|
//! | [`RestService::register`] | `{root}/` | collection |
//! | | `{root}/:uuid` | item |
//! | [`RestService::register_action`] | `{root}/invoke` | collection |
//!
//! Routes are installed once, in call order, before serving starts. A path
//! template that is already installed is refused with
//! [`RegistrationError::DuplicateRoute`]. Roots must be absolute literal paths;
//! one containing `:` or `*` is refused with [`RegistrationError::InvalidPath`].
//!
//! # Example
//!
//! ```ignore
//! let app = RestService::new(AppContext::default())
//!     .register(Arc::new(Widgets::default()))?
//!     .register_action(Arc::new(Jobs::default()))?
//!     .into_router();
//! ```

use crate::context::UUID_VARIABLE;
use crate::controller::{Controller, RouteKind};
use crate::error::RegistrationError;
use crate::pipeline::RequestPipeline;
use axum::Router;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Request};
use axum::routing::any;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Final segment of action routes.
pub const ACTION_SEGMENT: &str = "invoke";

/// One installed route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    /// Normalized root URL of the controller that owns the route.
    pub root: String,
    /// Method table the route dispatches through.
    pub kind: RouteKind,
    /// Path template handed to axum.
    pub path: String,
}

/// A set of controllers bound to one shared context and one pipeline.
pub struct RestService<C> {
    router: Router,
    pipeline: Arc<RequestPipeline<C>>,
    routes: Vec<RouteRecord>,
    paths: HashSet<String>,
}

impl<C> RestService<C>
where
    C: Send + Sync + 'static,
{
    /// Service with the default pipeline around `context`.
    #[must_use]
    pub fn new(context: C) -> Self {
        Self::with_pipeline(RequestPipeline::new(Arc::new(context)))
    }

    /// Service using a preconfigured pipeline.
    #[must_use]
    pub fn with_pipeline(pipeline: RequestPipeline<C>) -> Self {
        Self {
            router: Router::new(),
            pipeline: Arc::new(pipeline),
            routes: Vec::new(),
            paths: HashSet::new(),
        }
    }

    /// Install the collection route `{root}/` and the item route `{root}/:uuid`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateRoute`] if either path is already
    /// installed, or [`RegistrationError::InvalidPath`] if the root is not
    /// absolute or contains `:` or `*`. Nothing is installed in either case.
    pub fn register(self, controller: Arc<dyn Controller<C>>) -> Result<Self, RegistrationError> {
        let root = controller.root_url();
        let item = format!("{root}:{UUID_VARIABLE}");

        ensure_literal(&root)?;
        self.ensure_free(&root)?;
        self.ensure_free(&item)?;

        Ok(self
            .install(&root, root.clone(), RouteKind::Collection, Arc::clone(&controller))
            .install(&root, item, RouteKind::Item, controller))
    }

    /// Install the action route `{root}/invoke`, dispatched like a collection.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateRoute`] if the path is already
    /// installed, or [`RegistrationError::InvalidPath`] if the root is not
    /// absolute or contains `:` or `*`.
    pub fn register_action(self, controller: Arc<dyn Controller<C>>) -> Result<Self, RegistrationError> {
        let root = controller.root_url();
        let action = format!("{root}{ACTION_SEGMENT}");

        ensure_literal(&root)?;
        self.ensure_free(&action)?;
        Ok(self.install(&root, action, RouteKind::Collection, controller))
    }

    /// Installed routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    /// The pipeline every route runs through.
    #[must_use]
    pub fn pipeline(&self) -> &RequestPipeline<C> {
        &self.pipeline
    }

    /// Finish registration and hand the routes to axum.
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }

    fn ensure_free(&self, path: &str) -> Result<(), RegistrationError> {
        if !path.starts_with('/') {
            return Err(RegistrationError::InvalidPath {
                path: path.to_string(),
            });
        }
        if self.paths.contains(path) {
            return Err(RegistrationError::DuplicateRoute {
                path: path.to_string(),
            });
        }
        Ok(())
    }

    fn install(mut self, root: &str, path: String, kind: RouteKind, controller: Arc<dyn Controller<C>>) -> Self {
        let pipeline = Arc::clone(&self.pipeline);
        let handler = move |variables: Result<Path<HashMap<String, String>>, PathRejection>,
                            request: Request| {
            let pipeline = Arc::clone(&pipeline);
            let controller = Arc::clone(&controller);
            async move {
                let variables = match variables {
                    Ok(Path(variables)) => variables,
                    Err(PathRejection::MissingPathParams(_)) => HashMap::new(),
                    Err(rejection) => {
                        return pipeline
                            .reject_path_variables(request, &rejection.body_text())
                            .await;
                    }
                };
                pipeline
                    .handle(kind, controller.as_ref(), variables, request)
                    .await
            }
        };

        self.router = self.router.route(&path, any(handler));

        tracing::debug!(root, path = %path, kind = %kind, "Route registered");
        self.paths.insert(path.clone());
        self.routes.push(RouteRecord {
            root: root.to_string(),
            kind,
            path,
        });
        self
    }
}

/// Roots are literal paths. A `:` or `*` would install a second placeholder
/// next to `:uuid`, which axum refuses with a panic.
fn ensure_literal(root: &str) -> Result<(), RegistrationError> {
    if root.contains([':', '*']) {
        return Err(RegistrationError::InvalidPath {
            path: root.to_string(),
        });
    }
    Ok(())
}

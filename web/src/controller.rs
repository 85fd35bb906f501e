//! The controller contract and the fixed method tables.
//!
//! A controller implements any subset of five operations. Whatever it does not
//! override answers 405 through the default methods. Which operation a request
//! reaches is decided by an explicit lookup on `(RouteKind, Method)`, not by the
//! controller:
//!
//! | Route kind | GET | POST | PUT | DELETE | other |
//! |---|---|---|---|---|---|
//! | Collection | `list` | `create` | 405 | 405 | 405 |
//! | Item | `get` | 405 | `update` | `delete` | 405 |
//!
//! # Example
//!
//! ```ignore
//! struct Widgets;
//!
//! #[async_trait]
//! impl Controller<AppContext> for Widgets {
//!     fn root_path(&self) -> &str {
//!         "/widgets"
//!     }
//!
//!     async fn list(&self, request: &RequestContext<AppContext>) -> Response {
//!         Response::json(&request.context().widgets())
//!     }
//! }
//! ```

use crate::context::RequestContext;
use async_trait::async_trait;
use composable_restful_core::{Response, normalize_collection_path};
use http::Method;
use std::fmt;

/// A REST resource handler.
///
/// Implementations are shared across concurrently running requests; any
/// mutable state inside a controller needs its own synchronization.
#[async_trait]
pub trait Controller<C>: Send + Sync + 'static
where
    C: Send + Sync + 'static,
{
    /// Root path as configured, before normalization.
    fn root_path(&self) -> &str;

    /// Normalized collection URL (always ends with `/`).
    fn root_url(&self) -> String {
        normalize_collection_path(self.root_path())
    }

    /// URL of the item `id`, used for `Location` headers.
    fn location(&self, id: &str) -> String {
        let mut url = self.root_url();
        url.push_str(id);
        url
    }

    /// `POST {root}/`
    async fn create(&self, _request: &RequestContext<C>) -> Response {
        Response::method_not_allowed()
    }

    /// `GET {root}/{uuid}`
    async fn get(&self, _request: &RequestContext<C>) -> Response {
        Response::method_not_allowed()
    }

    /// `PUT {root}/{uuid}`
    async fn update(&self, _request: &RequestContext<C>) -> Response {
        Response::method_not_allowed()
    }

    /// `DELETE {root}/{uuid}`
    async fn delete(&self, _request: &RequestContext<C>) -> Response {
        Response::method_not_allowed()
    }

    /// `GET {root}/`
    async fn list(&self, _request: &RequestContext<C>) -> Response {
        Response::method_not_allowed()
    }
}

/// Shape of a registered route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// The set of all resources (`{root}/`, and `{root}/invoke` for actions).
    Collection,
    /// One resource addressed by `{root}/{uuid}`.
    Item,
}

impl RouteKind {
    /// Look up the operation serving `method` on this kind of route.
    ///
    /// `None` means the method is not allowed here.
    #[must_use]
    pub fn resolve(self, method: &Method) -> Option<Operation> {
        match (self, method.as_str()) {
            (Self::Collection, "GET") => Some(Operation::List),
            (Self::Collection, "POST") => Some(Operation::Create),
            (Self::Item, "GET") => Some(Operation::Get),
            (Self::Item, "PUT") => Some(Operation::Update),
            (Self::Item, "DELETE") => Some(Operation::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collection => f.write_str("collection"),
            Self::Item => f.write_str("item"),
        }
    }
}

/// One of the five controller operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// [`Controller::create`]
    Create,
    /// [`Controller::get`]
    Get,
    /// [`Controller::update`]
    Update,
    /// [`Controller::delete`]
    Delete,
    /// [`Controller::list`]
    List,
}

impl Operation {
    /// Call the matching method on `controller`.
    pub async fn invoke<C>(self, controller: &dyn Controller<C>, request: &RequestContext<C>) -> Response
    where
        C: Send + Sync + 'static,
    {
        match self {
            Self::Create => controller.create(request).await,
            Self::Get => controller.get(request).await,
            Self::Update => controller.update(request).await,
            Self::Delete => controller.delete(request).await,
            Self::List => controller.list(request).await,
        }
    }
}

/// Resolve and invoke in one step; unmatched methods answer 405 without
/// touching the controller.
pub async fn dispatch<C>(
    kind: RouteKind,
    controller: &dyn Controller<C>,
    request: &RequestContext<C>,
) -> Response
where
    C: Send + Sync + 'static,
{
    match kind.resolve(request.method()) {
        Some(operation) => operation.invoke(controller, request).await,
        None => Response::method_not_allowed(),
    }
}

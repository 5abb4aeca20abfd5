use super::table::RouteTable;
use crate::container::Registry;
use crate::http::{HttpResponse, Request, Response};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed controller action. Actions receive the request (with route
/// parameters bound) and the service registry for resolving their
/// dependencies.
pub type BoxedHandler = Arc<
    dyn Fn(Request, Arc<Registry>) -> Pin<Box<dyn Future<Output = Response> + Send>>
        + Send
        + Sync,
>;

/// Explicit (controller, action) → handler map. No convention or attribute
/// discovery: every action is registered here by hand.
pub struct ActionRegistry {
    services: Arc<Registry>,
    actions: HashMap<(String, String), BoxedHandler>,
}

impl ActionRegistry {
    pub fn new(services: Arc<Registry>) -> Self {
        Self {
            services,
            actions: HashMap::new(),
        }
    }

    /// Register an action. Controller and action names are matched
    /// case-insensitively at dispatch time.
    pub fn action<H, Fut>(mut self, controller: &str, action: &str, handler: H) -> Self
    where
        H: Fn(Request, Arc<Registry>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let boxed: BoxedHandler = Arc::new(move |req, services| Box::pin(handler(req, services)));
        self.actions.insert(
            (
                controller.to_ascii_lowercase(),
                action.to_ascii_lowercase(),
            ),
            boxed,
        );
        self
    }

    fn get(&self, controller: &str, action: &str) -> Option<BoxedHandler> {
        self.actions
            .get(&(
                controller.to_ascii_lowercase(),
                action.to_ascii_lowercase(),
            ))
            .cloned()
    }
}

/// Terminal pipeline stage: recognizes the path against the route table and
/// invokes the matching action.
pub struct Dispatcher {
    table: RouteTable,
    actions: ActionRegistry,
}

impl Dispatcher {
    pub fn new(table: RouteTable, actions: ActionRegistry) -> Self {
        Self { table, actions }
    }

    /// Resolve and invoke the action for a request.
    ///
    /// A path no rule matches, or a match that names an unregistered
    /// controller/action, is a plain not-found response; it is not an error
    /// for the pipeline's error stage.
    pub async fn dispatch(&self, req: Request) -> Response {
        let Some(matched) = self.table.recognize(req.path()) else {
            tracing::debug!(path = req.path(), "no route matched");
            return Ok(not_found());
        };

        let Some(handler) = self.actions.get(&matched.controller, &matched.action) else {
            tracing::debug!(
                controller = %matched.controller,
                action = %matched.action,
                route = %matched.route,
                "route matched but no such action is registered"
            );
            return Ok(not_found());
        };

        tracing::debug!(
            route = %matched.route,
            controller = %matched.controller,
            action = %matched.action,
            "dispatching"
        );
        let req = req.with_params(matched.params);
        handler(req, self.actions.services.clone()).await
    }
}

fn not_found() -> HttpResponse {
    HttpResponse::html("<h1>404 — page not found</h1>").status(404)
}

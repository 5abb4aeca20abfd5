//! Middleware pipeline.
//!
//! A [`Pipeline`] is an ordered list of stages wrapped around a terminal
//! endpoint (the MVC dispatcher). Each stage receives the request and a
//! [`Next`] handle; it may short-circuit by returning a response without
//! calling `next.run`, or delegate downstream. The order is fixed when the
//! pipeline is built at startup and is identical for every request.

mod authenticate;
mod errors;
mod live_reload;
mod static_files;

pub use authenticate::Authenticate;
pub use errors::{DatabaseErrorPage, DeveloperExceptionPage, ExceptionHandler};
pub use live_reload::LiveReload;
pub use static_files::StaticFiles;

use crate::http::{Request, Response};
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Terminal request handler at the end of the pipeline.
pub type Endpoint =
    dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync;

/// One pipeline stage.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Stable stage name, used in startup logs and order assertions.
    fn name(&self) -> &'static str;

    async fn handle(&self, req: Request, next: Next<'_>) -> Response;
}

/// Handle to the remainder of the pipeline.
pub struct Next<'a> {
    stack: &'a [Arc<dyn Middleware>],
    endpoint: &'a Endpoint,
}

impl Next<'_> {
    /// Run the rest of the pipeline: the next stage if one remains,
    /// otherwise the endpoint.
    pub async fn run(self, req: Request) -> Response {
        match self.stack.split_first() {
            Some((stage, rest)) => {
                stage
                    .handle(
                        req,
                        Next {
                            stack: rest,
                            endpoint: self.endpoint,
                        },
                    )
                    .await
            }
            None => (self.endpoint)(req).await,
        }
    }
}

/// Ordered middleware stack plus terminal endpoint. Built once per startup
/// profile; immutable afterwards.
pub struct Pipeline {
    stack: Vec<Arc<dyn Middleware>>,
    endpoint: Box<Endpoint>,
}

impl Pipeline {
    pub fn new<F, Fut>(endpoint: F) -> Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        Self {
            stack: Vec::new(),
            endpoint: Box::new(move |req| Box::pin(endpoint(req))),
        }
    }

    /// Append a stage. Stages run in the order they were appended, the first
    /// appended being outermost.
    pub fn through<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.stack.push(Arc::new(middleware));
        self
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stack.iter().map(|m| m.name()).collect()
    }

    pub async fn run(&self, req: Request) -> Response {
        Next {
            stack: &self.stack,
            endpoint: self.endpoint.as_ref(),
        }
        .run(req)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl Middleware for Recorder {
        fn name(&self) -> &'static str {
            self.label
        }

        async fn handle(&self, req: Request, next: Next<'_>) -> Response {
            self.log.lock().unwrap().push(self.label);
            next.run(req).await
        }
    }

    struct ShortCircuit;

    #[async_trait]
    impl Middleware for ShortCircuit {
        fn name(&self) -> &'static str {
            "short_circuit"
        }

        async fn handle(&self, _req: Request, _next: Next<'_>) -> Response {
            HttpResponse::text("stopped").status(403).ok()
        }
    }

    #[tokio::test]
    async fn stages_run_in_append_order_then_the_endpoint() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let endpoint_log = log.clone();

        let pipeline = Pipeline::new(move |_req| {
            let endpoint_log = endpoint_log.clone();
            async move {
                endpoint_log.lock().unwrap().push("endpoint");
                HttpResponse::text("done").ok()
            }
        })
        .through(Recorder {
            label: "first",
            log: log.clone(),
        })
        .through(Recorder {
            label: "second",
            log: log.clone(),
        });

        assert_eq!(pipeline.stage_names(), vec!["first", "second"]);

        let res = pipeline.run(Request::get("/")).await.unwrap();
        assert_eq!(res.body_str(), "done");
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "endpoint"]);
    }

    #[tokio::test]
    async fn a_stage_can_short_circuit_the_rest() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let endpoint_log = log.clone();

        let pipeline = Pipeline::new(move |_req| {
            let endpoint_log = endpoint_log.clone();
            async move {
                endpoint_log.lock().unwrap().push("endpoint");
                HttpResponse::text("done").ok()
            }
        })
        .through(ShortCircuit)
        .through(Recorder {
            label: "after",
            log: log.clone(),
        });

        let res = pipeline.run(Request::get("/")).await.unwrap();
        assert_eq!(res.status_code(), 403);
        assert!(log.lock().unwrap().is_empty());
    }
}

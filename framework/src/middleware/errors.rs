use super::{Middleware, Next};
use crate::http::{HttpResponse, Redirect, Request, Response};
use async_trait::async_trait;

/// Development-profile error stage: renders failures from later stages as a
/// verbose diagnostic page instead of leaking them as raw responses.
pub struct DeveloperExceptionPage;

#[async_trait]
impl Middleware for DeveloperExceptionPage {
    fn name(&self) -> &'static str {
        "developer_exception_page"
    }

    async fn handle(&self, req: Request, next: Next<'_>) -> Response {
        let method = req.method().clone();
        let path = req.path().to_string();

        match next.run(req).await {
            Ok(res) => Ok(res),
            Err(failure) => {
                tracing::error!(%method, %path, status = failure.status_code(), "unhandled error");
                let page = format!(
                    "<!DOCTYPE html>\n<html><head><title>Unhandled error</title></head><body>\n\
                     <h1>Unhandled error while processing {method} {path}</h1>\n\
                     <p>Status: {status}</p>\n\
                     <pre>{detail}</pre>\n\
                     </body></html>",
                    method = method,
                    path = path,
                    status = failure.status_code(),
                    detail = failure.body_str(),
                );
                Ok(HttpResponse::html(page).status(failure.status_code()))
            }
        }
    }
}

/// Development-profile stage for persistence failures: renders database
/// errors from later stages as their own diagnostic page, with a hint about
/// the usual causes. Every other failure propagates untouched to the outer
/// error stage.
pub struct DatabaseErrorPage;

#[async_trait]
impl Middleware for DatabaseErrorPage {
    fn name(&self) -> &'static str {
        "database_error_page"
    }

    async fn handle(&self, req: Request, next: Next<'_>) -> Response {
        let method = req.method().clone();
        let path = req.path().to_string();

        match next.run(req).await {
            Ok(res) => Ok(res),
            Err(failure) if failure.header_value("x-error-kind") == Some("database") => {
                tracing::error!(%method, %path, "database error");
                let page = format!(
                    "<!DOCTYPE html>\n<html><head><title>Database error</title></head><body>\n\
                     <h1>A database error occurred while processing {method} {path}</h1>\n\
                     <pre>{detail}</pre>\n\
                     <p>Check that the connection string points at a reachable database\n\
                     and that the schema is up to date.</p>\n\
                     </body></html>",
                    method = method,
                    path = path,
                    detail = failure.body_str(),
                );
                Ok(HttpResponse::html(page).status(500))
            }
            Err(failure) => Err(failure),
        }
    }
}

/// Production-profile error stage: converts failures from later stages into
/// a redirect to a generic error page. The failure detail is logged, never
/// shown; the request is not retried and the process keeps serving.
pub struct ExceptionHandler {
    error_path: String,
}

impl ExceptionHandler {
    pub fn new(error_path: impl Into<String>) -> Self {
        Self {
            error_path: error_path.into(),
        }
    }
}

#[async_trait]
impl Middleware for ExceptionHandler {
    fn name(&self) -> &'static str {
        "exception_handler"
    }

    async fn handle(&self, req: Request, next: Next<'_>) -> Response {
        let method = req.method().clone();
        let path = req.path().to_string();

        match next.run(req).await {
            Ok(res) => Ok(res),
            Err(failure) => {
                tracing::error!(
                    %method,
                    %path,
                    status = failure.status_code(),
                    detail = failure.body_str(),
                    "unhandled error, redirecting to error page"
                );
                Redirect::to(self.error_path.clone()).into()
            }
        }
    }
}

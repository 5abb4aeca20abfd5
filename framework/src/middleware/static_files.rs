use super::{Middleware, Next};
use crate::http::{HttpResponse, Request, Response};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Static assets are immutable-by-convention; one year, in seconds.
const CACHE_MAX_AGE_SECS: u64 = 31_536_000;

/// Serves files from an asset root. Hits short-circuit the pipeline with the
/// file contents and a one-year `Cache-Control` max-age; misses delegate to
/// the next stage.
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a request path inside the root, rejecting traversal.
    fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let relative = request_path.trim_start_matches('/');
        if relative.is_empty() {
            return None;
        }
        let relative = Path::new(relative);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait]
impl Middleware for StaticFiles {
    fn name(&self) -> &'static str {
        "static_files"
    }

    async fn handle(&self, req: Request, next: Next<'_>) -> Response {
        if req.method() != http::Method::GET && req.method() != http::Method::HEAD {
            return next.run(req).await;
        }
        let Some(candidate) = self.resolve(req.path()) else {
            return next.run(req).await;
        };
        let is_file = tokio::fs::metadata(&candidate)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return next.run(req).await;
        }

        match tokio::fs::read(&candidate).await {
            Ok(contents) => {
                let content_type = content_type_for(&candidate);
                Ok(HttpResponse::bytes(content_type, contents.into()).header(
                    "Cache-Control",
                    format!("max-age={}", CACHE_MAX_AGE_SECS),
                ))
            }
            Err(e) => {
                tracing::warn!(path = %candidate.display(), error = %e, "static file read failed");
                next.run(req).await
            }
        }
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("txt") => "text/plain",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}

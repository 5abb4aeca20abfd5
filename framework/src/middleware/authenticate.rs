use super::{Middleware, Next};
use crate::http::{Request, Response};
use crate::identity::{Identity, AUTH_COOKIE};
use async_trait::async_trait;
use std::sync::Arc;

/// Identity middleware: resolves the auth cookie to a principal and attaches
/// it to the request. Never short-circuits; an unauthenticated or failed
/// lookup simply leaves the request anonymous.
pub struct Authenticate {
    identity: Arc<Identity>,
}

impl Authenticate {
    pub fn new(identity: Arc<Identity>) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl Middleware for Authenticate {
    fn name(&self) -> &'static str {
        "authenticate"
    }

    async fn handle(&self, mut req: Request, next: Next<'_>) -> Response {
        if let Some(cookie) = req.cookie(AUTH_COOKIE).map(str::to_string) {
            match self.identity.resolve_cookie(&cookie).await {
                Ok(Some(principal)) => {
                    tracing::debug!(user = %principal.username, "request authenticated");
                    req.set_user(principal);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "identity lookup failed; continuing anonymous");
                }
            }
        }
        next.run(req).await
    }
}

use super::{Middleware, Next};
use crate::http::{Request, Response};
use async_trait::async_trait;
use bytes::Bytes;

/// Injected before `</body>`. Polls the current page and reloads the browser
/// once the server answers again after a restart.
const RELOAD_SCRIPT: &str = concat!(
    "<script>(function(){",
    "var poll=setInterval(function(){",
    "fetch(location.href,{method:'HEAD'}).catch(function(){",
    "clearInterval(poll);",
    "var retry=setInterval(function(){",
    "fetch(location.href,{method:'HEAD'})",
    ".then(function(){location.reload();})",
    ".catch(function(){});",
    "},500);",
    "});",
    "},1000);",
    "})();</script>"
);

/// Development helper: appends a reload script to HTML responses so the
/// browser refreshes itself when the server comes back after a restart.
/// Non-HTML responses and failures pass through untouched.
pub struct LiveReload;

#[async_trait]
impl Middleware for LiveReload {
    fn name(&self) -> &'static str {
        "live_reload"
    }

    async fn handle(&self, req: Request, next: Next<'_>) -> Response {
        let res = next.run(req).await?;
        let is_html = res
            .header_value("content-type")
            .map(|ct| ct.starts_with("text/html"))
            .unwrap_or(false);
        if !is_html {
            return Ok(res);
        }
        Ok(res.map_body(inject_script))
    }
}

fn inject_script(body: Bytes) -> Bytes {
    let Ok(text) = std::str::from_utf8(&body) else {
        return body;
    };
    let Some(at) = text.rfind("</body>") else {
        return body;
    };
    let mut out = String::with_capacity(text.len() + RELOAD_SCRIPT.len());
    out.push_str(&text[..at]);
    out.push_str(RELOAD_SCRIPT);
    out.push_str(&text[at..]);
    Bytes::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use crate::middleware::Pipeline;
    use pretty_assertions::assert_eq;

    fn pipeline(response: fn() -> Response) -> Pipeline {
        Pipeline::new(move |_req| async move { response() }).through(LiveReload)
    }

    #[tokio::test]
    async fn html_responses_get_the_reload_script_before_the_body_close() {
        let pipeline = pipeline(|| {
            HttpResponse::html("<html><body><p>hi</p></body></html>").ok()
        });
        let res = pipeline.run(Request::get("/")).await.unwrap();

        let body = res.body_str();
        let script_at = body.find("<script>").unwrap();
        let close_at = body.find("</body>").unwrap();
        assert!(script_at < close_at);
        assert!(body.contains("location.reload()"));
    }

    #[tokio::test]
    async fn non_html_responses_are_untouched() {
        let pipeline = pipeline(|| HttpResponse::xml("<urlset/>").ok());
        let res = pipeline.run(Request::get("/sitemap.xml")).await.unwrap();
        assert_eq!(res.body_str(), "<urlset/>");
    }

    #[tokio::test]
    async fn failures_pass_through_for_the_error_stages() {
        let pipeline = pipeline(|| {
            Err(HttpResponse::html("<body>broken</body>").status(500))
        });
        let failure = pipeline.run(Request::get("/")).await.unwrap_err();
        assert_eq!(failure.body_str(), "<body>broken</body>");
    }
}

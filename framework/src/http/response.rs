use bytes::Bytes;
use http_body_util::Full;

/// HTTP response builder.
#[derive(Debug)]
pub struct HttpResponse {
    status: u16,
    body: Bytes,
    headers: Vec<(String, String)>,
}

/// Handler return type. `Err` carries a response describing a failure and is
/// what the pipeline's error stage renders; `Ok` flows through untouched.
/// Both sides being responses lets handlers use `?` on framework errors.
pub type Response = Result<HttpResponse, HttpResponse>;

impl HttpResponse {
    pub fn new() -> Self {
        Self {
            status: 200,
            body: Bytes::new(),
            headers: Vec::new(),
        }
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: Bytes::from(body.into()),
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
        }
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: Bytes::from(body.into()),
            headers: vec![(
                "Content-Type".to_string(),
                "text/html; charset=utf-8".to_string(),
            )],
        }
    }

    pub fn xml(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: Bytes::from(body.into()),
            headers: vec![("Content-Type".to_string(), "application/xml".to_string())],
        }
    }

    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: Bytes::from(body.to_string()),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }

    /// Raw bytes with an explicit content type (static assets).
    pub fn bytes(content_type: &str, body: Bytes) -> Self {
        Self {
            status: 200,
            body,
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
        }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// First header value with the given name, case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or_default()
    }

    /// Transform the body in place, keeping status and headers.
    pub fn map_body(mut self, f: impl FnOnce(Bytes) -> Bytes) -> Self {
        self.body = f(self.body);
        self
    }

    /// Wrap in `Ok` for use as the `Response` type.
    pub fn ok(self) -> Response {
        Ok(self)
    }

    pub fn into_hyper(self) -> hyper::Response<Full<Bytes>> {
        let mut builder = hyper::Response::builder().status(self.status);
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }
        builder
            .body(Full::new(self.body))
            .unwrap_or_else(|_| hyper::Response::new(Full::new(Bytes::new())))
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Temporary (302) redirect response builder.
pub struct Redirect {
    location: String,
}

impl Redirect {
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            location: path.into(),
        }
    }

    pub fn into_response(self) -> HttpResponse {
        HttpResponse::new()
            .status(302)
            .header("Location", self.location)
    }
}

impl From<Redirect> for Response {
    fn from(redirect: Redirect) -> Response {
        Ok(redirect.into_response())
    }
}

/// Convert framework errors into failure responses so handlers can use `?`.
/// The error kind travels as a header so error stages can distinguish, say,
/// database failures from the rest.
impl From<crate::error::FrameworkError> for HttpResponse {
    fn from(err: crate::error::FrameworkError) -> HttpResponse {
        let status = err.status_code();
        let body = serde_json::json!({ "error": err.to_string() });
        HttpResponse::json(body)
            .status(status)
            .header("X-Error-Kind", err.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameworkError;
    use pretty_assertions::assert_eq;

    #[test]
    fn builders_set_status_and_headers() {
        let res = HttpResponse::text("hi").status(404).header("X-Thing", "1");
        assert_eq!(res.status_code(), 404);
        assert_eq!(res.header_value("content-type"), Some("text/plain"));
        assert_eq!(res.header_value("x-thing"), Some("1"));
        assert_eq!(res.body_str(), "hi");
    }

    #[test]
    fn framework_errors_become_failure_responses() {
        let res: HttpResponse = FrameworkError::param("id").into();
        assert_eq!(res.status_code(), 400);
        assert!(res.body_str().contains("id"));
        assert_eq!(res.header_value("x-error-kind"), Some("parameter"));
    }

    #[test]
    fn database_failures_carry_their_kind() {
        let res: HttpResponse = FrameworkError::database("no such table").into();
        assert_eq!(res.status_code(), 500);
        assert_eq!(res.header_value("x-error-kind"), Some("database"));
    }

    #[test]
    fn map_body_keeps_status_and_headers() {
        let res = HttpResponse::html("<p>hi</p>")
            .status(201)
            .map_body(|body| {
                let mut text = String::from_utf8(body.to_vec()).unwrap();
                text.push_str("<!-- more -->");
                Bytes::from(text)
            });
        assert_eq!(res.status_code(), 201);
        assert_eq!(
            res.header_value("content-type"),
            Some("text/html; charset=utf-8")
        );
        assert_eq!(res.body_str(), "<p>hi</p><!-- more -->");
    }

    #[test]
    fn redirects_carry_location() {
        let res = Redirect::to("/home/error").into_response();
        assert_eq!(res.status_code(), 302);
        assert_eq!(res.header_value("location"), Some("/home/error"));
    }
}

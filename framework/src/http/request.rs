use super::body::{collect_body, parse_form, parse_json};
use crate::error::FrameworkError;
use crate::identity::Principal;
use http::{HeaderMap, Method, Uri};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::str::FromStr;

/// Inbound HTTP request, carrying route parameters bound by the dispatcher
/// and the principal attached by the identity middleware.
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Option<hyper::body::Incoming>,
    params: HashMap<String, String>,
    user: Option<Principal>,
}

impl Request {
    pub fn from_hyper(req: hyper::Request<hyper::body::Incoming>) -> Self {
        let (parts, body) = req.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body: Some(body),
            params: HashMap::new(),
            user: None,
        }
    }

    /// Build a bodyless request, mainly for exercising middleware and
    /// dispatch without a live connection.
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            uri: path.parse().unwrap_or_else(|_| Uri::from_static("/")),
            headers: HeaderMap::new(),
            body: None,
            params: HashMap::new(),
            user: None,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Read a cookie value from the `Cookie` header.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.header("cookie")?.split(';').find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value)
        })
    }

    /// Route parameter bound by the dispatcher. Absence propagates as a 400.
    pub fn param(&self, name: &str) -> Result<&str, FrameworkError> {
        self.params
            .get(name)
            .map(|s| s.as_str())
            .ok_or_else(|| FrameworkError::param(name))
    }

    /// Route parameter that may legitimately be absent (optional segments).
    pub fn param_opt(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }

    /// Required route parameter parsed to a typed value.
    pub fn param_as<T: FromStr>(&self, name: &str) -> Result<T, FrameworkError> {
        let raw = self.param(name)?;
        raw.parse()
            .map_err(|_| FrameworkError::param_parse(raw, std::any::type_name::<T>()))
    }

    /// Optional route parameter parsed to a typed value. A present but
    /// unparsable value is still an error.
    pub fn param_opt_as<T: FromStr>(&self, name: &str) -> Result<Option<T>, FrameworkError> {
        match self.param_opt(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| FrameworkError::param_parse(raw, std::any::type_name::<T>())),
        }
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Principal attached by the identity middleware, if any.
    pub fn user(&self) -> Option<&Principal> {
        self.user.as_ref()
    }

    pub fn set_user(&mut self, user: Principal) {
        self.user = Some(user);
    }

    /// Consume the request and collect the body.
    pub async fn bytes(self) -> Result<bytes::Bytes, FrameworkError> {
        let body = self
            .body
            .ok_or_else(|| FrameworkError::internal("request body unavailable"))?;
        collect_body(body).await
    }

    /// Parse the body as form-urlencoded. Consumes the request; the body can
    /// only be read once.
    pub async fn form<T: DeserializeOwned>(self) -> Result<T, FrameworkError> {
        let bytes = self.bytes().await?;
        parse_form(&bytes)
    }

    /// Parse the body as JSON. Consumes the request.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, FrameworkError> {
        let bytes = self.bytes().await?;
        parse_json(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn params_bind_and_parse() {
        let mut params = HashMap::new();
        params.insert("id".to_string(), "42".to_string());
        let req = Request::get("/post/42").with_params(params);

        assert_eq!(req.param("id").unwrap(), "42");
        assert_eq!(req.param_as::<i32>("id").unwrap(), 42);
        assert_eq!(req.param_opt("page"), None);
        assert_eq!(req.param_opt_as::<u64>("page").unwrap(), None);
        assert!(matches!(
            req.param("page"),
            Err(FrameworkError::ParamError { .. })
        ));
    }

    #[test]
    fn unparsable_present_param_is_an_error() {
        let mut params = HashMap::new();
        params.insert("page".to_string(), "abc".to_string());
        let req = Request::get("/blog/abc").with_params(params);
        assert!(matches!(
            req.param_opt_as::<u64>("page"),
            Err(FrameworkError::ParamParse { .. })
        ));
    }

    #[test]
    fn cookies_parse_from_the_cookie_header() {
        let req = Request::get("/").with_header("cookie", "a=1; auth=7:token; b=2");
        assert_eq!(req.cookie("auth"), Some("7:token"));
        assert_eq!(req.cookie("missing"), None);
    }
}

use crate::error::FrameworkError;
use bytes::Bytes;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;

/// Collect a hyper request body into contiguous bytes.
pub async fn collect_body(body: hyper::body::Incoming) -> Result<Bytes, FrameworkError> {
    body.collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|e| FrameworkError::internal(format!("failed to read request body: {}", e)))
}

/// Parse a form-urlencoded body.
pub fn parse_form<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, FrameworkError> {
    serde_urlencoded::from_bytes(bytes)
        .map_err(|e| FrameworkError::domain(format!("invalid form body: {}", e), 400))
}

/// Parse a JSON body.
pub fn parse_json<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, FrameworkError> {
    serde_json::from_slice(bytes)
        .map_err(|e| FrameworkError::domain(format!("invalid JSON body: {}", e), 400))
}

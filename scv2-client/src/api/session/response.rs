//! Materialised HTTP response

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::api::error::TransportError;

/// Status, headers and decoded body of one exchange
///
/// Header names are stored lowercase. Bodies that are not JSON are kept as a
/// JSON string; an empty body becomes `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
}

impl Response {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body,
        }
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self) -> &Value {
        &self.body
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Concurrency token of the returned record
    pub fn etag(&self) -> Option<&str> {
        self.header("etag")
    }

    /// Body value at a JSON pointer, e.g. `/value/id`
    pub fn field(&self, pointer: &str) -> Option<&Value> {
        self.body.pointer(pointer)
    }

    /// String body value at a JSON pointer
    pub fn str_field(&self, pointer: &str) -> Option<&str> {
        self.field(pointer).and_then(Value::as_str)
    }

    pub(crate) async fn from_reqwest(response: reqwest::Response) -> Result<Self, TransportError> {
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(Box::new(e)))?;

        Ok(Self {
            status,
            headers,
            body: decode_body(&bytes),
        })
    }
}

fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }

    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b""), Value::Null);
        assert_eq!(decode_body(b"  \n"), Value::Null);
        assert_eq!(decode_body(br#"{"value":{"id":"1"}}"#), json!({"value": {"id": "1"}}));
        assert_eq!(decode_body(b"Service Unavailable"), json!("Service Unavailable"));
    }

    #[test]
    fn test_field_access_and_etag() {
        let response = Response::new(200, json!({"value": {"id": "A-1", "revision": 3}}))
            .with_header("ETag", "W/\"3\"");

        assert!(response.is_success());
        assert_eq!(response.str_field("/value/id"), Some("A-1"));
        assert_eq!(response.field("/value/revision"), Some(&json!(3)));
        assert_eq!(response.str_field("/value/missing"), None);
        assert_eq!(response.etag(), Some("W/\"3\""));
        assert_eq!(response.header("ETAG"), Some("W/\"3\""));
    }

    #[test]
    fn test_is_success_range() {
        assert!(Response::new(204, Value::Null).is_success());
        assert!(!Response::new(304, Value::Null).is_success());
        assert!(!Response::new(412, Value::Null).is_success());
    }
}

use crate::error::Error;
use serde::de::DeserializeOwned;
use std::{borrow::Cow, collections::HashMap};
use url::form_urlencoded;

/// A single request received by an [`EchoServer`](crate::EchoServer).
///
/// Requests are captured in arrival order and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRequest {
    /// Zero-based position of this request in the server's capture list.
    pub index: usize,
    pub method: String,
    /// The request target exactly as received, path plus query.
    pub uri: String,
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn body_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Deserializes the captured body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    /// Decoded query parameters in the order they were sent.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .as_deref()
            .map(|query| {
                form_urlencoded::parse(query.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Re-encodes the query with parameters sorted by key, so that two requests
    /// carrying the same parameters in a different order compare equal.
    pub fn canonical_query(&self) -> String {
        let mut pairs = self.query_pairs();
        pairs.sort_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));

        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish()
    }
}

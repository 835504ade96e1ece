//! HTTP request builder.

use std::collections::HashMap;

/// A builder for constructing GET requests.
///
/// Holds the request parts until a client sends them; it carries no
/// connection state of its own.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    pub(crate) url: String,
    pub(crate) headers: HashMap<String, String>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the Accept header.
    pub fn accept(self, content_type: impl Into<String>) -> Self {
        self.header("Accept", content_type)
    }

    /// The target URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_header() {
        let builder = RequestBuilder::new("/x").accept("application/json");
        assert_eq!(
            builder.headers.get("Accept").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(builder.url(), "/x");
    }

    #[test]
    fn test_later_header_wins() {
        let builder = RequestBuilder::new("/x")
            .header("Accept", "text/plain")
            .accept("application/json");
        assert_eq!(builder.headers.len(), 1);
        assert_eq!(builder.headers["Accept"], "application/json");
    }
}

/// HTTP request methods the server answers.
///
/// Everything else is closed without a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve the listing or a media file
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
}

impl Method {
    /// Parses an HTTP method from a string, ignoring case.
    ///
    /// # Returns
    ///
    /// `Some(Method)` for GET and HEAD, `None` otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use mediaserve::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("head"), Some(Method::HEAD));
    /// assert_eq!(Method::from_str("POST"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("GET") {
            Some(Method::GET)
        } else if s.eq_ignore_ascii_case("HEAD") {
            Some(Method::HEAD)
        } else {
            None
        }
    }
}

/// A request as read off the wire.
///
/// Header names are trimmed and lower-cased and keep their trailing colon
/// (`"range:"`), in the order they were received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Request method as sent (e.g. "GET"); empty when the request line was malformed
    pub method: String,
    /// Request target (e.g. "/3"); empty when the request line was malformed
    pub target: String,
    /// HTTP version token, empty if absent
    pub version: String,
    /// Header pairs as `("name:", "value")`
    pub headers: Vec<(String, String)>,
}

impl Request {
    /// The request line had fewer than two tokens.
    pub fn is_malformed(&self) -> bool {
        self.method.is_empty() || self.target.is_empty()
    }

    /// The method, if it is one the server answers.
    pub fn method_kind(&self) -> Option<Method> {
        Method::from_str(&self.method)
    }

    /// Retrieves the first header value by name, case-insensitively.
    ///
    /// The trailing colon of the stored key is optional in `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.trim().trim_end_matches(':');
        self.headers
            .iter()
            .find(|(key, _)| key.trim_end_matches(':').eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Raw value of the `Range` header, if any.
    pub fn range(&self) -> Option<&str> {
        self.header("range")
    }

    /// Catalog index addressed by the target (`/<integer>`), if it parses.
    pub fn index(&self) -> Option<i64> {
        self.target.strip_prefix('/')?.trim().parse().ok()
    }
}

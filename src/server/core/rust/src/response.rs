/* src/server/core/rust/src/response.rs */

use crate::errors::SsrError;

/// Name of the cookie carrying the negotiated locale.
pub const LOCALE_COOKIE: &str = "locale";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
  pub name: String,
  pub value: String,
}

impl Cookie {
  pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
    Self { name: name.into(), value: value.into() }
  }

  /// `Set-Cookie` value for a session cookie scoped to the whole site.
  pub fn header_value(&self) -> String {
    format!("{}={}; Path=/", self.name, self.value)
  }
}

/// The single response produced for a request. Framework adapters turn it
/// into their own response type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
  pub status: u16,
  pub headers: Vec<(String, String)>,
  pub cookies: Vec<Cookie>,
  /// `None` ends the response without a body.
  pub body: Option<String>,
}

impl PageResponse {
  pub fn html(status: u16, body: String) -> Self {
    Self { status, headers: Vec::new(), cookies: Vec::new(), body: Some(body) }
  }

  pub fn redirect(location: &str) -> Self {
    Self {
      status: 302,
      headers: vec![("Location".to_string(), location.to_string())],
      cookies: Vec::new(),
      body: None,
    }
  }

  /// Error page body: the error message followed by its cause chain.
  pub fn error(err: &SsrError) -> Self {
    Self {
      status: err.status(),
      headers: Vec::new(),
      cookies: Vec::new(),
      body: Some(format!("Error during rendering: {err}!: {}", err.trace())),
    }
  }

  pub fn with_cookie(mut self, cookie: Cookie) -> Self {
    self.cookies.push(cookie);
    self
  }

  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
  }
}

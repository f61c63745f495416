/* src/server/core/rust/src/resolve.rs */

use universal_engine::Locale;

use crate::response::LOCALE_COOKIE;

/// Negotiates the request locale: `locale` cookie -> Accept-Language -> default.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
  supported: Vec<Locale>,
  default: Locale,
}

impl LocaleResolver {
  /// An empty `supported` list accepts any well-formed locale.
  pub fn new(supported: Vec<Locale>, default: Locale) -> Self {
    Self { supported, default }
  }

  pub fn default_locale(&self) -> &Locale {
    &self.default
  }

  pub fn resolve(&self, cookie_header: Option<&str>, accept_language: Option<&str>) -> Locale {
    if let Some(header) = cookie_header
      && let Some(locale) = self.from_cookie(header)
    {
      return locale;
    }
    if let Some(header) = accept_language
      && let Some(locale) = self.from_accept_language(header)
    {
      return locale;
    }
    self.default.clone()
  }

  fn from_cookie(&self, header: &str) -> Option<Locale> {
    header
      .split(';')
      .filter_map(|pair| pair.trim().split_once('='))
      .filter(|(k, _)| k.trim() == LOCALE_COOKIE)
      .find_map(|(_, v)| Locale::parse(v.trim()).and_then(|l| self.supported_match(&l)))
  }

  fn from_accept_language(&self, header: &str) -> Option<Locale> {
    let mut entries: Vec<(&str, f64)> = Vec::new();
    for part in header.split(',') {
      let part = part.trim();
      if part.is_empty() {
        continue;
      }
      let mut segments = part.split(';');
      let tag = segments.next().unwrap_or("").trim();
      let mut q = 1.0_f64;
      for s in segments {
        if let Some(val) = s.trim().strip_prefix("q=")
          && let Ok(v) = val.parse::<f64>()
        {
          q = v;
        }
      }
      if q > 0.0 {
        entries.push((tag, q));
      }
    }

    // Stable sort keeps header order among equal weights.
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    entries.iter().filter_map(|(tag, _)| Locale::parse(tag)).find_map(|l| self.supported_match(&l))
  }

  /// Exact match, then the bare language, then any region of the same language.
  fn supported_match(&self, candidate: &Locale) -> Option<Locale> {
    if self.supported.is_empty() {
      return Some(candidate.clone());
    }
    if let Some(exact) = self.supported.iter().find(|s| *s == candidate) {
      return Some(exact.clone());
    }
    let same_language = |s: &&Locale| s.language == candidate.language;
    self
      .supported
      .iter()
      .filter(same_language)
      .find(|s| s.region.is_none())
      .or_else(|| self.supported.iter().find(same_language))
      .cloned()
  }
}

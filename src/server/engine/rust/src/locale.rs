/* src/server/engine/rust/src/locale.rs */

use std::fmt;

use serde::{Deserialize, Serialize};

/// A negotiated locale: a required language code plus an optional region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
  pub language: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub region: Option<String>,
}

impl Locale {
  pub fn new(language: impl Into<String>, region: Option<&str>) -> Self {
    Self { language: language.into(), region: region.map(str::to_string) }
  }

  /// Parse `en`, `en-US` or `en_US`. Language is lowercased, region uppercased.
  pub fn parse(tag: &str) -> Option<Self> {
    let tag = tag.trim();
    let (language, region) = match tag.split_once(['-', '_']) {
      Some((lang, region)) => (lang, Some(region)),
      None => (tag, None),
    };

    if language.len() < 2 || language.len() > 8 || !language.bytes().all(|b| b.is_ascii_alphabetic())
    {
      return None;
    }
    if let Some(region) = region
      && (region.is_empty() || region.len() > 8 || !region.bytes().all(|b| b.is_ascii_alphanumeric()))
    {
      return None;
    }

    Some(Self {
      language: language.to_ascii_lowercase(),
      region: region.map(str::to_ascii_uppercase),
    })
  }

  /// Display form used for `<html lang>`: `language` or `language-region`.
  pub fn lang_tag(&self) -> String {
    match self.region {
      Some(ref region) => format!("{}-{region}", self.language),
      None => self.language.clone(),
    }
  }

  /// Cookie form: `language` or `language_region`.
  pub fn cookie_value(&self) -> String {
    match self.region {
      Some(ref region) => format!("{}_{region}", self.language),
      None => self.language.clone(),
    }
  }
}

impl fmt::Display for Locale {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.lang_tag())
  }
}

/* src/server/core/rust/src/errors.rs */

use std::path::PathBuf;
use std::time::Duration;

use universal_engine::AssembleError;

#[derive(Debug, thiserror::Error)]
pub enum SsrError {
  /// Integration mistakes: missing nonce, locale or application.
  #[error("configuration error: {0}")]
  Config(String),

  #[error("page assembly failed: {0}")]
  Assembly(#[from] AssembleError),

  #[error("data client setup failed: {0}")]
  Client(String),

  #[error("state store setup failed: {0}")]
  Store(String),

  #[error("code splitting failed: {0}")]
  CodeSplit(String),

  #[error("data resolution failed: {0}")]
  DataResolution(String),

  #[error("render failed: {0}")]
  Render(String),

  #[error("phase {phase} did not finish within {after:?}")]
  Timeout { phase: &'static str, after: Duration },

  #[error("failed to read {}: {source}", path.display())]
  ManifestIo {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse {}: {source}", path.display())]
  ManifestParse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

impl SsrError {
  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config(msg.into())
  }

  pub fn code_split(msg: impl Into<String>) -> Self {
    Self::CodeSplit(msg.into())
  }

  pub fn data_resolution(msg: impl Into<String>) -> Self {
    Self::DataResolution(msg.into())
  }

  pub fn render(msg: impl Into<String>) -> Self {
    Self::Render(msg.into())
  }

  pub fn code(&self) -> &'static str {
    match self {
      Self::Config(_) => "CONFIG_ERROR",
      Self::Assembly(_) => "ASSEMBLY_ERROR",
      Self::Client(_) | Self::Store(_) => "SETUP_ERROR",
      Self::CodeSplit(_) => "CODE_SPLIT_ERROR",
      Self::DataResolution(_) => "DATA_ERROR",
      Self::Render(_) => "RENDER_ERROR",
      Self::Timeout { .. } => "TIMEOUT",
      Self::ManifestIo { .. } | Self::ManifestParse { .. } => "MANIFEST_ERROR",
    }
  }

  /// HTTP status a response for this error carries.
  pub fn status(&self) -> u16 {
    match self {
      Self::Timeout { .. } => 504,
      _ => 500,
    }
  }

  /// The error followed by each underlying cause, one per line.
  pub fn trace(&self) -> String {
    let mut out = format!("{}: {self}", self.code());
    let mut source = std::error::Error::source(self);
    while let Some(cause) = source {
      out.push_str(&format!("\n  caused by: {cause}"));
      source = cause.source();
    }
    out
  }
}

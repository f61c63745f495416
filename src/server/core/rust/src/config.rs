/* src/server/core/rust/src/config.rs */

use std::path::{Path, PathBuf};
use std::time::Duration;

use universal_engine::Locale;

use crate::errors::SsrError;

/// Build mode. Only production reads the chunk manifest from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
  Production,
  #[default]
  Development,
}

impl Mode {
  fn parse(raw: &str) -> Self {
    if raw.trim().eq_ignore_ascii_case("production") { Self::Production } else { Self::Development }
  }
}

/// Process-wide server settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub mode: Mode,
  pub disable_ssr: bool,
  pub app_root: PathBuf,
  pub client_output_path: PathBuf,
  pub assets_filename: String,
  pub chunk_manifest_filename: String,
  pub public_path: PathBuf,
  /// Fail startup when the chunk manifest cannot be read in production.
  pub strict_chunk_manifest: bool,
  pub phase_timeout: Option<Duration>,
  pub port: u16,
  pub supported_locales: Vec<Locale>,
  pub default_locale: Locale,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      mode: Mode::Development,
      disable_ssr: false,
      app_root: PathBuf::from("."),
      client_output_path: PathBuf::from("build/client"),
      assets_filename: "assets.json".to_string(),
      chunk_manifest_filename: "chunk-manifest.json".to_string(),
      public_path: PathBuf::from("public"),
      strict_chunk_manifest: false,
      phase_timeout: None,
      port: 3000,
      supported_locales: Vec::new(),
      default_locale: Locale::new("en", Some("US")),
    }
  }
}

impl ServerConfig {
  pub fn from_env() -> Result<Self, SsrError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Build the config from any key lookup. Unset or empty keys keep their defaults.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, SsrError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let mut config = Self::default();

    if let Some(mode) = get("MODE") {
      config.mode = Mode::parse(&mode);
    }
    config.disable_ssr = get("DISABLE_SSR").is_some_and(|v| is_truthy(&v));
    if let Some(root) = get("APP_ROOT") {
      config.app_root = PathBuf::from(root);
    }
    if let Some(out) = get("CLIENT_BUNDLE_OUTPUT_PATH") {
      config.client_output_path = PathBuf::from(out);
    }
    if let Some(name) = get("CLIENT_BUNDLE_ASSETS_FILENAME") {
      config.assets_filename = name;
    }
    if let Some(name) = get("CLIENT_BUNDLE_CHUNK_MANIFEST_FILENAME") {
      config.chunk_manifest_filename = name;
    }
    if let Some(public) = get("CLIENT_PUBLIC_PATH") {
      config.public_path = PathBuf::from(public);
    }
    config.strict_chunk_manifest = get("CHUNK_MANIFEST_STRICT").is_some_and(|v| is_truthy(&v));

    if let Some(raw) = get("SSR_PHASE_TIMEOUT_MS") {
      let ms: u64 = raw
        .trim()
        .parse()
        .map_err(|_| SsrError::config(format!("SSR_PHASE_TIMEOUT_MS must be an integer, got {raw:?}")))?;
      config.phase_timeout = (ms > 0).then(|| Duration::from_millis(ms));
    }
    if let Some(raw) = get("PORT") {
      config.port =
        raw.trim().parse().map_err(|_| SsrError::config(format!("PORT must be a port number, got {raw:?}")))?;
    }
    if let Some(raw) = get("SUPPORTED_LOCALES") {
      config.supported_locales = raw
        .split(',')
        .filter(|tag| !tag.trim().is_empty())
        .map(|tag| {
          Locale::parse(tag).ok_or_else(|| SsrError::config(format!("invalid locale {tag:?} in SUPPORTED_LOCALES")))
        })
        .collect::<Result<_, _>>()?;
    }
    if let Some(raw) = get("DEFAULT_LOCALE") {
      config.default_locale =
        Locale::parse(&raw).ok_or_else(|| SsrError::config(format!("invalid DEFAULT_LOCALE {raw:?}")))?;
    }

    Ok(config)
  }

  pub fn is_production(&self) -> bool {
    self.mode == Mode::Production
  }

  pub fn absolute_app_root(&self) -> PathBuf {
    absolutize(&self.app_root)
  }

  pub fn absolute_client_output_path(&self) -> PathBuf {
    self.absolute_app_root().join(&self.client_output_path)
  }

  pub fn assets_info_path(&self) -> PathBuf {
    self.absolute_client_output_path().join(&self.assets_filename)
  }

  pub fn chunk_manifest_path(&self) -> PathBuf {
    self.absolute_client_output_path().join(&self.chunk_manifest_filename)
  }

  pub fn absolute_public_path(&self) -> PathBuf {
    self.absolute_app_root().join(&self.public_path)
  }
}

fn is_truthy(raw: &str) -> bool {
  !matches!(raw.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off")
}

fn absolutize(path: &Path) -> PathBuf {
  if path.is_absolute() {
    return path.to_path_buf();
  }
  match std::env::current_dir() {
    Ok(cwd) => cwd.join(path),
    Err(_) => path.to_path_buf(),
  }
}

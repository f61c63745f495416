/* src/server/core/rust/src/server.rs */

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use universal_engine::Locale;

use crate::app::UniversalApp;
use crate::build_loader::BuildArtifacts;
use crate::errors::SsrError;

/// Per-renderer settings shared by every request.
#[derive(Debug, Clone)]
pub struct RenderOptions {
  /// Seed data exposed to the client under the `ssr` state namespace.
  pub ssr_data: serde_json::Value,
  pub batch_requests: bool,
  pub trust_network: bool,
  /// Upper bound for each pipeline phase. `None` waits indefinitely.
  pub phase_timeout: Option<Duration>,
  /// Translated messages keyed by `language-region` or `language`.
  pub messages: HashMap<String, serde_json::Value>,
}

impl Default for RenderOptions {
  fn default() -> Self {
    Self {
      ssr_data: serde_json::Value::Object(serde_json::Map::new()),
      batch_requests: false,
      trust_network: true,
      phase_timeout: None,
      messages: HashMap::new(),
    }
  }
}

impl RenderOptions {
  /// Messages for `locale`, falling back from `language-region` to `language`.
  pub fn messages_for(&self, locale: &Locale) -> Option<&serde_json::Value> {
    self.messages.get(&locale.lang_tag()).or_else(|| self.messages.get(&locale.language))
  }
}

/// Turns requests into page responses for one application.
pub struct UniversalRenderer<A: UniversalApp> {
  pub(crate) app: Arc<A>,
  pub(crate) artifacts: Arc<BuildArtifacts>,
  pub(crate) options: RenderOptions,
}

impl<A: UniversalApp> UniversalRenderer<A> {
  pub fn builder() -> RendererBuilder<A> {
    RendererBuilder::new()
  }

  pub fn app(&self) -> &A {
    &self.app
  }

  pub fn artifacts(&self) -> &BuildArtifacts {
    &self.artifacts
  }

  pub fn options(&self) -> &RenderOptions {
    &self.options
  }
}

pub struct RendererBuilder<A: UniversalApp> {
  app: Option<Arc<A>>,
  artifacts: Option<Arc<BuildArtifacts>>,
  options: RenderOptions,
}

impl<A: UniversalApp> RendererBuilder<A> {
  pub fn new() -> Self {
    Self { app: None, artifacts: None, options: RenderOptions::default() }
  }

  pub fn app(mut self, app: A) -> Self {
    self.app = Some(Arc::new(app));
    self
  }

  pub fn shared_app(mut self, app: Arc<A>) -> Self {
    self.app = Some(app);
    self
  }

  pub fn artifacts(mut self, artifacts: BuildArtifacts) -> Self {
    self.artifacts = Some(Arc::new(artifacts));
    self
  }

  pub fn shared_artifacts(mut self, artifacts: Arc<BuildArtifacts>) -> Self {
    self.artifacts = Some(artifacts);
    self
  }

  pub fn ssr_data(mut self, data: serde_json::Value) -> Self {
    self.options.ssr_data = data;
    self
  }

  pub fn batch_requests(mut self, enabled: bool) -> Self {
    self.options.batch_requests = enabled;
    self
  }

  pub fn trust_network(mut self, enabled: bool) -> Self {
    self.options.trust_network = enabled;
    self
  }

  pub fn phase_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.options.phase_timeout = timeout;
    self
  }

  pub fn messages(mut self, locale: &Locale, messages: serde_json::Value) -> Self {
    self.options.messages.insert(locale.lang_tag(), messages);
    self
  }

  /// Fails when no application or build artifacts were supplied.
  pub fn build(self) -> Result<UniversalRenderer<A>, SsrError> {
    let app = self.app.ok_or_else(|| SsrError::config("missing application"))?;
    let artifacts = self.artifacts.ok_or_else(|| SsrError::config("missing build artifacts"))?;
    Ok(UniversalRenderer { app, artifacts, options: self.options })
  }
}

impl<A: UniversalApp> Default for RendererBuilder<A> {
  fn default() -> Self {
    Self::new()
  }
}

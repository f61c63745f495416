/* demos/standalone/src/main.rs */

mod app;

use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;
use universal_server::{BuildArtifacts, Locale, ServerConfig, UniversalRenderer};
use universal_server_axum::IntoAxumRouter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("universal_server=debug,universal_standalone_demo=info")),
    )
    .init();

  let config = ServerConfig::from_env()?;
  let artifacts = BuildArtifacts::load(&config)?;
  info!(mode = ?config.mode, output = %config.absolute_client_output_path().display(), "build artifacts ready");

  let renderer = UniversalRenderer::builder()
    .app(app::DemoApp)
    .artifacts(artifacts)
    .ssr_data(json!({ "apiUri": format!("http://localhost:{}/api", config.port) }))
    .phase_timeout(config.phase_timeout)
    .messages(&Locale::new("en", Some("US")), json!({ "greeting": "Hello" }))
    .messages(&Locale::new("de", Some("DE")), json!({ "greeting": "Hallo" }))
    .build()?;

  renderer.serve(&config).await
}

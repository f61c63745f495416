/* src/server/adapter/axum/src/lib.rs */

mod error;
mod handler;
mod nonce;


use tracing::info;
use universal_server::{LocaleResolver, ServerConfig, UniversalApp, UniversalRenderer};

pub use nonce::{content_security_policy, generate_nonce};
/// Re-export the render pipeline for convenience
pub use universal_server;

/// Extension trait that converts a `UniversalRenderer` into an Axum router.
pub trait IntoAxumRouter {
  /// Page routes for every GET path plus `/static` served from the client
  /// build output.
  fn into_axum_router(self, config: &ServerConfig) -> axum::Router;
  fn serve(
    self,
    config: &ServerConfig,
  ) -> impl std::future::Future<Output = Result<(), Box<dyn std::error::Error>>> + Send;
}

impl<A: UniversalApp> IntoAxumRouter for UniversalRenderer<A> {
  fn into_axum_router(self, config: &ServerConfig) -> axum::Router {
    let state = handler::AppState {
      renderer: self,
      resolver: LocaleResolver::new(config.supported_locales.clone(), config.default_locale.clone()),
      disable_ssr: config.disable_ssr,
    };
    handler::build_router(state, config.absolute_client_output_path())
  }

  async fn serve(self, config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let router = self.into_axum_router(config);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    let local_addr = listener.local_addr()?;
    info!(
      port = local_addr.port(),
      ssr = if config.disable_ssr { "disabled" } else { "enabled" },
      "server listening on http://localhost:{}",
      local_addr.port()
    );
    axum::serve(listener, router).await?;
    Ok(())
  }
}

/* src/server/core/rust/src/pipeline/mod.rs */

// Request -> response orchestration.
// Light path: bootstrap shell only. Full path: client, store, code split,
// data resolution, render, routing outcome, document assembly.

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, info};
use universal_engine::{Locale, PageOptions, assemble_page};

use crate::app::{
  ClientOptions, CodeSplitWrapped, ComponentTree, InitialState, RoutingOutcome, StateStore,
  UniversalApp, initial_state,
};
use crate::errors::SsrError;
use crate::measure::Measure;
use crate::response::{Cookie, LOCALE_COOKIE, PageResponse};
use crate::server::UniversalRenderer;

/// Everything the pipeline knows about one incoming request.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
  /// Path and query of the request.
  pub url: String,
  /// Request headers, lowercased names.
  pub headers: BTreeMap<String, String>,
  /// Nonce allowing the inline bootstrap script under CSP.
  pub nonce: Option<String>,
  /// Locale negotiated upstream.
  pub locale: Option<Locale>,
  pub ssr_disabled: bool,
}

impl<A: UniversalApp> UniversalRenderer<A> {
  /// Render one request. Returns `Err` only for configuration errors
  /// (missing nonce or locale); every other failure becomes an error page.
  pub async fn render(&self, ctx: RenderContext) -> Result<PageResponse, SsrError> {
    let Some(nonce) = ctx.nonce.as_deref() else {
      return Err(SsrError::config("a nonce value has not been attached to the response"));
    };
    let Some(locale) = ctx.locale.as_ref() else {
      return Err(SsrError::config("no locale has been attached to the request"));
    };

    info!(
      url = %ctx.url,
      ssr = if ctx.ssr_disabled { "disabled" } else { "enabled" },
      locale = %locale,
      "incoming request"
    );

    let locale_cookie = Cookie::new(LOCALE_COOKIE, locale.cookie_value());
    let seed = initial_state(&self.options.ssr_data);
    let mut measure = Measure::new();

    let response = if ctx.ssr_disabled {
      self.render_light(nonce, locale, seed, &mut measure)
    } else {
      self.render_full(&ctx, nonce, locale, seed, &mut measure).await
    };

    measure.print();
    Ok(response.with_cookie(locale_cookie))
  }

  /// SSR disabled: send the shell and let the client render.
  fn render_light(
    &self,
    nonce: &str,
    locale: &Locale,
    seed: InitialState,
    measure: &mut Measure,
  ) -> PageResponse {
    let state = serde_json::Value::Object(seed);
    let mut opts =
      PageOptions::new(&state, locale, &self.artifacts.assets, &self.artifacts.chunk_manifest);
    opts.nonce = Some(nonce);
    opts.messages = self.options.messages_for(locale);

    measure.start("render-page");
    let result = assemble_page(&opts);
    measure.stop("render-page");

    match result {
      Ok(html) => PageResponse::html(200, html),
      Err(err) => {
        let err = SsrError::from(err);
        error!(error = %err, "light render failed");
        PageResponse::error(&err)
      }
    }
  }

  async fn render_full(
    &self,
    ctx: &RenderContext,
    nonce: &str,
    locale: &Locale,
    seed: InitialState,
    measure: &mut Measure,
  ) -> PageResponse {
    debug!("rendering app with data");
    match self.try_render_full(ctx, nonce, locale, seed, measure).await {
      Ok(response) => response,
      Err(err) => PageResponse::error(&err),
    }
  }

  async fn try_render_full(
    &self,
    ctx: &RenderContext,
    nonce: &str,
    locale: &Locale,
    seed: InitialState,
    measure: &mut Measure,
  ) -> Result<PageResponse, SsrError> {
    let app = &*self.app;
    let limit = self.options.phase_timeout;

    let client_options = ClientOptions {
      headers: ctx.headers.clone(),
      batch_requests: self.options.batch_requests,
      trust_network: self.options.trust_network,
      initial_state: seed.clone(),
    };
    let client =
      run_phase(measure, "create-client", limit, async { app.create_client(&client_options) }).await?;
    let store =
      run_phase(measure, "create-store", limit, async { app.create_store(client.clone(), &seed) })
        .await?;

    let root = app.root(&ctx.url, client, store.clone());
    let CodeSplitWrapped { mut tree, state: code_split } =
      run_phase(measure, "wrap-async", limit, app.wrap_async(root)).await?;

    run_phase(measure, "loading-data", limit, tree.resolve_data()).await?;
    let rendered = run_phase(measure, "render-react", limit, async { tree.render_to_string() }).await?;
    debug!(routing = ?rendered.routing, "routing outcome");

    let status = match rendered.routing {
      RoutingOutcome::Redirect(ref target) => {
        info!(location = %target, "redirecting");
        return Ok(PageResponse::redirect(target));
      }
      RoutingOutcome::Missed => 404,
      RoutingOutcome::Normal => 200,
    };

    // Embed what was rendered, not the pre-render seed.
    let state = serde_json::Value::Object(store.snapshot());
    let mut opts =
      PageOptions::new(&state, locale, &self.artifacts.assets, &self.artifacts.chunk_manifest);
    opts.rendered_app = Some(&rendered.markup);
    opts.nonce = Some(nonce);
    opts.head = Some(&rendered.head);
    opts.code_split = Some(&code_split);
    opts.messages = self.options.messages_for(locale);

    let html =
      run_phase(measure, "render-page", limit, async { assemble_page(&opts).map_err(SsrError::from) })
        .await?;
    debug!(status, "sending page");
    Ok(PageResponse::html(status, html))
  }
}

/// Time one phase, bound it by `limit`, and log its failure.
async fn run_phase<T, F>(
  measure: &mut Measure,
  phase: &'static str,
  limit: Option<Duration>,
  fut: F,
) -> Result<T, SsrError>
where
  F: Future<Output = Result<T, SsrError>>,
{
  measure.start(phase);
  let result = match limit {
    Some(after) => tokio::time::timeout(after, fut)
      .await
      .unwrap_or_else(|_| Err(SsrError::Timeout { phase, after })),
    None => fut.await,
  };
  measure.stop(phase);

  if let Err(ref err) = result {
    error!(phase, error = %err, "render phase failed");
  }
  result
}

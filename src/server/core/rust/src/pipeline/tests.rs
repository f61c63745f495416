/* src/server/core/rust/src/pipeline/tests.rs */

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde_json::json;
use universal_engine::{AssetManifest, ChunkAssets, ChunkManifest, CodeSplitState, HeadFragments, Locale};

use super::RenderContext;
use crate::app::{
  ClientOptions, CodeSplitWrapped, ComponentTree, InitialState, RenderedTree, RoutingOutcome,
  StateStore, UniversalApp,
};
use crate::build_loader::BuildArtifacts;
use crate::errors::SsrError;
use crate::server::UniversalRenderer;

#[derive(Default)]
struct MockApp {
  routing: RoutingOutcome,
  fail_wrap: bool,
  fail_data: bool,
  stall_data: bool,
  extra_chunks: Vec<String>,
  stores_created: AtomicUsize,
  last_client: Mutex<Option<ClientOptions>>,
}

struct MockStore {
  state: Mutex<InitialState>,
}

impl StateStore for MockStore {
  fn snapshot(&self) -> InitialState {
    self.state.lock().unwrap().clone()
  }
}

struct MockTree {
  location: String,
  store: Arc<MockStore>,
  routing: RoutingOutcome,
  fail_data: bool,
  stall_data: bool,
  resolved: bool,
}

impl ComponentTree for MockTree {
  fn resolve_data(&mut self) -> BoxFuture<'_, Result<(), SsrError>> {
    Box::pin(async move {
      if self.stall_data {
        std::future::pending::<()>().await;
      }
      if self.fail_data {
        return Err(SsrError::data_resolution("upstream returned 503"));
      }
      self.store.state.lock().unwrap().insert("user".into(), json!({"name": "Ada"}));
      self.resolved = true;
      Ok(())
    })
  }

  fn render_to_string(&self) -> Result<RenderedTree, SsrError> {
    Ok(RenderedTree {
      markup: format!("<main>{} resolved={}</main>", self.location, self.resolved),
      routing: self.routing.clone(),
      head: HeadFragments { title: "<title>Home</title>".into(), ..Default::default() },
    })
  }
}

impl UniversalApp for MockApp {
  type Client = ();
  type Store = MockStore;
  type Tree = MockTree;

  fn create_client(&self, options: &ClientOptions) -> Result<Arc<()>, SsrError> {
    *self.last_client.lock().unwrap() = Some(options.clone());
    Ok(Arc::new(()))
  }

  fn create_store(&self, _client: Arc<()>, initial_state: &InitialState) -> Result<Arc<MockStore>, SsrError> {
    self.stores_created.fetch_add(1, Ordering::SeqCst);
    Ok(Arc::new(MockStore { state: Mutex::new(initial_state.clone()) }))
  }

  fn root(&self, location: &str, _client: Arc<()>, store: Arc<MockStore>) -> MockTree {
    MockTree {
      location: location.to_string(),
      store,
      routing: self.routing.clone(),
      fail_data: self.fail_data,
      stall_data: self.stall_data,
      resolved: false,
    }
  }

  fn wrap_async(&self, tree: MockTree) -> BoxFuture<'_, Result<CodeSplitWrapped<MockTree>, SsrError>> {
    Box::pin(async move {
      if self.fail_wrap {
        return Err(SsrError::code_split("async component bootstrap failed"));
      }
      Ok(CodeSplitWrapped {
        tree,
        state: CodeSplitState {
          identifier: "ASYNC_COMPONENTS_STATE".into(),
          state: json!({"resolved": {"1": true}}),
          chunks: self.extra_chunks.clone(),
        },
      })
    })
  }
}

fn artifacts() -> BuildArtifacts {
  let assets = AssetManifest::default()
    .with_chunk("vendor", ChunkAssets { js: Some("/static/vendor.1a.js".into()), css: None })
    .with_chunk(
      "main",
      ChunkAssets { js: Some("/static/main.2b.js".into()), css: Some("/static/main.2b.css".into()) },
    )
    .with_chunk("about", ChunkAssets { js: Some("/static/about.3c.js".into()), css: None });
  BuildArtifacts::new(assets, ChunkManifest::empty())
}

fn renderer(app: MockApp) -> UniversalRenderer<MockApp> {
  UniversalRenderer::builder()
    .app(app)
    .artifacts(artifacts())
    .ssr_data(json!({"apiUri": "https://api.test"}))
    .build()
    .unwrap()
}

fn ctx(url: &str, ssr_disabled: bool) -> RenderContext {
  let mut headers = BTreeMap::new();
  headers.insert("authorization".to_string(), "Bearer t0k".to_string());
  RenderContext {
    url: url.to_string(),
    headers,
    nonce: Some("abc123".to_string()),
    locale: Some(Locale::new("en", Some("US"))),
    ssr_disabled,
  }
}

#[tokio::test]
async fn light_path_sends_empty_shell() {
  let renderer = renderer(MockApp::default());
  let response = renderer.render(ctx("/", true)).await.unwrap();

  assert_eq!(response.status, 200);
  let body = response.body.unwrap();
  assert!(body.contains(r#"<div id="app"></div>"#));
  assert!(body.contains(r#"<script nonce="abc123">APP_STATE="#));
  assert!(body.contains(r#""apiUri":"https:"#));
  assert_eq!(response.cookies[0].header_value(), "locale=en_US; Path=/");
  assert_eq!(renderer.app().stores_created.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn light_path_assembly_failure_is_500() {
  let renderer = renderer(MockApp::default());
  let mut request = ctx("/", true);
  request.nonce = Some("bad\"nonce".to_string());

  let response = renderer.render(request).await.unwrap();
  assert_eq!(response.status, 500);
  assert!(response.body.unwrap().starts_with("Error during rendering: "));
  assert_eq!(response.cookies.len(), 1);
}

#[tokio::test]
async fn full_path_renders_resolved_tree() {
  let app = MockApp { extra_chunks: vec!["about".into()], ..Default::default() };
  let renderer = renderer(app);
  let response = renderer.render(ctx("/about", false)).await.unwrap();

  assert_eq!(response.status, 200);
  let body = response.body.unwrap();
  assert!(body.contains("<main>/about resolved=true</main>"));
  assert!(body.contains("<title>Home</title>"));
  assert!(body.contains(r#"ASYNC_COMPONENTS_STATE={"resolved":{"1":true}};"#));

  let vendor = body.find("vendor.1a.js").unwrap();
  let main = body.find("main.2b.js").unwrap();
  let about = body.find("about.3c.js").unwrap();
  assert!(vendor < main && main < about);
  assert!(body.contains("main.2b.css"));
  assert_eq!(renderer.app().stores_created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn embedded_state_is_taken_after_render() {
  let renderer = renderer(MockApp::default());
  let body = renderer.render(ctx("/", false)).await.unwrap().body.unwrap();
  assert!(body.contains(r#""user":{"name":"Ada"}"#));
  assert!(body.contains(r#""ssr":{"apiUri""#));
}

#[tokio::test]
async fn client_receives_request_headers_and_flags() {
  let renderer = UniversalRenderer::builder()
    .app(MockApp::default())
    .artifacts(artifacts())
    .batch_requests(true)
    .trust_network(false)
    .build()
    .unwrap();
  renderer.render(ctx("/", false)).await.unwrap();

  let options = renderer.app().last_client.lock().unwrap().clone().unwrap();
  assert_eq!(options.headers["authorization"], "Bearer t0k");
  assert!(options.batch_requests);
  assert!(!options.trust_network);
  assert!(options.initial_state.contains_key("ssr"));
}

#[tokio::test]
async fn redirect_ends_without_body() {
  let app = MockApp { routing: RoutingOutcome::Redirect("/login".into()), ..Default::default() };
  let response = renderer(app).render(ctx("/account", false)).await.unwrap();

  assert_eq!(response.status, 302);
  assert_eq!(response.header("Location"), Some("/login"));
  assert_eq!(response.body, None);
  assert_eq!(response.cookies[0].value, "en_US");
}

#[tokio::test]
async fn missed_route_is_404_with_full_page() {
  let app = MockApp { routing: RoutingOutcome::Missed, ..Default::default() };
  let response = renderer(app).render(ctx("/nowhere", false)).await.unwrap();

  assert_eq!(response.status, 404);
  assert!(response.body.unwrap().contains("<main>/nowhere resolved=true</main>"));
}

#[tokio::test]
async fn missing_nonce_fails_before_store_creation() {
  let renderer = renderer(MockApp::default());
  let mut request = ctx("/", false);
  request.nonce = None;

  let err = renderer.render(request).await.unwrap_err();
  assert!(matches!(err, SsrError::Config(_)));
  assert_eq!(renderer.app().stores_created.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_locale_fails_before_store_creation() {
  let renderer = renderer(MockApp::default());
  let mut request = ctx("/", false);
  request.locale = None;

  let err = renderer.render(request).await.unwrap_err();
  assert_eq!(err.code(), "CONFIG_ERROR");
  assert_eq!(renderer.app().stores_created.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn code_split_failure_becomes_error_page() {
  let app = MockApp { fail_wrap: true, ..Default::default() };
  let response = renderer(app).render(ctx("/", false)).await.unwrap();

  assert_eq!(response.status, 500);
  assert!(response.body.unwrap().contains("async component bootstrap failed"));
  assert_eq!(response.cookies.len(), 1);
}

#[tokio::test]
async fn data_failure_becomes_error_page() {
  let app = MockApp { fail_data: true, ..Default::default() };
  let response = renderer(app).render(ctx("/", false)).await.unwrap();

  assert_eq!(response.status, 500);
  assert!(response.body.unwrap().contains("upstream returned 503"));
}

#[tokio::test(start_paused = true)]
async fn stalled_phase_times_out() {
  let renderer = UniversalRenderer::builder()
    .app(MockApp { stall_data: true, ..Default::default() })
    .artifacts(artifacts())
    .phase_timeout(Some(Duration::from_millis(50)))
    .build()
    .unwrap();

  let response = renderer.render(ctx("/", false)).await.unwrap();
  assert_eq!(response.status, 504);
  assert!(response.body.unwrap().contains("loading-data"));
}

#[tokio::test]
async fn messages_follow_locale() {
  let de = Locale::new("de", Some("DE"));
  let renderer = UniversalRenderer::builder()
    .app(MockApp::default())
    .artifacts(artifacts())
    .messages(&de, json!({"greeting": "Hallo"}))
    .build()
    .unwrap();

  let mut request = ctx("/", true);
  request.locale = Some(de);
  let body = renderer.render(request).await.unwrap().body.unwrap();
  assert!(body.contains(r#"MESSAGES={"greeting":"Hallo"};"#));
  assert!(body.contains(r#"<html lang="de-DE""#));

  let body = renderer.render(ctx("/", true)).await.unwrap().body.unwrap();
  assert!(body.contains("MESSAGES={};"));
}

#[test]
fn builder_requires_app_and_artifacts() {
  let missing_app = UniversalRenderer::<MockApp>::builder().artifacts(artifacts()).build();
  assert!(matches!(missing_app, Err(SsrError::Config(_))));

  let missing_artifacts = UniversalRenderer::builder().app(MockApp::default()).build();
  assert!(matches!(missing_artifacts, Err(SsrError::Config(_))));
}

fn assert_send<T: Send>(_: &T) {}

fn render_future_is_send<A: UniversalApp>(renderer: &UniversalRenderer<A>) {
  assert_send(&renderer.render(RenderContext::default()));
}

#[test]
fn render_future_can_cross_threads() {
  render_future_is_send(&renderer(MockApp::default()));
}

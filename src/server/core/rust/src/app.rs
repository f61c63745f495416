/* src/server/core/rust/src/app.rs */

//! Seams between the render pipeline and the embedding application.
//!
//! The pipeline never looks inside the data client, the store or the
//! component tree. It only drives them through these traits, in a fixed
//! order, once per request.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use universal_engine::{CodeSplitState, HeadFragments};

use crate::errors::SsrError;

/// Namespace -> serializable data. Always carries an `ssr` namespace.
pub type InitialState = serde_json::Map<String, serde_json::Value>;

/// Namespace holding caller-supplied SSR seed data.
pub const SSR_NAMESPACE: &str = "ssr";

/// Seed state for one request: `{ "ssr": <ssr data> }`.
pub fn initial_state(ssr_data: &serde_json::Value) -> InitialState {
  let mut state = InitialState::new();
  state.insert(SSR_NAMESPACE.to_string(), ssr_data.clone());
  state
}

/// Settings for the per-request data-fetching client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
  /// Incoming request headers, lowercased names. Forwarded so that the
  /// client can authenticate as the user.
  pub headers: BTreeMap<String, String>,
  pub batch_requests: bool,
  pub trust_network: bool,
  pub initial_state: InitialState,
}

/// What the router concluded while the tree was rendered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoutingOutcome {
  #[default]
  Normal,
  Redirect(String),
  /// No route matched. The tree still renders its not-found view.
  Missed,
}

/// Result of rendering a fully resolved tree.
#[derive(Debug, Clone, Default)]
pub struct RenderedTree {
  pub markup: String,
  pub routing: RoutingOutcome,
  pub head: HeadFragments,
}

/// A tree decorated for code splitting, plus the state the client needs to
/// rehydrate the same async chunks.
pub struct CodeSplitWrapped<T> {
  pub tree: T,
  pub state: CodeSplitState,
}

/// Application state container. Created fresh for each full render.
pub trait StateStore: Send + Sync {
  /// Current state, including everything fetched during data resolution.
  fn snapshot(&self) -> InitialState;
}

/// A root component tree bound to one request location.
pub trait ComponentTree: Send + Sync {
  /// Walk the tree and fetch every declared async data dependency.
  fn resolve_data(&mut self) -> BoxFuture<'_, Result<(), SsrError>>;

  /// Render the resolved tree to markup. Head metadata and the routing
  /// outcome are returned alongside instead of being written to shared state.
  fn render_to_string(&self) -> Result<RenderedTree, SsrError>;
}

/// Everything an application supplies to be server rendered.
pub trait UniversalApp: Send + Sync + 'static {
  type Client: Send + Sync + 'static;
  type Store: StateStore + 'static;
  type Tree: ComponentTree + 'static;

  fn create_client(&self, options: &ClientOptions) -> Result<Arc<Self::Client>, SsrError>;

  /// Build the store from the application's reducers, middlewares and
  /// enhancers, seeded with `initial_state`.
  fn create_store(
    &self,
    client: Arc<Self::Client>,
    initial_state: &InitialState,
  ) -> Result<Arc<Self::Store>, SsrError>;

  /// The root tree rendered for `location`.
  fn root(&self, location: &str, client: Arc<Self::Client>, store: Arc<Self::Store>) -> Self::Tree;

  /// Decorate the tree so async components are initialised for rendering.
  fn wrap_async(&self, tree: Self::Tree) -> BoxFuture<'_, Result<CodeSplitWrapped<Self::Tree>, SsrError>>;
}

/* demos/standalone/src/app.rs */

// A toy application: two pages, one legacy redirect, everything else missed.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use universal_server::{
  BoxFuture, ClientOptions, CodeSplitState, CodeSplitWrapped, ComponentTree, HeadFragments,
  InitialState, RenderedTree, RoutingOutcome, SsrError, StateStore, UniversalApp,
};

pub struct DemoApp;

/// Stands in for a data-fetching client bound to the caller's headers.
pub struct DemoClient {
  user_agent: Option<String>,
}

impl DemoClient {
  async fn fetch_page(&self, location: &str) -> Result<serde_json::Value, SsrError> {
    tokio::time::sleep(Duration::from_millis(5)).await;
    Ok(json!({
      "path": location,
      "userAgent": self.user_agent,
    }))
  }
}

pub struct DemoStore {
  state: Mutex<InitialState>,
}

impl DemoStore {
  fn insert(&self, key: &str, value: serde_json::Value) -> Result<(), SsrError> {
    let mut state =
      self.state.lock().map_err(|_| SsrError::data_resolution("store lock poisoned"))?;
    state.insert(key.to_string(), value);
    Ok(())
  }
}

impl StateStore for DemoStore {
  fn snapshot(&self) -> InitialState {
    self.state.lock().map(|s| s.clone()).unwrap_or_default()
  }
}

pub struct DemoTree {
  location: String,
  client: Arc<DemoClient>,
  store: Arc<DemoStore>,
  page: Option<serde_json::Value>,
}

impl DemoTree {
  fn path(&self) -> &str {
    self.location.split('?').next().unwrap_or_default()
  }
}

impl ComponentTree for DemoTree {
  fn resolve_data(&mut self) -> BoxFuture<'_, Result<(), SsrError>> {
    Box::pin(async move {
      let data = self.client.fetch_page(&self.location).await?;
      self.store.insert("page", data.clone())?;
      self.page = Some(data);
      Ok(())
    })
  }

  fn render_to_string(&self) -> Result<RenderedTree, SsrError> {
    let (routing, title, body) = match self.path() {
      "/" => (RoutingOutcome::Normal, "Home", "<h1>Welcome</h1><a href=\"/about\">About</a>"),
      "/about" => (RoutingOutcome::Normal, "About", "<h1>About</h1>"),
      "/legacy" => (RoutingOutcome::Redirect("/about".into()), "", ""),
      _ => (RoutingOutcome::Missed, "Not found", "<h1>Not found</h1>"),
    };
    let fetched = self.page.as_ref().map(|p| p.to_string()).unwrap_or_default();

    Ok(RenderedTree {
      markup: format!("{body}<pre>{}</pre>", fetched.replace('<', "&lt;")),
      routing,
      head: HeadFragments {
        title: format!("<title>{title}</title>"),
        meta: r#"<meta charset="utf-8" />"#.to_string(),
        ..HeadFragments::default()
      },
    })
  }
}

impl UniversalApp for DemoApp {
  type Client = DemoClient;
  type Store = DemoStore;
  type Tree = DemoTree;

  fn create_client(&self, options: &ClientOptions) -> Result<Arc<DemoClient>, SsrError> {
    Ok(Arc::new(DemoClient { user_agent: options.headers.get("user-agent").cloned() }))
  }

  fn create_store(
    &self,
    _client: Arc<DemoClient>,
    initial_state: &InitialState,
  ) -> Result<Arc<DemoStore>, SsrError> {
    Ok(Arc::new(DemoStore { state: Mutex::new(initial_state.clone()) }))
  }

  fn root(&self, location: &str, client: Arc<DemoClient>, store: Arc<DemoStore>) -> DemoTree {
    DemoTree { location: location.to_string(), client, store, page: None }
  }

  fn wrap_async(&self, tree: DemoTree) -> BoxFuture<'_, Result<CodeSplitWrapped<DemoTree>, SsrError>> {
    Box::pin(async move {
      let chunks = if tree.path() == "/about" { vec!["about".to_string()] } else { Vec::new() };
      let resolved: BTreeMap<String, bool> = chunks.iter().map(|c| (c.clone(), true)).collect();
      Ok(CodeSplitWrapped {
        tree,
        state: CodeSplitState {
          identifier: "ASYNC_COMPONENTS_STATE".to_string(),
          state: json!({ "resolved": resolved }),
          chunks,
        },
      })
    })
  }
}

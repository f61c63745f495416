/* src/server/adapter/axum/src/handler.rs */

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::header::{ACCEPT_LANGUAGE, CONTENT_SECURITY_POLICY, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, get_service};
use tower_http::services::ServeDir;
use tracing::warn;
use universal_server::{
  LocaleResolver, PageResponse, RenderContext, UniversalApp, UniversalRenderer,
};

use crate::error::AxumError;
use crate::nonce::{content_security_policy, generate_nonce};

pub(crate) struct AppState<A: UniversalApp> {
  pub renderer: UniversalRenderer<A>,
  pub resolver: LocaleResolver,
  pub disable_ssr: bool,
}

pub(crate) fn build_router<A: UniversalApp>(state: AppState<A>, static_dir: PathBuf) -> Router {
  Router::new()
    .nest_service("/static", get_service(ServeDir::new(static_dir)))
    .route("/", get(handle_page::<A>))
    .route("/{*path}", get(handle_page::<A>))
    .with_state(Arc::new(state))
}

async fn handle_page<A: UniversalApp>(
  State(state): State<Arc<AppState<A>>>,
  uri: Uri,
  headers: HeaderMap,
) -> Result<Response, AxumError> {
  let nonce = generate_nonce();
  let locale = state.resolver.resolve(header_str(&headers, &COOKIE), header_str(&headers, &ACCEPT_LANGUAGE));

  let ctx = RenderContext {
    url: uri.path_and_query().map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string()),
    headers: forwarded_headers(&headers),
    nonce: Some(nonce.clone()),
    locale: Some(locale),
    ssr_disabled: state.disable_ssr,
  };

  let page = state.renderer.render(ctx).await?;
  Ok(into_axum_response(page, &nonce))
}

/// Flatten request headers for the data client. Repeated headers are joined
/// into one value; `cookie` lines with `; `, everything else with `, `.
fn forwarded_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
  headers
    .keys()
    .filter_map(|name| {
      let separator = if *name == COOKIE { "; " } else { ", " };
      let values: Vec<&str> = headers.get_all(name).iter().filter_map(|v| v.to_str().ok()).collect();
      (!values.is_empty()).then(|| (name.as_str().to_string(), values.join(separator)))
    })
    .collect()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
  headers.get(name).and_then(|v| v.to_str().ok())
}

fn into_axum_response(page: PageResponse, nonce: &str) -> Response {
  let status = StatusCode::from_u16(page.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
  let mut response = match page.body {
    Some(body) => Html(body).into_response(),
    None => ().into_response(),
  };
  *response.status_mut() = status;

  let headers = response.headers_mut();
  for (name, value) in &page.headers {
    match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
      (Ok(name), Ok(value)) => {
        headers.append(name, value);
      }
      _ => warn!(header = %name, "dropping response header that is not valid HTTP"),
    }
  }
  for cookie in &page.cookies {
    if let Ok(value) = HeaderValue::try_from(cookie.header_value()) {
      headers.append(SET_COOKIE, value);
    }
  }
  if let Ok(csp) = HeaderValue::try_from(content_security_policy(nonce)) {
    headers.insert(CONTENT_SECURITY_POLICY, csp);
  }
  response
}

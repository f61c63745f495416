/* src/server/engine/rust/src/page.rs */

use serde::{Deserialize, Serialize};

use crate::assets::{AssetManifest, ChunkManifest, chunks_for_render, resolve_assets};
use crate::escape::script_literal;
use crate::locale::Locale;

/// Global the client store rehydrates from.
pub const APP_STATE_GLOBAL: &str = "APP_STATE";
/// Global holding the code-split chunk table.
pub const CHUNK_MANIFEST_GLOBAL: &str = "CHUNK_MANIFEST";
/// Global holding translated messages.
pub const MESSAGES_GLOBAL: &str = "MESSAGES";
/// Id of the element the client mounts into.
pub const MOUNT_ELEMENT_ID: &str = "app";

#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
  #[error("nonce {0:?} contains characters not allowed in an attribute value")]
  InvalidNonce(String),
  #[error("{0:?} is not a valid script identifier")]
  InvalidIdentifier(String),
  #[error("failed to serialize {global}: {source}")]
  Serialize {
    global: String,
    #[source]
    source: serde_json::Error,
  },
}

/// HTML fragments collected from the rendered tree's head management.
/// Each field is injected verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadFragments {
  #[serde(default)]
  pub html_attributes: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub meta: String,
  #[serde(default)]
  pub link: String,
  #[serde(default)]
  pub style: String,
  #[serde(default)]
  pub script: String,
}

/// Which async chunks a render used, and the global the client reads them from.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeSplitState {
  pub identifier: String,
  pub state: serde_json::Value,
  /// Chunk names to preload after `vendor` and `main`.
  pub chunks: Vec<String>,
}

/// Inputs for [`assemble_page`]. Everything is borrowed; assembly performs no I/O.
pub struct PageOptions<'a> {
  pub rendered_app: Option<&'a str>,
  pub initial_state: &'a serde_json::Value,
  pub nonce: Option<&'a str>,
  pub head: Option<&'a HeadFragments>,
  pub code_split: Option<&'a CodeSplitState>,
  pub locale: &'a Locale,
  pub messages: Option<&'a serde_json::Value>,
  pub asset_manifest: &'a AssetManifest,
  pub chunk_manifest: &'a ChunkManifest,
}

impl<'a> PageOptions<'a> {
  /// Options for a page without server-rendered markup.
  pub fn new(
    initial_state: &'a serde_json::Value,
    locale: &'a Locale,
    asset_manifest: &'a AssetManifest,
    chunk_manifest: &'a ChunkManifest,
  ) -> Self {
    Self {
      rendered_app: None,
      initial_state,
      nonce: None,
      head: None,
      code_split: None,
      locale,
      messages: None,
      asset_manifest,
      chunk_manifest,
    }
  }
}

/// Build the inline bootstrap code: state, chunk manifest, optional
/// code-split state, messages. Each is its own `NAME=literal;` statement.
pub fn bootstrap_script(opts: &PageOptions<'_>) -> Result<String, AssembleError> {
  let empty = serde_json::Value::Object(serde_json::Map::new());

  let mut code = String::new();
  push_assignment(&mut code, APP_STATE_GLOBAL, opts.initial_state)?;
  push_assignment(&mut code, CHUNK_MANIFEST_GLOBAL, opts.chunk_manifest.as_value())?;
  if let Some(split) = opts.code_split {
    if !is_script_identifier(&split.identifier) {
      return Err(AssembleError::InvalidIdentifier(split.identifier.clone()));
    }
    push_assignment(&mut code, &split.identifier, &split.state)?;
  }
  push_assignment(&mut code, MESSAGES_GLOBAL, opts.messages.unwrap_or(&empty))?;
  Ok(code)
}

fn push_assignment(
  code: &mut String,
  global: &str,
  value: &serde_json::Value,
) -> Result<(), AssembleError> {
  let literal = script_literal(value)
    .map_err(|source| AssembleError::Serialize { global: global.to_string(), source })?;
  code.push_str(global);
  code.push('=');
  code.push_str(&literal);
  code.push(';');
  Ok(())
}

/// Produce the complete HTML document. Identical options give byte-identical output.
pub fn assemble_page(opts: &PageOptions<'_>) -> Result<String, AssembleError> {
  if let Some(nonce) = opts.nonce
    && !is_valid_nonce(nonce)
  {
    return Err(AssembleError::InvalidNonce(nonce.to_string()));
  }

  let extra_chunks = opts.code_split.map(|s| s.chunks.as_slice()).unwrap_or_default();
  let assets = resolve_assets(opts.asset_manifest, &chunks_for_render(extra_chunks));
  let inline_code = bootstrap_script(opts)?;
  let head = opts.head;

  let mut html = String::with_capacity(1024 + opts.rendered_app.map_or(0, str::len));
  html.push_str("<!doctype html>\n");
  html.push_str(&format!(r#"<html lang="{}""#, escape_attr(&opts.locale.lang_tag())));
  if let Some(attrs) = head.map(|h| h.html_attributes.as_str()).filter(|a| !a.is_empty()) {
    html.push(' ');
    html.push_str(attrs);
  }
  html.push_str(">\n<head>\n");
  if let Some(h) = head {
    push_fragment(&mut html, &h.title);
    push_fragment(&mut html, &h.meta);
    push_fragment(&mut html, &h.link);
  }
  for uri in &assets.styles {
    html.push_str(&format!(
      r#"<link href="{}" media="screen, projection" rel="stylesheet" />"#,
      escape_attr(uri)
    ));
    html.push('\n');
  }
  if let Some(h) = head {
    push_fragment(&mut html, &h.style);
  }
  html.push_str("</head>\n<body>\n");

  html.push_str(&format!(
    r#"<div id="{MOUNT_ELEMENT_ID}">{}</div>"#,
    opts.rendered_app.unwrap_or_default()
  ));
  html.push('\n');

  match opts.nonce {
    Some(nonce) => html.push_str(&format!(r#"<script nonce="{nonce}">"#)),
    None => html.push_str("<script>"),
  }
  html.push_str(&inline_code);
  html.push_str("</script>\n");

  for uri in &assets.scripts {
    html.push_str(&format!(r#"<script src="{}"></script>"#, escape_attr(uri)));
    html.push('\n');
  }
  if let Some(h) = head {
    push_fragment(&mut html, &h.script);
  }
  html.push_str("</body>\n</html>\n");
  Ok(html)
}

fn push_fragment(html: &mut String, fragment: &str) {
  if !fragment.is_empty() {
    html.push_str(fragment);
    html.push('\n');
  }
}

/// Nonces are base64 or hex tokens.
fn is_valid_nonce(nonce: &str) -> bool {
  !nonce.is_empty()
    && nonce.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=' | b'-' | b'_'))
}

fn is_script_identifier(name: &str) -> bool {
  let mut bytes = name.bytes();
  match bytes.next() {
    Some(first) if first.is_ascii_alphabetic() || first == b'_' || first == b'$' => {}
    _ => return false,
  }
  bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
}

fn escape_attr(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  for ch in value.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '"' => out.push_str("&quot;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      c => out.push(c),
    }
  }
  out
}

/* src/server/engine/rust/src/assets.rs */

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Shared vendor bundle. Always resolved first.
pub const VENDOR_CHUNK: &str = "vendor";
/// Application entry bundle. Always resolved right after the vendor bundle.
pub const MAIN_CHUNK: &str = "main";

/// Compiled output files of one named bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkAssets {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub js: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub css: Option<String>,
}

/// Bundle name -> compiled script/style URIs, as written by the client build
/// (`assets.json`). Filenames may carry content hashes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
  chunks: HashMap<String, ChunkAssets>,
}

impl AssetManifest {
  pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(json)
  }

  pub fn with_chunk(mut self, name: impl Into<String>, assets: ChunkAssets) -> Self {
    self.chunks.insert(name.into(), assets);
    self
  }

  pub fn get(&self, name: &str) -> Option<&ChunkAssets> {
    self.chunks.get(name)
  }

  pub fn len(&self) -> usize {
    self.chunks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.chunks.is_empty()
  }
}

/// Code-split chunk table sent to the client as `CHUNK_MANIFEST`.
/// Defaults to an empty object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkManifest(serde_json::Value);

impl ChunkManifest {
  pub fn empty() -> Self {
    Self(serde_json::Value::Object(serde_json::Map::new()))
  }

  /// Parse the raw manifest text. Must be a JSON object.
  pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
    Ok(Self(serde_json::Value::Object(map)))
  }

  pub fn as_value(&self) -> &serde_json::Value {
    &self.0
  }
}

impl Default for ChunkManifest {
  fn default() -> Self {
    Self::empty()
  }
}

/// Script and style URIs for a render, in load order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAssets {
  pub scripts: Vec<String>,
  pub styles: Vec<String>,
}

/// Chunk names for one render: `vendor`, `main`, then any extra chunks
/// reported by code splitting. Repeats are dropped, first occurrence wins.
pub fn chunks_for_render<S: AsRef<str>>(extra: &[S]) -> Vec<String> {
  let mut chunks = vec![VENDOR_CHUNK.to_string(), MAIN_CHUNK.to_string()];
  for name in extra {
    let name = name.as_ref();
    if !chunks.iter().any(|c| c == name) {
      chunks.push(name.to_string());
    }
  }
  chunks
}

/// Collect script and style URIs for `chunk_names`, preserving their order.
/// Names missing from the manifest contribute nothing.
pub fn resolve_assets<S: AsRef<str>>(manifest: &AssetManifest, chunk_names: &[S]) -> ResolvedAssets {
  chunk_names.iter().filter_map(|name| manifest.get(name.as_ref())).fold(
    ResolvedAssets::default(),
    |mut result, assets| {
      if let Some(ref js) = assets.js {
        result.scripts.push(js.clone());
      }
      if let Some(ref css) = assets.css {
        result.styles.push(css.clone());
      }
      result
    },
  )
}

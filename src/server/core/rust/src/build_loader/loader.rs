/* src/server/core/rust/src/build_loader/loader.rs */

use std::path::Path;

use tracing::{info, warn};
use universal_engine::{AssetManifest, ChunkManifest};

use crate::config::{Mode, ServerConfig};
use crate::errors::SsrError;

/// Read-only build output shared by every render.
#[derive(Debug, Clone, Default)]
pub struct BuildArtifacts {
  pub assets: AssetManifest,
  pub chunk_manifest: ChunkManifest,
}

impl BuildArtifacts {
  pub fn new(assets: AssetManifest, chunk_manifest: ChunkManifest) -> Self {
    Self { assets, chunk_manifest }
  }

  /// Load both manifests from the paths in `config`.
  /// A missing or malformed asset manifest is fatal.
  pub fn load(config: &ServerConfig) -> Result<Self, SsrError> {
    let assets = load_asset_manifest(&config.assets_info_path())?;
    let chunk_manifest =
      load_chunk_manifest(&config.chunk_manifest_path(), config.mode, config.strict_chunk_manifest)?;
    info!(bundles = assets.len(), "loaded client asset manifest");
    Ok(Self { assets, chunk_manifest })
  }
}

pub fn load_asset_manifest(path: &Path) -> Result<AssetManifest, SsrError> {
  let content = std::fs::read_to_string(path)
    .map_err(|source| SsrError::ManifestIo { path: path.to_path_buf(), source })?;
  AssetManifest::from_json(&content)
    .map_err(|source| SsrError::ManifestParse { path: path.to_path_buf(), source })
}

/// Outside production the chunk manifest is never read and stays `{}`.
/// In production an unreadable manifest falls back to `{}` with a warning,
/// unless `strict` is set.
pub fn load_chunk_manifest(path: &Path, mode: Mode, strict: bool) -> Result<ChunkManifest, SsrError> {
  if mode != Mode::Production {
    return Ok(ChunkManifest::empty());
  }

  let result = std::fs::read_to_string(path)
    .map_err(|source| SsrError::ManifestIo { path: path.to_path_buf(), source })
    .and_then(|content| {
      ChunkManifest::from_json(&content)
        .map_err(|source| SsrError::ManifestParse { path: path.to_path_buf(), source })
    });

  match result {
    Ok(manifest) => Ok(manifest),
    Err(err) if strict => Err(err),
    Err(err) => {
      warn!(error = %err, "could not load chunk hashes, falling back to an empty chunk manifest");
      Ok(ChunkManifest::empty())
    }
  }
}

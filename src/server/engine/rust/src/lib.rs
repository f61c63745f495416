/* src/server/engine/rust/src/lib.rs */

pub mod assets;
pub mod escape;
pub mod locale;
pub mod page;

// Public API re-exports
pub use assets::{
  AssetManifest, ChunkAssets, ChunkManifest, MAIN_CHUNK, ResolvedAssets, VENDOR_CHUNK,
  chunks_for_render, resolve_assets,
};
pub use escape::{escape_json_for_script, script_literal};
pub use locale::Locale;
pub use page::{
  APP_STATE_GLOBAL, AssembleError, CHUNK_MANIFEST_GLOBAL, CodeSplitState, HeadFragments,
  MESSAGES_GLOBAL, MOUNT_ELEMENT_ID, PageOptions, assemble_page, bootstrap_script,
};

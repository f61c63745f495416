/* src/server/core/rust/src/build_loader/mod.rs */

// Load client build output (asset manifest + chunk manifest) once at startup.
// The loaded structures are immutable and shared read-only across requests.

mod loader;


pub use loader::{BuildArtifacts, load_asset_manifest, load_chunk_manifest};

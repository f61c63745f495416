/* src/server/core/rust/src/lib.rs */

pub mod app;
pub mod build_loader;
pub mod config;
pub mod errors;
pub mod measure;
pub mod pipeline;
pub mod resolve;
pub mod response;
pub mod server;

// Re-exports for ergonomic use
pub use app::{
  ClientOptions, CodeSplitWrapped, ComponentTree, InitialState, RenderedTree, RoutingOutcome,
  SSR_NAMESPACE, StateStore, UniversalApp, initial_state,
};
pub use build_loader::{BuildArtifacts, load_asset_manifest, load_chunk_manifest};
pub use config::{Mode, ServerConfig};
pub use errors::SsrError;
pub use futures_util::future::BoxFuture;
pub use measure::Measure;
pub use pipeline::RenderContext;
pub use resolve::LocaleResolver;
pub use response::{Cookie, LOCALE_COOKIE, PageResponse};
pub use server::{RenderOptions, RendererBuilder, UniversalRenderer};
pub use universal_engine::{
  AssetManifest, ChunkManifest, CodeSplitState, HeadFragments, Locale, escape_json_for_script,
  script_literal,
};

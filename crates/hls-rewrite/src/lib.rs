//! # hls-rewrite
//!
//! A library for rewriting the child-resource URIs of HLS playlists.
//! Given a multivariant manifest or a media playlist, every referenced
//! variant, alternate-media track, or segment URI is pushed through a
//! configurable transform pipeline and the playlist is re-serialized,
//! letting a caller decorate downstream URLs with auth tokens or routing
//! hints without touching the M3U8 grammar.
//!
//! ## Features
//!
//! - Query-parameter injection from a static set or a per-URI generator
//! - Base-URL prepension, named-parameter removal, traversal stripping
//! - Manifest acquisition from a URL, a file, or an arbitrary byte stream
//! - Serialization delegated to the `m3u8-rs` formatter
//!
//! ## Example
//!
//! ```no_run
//! use hls_rewrite::{Manifest, ManifestSource, QueryParams, RewriteOptions};
//! use url::Url;
//!
//! # async fn run() -> Result<(), hls_rewrite::ManifestError> {
//! let source = ManifestSource::Url(Url::parse("https://example.com/manifest.m3u8")?);
//! let options = RewriteOptions::new()
//!     .with_params(QueryParams::from_iter([("token", "abc123")]));
//! let manifest = Manifest::fetch(source, options).await?;
//! println!("{manifest}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod params;
pub mod playlist;
pub mod transform;
pub mod walker;

pub use config::FetchConfig;
pub use error::ManifestError;
pub use fetch::ManifestSource;
pub use params::QueryParams;
pub use playlist::{Manifest, MediaManifest, MultiVariantManifest};
pub use transform::{ParamsSource, RewriteOptions, UriRewriter};
pub use walker::UriItem;

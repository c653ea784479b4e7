//! indieglue — IndieWeb glue service
//!
//! Fetches remote pages, extracts the representative identity card and
//! generic page metadata, and serves the results through an HTTP-caching-
//! aware layer that honors origin `Cache-Control`/`Expires` semantics.
pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod fetch;
pub mod hcard;
pub mod mf;
pub mod og;
pub mod pageinfo;
pub mod server;

pub use context::AppContext;

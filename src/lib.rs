//! Async bridge between a host application and a native PDF rendering
//! capability.
//!
//! The bridge receives named method calls (`getNumberOfPages`, `getPage`,
//! `clearCache`), runs the document work on a single lazily-created
//! background worker thread, and resolves each call back on the caller's
//! async context. Rendered pages are written as PNG files into an
//! application-private cache directory and returned by path.

pub mod backend;
pub mod bridge;
pub mod cache;
pub mod config;
pub mod error;

#[cfg(test)]
pub(crate) mod testutil;

pub use bridge::{CallOutcome, MethodCall, PdfViewerBridge};
pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult};

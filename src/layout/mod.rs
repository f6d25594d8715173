//! Layout: the explicit render context, size requests and stack arrangement.

/// Explicit context threaded through measurement, discovery and rendering.
pub mod context;
/// Per-node size requests and query discovery.
pub mod request;
/// Stack arrangement along one axis.
pub mod stack;

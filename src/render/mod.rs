//! Drawing: per-node render bodies and slide chrome.

/// Node render bodies and slide chrome.
pub mod body;

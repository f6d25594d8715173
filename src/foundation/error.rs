/// Convenience result type used across stepdeck.
pub type DeckResult<T> = Result<T, DeckError>;

/// Top-level error taxonomy used by deck construction, layout and the build pipeline.
#[derive(thiserror::Error, Debug)]
pub enum DeckError {
    /// Invalid tree construction input (visibility ranges, empty deck, bad image source, unknown
    /// style names).
    #[error("construction error: {0}")]
    Construction(String),

    /// A measurement query failed or a needed measurement is missing from the cache.
    #[error("query error for key {key}: {message}")]
    Query {
        /// Shortened display form of the offending query key.
        key: String,
        /// Failure description.
        message: String,
    },

    /// Query cache or artifact cache IO failure.
    #[error("cache io error: {0}")]
    CacheIo(String),

    /// Children handed to a stacking container violate its single-fill-axis precondition.
    #[error("arrangement error: {0}")]
    Arrangement(String),

    /// An external measurement, compositing or concatenation tool failed.
    #[error("external tool error: `{command}`: {message}")]
    ExternalTool {
        /// Command line that was invoked.
        command: String,
        /// Exit status and captured diagnostic output.
        message: String,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeckError {
    /// Build a [`DeckError::Construction`] value.
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    /// Build a [`DeckError::Query`] value.
    pub fn query(key: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Query {
            key: key.into(),
            message: msg.into(),
        }
    }

    /// Build a [`DeckError::CacheIo`] value.
    pub fn cache_io(msg: impl Into<String>) -> Self {
        Self::CacheIo(msg.into())
    }

    /// Build a [`DeckError::Arrangement`] value.
    pub fn arrangement(msg: impl Into<String>) -> Self {
        Self::Arrangement(msg.into())
    }

    /// Build a [`DeckError::ExternalTool`] value.
    pub fn external_tool(command: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::ExternalTool {
            command: command.into(),
            message: msg.into(),
        }
    }

    /// Build a [`DeckError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

use thiserror::Error;

/// Failures reported by a `DocumentAccessor`.
///
/// Analysis code treats every variant except `SessionSetup` as recoverable:
/// the failing query, script or attribute read is logged and skipped.
#[derive(Debug, Error)]
pub enum AccessError {
    /// HTTP transport to the driver failed (connection refused, timeout, ...)
    #[error("transport error during {command}: {source}")]
    Transport {
        command: String,
        #[source]
        source: reqwest::Error,
    },

    /// The driver answered with a protocol-level error payload
    #[error("{command} failed: {error}")]
    Protocol { command: String, error: String },

    /// Script evaluation failed or returned an unusable value
    #[error("script evaluation failed: {0}")]
    Script(String),

    /// The accessor cannot serve this request (e.g. an XPath a fake DOM does not understand)
    #[error("unsupported request: {0}")]
    Unsupported(String),

    /// The element handle no longer refers to a live element
    #[error("stale element handle '{0}'")]
    StaleElement(String),

    /// A driver response could not be decoded
    #[error("could not decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The document accessor could not be brought up at all
    #[error("session setup failed: {0}")]
    SessionSetup(String),
}

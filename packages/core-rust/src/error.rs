//! Construction-time errors shared by the core and server crates.

/// Errors that abort building a paymail service.
///
/// Every variant is fatal: a service whose construction fails never
/// serves traffic, and no partially-built router is handed out.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("invalid base URL {input:?}: {source}")]
    InvalidBaseUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base URL {input:?} has no host origin")]
    OpaqueOrigin { input: String },
    #[error("invalid base path {input:?}: {reason}")]
    InvalidBasePath { input: String, reason: &'static str },
    #[error("capability {key} registered twice")]
    DuplicateCapability { key: &'static str },
    #[error("capability {key} has no path template")]
    MissingPathTemplate { key: &'static str },
    #[error("invalid CORS origin {origin:?}")]
    InvalidCorsOrigin { origin: String },
    #[error("failed to build outbound client: {0}")]
    OutboundClient(String),
}

//! Validation of the advertised service origin and API base path.
//!
//! Capability templates are built as `origin + base path + capability path`.
//! Joining collapses repeated separators but leaves every other character,
//! including the `{` `}` placeholder braces, exactly as written.

use tracing::warn;
use url::Url;

use crate::error::ConfigurationError;

/// Host name treated as a local development host when served over plain HTTP.
pub const INSECURE_DEV_HOST: &str = "localhost";

/// The validated public origin of the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    scheme: String,
    host: String,
    origin: String,
}

impl BaseUrl {
    /// Parses `raw` as an absolute URL and keeps its origin.
    ///
    /// Any path, query or fragment on `raw` is dropped. A plain-HTTP URL on
    /// [`INSECURE_DEV_HOST`] logs a warning but is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidBaseUrl`] if `raw` is not an
    /// absolute URL, or [`ConfigurationError::OpaqueOrigin`] if the URL has no
    /// scheme/host origin (e.g. `mailto:` URLs).
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        let url = Url::parse(raw).map_err(|source| ConfigurationError::InvalidBaseUrl {
            input: raw.to_string(),
            source,
        })?;

        let origin = url.origin();
        let Some(host) = url.host_str().filter(|_| origin.is_tuple()) else {
            return Err(ConfigurationError::OpaqueOrigin {
                input: raw.to_string(),
            });
        };

        let base = Self {
            scheme: url.scheme().to_string(),
            host: host.to_string(),
            origin: origin.ascii_serialization(),
        };

        if base.is_insecure_dev_host() {
            warn!(
                origin = %base.origin,
                "serving capabilities over {} on a development host; remote clients will expect https",
                base.scheme
            );
        }

        Ok(base)
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Serialized origin, e.g. `https://example.com:8443`. Never ends with `/`.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.scheme == "https"
    }

    /// True when the URL uses a non-secure scheme on the development host.
    #[must_use]
    pub fn is_insecure_dev_host(&self) -> bool {
        !self.is_secure() && self.host == INSECURE_DEV_HOST
    }

    /// Builds the absolute URL template for a capability path.
    #[must_use]
    pub fn template(&self, base_path: &BasePath, path: &str) -> String {
        format!("{}{}", self.origin, join_path(base_path.as_str(), path))
    }
}

/// Normalized mount point of the sub-protocol API. Always starts with `/`
/// and never ends with one unless it is the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePath(String);

impl BasePath {
    /// Validates and normalizes a configured base path. An empty string is
    /// the root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidBasePath`] if the path contains a
    /// query, fragment, placeholder brace or whitespace, or if a segment
    /// starts with `:` or `*` (route capture syntax).
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        let reason = if raw.contains(['?', '#']) {
            Some("query and fragment are not allowed")
        } else if raw.contains(['{', '}']) {
            Some("placeholder braces are not allowed")
        } else if raw.chars().any(char::is_whitespace) {
            Some("whitespace is not allowed")
        } else if raw.split('/').any(|s| s.starts_with([':', '*'])) {
            Some("segments must not start with ':' or '*'")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(ConfigurationError::InvalidBasePath {
                input: raw.to_string(),
                reason,
            });
        }
        Ok(Self(join_path(raw, "")))
    }

    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }
}

impl Default for BasePath {
    fn default() -> Self {
        Self::root()
    }
}

/// Joins two path fragments into one absolute path, dropping empty segments.
///
/// ```
/// use bsvalias_core::base_url::join_path;
///
/// assert_eq!(join_path("/api//", "/id/{alias}@{domain.tld}"), "/api/id/{alias}@{domain.tld}");
/// assert_eq!(join_path("", ""), "/");
/// ```
#[must_use]
pub fn join_path(base: &str, path: &str) -> String {
    let mut out = String::with_capacity(base.len() + path.len() + 1);
    for segment in base.split('/').chain(path.split('/')) {
        if segment.is_empty() {
            continue;
        }
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

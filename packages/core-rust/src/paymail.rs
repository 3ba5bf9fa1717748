//! Paymail handles (`alias@domain.tld`).

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

static ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*$")
        .expect("alias pattern is valid")
});

static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)*$")
        .expect("domain pattern is valid")
});

/// Errors from parsing a paymail handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymailError {
    #[error("paymail {0:?} is missing the '@' separator")]
    MissingSeparator(String),
    #[error("invalid paymail alias {0:?}")]
    InvalidAlias(String),
    #[error("invalid paymail domain {0:?}")]
    InvalidDomain(String),
}

/// A parsed paymail handle. Both parts are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymailAddress {
    alias: String,
    domain: String,
}

impl PaymailAddress {
    /// Parses `alias@domain.tld`, splitting on the last `@`.
    ///
    /// # Errors
    ///
    /// Returns a [`PaymailError`] when the separator is missing or either
    /// part fails validation.
    pub fn parse(handle: &str) -> Result<Self, PaymailError> {
        let (alias, domain) = handle
            .trim()
            .rsplit_once('@')
            .ok_or_else(|| PaymailError::MissingSeparator(handle.to_string()))?;

        let alias = alias.to_ascii_lowercase();
        if !ALIAS_RE.is_match(&alias) {
            return Err(PaymailError::InvalidAlias(alias));
        }

        let domain = domain.to_ascii_lowercase();
        if domain.len() > 253 || !DOMAIN_RE.is_match(&domain) {
            return Err(PaymailError::InvalidDomain(domain));
        }

        Ok(Self { alias, domain })
    }

    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl FromStr for PaymailAddress {
    type Err = PaymailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PaymailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.alias, self.domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_lowercases() {
        let addr = PaymailAddress::parse("Alice.Smith@Example.COM").unwrap();
        assert_eq!(addr.alias(), "alice.smith");
        assert_eq!(addr.domain(), "example.com");
        assert_eq!(addr.to_string(), "alice.smith@example.com");
    }

    #[test]
    fn accepts_single_label_domain() {
        let addr: PaymailAddress = "dev@localhost".parse().unwrap();
        assert_eq!(addr.domain(), "localhost");
    }

    #[test]
    fn missing_separator() {
        assert_eq!(
            PaymailAddress::parse("alice.example.com"),
            Err(PaymailError::MissingSeparator("alice.example.com".to_string()))
        );
    }

    #[test]
    fn rejects_bad_alias() {
        for bad in ["@example.com", ".alice@example.com", "al ice@example.com", "a..b@example.com"] {
            assert!(
                matches!(PaymailAddress::parse(bad), Err(PaymailError::InvalidAlias(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn rejects_bad_domain() {
        for bad in ["alice@", "alice@-example.com", "alice@exa_mple.com", "alice@example..com"] {
            assert!(
                matches!(PaymailAddress::parse(bad), Err(PaymailError::InvalidDomain(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn splits_on_last_separator() {
        assert!(matches!(
            PaymailAddress::parse("a@b@example.com"),
            Err(PaymailError::InvalidAlias(_))
        ));
    }
}

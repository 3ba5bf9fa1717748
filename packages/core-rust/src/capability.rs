//! Capability identifiers and their advertised path patterns.
//!
//! The path table is plain data: each capability key maps to the relative
//! path a remote client substitutes `{alias}`, `{domain.tld}` and `{pubkey}`
//! into. Joining with the service origin happens in [`crate::base_url`].

use serde::{Serialize, Serializer};

/// Known capability codes, one per sub-protocol plus the sender-validation
/// flag. Codes that have a BRFC identifier advertise it; the rest use their
/// historical literal names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CapabilityCode {
    Pki,
    PaymentDestination,
    RequestSenderValidation,
    VerifyPublicKeyOwner,
    PublicProfile,
    ReceiveTransaction,
    P2pPaymentDestination,
    P2pPaymentDestinationWithTokens,
    AssetInformation,
}

impl CapabilityCode {
    /// All codes, in registration order.
    pub const ALL: [Self; 9] = [
        Self::Pki,
        Self::PaymentDestination,
        Self::RequestSenderValidation,
        Self::VerifyPublicKeyOwner,
        Self::PublicProfile,
        Self::ReceiveTransaction,
        Self::P2pPaymentDestination,
        Self::P2pPaymentDestinationWithTokens,
        Self::AssetInformation,
    ];

    /// The identifier advertised in the discovery document. The
    /// sender-validation flag is advertised under its BRFC id `6745385c3fc0`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pki => "pki",
            Self::PaymentDestination => "paymentDestination",
            Self::RequestSenderValidation => "6745385c3fc0",
            Self::VerifyPublicKeyOwner => "a9f510c16bde",
            Self::PublicProfile => "f12f968c92d6",
            Self::ReceiveTransaction => "5f1323cddf31",
            Self::P2pPaymentDestination => "2a40af698840",
            Self::P2pPaymentDestinationWithTokens => "f792b6eff07a",
            Self::AssetInformation => "assetInformation",
        }
    }
}

/// Key of a capability map entry: an enumerated code or one of the ad hoc
/// keys that are always advertised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CapabilityKey {
    Code(CapabilityCode),
    UserDomain,
    UserDomainResponse,
    UserInfo,
}

impl CapabilityKey {
    /// The ad hoc keys present in every discovery document.
    pub const FIXED: [Self; 3] = [Self::UserDomain, Self::UserDomainResponse, Self::UserInfo];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code(code) => code.as_str(),
            Self::UserDomain => "userDomain",
            Self::UserDomainResponse => "userDomainResponse",
            Self::UserInfo => "userInfo",
        }
    }
}

impl From<CapabilityCode> for CapabilityKey {
    fn from(code: CapabilityCode) -> Self {
        Self::Code(code)
    }
}

impl std::fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CapabilityKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Advertised value of a capability: a URL template or a boolean flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CapabilityValue {
    Template(String),
    Flag(bool),
}

impl CapabilityValue {
    #[must_use]
    pub fn as_template(&self) -> Option<&str> {
        match self {
            Self::Template(t) => Some(t),
            Self::Flag(_) => None,
        }
    }

    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            Self::Template(_) => None,
        }
    }
}

/// Relative path pattern for every capability that advertises a URL.
///
/// `RequestSenderValidation` is a flag and has no entry.
pub const PATH_TEMPLATES: &[(CapabilityKey, &str)] = &[
    (CapabilityKey::Code(CapabilityCode::Pki), "/id/{alias}@{domain.tld}"),
    (
        CapabilityKey::Code(CapabilityCode::PaymentDestination),
        "/address/{alias}@{domain.tld}",
    ),
    (
        CapabilityKey::Code(CapabilityCode::VerifyPublicKeyOwner),
        "/verifypubkey/{alias}@{domain.tld}/{pubkey}",
    ),
    (
        CapabilityKey::Code(CapabilityCode::PublicProfile),
        "/public-profile/{alias}@{domain.tld}",
    ),
    (
        CapabilityKey::Code(CapabilityCode::ReceiveTransaction),
        "/receive-transaction/{alias}@{domain.tld}",
    ),
    (
        CapabilityKey::Code(CapabilityCode::P2pPaymentDestination),
        "/p2p-payment-destination/{alias}@{domain.tld}",
    ),
    (
        CapabilityKey::Code(CapabilityCode::P2pPaymentDestinationWithTokens),
        "/p2p-payment-destination-with-tokens-support/{alias}@{domain.tld}",
    ),
    (
        CapabilityKey::Code(CapabilityCode::AssetInformation),
        "/asset-information/{alias}@{domain.tld}",
    ),
    (CapabilityKey::UserDomain, "/user-domain/{alias}@{domain.tld}"),
    (
        CapabilityKey::UserDomainResponse,
        "/user-domain-response/{alias}@{domain.tld}",
    ),
    (CapabilityKey::UserInfo, "/user-info/{alias}@{domain.tld}"),
];

/// Looks up the relative path pattern advertised for `key`.
#[must_use]
pub fn path_template(key: CapabilityKey) -> Option<&'static str> {
    PATH_TEMPLATES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, path)| *path)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_code_except_sender_validation_has_a_path() {
        for code in CapabilityCode::ALL {
            let path = path_template(code.into());
            if code == CapabilityCode::RequestSenderValidation {
                assert!(path.is_none());
            } else {
                assert!(path.is_some(), "{} has no path", code.as_str());
            }
        }
        for key in CapabilityKey::FIXED {
            assert!(path_template(key).is_some());
        }
    }

    #[test]
    fn paths_carry_unsubstituted_placeholders() {
        for (key, path) in PATH_TEMPLATES {
            assert!(path.starts_with('/'), "{key} path must be absolute");
            assert!(path.contains("{alias}@{domain.tld}"), "{key}");
        }
        assert!(path_template(CapabilityCode::VerifyPublicKeyOwner.into())
            .unwrap()
            .ends_with("/{pubkey}"));
    }

    #[test]
    fn identifiers_are_unique() {
        let mut seen = HashSet::new();
        for code in CapabilityCode::ALL {
            assert!(seen.insert(code.as_str()));
        }
        for key in CapabilityKey::FIXED {
            assert!(seen.insert(key.as_str()));
        }
    }

    #[test]
    fn path_table_has_no_duplicate_keys() {
        let keys: HashSet<_> = PATH_TEMPLATES.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.len(), PATH_TEMPLATES.len());
    }

    #[test]
    fn values_serialize_untagged() {
        let template = CapabilityValue::Template("https://a.b/id".to_string());
        assert_eq!(serde_json::to_value(&template).unwrap(), "https://a.b/id");
        assert_eq!(
            serde_json::to_value(CapabilityValue::Flag(true)).unwrap(),
            true
        );
    }

    #[test]
    fn key_serializes_as_identifier() {
        let key = CapabilityKey::Code(CapabilityCode::PublicProfile);
        assert_eq!(serde_json::to_value(key).unwrap(), "f12f968c92d6");
        assert_eq!(CapabilityKey::UserInfo.to_string(), "userInfo");
    }
}

//! Identity (`pki`), public-key verification and public profile responses.

use serde::{Deserialize, Serialize};

use crate::registry::BSVALIAS_VERSION;

/// Response of the identity lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PkiResponse {
    pub bsvalias: String,
    pub handle: String,
    /// Compressed secp256k1 public key, hex encoded.
    pub pubkey: String,
}

impl PkiResponse {
    #[must_use]
    pub fn new(handle: String, pubkey: String) -> Self {
        Self {
            bsvalias: BSVALIAS_VERSION.to_string(),
            handle,
            pubkey,
        }
    }
}

/// Response of the public-key ownership check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPubkeyResponse {
    pub handle: String,
    pub pubkey: String,
    #[serde(rename = "match")]
    pub is_match: bool,
}

/// Display name and avatar URL of a handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub name: String,
    pub avatar: String,
}

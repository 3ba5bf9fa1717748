//! A read-only handle directory loaded from a JSON file.
//!
//! ```json
//! {
//!   "entries": [
//!     {
//!       "handle": "alice@example.com",
//!       "pubkey": "02...",
//!       "name": "Alice",
//!       "avatar": "https://example.com/alice.png",
//!       "output": "76a914...88ac"
//!     }
//!   ]
//! }
//! ```
//!
//! Enough to run a standalone server that answers identity, public-key
//! verification, public profile and basic payment destination requests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bsvalias_core::messages::{PaymentDestinationRequest, PublicProfile};
use bsvalias_core::{PaymailAddress, PaymailError};
use serde::Deserialize;
use tracing::{debug, info};

use crate::context::RequestContext;
use crate::service::config::{SubProtocol, SubProtocols};
use crate::service::error::RequestError;
use crate::traits::{
    IdentityResolver, PaymentDestinationResolver, ProfileResolver, PublicKeyVerifier,
};

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to read directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse directory {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid handle in directory: {0}")]
    InvalidHandle(#[from] PaymailError),
    #[error("handle {0} is listed more than once")]
    DuplicateHandle(String),
}

/// One handle and what it resolves to.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub handle: String,
    pub pubkey: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    /// Locking script handed out as the payment destination.
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DirectoryFile {
    entries: Vec<DirectoryEntry>,
}

#[derive(Debug, Default)]
pub struct StaticDirectory {
    entries: HashMap<PaymailAddress, DirectoryEntry>,
}

impl StaticDirectory {
    /// Reads and validates a directory file.
    ///
    /// # Errors
    ///
    /// Returns a [`DirectoryError`] if the file cannot be read or parsed, or
    /// if a handle is invalid or repeated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| DirectoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: DirectoryFile =
            serde_json::from_str(&raw).map_err(|source| DirectoryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let directory = Self::from_entries(file.entries)?;
        info!(path = %path.display(), handles = directory.len(), "directory loaded");
        Ok(directory)
    }

    /// Builds a directory from in-memory entries. Handles are normalized the
    /// same way request paths are.
    ///
    /// # Errors
    ///
    /// Returns a [`DirectoryError`] for an invalid or repeated handle.
    pub fn from_entries(
        entries: impl IntoIterator<Item = DirectoryEntry>,
    ) -> Result<Self, DirectoryError> {
        let mut map = HashMap::new();
        for entry in entries {
            let address = PaymailAddress::parse(&entry.handle)?;
            if map.contains_key(&address) {
                return Err(DirectoryError::DuplicateHandle(address.to_string()));
            }
            map.insert(address, entry);
        }
        Ok(Self { entries: map })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enables every sub-protocol this directory can answer.
    pub fn install(self: Arc<Self>, sub_protocols: &mut SubProtocols) {
        sub_protocols.identity =
            SubProtocol::Enabled(Arc::clone(&self) as Arc<dyn IdentityResolver>);
        sub_protocols.verify_public_key =
            SubProtocol::Enabled(Arc::clone(&self) as Arc<dyn PublicKeyVerifier>);
        sub_protocols.public_profile =
            SubProtocol::Enabled(Arc::clone(&self) as Arc<dyn ProfileResolver>);
        sub_protocols.payment_destination =
            SubProtocol::Enabled(self as Arc<dyn PaymentDestinationResolver>);
    }

    fn lookup(&self, address: &PaymailAddress) -> Result<&DirectoryEntry, RequestError> {
        self.entries
            .get(address)
            .ok_or_else(|| RequestError::NotFound(format!("unknown handle {address}")))
    }
}

#[async_trait]
impl IdentityResolver for StaticDirectory {
    async fn identity_key(
        &self,
        _ctx: &RequestContext,
        address: &PaymailAddress,
    ) -> Result<String, RequestError> {
        Ok(self.lookup(address)?.pubkey.clone())
    }
}

#[async_trait]
impl PublicKeyVerifier for StaticDirectory {
    async fn verify_owner(
        &self,
        _ctx: &RequestContext,
        address: &PaymailAddress,
        pubkey: &str,
    ) -> Result<bool, RequestError> {
        let entry = self.lookup(address)?;
        Ok(entry.pubkey.eq_ignore_ascii_case(pubkey))
    }
}

#[async_trait]
impl ProfileResolver for StaticDirectory {
    async fn public_profile(
        &self,
        _ctx: &RequestContext,
        address: &PaymailAddress,
    ) -> Result<PublicProfile, RequestError> {
        let entry = self.lookup(address)?;
        Ok(PublicProfile {
            name: entry.name.clone().unwrap_or_else(|| address.alias().to_string()),
            avatar: entry.avatar.clone().unwrap_or_default(),
        })
    }
}

#[async_trait]
impl PaymentDestinationResolver for StaticDirectory {
    async fn payment_destination(
        &self,
        ctx: &RequestContext,
        address: &PaymailAddress,
        request: PaymentDestinationRequest,
    ) -> Result<String, RequestError> {
        let entry = self.lookup(address)?;
        debug!(
            request_id = ?ctx.request_id,
            sender = %request.sender_handle,
            "payment destination requested"
        );
        entry
            .output
            .clone()
            .ok_or_else(|| RequestError::NotFound(format!("{address} accepts no payments")))
    }
}

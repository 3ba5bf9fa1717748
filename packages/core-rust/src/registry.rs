//! Capability registry and the discovery document it serializes into.
//!
//! The registry is assembled once through [`CapabilityRegistryBuilder`] and
//! then frozen. The frozen [`CapabilityRegistry`] has no mutating methods,
//! so it can be shared behind an `Arc` by any number of concurrent requests.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::base_url::{BasePath, BaseUrl};
use crate::capability::{path_template, CapabilityKey, CapabilityValue};
use crate::error::ConfigurationError;

/// Protocol version literal carried by every discovery document.
pub const BSVALIAS_VERSION: &str = "1.0";

/// Path of the discovery document, independent of the API base path.
pub const WELL_KNOWN_PATH: &str = "/.well-known/bsvalias";

/// Accumulates capability entries during service construction.
#[derive(Debug)]
pub struct CapabilityRegistryBuilder {
    base_url: BaseUrl,
    base_path: BasePath,
    entries: BTreeMap<CapabilityKey, CapabilityValue>,
}

impl CapabilityRegistryBuilder {
    /// Creates an empty builder that templates URLs against `base_url` and
    /// `base_path`.
    #[must_use]
    pub fn new(base_url: BaseUrl, base_path: BasePath) -> Self {
        Self {
            base_url,
            base_path,
            entries: BTreeMap::new(),
        }
    }

    /// Inserts a raw entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicateCapability`] if `key` is already
    /// present. Each sub-protocol owns exactly one key, so a duplicate is a
    /// wiring bug.
    pub fn insert(
        &mut self,
        key: CapabilityKey,
        value: CapabilityValue,
    ) -> Result<(), ConfigurationError> {
        if self.entries.contains_key(&key) {
            return Err(ConfigurationError::DuplicateCapability { key: key.as_str() });
        }
        self.entries.insert(key, value);
        Ok(())
    }

    /// Inserts the URL template for `key`, built from the static path table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingPathTemplate`] for keys without a
    /// path (the sender-validation flag), or a duplicate error as
    /// [`Self::insert`].
    pub fn insert_template(&mut self, key: CapabilityKey) -> Result<(), ConfigurationError> {
        let path = path_template(key)
            .ok_or(ConfigurationError::MissingPathTemplate { key: key.as_str() })?;
        let template = self.base_url.template(&self.base_path, path);
        self.insert(key, CapabilityValue::Template(template))
    }

    /// Adds the entries every discovery document carries regardless of
    /// which sub-protocols are enabled.
    ///
    /// # Errors
    ///
    /// Returns a duplicate error if any fixed key was inserted earlier.
    pub fn insert_fixed(&mut self) -> Result<(), ConfigurationError> {
        for key in CapabilityKey::FIXED {
            self.insert_template(key)?;
        }
        Ok(())
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> CapabilityRegistry {
        CapabilityRegistry {
            entries: self.entries,
        }
    }
}

/// Frozen capability map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRegistry {
    entries: BTreeMap<CapabilityKey, CapabilityValue>,
}

impl CapabilityRegistry {
    #[must_use]
    pub fn get(&self, key: impl Into<CapabilityKey>) -> Option<&CapabilityValue> {
        self.entries.get(&key.into())
    }

    #[must_use]
    pub fn contains(&self, key: impl Into<CapabilityKey>) -> bool {
        self.entries.contains_key(&key.into())
    }

    pub fn keys(&self) -> impl Iterator<Item = CapabilityKey> + '_ {
        self.entries.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The discovery document view of this registry. Placeholders are left
    /// for remote clients to substitute.
    #[must_use]
    pub fn document(&self) -> DiscoveryDocument<'_> {
        DiscoveryDocument {
            bsvalias: BSVALIAS_VERSION,
            capabilities: &self.entries,
        }
    }
}

/// Body served at [`WELL_KNOWN_PATH`].
#[derive(Debug, Serialize)]
pub struct DiscoveryDocument<'a> {
    pub bsvalias: &'static str,
    pub capabilities: &'a BTreeMap<CapabilityKey, CapabilityValue>,
}

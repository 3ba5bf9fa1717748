//! bsvalias core: capability codes, URL templating, the discovery document and
//! sub-protocol message schemas.

pub mod base_url;
pub mod capability;
pub mod error;
pub mod messages;
pub mod paymail;
pub mod registry;

pub use base_url::{BasePath, BaseUrl};
pub use capability::{CapabilityCode, CapabilityKey, CapabilityValue};
pub use error::ConfigurationError;
pub use paymail::{PaymailAddress, PaymailError};
pub use registry::{
    CapabilityRegistry, CapabilityRegistryBuilder, DiscoveryDocument, BSVALIAS_VERSION,
    WELL_KNOWN_PATH,
};

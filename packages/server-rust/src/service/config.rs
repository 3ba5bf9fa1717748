use std::fmt;
use std::sync::Arc;

use crate::client::OutboundClient;
use crate::traits::{
    AssetResolver, IdentityResolver, P2pDestinationResolver, PaymentDestinationResolver,
    ProfileResolver, PublicKeyVerifier, TokenDestinationResolver, TransactionReceiver,
};

use super::error::{ErrorHandler, JsonErrorHandler};

/// Default maximum size of a JSON request body.
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

/// Whether a sub-protocol is served, and by what.
pub enum SubProtocol<T: ?Sized> {
    Enabled(Arc<T>),
    Disabled,
}

impl<T: ?Sized> SubProtocol<T> {
    #[must_use]
    pub fn enabled(&self) -> Option<&Arc<T>> {
        match self {
            Self::Enabled(handler) => Some(handler),
            Self::Disabled => None,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }
}

impl<T: ?Sized> Clone for SubProtocol<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Enabled(handler) => Self::Enabled(Arc::clone(handler)),
            Self::Disabled => Self::Disabled,
        }
    }
}

impl<T: ?Sized> Default for SubProtocol<T> {
    fn default() -> Self {
        Self::Disabled
    }
}

impl<T: ?Sized> fmt::Debug for SubProtocol<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enabled(_) => "Enabled",
            Self::Disabled => "Disabled",
        })
    }
}

/// One slot per optional sub-protocol. All disabled by default.
#[derive(Debug, Clone, Default)]
pub struct SubProtocols {
    pub identity: SubProtocol<dyn IdentityResolver>,
    pub payment_destination: SubProtocol<dyn PaymentDestinationResolver>,
    pub verify_public_key: SubProtocol<dyn PublicKeyVerifier>,
    pub public_profile: SubProtocol<dyn ProfileResolver>,
    pub receive_transaction: SubProtocol<dyn TransactionReceiver>,
    pub p2p_payment_destination: SubProtocol<dyn P2pDestinationResolver>,
    pub token_payment_destination: SubProtocol<dyn TokenDestinationResolver>,
    pub asset_information: SubProtocol<dyn AssetResolver>,
}

/// Cross-origin policy. Present in [`PaymailConfig::cors`] means enabled.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed origins. `"*"` allows any origin.
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: vec!["*".to_string()],
        }
    }
}

/// Body-parsing policy.
#[derive(Debug, Clone)]
pub struct BodyConfig {
    /// Maximum accepted JSON body size in bytes.
    pub limit: usize,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_BODY_LIMIT,
        }
    }
}

/// Everything needed to build one paymail service. Read-only once passed
/// to [`PaymailRouter::build`](super::PaymailRouter::build).
#[derive(Clone)]
pub struct PaymailConfig {
    pub sub_protocols: SubProtocols,
    /// Mount point of the sub-protocol API. Empty or `/` means the root.
    pub base_path: String,
    /// Advertised sender-validation flag, also passed to every handler.
    pub request_sender_validation: bool,
    /// `None` disables cross-origin support.
    pub cors: Option<CorsConfig>,
    pub body: BodyConfig,
    pub error_handler: Arc<dyn ErrorHandler>,
    pub client: OutboundClient,
}

impl Default for PaymailConfig {
    fn default() -> Self {
        Self {
            sub_protocols: SubProtocols::default(),
            base_path: "/".to_string(),
            request_sender_validation: false,
            cors: None,
            body: BodyConfig::default(),
            error_handler: Arc::new(JsonErrorHandler),
            client: OutboundClient::default(),
        }
    }
}

impl fmt::Debug for PaymailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymailConfig")
            .field("sub_protocols", &self.sub_protocols)
            .field("base_path", &self.base_path)
            .field("request_sender_validation", &self.request_sender_validation)
            .field("cors", &self.cors)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

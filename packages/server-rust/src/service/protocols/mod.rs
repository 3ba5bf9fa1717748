//! Sub-protocol registrars.
//!
//! Each submodule exposes `register(&PaymailConfig) -> Option<Registration>`.
//! A disabled sub-protocol yields `None`; an enabled one yields its routes
//! together with the capability key it advertises, so the composer can never
//! mount a handler without advertising it (or the reverse).

pub mod asset_information;
pub mod identity;
pub mod p2p_destination;
pub mod payment_destination;
pub mod public_profile;
pub mod receive_transaction;
pub mod token_destination;
pub mod verify_pubkey;

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::Router;
use bsvalias_core::CapabilityKey;

use crate::context::{HandlerEnv, RequestContext};

use super::config::PaymailConfig;

/// Signature shared by every registrar.
pub type Registrar = fn(&PaymailConfig) -> Option<Registration>;

/// Registrars in the order they are run.
pub const REGISTRARS: [Registrar; 8] = [
    identity::register,
    payment_destination::register,
    verify_pubkey::register,
    public_profile::register,
    receive_transaction::register,
    p2p_destination::register,
    token_destination::register,
    asset_information::register,
];

/// Routes of one enabled sub-protocol plus the capability they back.
pub struct Registration {
    pub key: CapabilityKey,
    /// Routes relative to the API base path, state already attached.
    pub router: Router,
}

impl Registration {
    #[must_use]
    pub fn new(key: impl Into<CapabilityKey>, router: Router) -> Self {
        Self {
            key: key.into(),
            router,
        }
    }
}

/// Axum state for a sub-protocol handler.
pub struct ProtocolState<H: ?Sized> {
    pub handler: Arc<H>,
    pub env: HandlerEnv,
}

impl<H: ?Sized> ProtocolState<H> {
    pub(crate) fn new(handler: &Arc<H>, config: &PaymailConfig) -> Self {
        Self {
            handler: Arc::clone(handler),
            env: HandlerEnv {
                sender_validation: config.request_sender_validation,
                client: config.client.clone(),
            },
        }
    }

    pub(crate) fn context(&self, headers: &HeaderMap) -> RequestContext {
        self.env.context(headers)
    }
}

impl<H: ?Sized> Clone for ProtocolState<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            env: self.env.clone(),
        }
    }
}

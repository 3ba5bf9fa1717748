//! Business-logic seams for the bsvalias sub-protocols.
//!
//! The server only routes, validates and serializes. What a handle resolves
//! to is decided by implementations of these traits, supplied through
//! [`SubProtocols`](crate::service::SubProtocols).

use async_trait::async_trait;
use bsvalias_core::messages::{
    AssetInformation, P2pPaymentDestinationRequest, P2pPaymentDestinationResponse,
    PaymentDestinationRequest, PublicProfile, ReceiveTransactionRequest,
    ReceiveTransactionResponse, TokenPaymentDestinationRequest, TokenPaymentDestinationResponse,
};
use bsvalias_core::PaymailAddress;

use crate::context::RequestContext;
use crate::service::error::RequestError;

/// Resolves the identity public key of a handle (`pki`).
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Returns the hex-encoded compressed public key of `address`.
    async fn identity_key(
        &self,
        ctx: &RequestContext,
        address: &PaymailAddress,
    ) -> Result<String, RequestError>;
}

/// Resolves a basic payment destination.
#[async_trait]
pub trait PaymentDestinationResolver: Send + Sync {
    /// Returns the hex-encoded locking script the sender should pay to.
    async fn payment_destination(
        &self,
        ctx: &RequestContext,
        address: &PaymailAddress,
        request: PaymentDestinationRequest,
    ) -> Result<String, RequestError>;
}

/// Checks whether a public key belongs to a handle.
#[async_trait]
pub trait PublicKeyVerifier: Send + Sync {
    async fn verify_owner(
        &self,
        ctx: &RequestContext,
        address: &PaymailAddress,
        pubkey: &str,
    ) -> Result<bool, RequestError>;
}

/// Resolves the public display name and avatar of a handle.
#[async_trait]
pub trait ProfileResolver: Send + Sync {
    async fn public_profile(
        &self,
        ctx: &RequestContext,
        address: &PaymailAddress,
    ) -> Result<PublicProfile, RequestError>;
}

/// Accepts a transaction paying to outputs issued by a P2P destination call.
#[async_trait]
pub trait TransactionReceiver: Send + Sync {
    async fn receive_transaction(
        &self,
        ctx: &RequestContext,
        address: &PaymailAddress,
        request: ReceiveTransactionRequest,
    ) -> Result<ReceiveTransactionResponse, RequestError>;
}

/// Issues one-time outputs for a P2P payment.
#[async_trait]
pub trait P2pDestinationResolver: Send + Sync {
    async fn p2p_payment_destination(
        &self,
        ctx: &RequestContext,
        address: &PaymailAddress,
        request: P2pPaymentDestinationRequest,
    ) -> Result<P2pPaymentDestinationResponse, RequestError>;
}

/// Issues one-time outputs for a P2P payment that may carry tokens.
#[async_trait]
pub trait TokenDestinationResolver: Send + Sync {
    async fn token_payment_destination(
        &self,
        ctx: &RequestContext,
        address: &PaymailAddress,
        request: TokenPaymentDestinationRequest,
    ) -> Result<TokenPaymentDestinationResponse, RequestError>;
}

/// Describes the token asset addressed by a handle.
#[async_trait]
pub trait AssetResolver: Send + Sync {
    async fn asset_information(
        &self,
        ctx: &RequestContext,
        asset: &PaymailAddress,
    ) -> Result<AssetInformation, RequestError>;
}

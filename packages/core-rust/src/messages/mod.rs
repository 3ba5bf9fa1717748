//! Wire schemas for the bsvalias sub-protocols.
//!
//! All structs use `#[serde(rename_all = "camelCase")]` to match the JSON
//! field names remote paymail clients send and expect.

pub mod asset;
pub mod identity;
pub mod p2p;
pub mod payment;

pub use asset::AssetInformation;
pub use identity::{PkiResponse, PublicProfile, VerifyPubkeyResponse};
pub use p2p::{
    P2pOutput, P2pPaymentDestinationRequest, P2pPaymentDestinationResponse, TokenOutput,
    TokenPaymentDestinationRequest, TokenPaymentDestinationResponse,
};
pub use payment::{
    PaymentDestinationRequest, PaymentDestinationResponse, ReceiveTransactionRequest,
    ReceiveTransactionResponse, TransactionMetadata,
};

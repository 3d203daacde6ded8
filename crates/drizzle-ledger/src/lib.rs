//! # drizzle-ledger
//! Thin I/O edge of the Drizzle engine: the JSON-RPC [`LedgerClient`]
//! implementation and the ed25519 [`TransferSigner`].
//!
//! [`LedgerClient`]: drizzle_core::traits::LedgerClient
//! [`TransferSigner`]: drizzle_core::traits::TransferSigner

pub mod client;
pub mod signer;

pub use client::RpcLedgerClient;
pub use signer::{KeypairSigner, SignerError};

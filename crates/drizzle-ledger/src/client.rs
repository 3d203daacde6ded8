//! JSON-RPC implementation of the ledger interface.
//!
//! All transport detail lives here: the core sees only
//! [`LedgerClient`](drizzle_core::traits::LedgerClient) results with the
//! error taxonomy already applied. Query failures map to connectivity or
//! invalid-address errors; submission failures carry a transient/permanent
//! kind derived from the RPC error code.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonrpsee::core::ClientError;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ArrayParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use tracing::debug;

use drizzle_core::error::{FailureKind, LedgerError};
use drizzle_core::traits::{LedgerClient, TransferSigner};
use drizzle_core::types::{Address, Confirmation, TokenAccount, TransferId};

/// RPC error code for a malformed or unknown address.
const CODE_INVALID_ADDRESS: i32 = -32001;
/// RPC error code for rate limiting. Submissions seeing it are transient.
const CODE_RATE_LIMITED: i32 = -32005;

/// Spacing between finality polls.
const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The signed envelope body submitted with `sendtransfer`.
#[derive(Debug, Clone, bincode::Encode, bincode::Decode)]
struct TransferPayload {
    source: Address,
    dest: Address,
    asset: Address,
    amount: u64,
    /// Monotonic per-process counter; disambiguates otherwise identical
    /// transfers to the same recipient across cycles.
    nonce: u64,
}

/// HTTP JSON-RPC ledger client.
pub struct RpcLedgerClient {
    client: HttpClient,
    nonce: AtomicU64,
}

impl RpcLedgerClient {
    /// Build a client for the given endpoint.
    pub fn new(endpoint: &str) -> Result<Self, LedgerError> {
        let client = HttpClientBuilder::default()
            .build(endpoint)
            .map_err(|e| LedgerError::Connectivity(e.to_string()))?;
        Ok(Self {
            client,
            nonce: AtomicU64::new(0),
        })
    }

    /// Startup connectivity probe: fetch the current ledger height.
    pub async fn ping(&self) -> Result<u64, LedgerError> {
        self.client
            .request("getheight", ArrayParams::new())
            .await
            .map_err(query_error)
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn token_accounts(&self, token: &Address) -> Result<Vec<TokenAccount>, LedgerError> {
        let mut params = ArrayParams::new();
        params.insert(token.to_string()).ok();

        let raw: Vec<serde_json::Value> = self
            .client
            .request("gettokenaccounts", params)
            .await
            .map_err(query_error)?;

        let mut accounts = Vec::with_capacity(raw.len());
        for value in &raw {
            match parse_token_account(value) {
                Some(account) => accounts.push(account),
                None => debug!(?value, "skipping malformed token account record"),
            }
        }
        Ok(accounts)
    }

    async fn asset_balance(&self, owner: &Address, asset: &Address) -> Result<u64, LedgerError> {
        let mut params = ArrayParams::new();
        params.insert(owner.to_string()).ok();
        params.insert(asset.to_string()).ok();

        self.client
            .request("getassetbalance", params)
            .await
            .map_err(query_error)
    }

    async fn submit_transfer(
        &self,
        source: &Address,
        dest: &Address,
        asset: &Address,
        amount: u64,
        signer: &dyn TransferSigner,
    ) -> Result<TransferId, LedgerError> {
        let payload = TransferPayload {
            source: *source,
            dest: *dest,
            asset: *asset,
            amount,
            nonce: self.nonce.fetch_add(1, Ordering::Relaxed),
        };

        let encoded = bincode::encode_to_vec(&payload, bincode::config::standard())
            .map_err(|e| LedgerError::Submission {
                kind: FailureKind::Permanent,
                reason: format!("payload encoding: {e}"),
            })?;
        let digest = blake3::hash(&encoded);
        let signature = signer.sign(digest.as_bytes());

        let mut params = ArrayParams::new();
        params.insert(hex::encode(&encoded)).ok();
        params.insert(hex::encode(signature)).ok();

        let id_hex: String = self
            .client
            .request("sendtransfer", params)
            .await
            .map_err(submit_error)?;

        id_hex.parse().map_err(|e| LedgerError::Submission {
            kind: FailureKind::Permanent,
            reason: format!("malformed transfer id {id_hex:?}: {e}"),
        })
    }

    async fn await_confirmation(
        &self,
        id: &TransferId,
        timeout: Duration,
    ) -> Result<Confirmation, LedgerError> {
        let deadline = Instant::now() + timeout;

        loop {
            let mut params = ArrayParams::new();
            params.insert(id.to_string()).ok();

            let status: serde_json::Value = self
                .client
                .request("gettransferstatus", params)
                .await
                .map_err(query_error)?;

            match status["status"].as_str().unwrap_or_default() {
                "confirmed" => return Ok(Confirmation::Confirmed),
                "rejected" => {
                    let reason = status["reason"].as_str().unwrap_or("unknown").to_string();
                    return Ok(Confirmation::Rejected(reason));
                }
                // "pending" or anything else: keep polling
                _ => {}
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(Confirmation::TimedOut);
            }
            tokio::time::sleep(CONFIRM_POLL_INTERVAL.min(deadline - now)).await;
        }
    }
}

/// Parse one token-account record from the RPC response.
fn parse_token_account(value: &serde_json::Value) -> Option<TokenAccount> {
    let account: Address = value["account"].as_str()?.parse().ok()?;
    let owner: Address = value["owner"].as_str()?.parse().ok()?;
    let balance = value["balance"].as_u64()?;
    Some(TokenAccount {
        account,
        owner,
        balance,
    })
}

/// Map a read-path RPC failure to the ledger error taxonomy.
fn query_error(e: ClientError) -> LedgerError {
    match e {
        ClientError::Call(obj) if obj.code() == CODE_INVALID_ADDRESS => {
            LedgerError::InvalidAddress(obj.message().to_string())
        }
        other => LedgerError::Connectivity(other.to_string()),
    }
}

/// Map a submission RPC failure, distinguishing transient from permanent.
fn submit_error(e: ClientError) -> LedgerError {
    match e {
        ClientError::Call(obj) => {
            let kind = if obj.code() == CODE_RATE_LIMITED {
                FailureKind::Transient
            } else {
                FailureKind::Permanent
            };
            LedgerError::Submission {
                kind,
                reason: obj.message().to_string(),
            }
        }
        ClientError::RequestTimeout => LedgerError::Submission {
            kind: FailureKind::Transient,
            reason: "request timed out".into(),
        },
        other => LedgerError::Connectivity(other.to_string()),
    }
}

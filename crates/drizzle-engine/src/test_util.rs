//! Scripted in-memory ledger and signer shared by engine unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use drizzle_core::error::LedgerError;
use drizzle_core::traits::{LedgerClient, TransferSigner};
use drizzle_core::types::{
    Address, AllocationEntry, Confirmation, TokenAccount, TransferId,
};

pub(crate) fn addr(seed: u8) -> Address {
    Address([seed; 32])
}

pub(crate) fn account(acct: u8, owner: u8, balance: u64) -> TokenAccount {
    TokenAccount {
        account: addr(acct),
        owner: addr(owner),
        balance,
    }
}

pub(crate) fn entry(owner: u8, reward: u64) -> AllocationEntry {
    AllocationEntry {
        owner: addr(owner),
        share_ppb: 0,
        reward,
    }
}

/// In-memory ledger with scriptable failures.
///
/// Scan errors, submit errors, and confirmations are consumed
/// front-to-back; an empty script means success / `Confirmed`. Every
/// submit call is recorded, including ones that fail.
pub(crate) struct MockLedger {
    accounts: Vec<TokenAccount>,
    balance: u64,
    scan_errors: Mutex<VecDeque<LedgerError>>,
    submit_errors: Mutex<VecDeque<LedgerError>>,
    confirmations: Mutex<VecDeque<Confirmation>>,
    submitted: Mutex<Vec<(Address, u64)>>,
    stop_flag: Mutex<Option<Arc<AtomicBool>>>,
    next_id: AtomicU64,
}

impl MockLedger {
    pub fn new(balance: u64) -> Self {
        Self {
            accounts: Vec::new(),
            balance,
            scan_errors: Mutex::new(VecDeque::new()),
            submit_errors: Mutex::new(VecDeque::new()),
            confirmations: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
            stop_flag: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_accounts(mut self, accounts: Vec<TokenAccount>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn push_scan_error(&self, e: LedgerError) {
        self.scan_errors.lock().unwrap().push_back(e);
    }

    pub fn push_submit_error(&self, e: LedgerError) {
        self.submit_errors.lock().unwrap().push_back(e);
    }

    pub fn push_confirmation(&self, c: Confirmation) {
        self.confirmations.lock().unwrap().push_back(c);
    }

    /// Clear `flag` from inside the next submit call, simulating an
    /// operator stop that arrives while a transfer is in flight.
    pub fn clear_flag_on_submit(&self, flag: Arc<AtomicBool>) {
        *self.stop_flag.lock().unwrap() = Some(flag);
    }

    /// Every `(dest, amount)` submit attempt, in call order.
    pub fn submitted_transfers(&self) -> Vec<(Address, u64)> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn token_accounts(&self, _token: &Address) -> Result<Vec<TokenAccount>, LedgerError> {
        if let Some(e) = self.scan_errors.lock().unwrap().pop_front() {
            return Err(e);
        }
        Ok(self.accounts.clone())
    }

    async fn asset_balance(&self, _owner: &Address, _asset: &Address) -> Result<u64, LedgerError> {
        Ok(self.balance)
    }

    async fn submit_transfer(
        &self,
        _source: &Address,
        dest: &Address,
        _asset: &Address,
        amount: u64,
        _signer: &dyn TransferSigner,
    ) -> Result<TransferId, LedgerError> {
        self.submitted.lock().unwrap().push((*dest, amount));
        if let Some(flag) = self.stop_flag.lock().unwrap().take() {
            flag.store(false, Ordering::Relaxed);
        }
        if let Some(e) = self.submit_errors.lock().unwrap().pop_front() {
            return Err(e);
        }
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut id = [0u8; 32];
        id[..8].copy_from_slice(&n.to_le_bytes());
        Ok(TransferId(id))
    }

    async fn await_confirmation(
        &self,
        _id: &TransferId,
        _timeout: Duration,
    ) -> Result<Confirmation, LedgerError> {
        Ok(self
            .confirmations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Confirmation::Confirmed))
    }
}

/// Signer with a fixed source address and an all-zero signature.
pub(crate) struct StaticSigner(pub Address);

impl TransferSigner for StaticSigner {
    fn source(&self) -> Address {
        self.0
    }

    fn sign(&self, _payload: &[u8]) -> [u8; 64] {
        [0u8; 64]
    }
}

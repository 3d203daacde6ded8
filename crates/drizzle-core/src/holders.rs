//! Holder aggregation: raw token accounts to per-owner totals.
//!
//! A single owner may control several token accounts; downstream stages
//! work on one record per distinct owner. Zero-balance accounts are
//! skipped — they can never be eligible and would only inflate the count.

use std::collections::HashMap;

use crate::types::{Address, HolderRecord, TokenAccount};

/// Collapse raw token accounts into one [`HolderRecord`] per distinct owner.
///
/// Balances are summed with saturating arithmetic (a combined holding past
/// `u64::MAX` base units is clamped rather than wrapped). No output
/// ordering is guaranteed; duplicate owners never appear.
pub fn aggregate(accounts: &[TokenAccount]) -> Vec<HolderRecord> {
    let mut by_owner: HashMap<Address, u64> = HashMap::new();

    for account in accounts {
        if account.balance == 0 {
            continue;
        }
        let total = by_owner.entry(account.owner).or_insert(0);
        *total = total.saturating_add(account.balance);
    }

    by_owner
        .into_iter()
        .map(|(owner, balance)| HolderRecord { owner, balance })
        .collect()
}

/// Sum of all aggregated balances, widened to avoid overflow.
pub fn total_supply(holders: &[HolderRecord]) -> u128 {
    holders.iter().map(|h| u128::from(h.balance)).sum()
}

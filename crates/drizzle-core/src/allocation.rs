//! Proportional reward allocation.
//!
//! Each eligible holder receives `floor(balance / total_eligible * reward)`
//! base units of the reward asset, computed with exact u128 rational
//! arithmetic — never floating point. The floor-rounding remainder is
//! intentionally not redistributed: the per-cycle total is a soft target,
//! and the shortfall is bounded by `eligible_count - 1` base units.

use crate::constants::SHARE_PRECISION;
use crate::types::{AllocationEntry, HolderRecord};

/// Compute the proportional allocation of `total_reward` over `eligible`.
///
/// Entries whose floored reward is zero are dropped; every returned entry
/// has `reward > 0`. An empty eligible set (or zero total balance, or zero
/// reward) yields an empty allocation, not an error. Output is sorted by
/// reward descending, owner ascending for determinism.
pub fn allocate(eligible: &[HolderRecord], total_reward: u64) -> Vec<AllocationEntry> {
    let total_eligible: u128 = eligible.iter().map(|h| u128::from(h.balance)).sum();
    if total_eligible == 0 || total_reward == 0 {
        return Vec::new();
    }

    let mut entries: Vec<AllocationEntry> = eligible
        .iter()
        .filter_map(|holder| {
            let balance = u128::from(holder.balance);
            // Both products fit: u64 * u64 < u128::MAX.
            let reward = balance * u128::from(total_reward) / total_eligible;
            if reward == 0 {
                return None;
            }
            let share_ppb = balance * u128::from(SHARE_PRECISION) / total_eligible;
            Some(AllocationEntry {
                owner: holder.owner,
                share_ppb: share_ppb as u64,
                reward: reward as u64,
            })
        })
        .collect();

    entries.sort_by(|a, b| b.reward.cmp(&a.reward).then(a.owner.cmp(&b.owner)));
    entries
}

/// Sum of allocated rewards, widened to avoid overflow.
pub fn allocated_total(entries: &[AllocationEntry]) -> u128 {
    entries.iter().map(|e| u128::from(e.reward)).sum()
}

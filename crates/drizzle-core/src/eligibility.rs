//! Eligibility filtering: partition holders by holding thresholds.

use crate::types::{HolderPartition, HolderRecord};

/// Partition holders into eligible, excluded-low, and excluded-high sets.
///
/// Bounds are inclusive on both ends: a holder with balance exactly
/// `min_holding` or exactly `max_holding` is eligible. A pure, total
/// function with no failure mode; if `min_holding > max_holding` the
/// eligible set is simply always empty (the configuration layer rejects
/// that ordering at startup).
pub fn partition(holders: Vec<HolderRecord>, min_holding: u64, max_holding: u64) -> HolderPartition {
    let mut out = HolderPartition::default();

    for holder in holders {
        if holder.balance < min_holding {
            out.excluded_low.push(holder);
        } else if holder.balance > max_holding {
            out.excluded_high.push(holder);
        } else {
            out.eligible.push(holder);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Address;

    fn holder(seed: u8, balance: u64) -> HolderRecord {
        HolderRecord {
            owner: Address([seed; 32]),
            balance,
        }
    }

    #[test]
    fn empty_input_yields_empty_partition() {
        let p = partition(vec![], 10, 100);
        assert_eq!(p.holder_count(), 0);
    }

    #[test]
    fn boundary_values_are_eligible() {
        let p = partition(vec![holder(1, 10), holder(2, 100)], 10, 100);
        assert_eq!(p.eligible.len(), 2);
        assert!(p.excluded_low.is_empty());
        assert!(p.excluded_high.is_empty());
    }

    #[test]
    fn below_min_is_excluded_low() {
        let p = partition(vec![holder(1, 9)], 10, 100);
        assert_eq!(p.excluded_low, vec![holder(1, 9)]);
    }

    #[test]
    fn above_max_is_excluded_high() {
        let p = partition(vec![holder(1, 101)], 10, 100);
        assert_eq!(p.excluded_high, vec![holder(1, 101)]);
    }

    #[test]
    fn three_holders_one_below_minimum() {
        // balances {4000, 1000, 500}, min=1000, max=10000:
        // 500 is below min, the other two are eligible.
        let p = partition(
            vec![holder(1, 4000), holder(2, 1000), holder(3, 500)],
            1000,
            10_000,
        );
        assert_eq!(p.eligible.len(), 2);
        assert_eq!(p.excluded_low.len(), 1);
        assert_eq!(p.excluded_high.len(), 0);
        assert_eq!(p.excluded_low[0].owner, Address([3; 32]));
    }

    #[test]
    fn inverted_bounds_leave_nothing_eligible() {
        let p = partition(vec![holder(1, 50), holder(2, 5)], 100, 10);
        assert!(p.eligible.is_empty());
        assert_eq!(p.holder_count(), 2);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_holders() -> impl Strategy<Value = Vec<HolderRecord>> {
            proptest::collection::vec(
                (0u8..=255, 0u64..10_000u64).prop_map(|(s, b)| holder(s, b)),
                0..64,
            )
        }

        proptest! {
            #[test]
            fn partition_is_exhaustive(
                holders in arb_holders(),
                min in 0u64..5_000,
                span in 1u64..5_000,
            ) {
                let p = partition(holders.clone(), min, min + span);
                prop_assert_eq!(p.holder_count(), holders.len());
            }

            #[test]
            fn partition_is_disjoint_and_correct(
                holders in arb_holders(),
                min in 0u64..5_000,
                span in 1u64..5_000,
            ) {
                let max = min + span;
                let p = partition(holders, min, max);
                for h in &p.eligible {
                    prop_assert!(h.balance >= min && h.balance <= max);
                }
                for h in &p.excluded_low {
                    prop_assert!(h.balance < min);
                }
                for h in &p.excluded_high {
                    prop_assert!(h.balance > max);
                }
            }
        }
    }
}

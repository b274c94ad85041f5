//! Reward state invariants checked after every simulated instruction

use crate::scenarios::SimulatedRewardState;

/// Counter invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterInvariantResult {
    Valid,
    /// R1: total_minted decreased
    TotalMintedDecreased { before: u64, after: u64 },
    /// R1: aggregate reputation decreased
    ReputationDecreased { before: u64, after: u64 },
    /// R2: per-agent reputations do not add up to the aggregate
    ReputationSumMismatch { aggregate: u64, sum: u128 },
    /// R2: per-agent earnings do not add up to total_minted
    EarningsSumMismatch { total_minted: u64, sum: u128 },
    /// R3: one event and one receipt per mint
    EventCountMismatch { mints: u64, events: usize, receipts: usize },
}

/// Mint invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintInvariantResult {
    Valid,
    /// M1: reward differs from units * rate
    WrongReward { units: u64, rate: u64, amount: u64 },
    /// M2: a rejected instruction changed state or emitted an event
    PartialUpdate,
    /// M3: a past event changed after a rate update
    RetroactiveChange { index: usize },
}

// ============================================================================
// Counter Invariants (R1-R3)
// ============================================================================

/// R1: Counters never decrease across transactions.
pub fn check_counters_monotonic(
    before: &SimulatedRewardState,
    after: &SimulatedRewardState,
) -> CounterInvariantResult {
    if after.total_minted < before.total_minted {
        return CounterInvariantResult::TotalMintedDecreased {
            before: before.total_minted,
            after: after.total_minted,
        };
    }
    if after.aggregate_reputation < before.aggregate_reputation {
        return CounterInvariantResult::ReputationDecreased {
            before: before.aggregate_reputation,
            after: after.aggregate_reputation,
        };
    }
    CounterInvariantResult::Valid
}

/// R2: Per-agent accounts add up to the global counters.
pub fn check_agent_sums(state: &SimulatedRewardState) -> CounterInvariantResult {
    let reputation: u128 = state.agents.values().map(|a| a.reputation as u128).sum();
    if reputation != state.aggregate_reputation as u128 {
        return CounterInvariantResult::ReputationSumMismatch {
            aggregate: state.aggregate_reputation,
            sum: reputation,
        };
    }

    let earned: u128 = state.agents.values().map(|a| a.total_earned as u128).sum();
    if earned != state.total_minted as u128 {
        return CounterInvariantResult::EarningsSumMismatch {
            total_minted: state.total_minted,
            sum: earned,
        };
    }
    CounterInvariantResult::Valid
}

/// R3: Every mint leaves exactly one event and one task receipt.
pub fn check_event_accounting(state: &SimulatedRewardState) -> CounterInvariantResult {
    let mints = state.mint_count;
    if state.events.len() as u64 != mints || state.receipts.len() as u64 != mints {
        return CounterInvariantResult::EventCountMismatch {
            mints,
            events: state.events.len(),
            receipts: state.receipts.len(),
        };
    }
    CounterInvariantResult::Valid
}

// ============================================================================
// Mint Invariants (M1-M3)
// ============================================================================

/// M1: reward = compute_units * rate at the time of the mint.
pub fn check_reward_formula(units: u64, rate: u64, amount: u64) -> MintInvariantResult {
    match units.checked_mul(rate) {
        Some(expected) if expected == amount => MintInvariantResult::Valid,
        _ => MintInvariantResult::WrongReward {
            units,
            rate,
            amount,
        },
    }
}

/// M2: A failed instruction leaves the state exactly as it found it.
pub fn check_no_partial_update(
    before: &SimulatedRewardState,
    after: &SimulatedRewardState,
) -> MintInvariantResult {
    if before == after {
        MintInvariantResult::Valid
    } else {
        MintInvariantResult::PartialUpdate
    }
}

/// M3: Events already committed are never rewritten.
pub fn check_history_preserved(
    before: &SimulatedRewardState,
    after: &SimulatedRewardState,
) -> MintInvariantResult {
    for (index, event) in before.events.iter().enumerate() {
        if after.events.get(index) != Some(event) {
            return MintInvariantResult::RetroactiveChange { index };
        }
    }
    MintInvariantResult::Valid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_formula() {
        assert_eq!(check_reward_formula(7, 1000, 7000), MintInvariantResult::Valid);
        assert_eq!(
            check_reward_formula(7, 1000, 6999),
            MintInvariantResult::WrongReward {
                units: 7,
                rate: 1000,
                amount: 6999
            }
        );
        assert!(matches!(
            check_reward_formula(u64::MAX, 2, 0),
            MintInvariantResult::WrongReward { .. }
        ));
    }

    #[test]
    fn test_monotonic_counters() {
        let before = SimulatedRewardState {
            total_minted: 10,
            ..SimulatedRewardState::default()
        };
        let after = SimulatedRewardState::default();
        assert_eq!(
            check_counters_monotonic(&before, &after),
            CounterInvariantResult::TotalMintedDecreased {
                before: 10,
                after: 0
            }
        );
        assert_eq!(
            check_counters_monotonic(&after, &before),
            CounterInvariantResult::Valid
        );
    }

    #[test]
    fn test_fresh_state_is_consistent() {
        let state = SimulatedRewardState::default();
        assert_eq!(check_agent_sums(&state), CounterInvariantResult::Valid);
        assert_eq!(check_event_accounting(&state), CounterInvariantResult::Valid);
    }
}

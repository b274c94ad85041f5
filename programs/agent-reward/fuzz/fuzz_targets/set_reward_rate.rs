//! Fuzz target for set_reward_rate
//!
//! Tests invariants:
//! - Only the authority can change the rate
//! - M3: a rate change never rewrites committed mints
//!
//! Run with: cargo test --release -p agent-reward-fuzz set_reward_rate

use crate::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn fuzz_set_reward_rate(input in any::<SetRewardRateInput>()) {
        let mut state = SimulatedRewardState::default();
        let caller = if input.caller_is_authority { state.authority } else { input.caller };

        let result = simulate_set_reward_rate(&mut state, caller, input.new_rate);
        prop_assert!(!result.is_invariant_violation(), "{:?}", result);

        if caller == state.authority {
            prop_assert!(result.is_success());
            prop_assert_eq!(state.reward_rate, input.new_rate);
        } else {
            prop_assert!(result.is_error());
            prop_assert_eq!(state.reward_rate, INITIAL_REWARD_RATE);
        }
    }

    /// Mints committed before a rate change keep their amounts
    #[test]
    fn fuzz_rate_change_not_retroactive(
        units in 1u64..1_000_000u64,
        new_rate in arb_reward_rate(),
    ) {
        let mut state = SimulatedRewardState::default();
        let submission = SimulatedSubmission {
            task_id: [3u8; 32],
            agent: [4u8; 32],
            compute_units: units,
            proof_valid: true,
            selector_trusted: true,
        };
        prop_assert!(simulate_verify_and_mint(&mut state, &submission).is_success());
        let minted = state.total_minted;

        let authority = state.authority;
        prop_assert!(simulate_set_reward_rate(&mut state, authority, new_rate).is_success());
        prop_assert_eq!(state.total_minted, minted);
        prop_assert_eq!(state.events[0].amount, units * INITIAL_REWARD_RATE);
    }
}

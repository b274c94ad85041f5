//! Fuzz target for verify_and_mint
//!
//! Tests invariants:
//! - M1: reward = compute_units * reward_rate
//! - M2: rejected submissions leave no trace
//! - R1-R3: counters, sums and event accounting
//!
//! Run with: cargo test --release -p agent-reward-fuzz verify_and_mint

use crate::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Fuzz verify_and_mint with arbitrary inputs
    #[test]
    fn fuzz_verify_and_mint(input in any::<VerifyAndMintInput>()) {
        let mut state = SimulatedRewardState {
            reward_rate: input.reward_rate,
            ..SimulatedRewardState::default()
        };
        let before = state.clone();

        let submission = SimulatedSubmission {
            task_id: input.task_id,
            agent: input.agent,
            compute_units: input.compute_units,
            proof_valid: input.proof_valid,
            selector_trusted: input.selector_trusted,
        };
        let result = simulate_verify_and_mint(&mut state, &submission);

        prop_assert!(!result.is_invariant_violation(),
            "Invariant violation: {:?}\nInput: {:?}", result, input);

        if result.is_success() {
            prop_assert!(input.proof_valid && input.selector_trusted);
            prop_assert_eq!(state.total_minted, input.compute_units * input.reward_rate);
            prop_assert_eq!(state.reputation_of(&input.agent), input.compute_units);
            prop_assert_eq!(state.events.len(), 1);
        } else {
            prop_assert_eq!(&state, &before, "rejected mint changed state");
        }
    }

    /// An invalid proof never mints, whatever else the submission says
    #[test]
    fn fuzz_invalid_proof_never_mints(
        task_id in arb_id(),
        agent in arb_agent(),
        compute_units in arb_compute_units(),
    ) {
        let mut state = SimulatedRewardState::default();
        let submission = SimulatedSubmission {
            task_id,
            agent,
            compute_units,
            proof_valid: false,
            selector_trusted: true,
        };

        let result = simulate_verify_and_mint(&mut state, &submission);
        prop_assert!(result.is_error());
        prop_assert_eq!(state.total_minted, 0);
        prop_assert_eq!(state.aggregate_reputation, 0);
        prop_assert!(state.events.is_empty());
    }
}

#[test]
fn test_end_to_end_initial_mint() {
    let mut state = SimulatedRewardState::default();
    let agent = [7u8; 32];
    let result = simulate_verify_and_mint(
        &mut state,
        &SimulatedSubmission {
            task_id: [9u8; 32],
            agent,
            compute_units: 7,
            proof_valid: true,
            selector_trusted: true,
        },
    );

    assert!(result.is_success());
    assert_eq!(state.total_minted, 7000);
    assert_eq!(state.aggregate_reputation, 7);
    assert_eq!(state.reputation_of(&agent), 7);
    assert_eq!(state.events.len(), 1);
    assert_eq!(state.events[0].amount, 7000);
}

#[test]
fn test_overflowing_reward_is_rejected() {
    let mut state = SimulatedRewardState::default();
    let result = simulate_verify_and_mint(
        &mut state,
        &SimulatedSubmission {
            task_id: [9u8; 32],
            agent: [7u8; 32],
            compute_units: u64::MAX,
            proof_valid: true,
            selector_trusted: true,
        },
    );

    assert!(matches!(result, SimulationResult::Error(ref e) if e == "ArithmeticOverflow"));
    assert_eq!(state, SimulatedRewardState::default());
}

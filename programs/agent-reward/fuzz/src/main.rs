//! Fuzz test runner for the Agent Reward Program
//!
//! Run with: cargo run --release -p agent-reward-fuzz
//! Or: cargo test -p agent-reward-fuzz (for property-based tests)

use agent_reward_fuzz::*;
use proptest::prelude::*;
use std::time::Instant;

fn main() {
    println!("=== Agent Reward Program Fuzz Testing ===\n");

    let start = Instant::now();
    let mut total_tests = 0;
    let mut passed = 0;
    let mut failed = 0;

    println!("Running verify_and_mint fuzz tests...");
    let (p, f) = run_verify_and_mint_fuzz(200);
    passed += p;
    failed += f;
    total_tests += p + f;

    println!("Running mint sequence fuzz tests...");
    let (p, f) = run_mint_sequence_fuzz(100);
    passed += p;
    failed += f;
    total_tests += p + f;

    let duration = start.elapsed();

    println!("\n=== Fuzz Testing Complete ===");
    println!("Total tests: {}", total_tests);
    println!("Passed: {}", passed);
    println!("Failed: {}", failed);
    println!("Duration: {:?}", duration);

    if failed > 0 {
        std::process::exit(1);
    }
}

fn run_verify_and_mint_fuzz(iterations: usize) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    let mut runner = proptest::test_runner::TestRunner::default();

    for i in 0..iterations {
        let input = any::<VerifyAndMintInput>()
            .new_tree(&mut runner)
            .expect("Failed to generate VerifyAndMintInput")
            .current();

        let mut state = SimulatedRewardState {
            reward_rate: input.reward_rate,
            ..SimulatedRewardState::default()
        };
        let submission = SimulatedSubmission {
            task_id: input.task_id,
            agent: input.agent,
            compute_units: input.compute_units,
            proof_valid: input.proof_valid,
            selector_trusted: input.selector_trusted,
        };

        let result = simulate_verify_and_mint(&mut state, &submission);

        if result.is_invariant_violation() {
            println!("  [FAIL] Iteration {}: {:?}", i, result);
            failed += 1;
        } else {
            passed += 1;
        }
    }

    println!("  verify_and_mint: {} passed, {} failed", passed, failed);
    (passed, failed)
}

fn run_mint_sequence_fuzz(iterations: usize) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;

    let mut runner = proptest::test_runner::TestRunner::default();

    for i in 0..iterations {
        let input = any::<MintSequenceInput>()
            .new_tree(&mut runner)
            .expect("Failed to generate MintSequenceInput")
            .current();

        let mut state = SimulatedRewardState::default();
        let mut violation = None;

        for op in &input.ops {
            let result = match op {
                RewardOp::Mint {
                    task_id,
                    agent,
                    compute_units,
                    proof_valid,
                } => simulate_verify_and_mint(
                    &mut state,
                    &SimulatedSubmission {
                        task_id: *task_id,
                        agent: *agent,
                        compute_units: *compute_units,
                        proof_valid: *proof_valid,
                        selector_trusted: true,
                    },
                ),
                RewardOp::SetRate { new_rate } => {
                    let authority = state.authority;
                    simulate_set_reward_rate(&mut state, authority, *new_rate)
                }
            };
            if result.is_invariant_violation() {
                violation = Some(result);
                break;
            }
        }

        match violation {
            Some(result) => {
                println!("  [FAIL] Iteration {}: {:?}", i, result);
                failed += 1;
            }
            None => passed += 1,
        }
    }

    println!("  mint_sequence: {} passed, {} failed", passed, failed);
    (passed, failed)
}

//! Arbitrary input generators for fuzz testing

use proptest::prelude::*;

/// Arbitrary 32-byte identifier (task id, agent key)
pub fn arb_id() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>())
}

/// Agent keys drawn from a small pool so sequences revisit agents
pub fn arb_agent() -> impl Strategy<Value = [u8; 32]> {
    (1u8..=4u8).prop_map(|n| [n; 32])
}

/// Task ids drawn from a small pool so sequences hit replays
pub fn arb_task_id() -> impl Strategy<Value = [u8; 32]> {
    prop_oneof![
        (0u8..=8u8).prop_map(|n| [n; 32]),
        arb_id(),
    ]
}

/// Arbitrary compute units with edge cases
pub fn arb_compute_units() -> impl Strategy<Value = u64> {
    prop_oneof![
        // Edge cases
        Just(0u64),
        Just(1u64),
        Just(u64::MAX),
        Just(u64::MAX / 1000),
        // Typical values
        1u64..10_000u64,
        10_000u64..1_000_000_000u64,
    ]
}

/// Arbitrary reward rate with edge cases
pub fn arb_reward_rate() -> impl Strategy<Value = u64> {
    prop_oneof![
        Just(0u64),
        Just(1u64),
        Just(1000u64),
        Just(u64::MAX),
        1u64..100_000u64,
    ]
}

/// Input for verify_and_mint fuzz testing
#[derive(Debug, Clone)]
pub struct VerifyAndMintInput {
    pub task_id: [u8; 32],
    pub agent: [u8; 32],
    pub compute_units: u64,
    pub proof_valid: bool,
    pub selector_trusted: bool,
    pub reward_rate: u64,
}

impl Arbitrary for VerifyAndMintInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            arb_task_id(),
            arb_agent(),
            arb_compute_units(),
            prop::bool::weighted(0.8),
            prop::bool::weighted(0.9),
            arb_reward_rate(),
        )
            .prop_map(
                |(task_id, agent, compute_units, proof_valid, selector_trusted, reward_rate)| {
                    VerifyAndMintInput {
                        task_id,
                        agent,
                        compute_units,
                        proof_valid,
                        selector_trusted,
                        reward_rate,
                    }
                },
            )
            .boxed()
    }
}

/// Input for set_reward_rate fuzz testing
#[derive(Debug, Clone)]
pub struct SetRewardRateInput {
    pub caller_is_authority: bool,
    pub caller: [u8; 32],
    pub new_rate: u64,
}

impl Arbitrary for SetRewardRateInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (any::<bool>(), arb_id(), arb_reward_rate())
            .prop_map(|(caller_is_authority, caller, new_rate)| SetRewardRateInput {
                caller_is_authority,
                caller,
                new_rate,
            })
            .boxed()
    }
}

/// One step of a mint sequence
#[derive(Debug, Clone)]
pub enum RewardOp {
    Mint {
        task_id: [u8; 32],
        agent: [u8; 32],
        compute_units: u64,
        proof_valid: bool,
    },
    SetRate {
        new_rate: u64,
    },
}

pub fn arb_reward_op() -> impl Strategy<Value = RewardOp> {
    prop_oneof![
        4 => (arb_task_id(), arb_agent(), 0u64..1_000_000u64, prop::bool::weighted(0.85))
            .prop_map(|(task_id, agent, compute_units, proof_valid)| RewardOp::Mint {
                task_id,
                agent,
                compute_units,
                proof_valid,
            }),
        1 => (0u64..100_000u64).prop_map(|new_rate| RewardOp::SetRate { new_rate }),
    ]
}

/// Input for mint sequence fuzz testing
#[derive(Debug, Clone)]
pub struct MintSequenceInput {
    pub ops: Vec<RewardOp>,
}

impl Arbitrary for MintSequenceInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop::collection::vec(arb_reward_op(), 1..40)
            .prop_map(|ops| MintSequenceInput { ops })
            .boxed()
    }
}

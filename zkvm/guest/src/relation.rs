//! The two provable relations.
//!
//! `prove_work` is the base case. `verify_chain` is the recursive case and is
//! generic over a [`ChainStep`], which decides the public output of the new
//! proof from the already-verified inner statement and the new record.

use core::fmt;

use crate::commitment::FieldElement;
use crate::journal::{JournalError, ProofJournal, ProofKind, IMAGE_ID_LEN};
use crate::record::{WorkRecord, WorkWitness};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationError {
    CommitmentMismatch {
        expected: FieldElement,
        actual: FieldElement,
    },
    AggregateOverflow,
    ChainImageMismatch,
    Journal(JournalError),
}

impl fmt::Display for RelationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommitmentMismatch { .. } => {
                write!(f, "result hash does not match the declared commitments")
            }
            Self::AggregateOverflow => write!(f, "aggregated compute units overflow"),
            Self::ChainImageMismatch => {
                write!(f, "inner proof was produced under a different chain image")
            }
            Self::Journal(err) => write!(f, "malformed inner journal: {err}"),
        }
    }
}

impl From<JournalError> for RelationError {
    fn from(err: JournalError) -> Self {
        Self::Journal(err)
    }
}

/// Base relation: the record's result hash must equal the hash of the
/// private commitments. Returns the statement to commit.
pub fn prove_work(
    record: &WorkRecord,
    witness: &WorkWitness,
) -> Result<ProofJournal, RelationError> {
    let computed = witness.result_hash();
    if computed != record.result_hash {
        return Err(RelationError::CommitmentMismatch {
            expected: record.result_hash,
            actual: computed,
        });
    }
    Ok(ProofJournal::base(*record, computed))
}

/// Extension rule applied on top of a verified inner proof.
pub trait ChainStep {
    fn extend(&self, inner: &ProofJournal, record: &WorkRecord) -> Result<u128, RelationError>;
}

/// Sums compute units across the whole chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateCompute;

impl ChainStep for AggregateCompute {
    fn extend(&self, inner: &ProofJournal, record: &WorkRecord) -> Result<u128, RelationError> {
        inner
            .aggregate_units()?
            .checked_add(u128::from(record.compute_units))
            .ok_or(RelationError::AggregateOverflow)
    }
}

/// Recursive relation. The caller is responsible for having verified the
/// inner proof against `chain_image_id` before calling this.
pub fn verify_chain<S: ChainStep>(
    step: &S,
    inner: &ProofJournal,
    record: &WorkRecord,
    chain_image_id: [u8; IMAGE_ID_LEN],
) -> Result<ProofJournal, RelationError> {
    if inner.kind == ProofKind::Chained && inner.chain_image_id != chain_image_id {
        return Err(RelationError::ChainImageMismatch);
    }
    let total = step.extend(inner, record)?;
    Ok(ProofJournal::chained(*record, total, chain_image_id))
}

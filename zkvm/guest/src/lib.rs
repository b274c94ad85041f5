#![forbid(unsafe_code)]

//! Statement layer shared by the prover host, the zkVM guest image and the
//! reward program. Every byte layout that ends up inside a proof journal is
//! defined here so the three sides cannot drift apart.

pub mod commitment;
pub mod journal;
pub mod record;
pub mod relation;

pub use commitment::{commit, hash_work, FieldElement, FieldError, FIELD_ELEMENT_LEN, LIMB_LEN};
pub use journal::{JournalError, ProofJournal, ProofKind, IMAGE_ID_LEN, JOURNAL_TOTAL_LEN};
pub use record::{WorkRecord, WorkWitness, WORK_RECORD_LEN};
pub use relation::{prove_work, verify_chain, AggregateCompute, ChainStep, RelationError};

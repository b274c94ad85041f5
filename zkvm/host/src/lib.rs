#![forbid(unsafe_code)]

use std::{ffi::OsStr, fmt};

pub mod config;

use config::Deployment;

use agent_work_guest::{
    relation, AggregateCompute, JournalError, ProofJournal, ProofKind, RelationError, WorkRecord,
    WorkWitness, JOURNAL_TOTAL_LEN,
};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
#[cfg(not(feature = "production-prover"))]
use sha2::{Digest, Sha256};

pub const IMAGE_ID_LEN: usize = 32;
pub const SEAL_SELECTOR_LEN: usize = 4;
pub const SEAL_PROOF_LEN: usize = 256;
pub const SEAL_BYTES_LEN: usize = SEAL_SELECTOR_LEN + SEAL_PROOF_LEN;
pub const TRUSTED_SEAL_SELECTOR: Selector = [0x52, 0x5a, 0x56, 0x4d];
pub const DEV_MODE_ENV_VAR: &str = "RISC0_DEV_MODE";

pub type ImageId = [u8; IMAGE_ID_LEN];
pub type Selector = [u8; SEAL_SELECTOR_LEN];
type ProofBytes = [u8; SEAL_PROOF_LEN];

/// A proof over one [`ProofJournal`]. `journal` is the exact byte string the
/// guest committed; `receipt` carries the succinct receipt needed to compose
/// this proof into a chain and is only present from the real prover.
#[derive(
    Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct WorkProof {
    pub journal: Vec<u8>,
    pub seal_bytes: Vec<u8>,
    pub image_id: ImageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Vec<u8>>,
}

impl WorkProof {
    /// Decodes the public statement without verifying the seal.
    pub fn statement(&self) -> Result<ProofJournal, ProveError> {
        ProofJournal::from_bytes(&self.journal).map_err(ProveError::MalformedJournal)
    }

    pub fn selector(&self) -> Option<Selector> {
        self.seal_bytes
            .get(..SEAL_SELECTOR_LEN)
            .and_then(|bytes| bytes.try_into().ok())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ProveError> {
        self.try_to_vec()
            .map_err(|err| ProveError::Serialization(err.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProveError> {
        Self::try_from_slice(bytes).map_err(|err| ProveError::Serialization(err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProveError {
    ConstraintViolation(RelationError),
    UnexpectedJournalLength { expected: usize, actual: usize },
    MalformedJournal(JournalError),
    UntrustedSelector {
        expected: Selector,
        actual: Option<Selector>,
    },
    ImageMismatch { expected: ImageId, actual: ImageId },
    VerificationFailed(String),
    DevModeEnabled { variable: &'static str },
    ClusterNotAllowlisted { cluster: String },
    ProverFailed(String),
    ReceiptTypeMismatch(String),
    ReceiptMissing,
    Serialization(String),
}

impl fmt::Display for ProveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstraintViolation(err) => write!(f, "constraint violation: {err}"),
            Self::UnexpectedJournalLength { expected, actual } => {
                write!(
                    f,
                    "unexpected journal length: expected {}, got {}",
                    expected, actual
                )
            }
            Self::MalformedJournal(err) => write!(f, "malformed journal: {err}"),
            Self::UntrustedSelector { expected, actual } => {
                write!(
                    f,
                    "untrusted selector: expected {:?}, got {:?}",
                    expected, actual
                )
            }
            Self::ImageMismatch { .. } => write!(f, "proof was produced by an untrusted image"),
            Self::VerificationFailed(message) => write!(f, "verification failed: {message}"),
            Self::DevModeEnabled { variable } => {
                write!(f, "{variable} is set; refusing to generate proof output")
            }
            Self::ClusterNotAllowlisted { cluster } => {
                write!(f, "cluster is not allowlisted for trusted deployment: {cluster}")
            }
            Self::ProverFailed(message) => write!(f, "prover failed: {message}"),
            Self::ReceiptTypeMismatch(message) => write!(f, "receipt type mismatch: {message}"),
            Self::ReceiptMissing => write!(f, "proof carries no receipt to verify or compose"),
            Self::Serialization(message) => write!(f, "proof serialization failed: {message}"),
        }
    }
}

impl std::error::Error for ProveError {}

impl From<RelationError> for ProveError {
    fn from(err: RelationError) -> Self {
        Self::ConstraintViolation(err)
    }
}

/// What the guest is asked to prove.
#[cfg_attr(not(feature = "production-prover"), allow(dead_code))]
enum GuestCall<'a> {
    ProveWork {
        record: &'a WorkRecord,
        witness: &'a WorkWitness,
    },
    VerifyChain {
        record: &'a WorkRecord,
        inner: &'a WorkProof,
        chain_image_id: ImageId,
    },
}

/// Convert RISC Zero `[u32; 8]` image ID to flat `[u8; 32]`.
/// RISC Zero stores Digest words in little-endian order.
pub fn guest_id_to_image_id(guest_id: &[u32; 8]) -> ImageId {
    let mut out = [0u8; IMAGE_ID_LEN];
    for (i, word) in guest_id.iter().enumerate() {
        out[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
    }
    out
}

/// Image id every proof from this build is checked against.
pub fn work_image_id() -> ImageId {
    #[cfg(feature = "production-prover")]
    {
        guest_id_to_image_id(&agent_work_methods::AGENT_WORK_IMAGE_ID)
    }
    #[cfg(not(feature = "production-prover"))]
    {
        simulated_image_id()
    }
}

/// Base case: proves that `record.result_hash` is the hash of the witness.
pub fn prove_work(record: &WorkRecord, witness: &WorkWitness) -> Result<WorkProof, ProveError> {
    prove_work_for(config::DEFAULT_CLUSTER, record, witness)
}

/// Recursive case: verifies `previous`, then proves `record` on top of it.
pub fn verify_chain(record: &WorkRecord, previous: &WorkProof) -> Result<WorkProof, ProveError> {
    verify_chain_for(config::DEFAULT_CLUSTER, record, previous)
}

/// [`prove_work`] for a proof meant for the deployment on `cluster`.
pub fn prove_work_for(
    cluster: &str,
    record: &WorkRecord,
    witness: &WorkWitness,
) -> Result<WorkProof, ProveError> {
    let dev_mode_value = std::env::var_os(DEV_MODE_ENV_VAR);
    prove_work_with_dev_mode(cluster, record, witness, dev_mode_value.as_deref())
}

/// [`verify_chain`] for a proof meant for the deployment on `cluster`.
pub fn verify_chain_for(
    cluster: &str,
    record: &WorkRecord,
    previous: &WorkProof,
) -> Result<WorkProof, ProveError> {
    let dev_mode_value = std::env::var_os(DEV_MODE_ENV_VAR);
    verify_chain_with_dev_mode(cluster, record, previous, dev_mode_value.as_deref())
}

fn prove_work_with_dev_mode(
    cluster: &str,
    record: &WorkRecord,
    witness: &WorkWitness,
    dev_mode_value: Option<&OsStr>,
) -> Result<WorkProof, ProveError> {
    let deployment = ensure_allowlisted_deployment(cluster)?;
    ensure_dev_mode_disabled(dev_mode_value)?;

    // Native evaluation first, so a mismatch never reaches the prover.
    let expected = relation::prove_work(record, witness)?;
    tracing::debug!(
        units = record.compute_units,
        cluster = deployment.cluster,
        program = deployment.reward_program_id,
        "proving base work record"
    );
    generate(GuestCall::ProveWork { record, witness }, &expected)
}

fn verify_chain_with_dev_mode(
    cluster: &str,
    record: &WorkRecord,
    previous: &WorkProof,
    dev_mode_value: Option<&OsStr>,
) -> Result<WorkProof, ProveError> {
    let deployment = ensure_allowlisted_deployment(cluster)?;
    ensure_dev_mode_disabled(dev_mode_value)?;

    let inner = verify_proof(previous)?;
    let chain_image_id = work_image_id();
    let expected = relation::verify_chain(&AggregateCompute, &inner, record, chain_image_id)?;
    tracing::debug!(
        units = record.compute_units,
        inner_kind = ?inner.kind,
        cluster = deployment.cluster,
        program = deployment.reward_program_id,
        "proving chained work record"
    );
    generate(
        GuestCall::VerifyChain {
            record,
            inner: previous,
            chain_image_id,
        },
        &expected,
    )
}

fn generate(call: GuestCall<'_>, expected: &ProofJournal) -> Result<WorkProof, ProveError> {
    #[cfg(feature = "production-prover")]
    {
        generate_real(call, expected)
    }
    #[cfg(not(feature = "production-prover"))]
    {
        let _ = call;
        generate_simulated(expected)
    }
}

/// Checks seal framing, image id and the proof itself. Returns the verified
/// statement.
pub fn verify_proof(proof: &WorkProof) -> Result<ProofJournal, ProveError> {
    if proof.journal.len() != JOURNAL_TOTAL_LEN {
        return Err(ProveError::UnexpectedJournalLength {
            expected: JOURNAL_TOTAL_LEN,
            actual: proof.journal.len(),
        });
    }

    let selector = proof.selector();
    if proof.seal_bytes.len() != SEAL_BYTES_LEN || selector != Some(TRUSTED_SEAL_SELECTOR) {
        return Err(ProveError::UntrustedSelector {
            expected: TRUSTED_SEAL_SELECTOR,
            actual: selector,
        });
    }

    let expected_image = work_image_id();
    if proof.image_id != expected_image {
        return Err(ProveError::ImageMismatch {
            expected: expected_image,
            actual: proof.image_id,
        });
    }

    let statement = proof.statement()?;
    if statement.kind == ProofKind::Chained && statement.chain_image_id != expected_image {
        return Err(ProveError::VerificationFailed(
            "chained proof names a foreign chain image".into(),
        ));
    }

    #[cfg(feature = "production-prover")]
    verify_real(proof)?;
    #[cfg(not(feature = "production-prover"))]
    verify_simulated(proof)?;

    Ok(statement)
}

// ---------------------------------------------------------------------------
// Simulation path (default, no production-prover feature)
// ---------------------------------------------------------------------------

#[cfg(not(feature = "production-prover"))]
const SIM_IMAGE_LABEL: &[u8] = b"agent-work/simulated-image/v1";
#[cfg(not(feature = "production-prover"))]
const SIM_PROOF_TAG: &[u8] = b"agent-work/simulated-seal/v1";

#[cfg(not(feature = "production-prover"))]
fn simulated_image_id() -> ImageId {
    Sha256::digest(SIM_IMAGE_LABEL).into()
}

#[cfg(not(feature = "production-prover"))]
fn generate_simulated(expected: &ProofJournal) -> Result<WorkProof, ProveError> {
    let journal = expected.to_bytes();
    let image_id = simulated_image_id();
    let proof_bytes = simulate_proof_bytes(&journal, &image_id);

    Ok(WorkProof {
        journal: journal.to_vec(),
        seal_bytes: encode_seal(&proof_bytes),
        image_id,
        receipt: None,
    })
}

/// Expands SHA-256 over image id and journal into the 256 proof bytes.
/// Stands in for a Groth16 seal; carries no zero-knowledge property.
#[cfg(not(feature = "production-prover"))]
fn simulate_proof_bytes(journal: &[u8], image_id: &ImageId) -> ProofBytes {
    let mut out = [0_u8; SEAL_PROOF_LEN];
    for (block, chunk) in out.chunks_mut(32).enumerate() {
        let mut hasher = Sha256::new();
        hasher.update(SIM_PROOF_TAG);
        hasher.update([block as u8]);
        hasher.update(image_id);
        hasher.update(journal);
        chunk.copy_from_slice(&hasher.finalize());
    }
    out
}

#[cfg(not(feature = "production-prover"))]
fn verify_simulated(proof: &WorkProof) -> Result<(), ProveError> {
    let expected = simulate_proof_bytes(&proof.journal, &proof.image_id);
    if proof.seal_bytes[SEAL_SELECTOR_LEN..] != expected[..] {
        return Err(ProveError::VerificationFailed(
            "seal does not attest this journal".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Real prover path (production-prover feature)
// ---------------------------------------------------------------------------

#[cfg(feature = "production-prover")]
fn generate_real(call: GuestCall<'_>, expected: &ProofJournal) -> Result<WorkProof, ProveError> {
    use agent_work_methods::AGENT_WORK_IMAGE_ELF;
    use risc0_zkvm::{default_prover, ExecutorEnv, ProverOpts, Receipt};

    fn write<T: serde::Serialize>(
        builder: &mut risc0_zkvm::ExecutorEnvBuilder<'_>,
        name: &str,
        value: &T,
    ) -> Result<(), ProveError> {
        builder
            .write(value)
            .map_err(|e| ProveError::ProverFailed(format!("failed to write {name}: {e}")))?;
        Ok(())
    }

    fn write_record(
        builder: &mut risc0_zkvm::ExecutorEnvBuilder<'_>,
        record: &WorkRecord,
    ) -> Result<(), ProveError> {
        write(builder, "task_id", &record.task_id.to_bytes())?;
        write(builder, "result_hash", &record.result_hash.to_bytes())?;
        write(builder, "compute_units", &record.compute_units)?;
        write(builder, "timestamp", &record.timestamp)
    }

    let mut builder = ExecutorEnv::builder();
    match call {
        GuestCall::ProveWork { record, witness } => {
            write(&mut builder, "mode", &0_u8)?;
            write_record(&mut builder, record)?;
            write(&mut builder, "model_commitment", &witness.model_commitment.to_bytes())?;
            write(&mut builder, "input_commitment", &witness.input_commitment.to_bytes())?;
            write(&mut builder, "output_value", &witness.output_value.to_bytes())?;
        }
        GuestCall::VerifyChain {
            record,
            inner,
            chain_image_id,
        } => {
            let encoded = inner.receipt.as_ref().ok_or(ProveError::ReceiptMissing)?;
            let inner_receipt: Receipt = serde_json::from_slice(encoded)
                .map_err(|e| ProveError::Serialization(e.to_string()))?;
            builder.add_assumption(inner_receipt);
            write(&mut builder, "mode", &1_u8)?;
            write_record(&mut builder, record)?;
            write(&mut builder, "inner_journal", &inner.journal)?;
            write(&mut builder, "chain_image_id", &chain_image_id)?;
        }
    }
    let env = builder
        .build()
        .map_err(|e| ProveError::ProverFailed(format!("failed to build executor env: {e}")))?;

    let prover = default_prover();
    let succinct = prover
        .prove_with_opts(env, AGENT_WORK_IMAGE_ELF, &ProverOpts::succinct())
        .map_err(|e| ProveError::ProverFailed(format!("succinct proving failed: {e}")))?
        .receipt;
    let compressed = prover
        .compress(&ProverOpts::groth16(), &succinct)
        .map_err(|e| ProveError::ProverFailed(format!("Groth16 compression failed: {e}")))?;

    let groth16 = compressed
        .inner
        .groth16()
        .map_err(|e| ProveError::ReceiptTypeMismatch(format!("expected Groth16 receipt: {e}")))?;
    let raw_seal: ProofBytes = groth16.seal.clone().try_into().map_err(|v: Vec<u8>| {
        ProveError::ProverFailed(format!(
            "Groth16 seal is {} bytes, expected {}",
            v.len(),
            SEAL_PROOF_LEN
        ))
    })?;

    let journal = succinct.journal.bytes.clone();
    if journal.len() != JOURNAL_TOTAL_LEN {
        return Err(ProveError::UnexpectedJournalLength {
            expected: JOURNAL_TOTAL_LEN,
            actual: journal.len(),
        });
    }
    if journal[..] != expected.to_bytes()[..] {
        return Err(ProveError::ProverFailed(
            "guest journal differs from the native evaluation".into(),
        ));
    }

    let receipt =
        serde_json::to_vec(&succinct).map_err(|e| ProveError::Serialization(e.to_string()))?;

    Ok(WorkProof {
        journal,
        seal_bytes: encode_seal(&raw_seal),
        image_id: work_image_id(),
        receipt: Some(receipt),
    })
}

#[cfg(feature = "production-prover")]
fn verify_real(proof: &WorkProof) -> Result<(), ProveError> {
    use risc0_zkvm::Receipt;

    let encoded = proof.receipt.as_ref().ok_or(ProveError::ReceiptMissing)?;
    let receipt: Receipt =
        serde_json::from_slice(encoded).map_err(|e| ProveError::Serialization(e.to_string()))?;
    receipt
        .verify(agent_work_methods::AGENT_WORK_IMAGE_ID)
        .map_err(|e| ProveError::VerificationFailed(e.to_string()))?;
    if receipt.journal.bytes != proof.journal {
        return Err(ProveError::VerificationFailed(
            "receipt journal differs from the proof journal".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

pub fn render_work_proof(proof: &WorkProof) -> Result<String, ProveError> {
    serde_json::to_string(proof).map_err(|err| ProveError::Serialization(err.to_string()))
}

pub fn parse_work_proof(text: &str) -> Result<WorkProof, ProveError> {
    serde_json::from_str(text).map_err(|err| ProveError::Serialization(err.to_string()))
}

fn encode_seal(proof_bytes: &ProofBytes) -> Vec<u8> {
    let mut seal = Vec::with_capacity(SEAL_BYTES_LEN);
    seal.extend_from_slice(&TRUSTED_SEAL_SELECTOR);
    seal.extend_from_slice(proof_bytes);
    seal
}

fn ensure_dev_mode_disabled(dev_mode_value: Option<&OsStr>) -> Result<(), ProveError> {
    if dev_mode_value.is_some() {
        return Err(ProveError::DevModeEnabled {
            variable: DEV_MODE_ENV_VAR,
        });
    }
    Ok(())
}

fn ensure_allowlisted_deployment(cluster: &str) -> Result<&'static Deployment, ProveError> {
    config::deployment(cluster).map_err(|unknown| ProveError::ClusterNotAllowlisted {
        cluster: unknown.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CLUSTER;
    use agent_work_guest::{commit, FieldElement};

    fn witness(output: &[u8]) -> WorkWitness {
        WorkWitness {
            model_commitment: commit(b"model:llama-3-8b"),
            input_commitment: commit(b"translate to french"),
            output_value: commit(output),
        }
    }

    fn record(units: u64, output: &[u8]) -> WorkRecord {
        WorkRecord::bind(commit(b"task-1"), &witness(output), units, 1_700_000_000_000)
    }

    fn base_proof(units: u64) -> WorkProof {
        prove_work_with_dev_mode(
            DEFAULT_CLUSTER,
            &record(units, b"bonjour"),
            &witness(b"bonjour"),
            None,
        )
        .expect("proof generation must succeed")
    }

    #[test]
    fn canonical_seal_shape_and_lengths_are_correct() {
        let proof = base_proof(10);

        assert_eq!(proof.seal_bytes.len(), SEAL_BYTES_LEN);
        assert_eq!(proof.selector(), Some(TRUSTED_SEAL_SELECTOR));
        assert_eq!(proof.journal.len(), JOURNAL_TOTAL_LEN);
        assert_eq!(proof.image_id, work_image_id());
    }

    #[test]
    fn valid_witness_proves_and_verifies() {
        let proof = base_proof(10);
        let statement = verify_proof(&proof).expect("proof must verify");

        assert_eq!(statement.kind, ProofKind::Base);
        assert_eq!(statement.record, record(10, b"bonjour"));
        assert_eq!(statement.public_output, statement.record.result_hash);
    }

    #[test]
    fn mismatched_witness_cannot_be_proven() {
        let err = prove_work_with_dev_mode(
            DEFAULT_CLUSTER,
            &record(10, b"bonjour"),
            &witness(b"hola"),
            None,
        )
        .expect_err("mismatched commitments must fail");
        assert!(matches!(
            err,
            ProveError::ConstraintViolation(RelationError::CommitmentMismatch { .. })
        ));
    }

    #[test]
    fn chained_proofs_aggregate_compute_units() {
        let p1 = base_proof(10);
        let r2 = record(5, b"salut");
        let p2 = verify_chain_with_dev_mode(DEFAULT_CLUSTER, &r2, &p1, None)
            .expect("chain must prove");

        let s2 = verify_proof(&p2).expect("chained proof must verify");
        assert_eq!(s2.kind, ProofKind::Chained);
        assert_eq!(s2.public_output, FieldElement::from_u64(15));
        assert_eq!(s2.record, r2);

        let r3 = record(7, b"coucou");
        let p3 = verify_chain_with_dev_mode(DEFAULT_CLUSTER, &r3, &p2, None)
            .expect("chain must extend");
        assert_eq!(verify_proof(&p3).expect("verify").aggregate_units(), Ok(22));
    }

    #[test]
    fn chain_refuses_unverifiable_inner_proof() {
        let mut p1 = base_proof(10);
        p1.seal_bytes[10] ^= 0xff;

        let err = verify_chain_with_dev_mode(DEFAULT_CLUSTER, &record(5, b"x"), &p1, None)
            .expect_err("tampered inner proof must be rejected");
        assert!(matches!(err, ProveError::VerificationFailed(_)));
    }

    #[test]
    fn tampered_journal_is_rejected() {
        let mut proof = base_proof(10);
        // compute_units live at journal offset 1 + 64.
        proof.journal[65] = 99;

        let err = verify_proof(&proof).expect_err("tampered journal must fail");
        assert!(matches!(err, ProveError::VerificationFailed(_)));
    }

    #[test]
    fn untrusted_selector_and_image_are_rejected() {
        let mut proof = base_proof(1);
        proof.seal_bytes[0] = 0;
        assert!(matches!(
            verify_proof(&proof),
            Err(ProveError::UntrustedSelector { .. })
        ));

        let mut proof = base_proof(1);
        proof.image_id = [7_u8; IMAGE_ID_LEN];
        assert!(matches!(
            verify_proof(&proof),
            Err(ProveError::ImageMismatch { .. })
        ));
    }

    #[test]
    fn proof_generation_is_deterministic() {
        let first = base_proof(3);
        let second = base_proof(3);

        #[cfg(not(feature = "production-prover"))]
        assert_eq!(first, second);

        #[cfg(feature = "production-prover")]
        {
            assert_eq!(first.journal, second.journal);
            assert_eq!(first.image_id, second.image_id);
        }
    }

    #[test]
    fn binary_and_text_encodings_are_stable() {
        let proof = base_proof(4);

        let bytes = proof.to_bytes().expect("borsh encoding");
        assert_eq!(WorkProof::from_bytes(&bytes).expect("borsh decoding"), proof);

        let text = render_work_proof(&proof).expect("json encoding");
        assert!(text.starts_with("{\"journal\":["));
        assert!(text.contains(",\"seal_bytes\":["));
        assert!(text.contains(",\"image_id\":["));
        assert_eq!(parse_work_proof(&text).expect("json decoding"), proof);
    }

    #[test]
    fn dev_mode_guard_is_fail_closed() {
        let err = prove_work_with_dev_mode(
            DEFAULT_CLUSTER,
            &record(1, b"bonjour"),
            &witness(b"bonjour"),
            Some(OsStr::new("1")),
        )
        .expect_err("dev mode must be rejected");

        assert_eq!(
            err,
            ProveError::DevModeEnabled {
                variable: DEV_MODE_ENV_VAR,
            }
        );
    }

    #[test]
    fn default_cluster_is_allowlisted() {
        let deployment = ensure_allowlisted_deployment(DEFAULT_CLUSTER).unwrap();
        assert_eq!(deployment.cluster, DEFAULT_CLUSTER);
    }

    #[test]
    fn proofs_are_produced_for_the_requested_cluster() {
        let r1 = record(4, b"bonjour");
        let p1 = prove_work_with_dev_mode("devnet", &r1, &witness(b"bonjour"), None)
            .expect("devnet is allowlisted");
        let p2 = verify_chain_with_dev_mode("mainnet-beta", &record(6, b"x"), &p1, None)
            .expect("mainnet-beta is allowlisted");
        assert_eq!(p2.statement().unwrap().aggregate_units().unwrap(), 10);

        let err = prove_work_with_dev_mode("testnet", &r1, &witness(b"bonjour"), None)
            .expect_err("testnet has no deployment");
        assert_eq!(
            err,
            ProveError::ClusterNotAllowlisted {
                cluster: "testnet".to_string(),
            }
        );
        let err = verify_chain_with_dev_mode("testnet", &record(6, b"x"), &p1, None)
            .expect_err("testnet has no deployment");
        assert!(matches!(err, ProveError::ClusterNotAllowlisted { .. }));
    }

    #[test]
    fn deployment_allowlist_rejects_non_allowlisted_cluster() {
        let err = ensure_allowlisted_deployment("testnet")
            .expect_err("non-allowlisted cluster must be rejected");

        assert_eq!(
            err,
            ProveError::ClusterNotAllowlisted {
                cluster: "testnet".to_string(),
            }
        );
    }

    #[test]
    fn guest_id_to_image_id_converts_le_words_correctly() {
        let guest_id: [u32; 8] = [
            0x04030201, 0x08070605, 0x0c0b0a09, 0x100f0e0d,
            0x14131211, 0x18171615, 0x1c1b1a19, 0x201f1e1d,
        ];
        let image_id = guest_id_to_image_id(&guest_id);

        // Each u32 is laid out in LE: 0x04030201 -> [0x01, 0x02, 0x03, 0x04]
        assert_eq!(image_id[0], 0x01);
        assert_eq!(image_id[3], 0x04);
        assert_eq!(image_id[4], 0x05);
        assert_eq!(image_id[31], 0x20);
    }

    #[test]
    fn prove_error_display() {
        assert_eq!(
            ProveError::ProverFailed("out of memory".into()).to_string(),
            "prover failed: out of memory"
        );
        assert_eq!(
            ProveError::ReceiptMissing.to_string(),
            "proof carries no receipt to verify or compose"
        );
    }
}

//! Submission decoding and proof verification.
//!
//! The submission carries the public statement field by field. The program
//! rebuilds the exact journal bytes the prover committed, checks the parts it
//! can check itself, then hands `seal ‖ image_id ‖ sha256(journal)` to the
//! configured verifier program. A failing CPI aborts the transaction.

use crate::errors::RewardError;
use crate::instructions::constants::{SEAL_BYTES_LEN, SEAL_SELECTOR_LEN, TRUSTED_SEAL_SELECTOR};
use crate::state::{RewardConfig, HASH_SIZE};
use agent_work_guest::{ProofJournal, ProofKind, JOURNAL_TOTAL_LEN, WORK_RECORD_LEN};
use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::solana_program::program::invoke;
use sha2::{Digest, Sha256};

/// Public statement and seal of one work proof
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct WorkSubmission {
    /// 0 = base proof, 1 = chained proof
    pub kind: u8,
    pub task_id: [u8; HASH_SIZE],
    pub result_hash: [u8; HASH_SIZE],
    pub compute_units: u64,
    pub timestamp: u64,
    /// Recomputed result hash (base) or aggregated compute total (chained)
    pub public_output: [u8; HASH_SIZE],
    /// Image the chain was built under; zero for base proofs
    pub chain_image_id: [u8; HASH_SIZE],
    /// Selector followed by the Groth16 proof bytes
    pub seal: Vec<u8>,
}

impl WorkSubmission {
    /// Splits a committed journal back into submission fields.
    pub fn from_journal(journal: &ProofJournal, seal: Vec<u8>) -> Self {
        Self {
            kind: journal.kind as u8,
            task_id: journal.record.task_id.to_bytes(),
            result_hash: journal.record.result_hash.to_bytes(),
            compute_units: journal.record.compute_units,
            timestamp: journal.record.timestamp,
            public_output: journal.public_output.to_bytes(),
            chain_image_id: journal.chain_image_id,
            seal,
        }
    }

    /// Rebuilds the journal bytes in committed order.
    pub fn journal_bytes(&self) -> [u8; JOURNAL_TOTAL_LEN] {
        let mut out = [0u8; JOURNAL_TOTAL_LEN];
        let record = 1;
        let output = record + WORK_RECORD_LEN;
        let image = output + HASH_SIZE;

        out[0] = self.kind;
        out[record..record + 32].copy_from_slice(&self.task_id);
        out[record + 32..record + 64].copy_from_slice(&self.result_hash);
        out[record + 64..record + 72].copy_from_slice(&self.compute_units.to_le_bytes());
        out[record + 72..output].copy_from_slice(&self.timestamp.to_le_bytes());
        out[output..image].copy_from_slice(&self.public_output);
        out[image..].copy_from_slice(&self.chain_image_id);
        out
    }
}

/// Checks everything about a submission that does not need the verifier.
/// Returns the decoded statement.
pub fn validate_submission(
    config: &RewardConfig,
    submission: &WorkSubmission,
) -> Result<ProofJournal> {
    let journal = ProofJournal::from_bytes(&submission.journal_bytes()).map_err(|err| {
        msg!("Rejected submission: {}", err);
        error!(RewardError::MalformedSubmission)
    })?;

    require!(
        !journal.record.task_id.is_zero(),
        RewardError::MalformedSubmission
    );

    require!(
        submission.seal.len() == SEAL_BYTES_LEN
            && submission.seal[..SEAL_SELECTOR_LEN] == TRUSTED_SEAL_SELECTOR,
        RewardError::UntrustedSealSelector
    );

    if journal.kind == ProofKind::Chained {
        require!(
            journal.chain_image_id == config.work_image_id,
            RewardError::ChainImageMismatch
        );
    }

    Ok(journal)
}

/// Instruction data for the verifier: seal, image id, journal digest.
pub fn verifier_instruction_data(
    seal: &[u8],
    image_id: &[u8; HASH_SIZE],
    journal: &[u8; JOURNAL_TOTAL_LEN],
) -> Vec<u8> {
    let digest: [u8; HASH_SIZE] = Sha256::digest(journal).into();
    let mut data = Vec::with_capacity(seal.len() + HASH_SIZE * 2);
    data.extend_from_slice(seal);
    data.extend_from_slice(image_id);
    data.extend_from_slice(&digest);
    data
}

/// Verify the seal via CPI to the configured verifier program
pub fn verify_seal<'info>(
    verifier: &UncheckedAccount<'info>,
    config: &RewardConfig,
    submission: &WorkSubmission,
) -> Result<()> {
    require_keys_eq!(
        verifier.key(),
        config.verifier_program,
        RewardError::InvalidVerifierProgram
    );

    let journal = submission.journal_bytes();
    msg!(
        "Verifying work proof: kind={} units={}",
        submission.kind,
        submission.compute_units
    );

    let ix = Instruction {
        program_id: verifier.key(),
        accounts: vec![],
        data: verifier_instruction_data(&submission.seal, &config.work_image_id, &journal),
    };

    invoke(&ix, &[]).map_err(|_| error!(RewardError::ProofVerificationFailed))?;

    msg!("Work proof verified");
    Ok(())
}

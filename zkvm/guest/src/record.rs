use crate::commitment::{hash_work, FieldElement, FieldError, FIELD_ELEMENT_LEN};
use crate::journal::JournalError;

pub const WORK_RECORD_LEN: usize = FIELD_ELEMENT_LEN * 2 + 8 + 8;

/// Public summary of one unit of off-ledger work. The public input of
/// exactly one proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkRecord {
    pub task_id: FieldElement,
    pub result_hash: FieldElement,
    pub compute_units: u64,
    pub timestamp: u64,
}

/// Private inputs of the base relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkWitness {
    pub model_commitment: FieldElement,
    pub input_commitment: FieldElement,
    pub output_value: FieldElement,
}

impl WorkWitness {
    pub fn result_hash(&self) -> FieldElement {
        hash_work(
            &self.model_commitment,
            &self.input_commitment,
            &self.output_value,
        )
    }
}

impl WorkRecord {
    pub fn new(
        task_id: FieldElement,
        result_hash: FieldElement,
        compute_units: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            task_id,
            result_hash,
            compute_units,
            timestamp,
        }
    }

    /// Builds a record whose result hash is derived from `witness`.
    pub fn bind(
        task_id: FieldElement,
        witness: &WorkWitness,
        compute_units: u64,
        timestamp: u64,
    ) -> Self {
        Self::new(task_id, witness.result_hash(), compute_units, timestamp)
    }

    pub fn to_bytes(&self) -> [u8; WORK_RECORD_LEN] {
        let mut out = [0_u8; WORK_RECORD_LEN];
        out[0..32].copy_from_slice(self.task_id.as_bytes());
        out[32..64].copy_from_slice(self.result_hash.as_bytes());
        out[64..72].copy_from_slice(&self.compute_units.to_le_bytes());
        out[72..80].copy_from_slice(&self.timestamp.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, JournalError> {
        if bytes.len() != WORK_RECORD_LEN {
            return Err(JournalError::InvalidLength {
                expected: WORK_RECORD_LEN,
                actual: bytes.len(),
            });
        }

        let task_id = field("task_id", &bytes[0..32])?;
        let result_hash = field("result_hash", &bytes[32..64])?;
        let mut units = [0_u8; 8];
        units.copy_from_slice(&bytes[64..72]);
        let mut timestamp = [0_u8; 8];
        timestamp.copy_from_slice(&bytes[72..80]);

        Ok(Self {
            task_id,
            result_hash,
            compute_units: u64::from_le_bytes(units),
            timestamp: u64::from_le_bytes(timestamp),
        })
    }
}

pub(crate) fn field(name: &'static str, bytes: &[u8]) -> Result<FieldElement, JournalError> {
    FieldElement::from_slice(bytes).map_err(|err| match err {
        FieldError::InvalidLength { expected, actual } => JournalError::InvalidLength { expected, actual },
        _ => JournalError::NonCanonicalField { field: name },
    })
}

use core::fmt;

use crate::commitment::{FieldElement, FIELD_ELEMENT_LEN};
use crate::record::{field, WorkRecord, WORK_RECORD_LEN};

pub const IMAGE_ID_LEN: usize = 32;
pub const JOURNAL_TOTAL_LEN: usize = 1 + WORK_RECORD_LEN + FIELD_ELEMENT_LEN + IMAGE_ID_LEN;

const RECORD_OFFSET: usize = 1;
const OUTPUT_OFFSET: usize = RECORD_OFFSET + WORK_RECORD_LEN;
const IMAGE_OFFSET: usize = OUTPUT_OFFSET + FIELD_ELEMENT_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProofKind {
    Base = 0,
    Chained = 1,
}

impl TryFrom<u8> for ProofKind {
    type Error = JournalError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Base),
            1 => Ok(Self::Chained),
            other => Err(JournalError::UnknownKind(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalError {
    InvalidLength { expected: usize, actual: usize },
    UnknownKind(u8),
    NonCanonicalField { field: &'static str },
    MalformedAggregate,
    UnexpectedChainImage,
}

impl fmt::Display for JournalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { expected, actual } => {
                write!(f, "invalid journal length: expected {expected}, got {actual}")
            }
            Self::UnknownKind(kind) => write!(f, "unknown proof kind {kind}"),
            Self::NonCanonicalField { field } => write!(f, "{field} is not a canonical field element"),
            Self::MalformedAggregate => write!(f, "chained output is not a compute total"),
            Self::UnexpectedChainImage => write!(f, "base proof carries a chain image id"),
        }
    }
}

/// Public statement committed by one proof: the record it is about, the
/// derived public output and, for chained proofs, the image that produced
/// the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofJournal {
    pub kind: ProofKind,
    pub record: WorkRecord,
    pub public_output: FieldElement,
    pub chain_image_id: [u8; IMAGE_ID_LEN],
}

impl ProofJournal {
    pub fn base(record: WorkRecord, public_output: FieldElement) -> Self {
        Self {
            kind: ProofKind::Base,
            record,
            public_output,
            chain_image_id: [0_u8; IMAGE_ID_LEN],
        }
    }

    pub fn chained(
        record: WorkRecord,
        total_units: u128,
        chain_image_id: [u8; IMAGE_ID_LEN],
    ) -> Self {
        Self {
            kind: ProofKind::Chained,
            record,
            public_output: FieldElement::from_u128(total_units),
            chain_image_id,
        }
    }

    /// Compute units attested by this proof and everything it composes.
    pub fn aggregate_units(&self) -> Result<u128, JournalError> {
        match self.kind {
            ProofKind::Base => Ok(u128::from(self.record.compute_units)),
            ProofKind::Chained => self
                .public_output
                .to_u128()
                .map_err(|_| JournalError::MalformedAggregate),
        }
    }

    pub fn to_bytes(&self) -> [u8; JOURNAL_TOTAL_LEN] {
        let mut out = [0_u8; JOURNAL_TOTAL_LEN];
        out[0] = self.kind as u8;
        out[RECORD_OFFSET..OUTPUT_OFFSET].copy_from_slice(&self.record.to_bytes());
        out[OUTPUT_OFFSET..IMAGE_OFFSET].copy_from_slice(self.public_output.as_bytes());
        out[IMAGE_OFFSET..].copy_from_slice(&self.chain_image_id);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, JournalError> {
        if bytes.len() != JOURNAL_TOTAL_LEN {
            return Err(JournalError::InvalidLength {
                expected: JOURNAL_TOTAL_LEN,
                actual: bytes.len(),
            });
        }

        let kind = ProofKind::try_from(bytes[0])?;
        let record = WorkRecord::from_bytes(&bytes[RECORD_OFFSET..OUTPUT_OFFSET])?;
        let public_output = field("public_output", &bytes[OUTPUT_OFFSET..IMAGE_OFFSET])?;
        let mut chain_image_id = [0_u8; IMAGE_ID_LEN];
        chain_image_id.copy_from_slice(&bytes[IMAGE_OFFSET..]);

        if kind == ProofKind::Base && chain_image_id != [0_u8; IMAGE_ID_LEN] {
            return Err(JournalError::UnexpectedChainImage);
        }

        Ok(Self {
            kind,
            record,
            public_output,
            chain_image_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::commit;

    fn record(units: u64) -> WorkRecord {
        WorkRecord::new(commit(b"task"), commit(b"result"), units, 42)
    }

    #[test]
    fn journal_output_length_is_exact() {
        assert_eq!(WORK_RECORD_LEN, 80);
        assert_eq!(JOURNAL_TOTAL_LEN, 145);

        let journal = ProofJournal::base(record(3), commit(b"result"));
        assert_eq!(journal.to_bytes().len(), JOURNAL_TOTAL_LEN);
    }

    #[test]
    fn journal_field_order_matches_schema_offsets() {
        let journal = ProofJournal::chained(record(5), 15, [9_u8; IMAGE_ID_LEN]);
        let bytes = journal.to_bytes();

        assert_eq!(bytes[0], ProofKind::Chained as u8);
        assert_eq!(&bytes[1..81], &journal.record.to_bytes());
        assert_eq!(&bytes[81..113], journal.public_output.as_bytes());
        assert_eq!(&bytes[113..145], &[9_u8; IMAGE_ID_LEN]);
        assert_eq!(ProofJournal::from_bytes(&bytes), Ok(journal));
    }

    #[test]
    fn aggregate_units_follow_kind() {
        assert_eq!(ProofJournal::base(record(10), commit(b"x")).aggregate_units(), Ok(10));
        assert_eq!(
            ProofJournal::chained(record(5), 15, [1_u8; IMAGE_ID_LEN]).aggregate_units(),
            Ok(15)
        );

        let mut forged = ProofJournal::chained(record(5), 0, [1_u8; IMAGE_ID_LEN]);
        forged.public_output = commit(b"not a number");
        assert_eq!(forged.aggregate_units(), Err(JournalError::MalformedAggregate));
    }

    #[test]
    fn malformed_input_is_rejected() {
        let mut bytes = ProofJournal::base(record(1), commit(b"y")).to_bytes();

        let err = ProofJournal::from_bytes(&bytes[..JOURNAL_TOTAL_LEN - 1])
            .expect_err("short journal must fail");
        assert_eq!(
            err,
            JournalError::InvalidLength {
                expected: JOURNAL_TOTAL_LEN,
                actual: JOURNAL_TOTAL_LEN - 1,
            }
        );

        bytes[0] = 7;
        assert_eq!(ProofJournal::from_bytes(&bytes), Err(JournalError::UnknownKind(7)));

        bytes[0] = ProofKind::Base as u8;
        bytes[JOURNAL_TOTAL_LEN - 1] = 1;
        assert_eq!(
            ProofJournal::from_bytes(&bytes),
            Err(JournalError::UnexpectedChainImage)
        );
    }
}

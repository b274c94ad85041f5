//! Field-element commitments over arbitrary byte strings.
//!
//! A commitment is a SHA-256 chain over a length block followed by 31-byte
//! limbs, reduced into the canonical range of a 253-bit field element. The
//! same code runs natively on the prover host and inside the zkVM guest.

use core::fmt;

use sha2::{Digest, Sha256};

pub const FIELD_ELEMENT_LEN: usize = 32;

/// Payload bytes per limb. One byte of headroom keeps each limb below the
/// field modulus regardless of content.
pub const LIMB_LEN: usize = FIELD_ELEMENT_LEN - 1;

/// Bits cleared from the most significant byte so every digest is a
/// canonical element below 2^253.
const CANONICAL_MASK: u8 = 0x1f;

const TAG_LENGTH: u8 = 0x01;
const TAG_NODE: u8 = 0x02;
const TAG_WORK: u8 = 0x03;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    NonCanonical,
    InvalidLength { expected: usize, actual: usize },
    ExceedsU128,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonCanonical => write!(f, "field element is not canonical"),
            Self::InvalidLength { expected, actual } => {
                write!(f, "field element must be {expected} bytes, got {actual}")
            }
            Self::ExceedsU128 => write!(f, "field element does not fit in 128 bits"),
        }
    }
}

/// Big-endian 32-byte field element with the top three bits clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldElement([u8; FIELD_ELEMENT_LEN]);

impl FieldElement {
    pub const ZERO: Self = Self([0_u8; FIELD_ELEMENT_LEN]);

    pub fn from_bytes(bytes: [u8; FIELD_ELEMENT_LEN]) -> Result<Self, FieldError> {
        if bytes[0] & !CANONICAL_MASK != 0 {
            return Err(FieldError::NonCanonical);
        }
        Ok(Self(bytes))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, FieldError> {
        let array: [u8; FIELD_ELEMENT_LEN] =
            bytes.try_into().map_err(|_| FieldError::InvalidLength {
                expected: FIELD_ELEMENT_LEN,
                actual: bytes.len(),
            })?;
        Self::from_bytes(array)
    }

    pub fn from_u64(value: u64) -> Self {
        Self::from_u128(u128::from(value))
    }

    pub fn from_u128(value: u128) -> Self {
        let mut out = [0_u8; FIELD_ELEMENT_LEN];
        out[16..].copy_from_slice(&value.to_be_bytes());
        Self(out)
    }

    pub fn to_u128(&self) -> Result<u128, FieldError> {
        if self.0[..16].iter().any(|byte| *byte != 0) {
            return Err(FieldError::ExceedsU128);
        }
        let mut low = [0_u8; 16];
        low.copy_from_slice(&self.0[16..]);
        Ok(u128::from_be_bytes(low))
    }

    pub fn to_bytes(&self) -> [u8; FIELD_ELEMENT_LEN] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; FIELD_ELEMENT_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0_u8; FIELD_ELEMENT_LEN]
    }

    fn reduce(mut digest: [u8; FIELD_ELEMENT_LEN]) -> Self {
        digest[0] &= CANONICAL_MASK;
        Self(digest)
    }

    /// Packs up to [`LIMB_LEN`] bytes into one element, zero padded on the
    /// right. Wider input is a caller bug.
    fn limb(chunk: &[u8]) -> Self {
        assert!(
            chunk.len() <= LIMB_LEN,
            "limb of {} bytes exceeds {LIMB_LEN}",
            chunk.len()
        );
        let mut out = [0_u8; FIELD_ELEMENT_LEN];
        out[1..1 + chunk.len()].copy_from_slice(chunk);
        Self(out)
    }
}

fn tagged_hash(tag: u8, parts: &[&[u8; FIELD_ELEMENT_LEN]]) -> FieldElement {
    let mut hasher = Sha256::new();
    hasher.update([tag]);
    for part in parts {
        hasher.update(part.as_slice());
    }
    FieldElement::reduce(hasher.finalize().into())
}

/// Deterministic commitment to an arbitrary byte string.
pub fn commit(bytes: &[u8]) -> FieldElement {
    let mut length_block = [0_u8; FIELD_ELEMENT_LEN];
    length_block[..8].copy_from_slice(&(bytes.len() as u64).to_le_bytes());
    let mut state = tagged_hash(TAG_LENGTH, &[&length_block]);

    for chunk in bytes.chunks(LIMB_LEN) {
        let limb = FieldElement::limb(chunk);
        state = tagged_hash(TAG_NODE, &[state.as_bytes(), limb.as_bytes()]);
    }
    state
}

/// Arity-3 hash binding a model, an input and an output into a result hash.
pub fn hash_work(
    model_commitment: &FieldElement,
    input_commitment: &FieldElement,
    output_value: &FieldElement,
) -> FieldElement {
    tagged_hash(
        TAG_WORK,
        &[
            model_commitment.as_bytes(),
            input_commitment.as_bytes(),
            output_value.as_bytes(),
        ],
    )
}

/// Verification failures surfaced to callers.
///
/// These are returned as values; adversarial inputs never panic past the
/// decoding layer. Length mismatches, rings that are not a power of two,
/// and similar API misuse are programmer errors and panic instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// The Dory scalar-product base case failed.
    #[error("proof invalid")]
    InvalidProof,

    /// The first Dory reduction of a ring signature did not verify.
    #[error("first Dory proof invalid")]
    FirstDoryProof,

    /// The second Dory reduction of a ring signature did not verify.
    #[error("second Dory proof invalid")]
    SecondDoryProof,

    /// The sigma check on the tag relation failed.
    #[error("tag proof mismatch")]
    TagMismatch,

    /// The sigma check on the Pedersen commitment failed.
    #[error("commitment proof mismatch")]
    CommitmentMismatch,

    /// A threshold signature set contained duplicated linkability tags.
    #[error("signature set was signed by {distinct} out of {total} distinct signers")]
    DuplicateTags { distinct: usize, total: usize },
}

/// Errors produced while decoding untrusted signature or proof bytes.
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    /// The outer DER structure could not be parsed.
    #[error("malformed DER structure: {0}")]
    Der(#[from] der::Error),

    /// A group element or scalar failed canonical deserialization,
    /// including subgroup validation.
    #[error("invalid group element encoding")]
    InvalidElement,

    /// A DER sequence held the wrong number of entries.
    #[error("unexpected field count in {context}: expected {expected}, got {actual}")]
    FieldCount {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
}

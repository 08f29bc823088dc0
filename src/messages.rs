//! Reduction round messages.
//!
//! Each round of the Dory reduction exchanges two bundles. The first
//! carries the cross commitments of the current witness against the
//! half-length generators, bound to the level digest and the running
//! commitment; its digest yields the challenge β. The second carries the
//! plus/minus cross commitments of the β-combined witness, bound to the
//! first bundle's digest; its digest yields α.

use crate::curve::{element_bytes, Gt, Scalar};
use crate::transcript::{self, TranscriptDigest};

/// First prover message of a reduction round.
#[derive(Clone, Debug)]
pub struct ReduceStep1 {
    /// Digest of the level's public parameters.
    pub pp_digest: TranscriptDigest,
    /// Running commitment C at this level.
    pub c: Gt,
    /// Running commitment D1 at this level.
    pub d1: Gt,
    /// Running commitment D2 at this level.
    pub d2: Gt,
    /// D1L = ⟨v1[..m], Γ2'⟩
    pub d1l: Gt,
    /// D1R = ⟨v1[m..], Γ2'⟩
    pub d1r: Gt,
    /// D2L = ⟨Γ1', v2[..m]⟩
    pub d2l: Gt,
    /// D2R = ⟨Γ1', v2[m..]⟩
    pub d2r: Gt,
}

impl ReduceStep1 {
    /// Digest over the canonical field order.
    pub fn digest(&self) -> TranscriptDigest {
        let d1l = element_bytes(&self.d1l);
        let d1r = element_bytes(&self.d1r);
        let d2l = element_bytes(&self.d2l);
        let d2r = element_bytes(&self.d2r);
        let c = element_bytes(&self.c);
        let d1 = element_bytes(&self.d1);
        let d2 = element_bytes(&self.d2);
        transcript::digest(&[&self.pp_digest, &d1l, &d1r, &d2l, &d2r, &c, &d1, &d2])
    }

    /// The round challenge β.
    pub fn challenge(&self) -> Scalar {
        transcript::scalar_from_digest(&self.digest())
    }
}

/// Second prover message of a reduction round.
///
/// Carrying the first bundle's digest as a mandatory field makes the
/// transcript chaining unforgettable: the struct cannot be built without
/// it.
#[derive(Clone, Debug)]
pub struct ReduceStep2 {
    /// Digest of the round's [`ReduceStep1`].
    pub step1_digest: TranscriptDigest,
    /// C+ = ⟨v1*[..m], v2*[m..]⟩
    pub c_plus: Gt,
    /// C− = ⟨v1*[m..], v2*[..m]⟩
    pub c_minus: Gt,
}

impl ReduceStep2 {
    /// Digest over the canonical field order.
    pub fn digest(&self) -> TranscriptDigest {
        let c_plus = element_bytes(&self.c_plus);
        let c_minus = element_bytes(&self.c_minus);
        transcript::digest(&[&c_plus, &c_minus, &self.step1_digest])
    }

    /// The round challenge α.
    pub fn challenge(&self) -> Scalar {
        transcript::scalar_from_digest(&self.digest())
    }
}

//! Linkability tags and the tag proof.
//!
//! A signer's secret key `sk` is hidden inside a Pedersen commitment
//! `com = sk·g1 + r·H` and exposed deterministically per epoch as the tag
//! `T = sk·HashToG1(SHA256(prefix))`. The proof is a two-relation sigma
//! protocol showing that `com` and `T` share the same `sk`, with its
//! challenge bound to caller-supplied context bytes so the proof cannot be
//! transplanted into another transcript.

use ark_std::UniformRand;
use der::asn1::OctetString;
use der::{Decode, Encode, Sequence};
use rand_core::RngCore;
use sha2::{Digest, Sha256};

use crate::curve::{blinding_generator, element_bytes, g1_generator, hash_to_g1, Scalar, G1};
use crate::error::{EncodingError, VerifyError};
use crate::proof::{decode_element, octet};
use crate::transcript;

/// The commitment randomness. Required to open a tag proof; never leaves
/// the signer.
#[derive(Clone, Debug)]
pub struct TagWitness {
    r: Scalar,
}

impl TagWitness {
    pub(crate) fn r(&self) -> &Scalar {
        &self.r
    }
}

/// Sigma-protocol transcript for the tag relation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagProof {
    /// Nonce commitment on the tag base.
    pub a: G1,
    /// Nonce commitment on the Pedersen bases.
    pub b: G1,
    /// Response for the secret key.
    pub za: Scalar,
    /// Response for the commitment randomness.
    pub zb: Scalar,
}

/// Commit to a secret key: `com = sk·g1 + r·H` with fresh randomness `r`.
pub fn commit<R: RngCore>(sk: &Scalar, rng: &mut R) -> (TagWitness, G1) {
    let r = Scalar::rand(rng);
    let com = g1_generator() * *sk + blinding_generator() * r;
    (TagWitness { r }, com)
}

/// The deterministic per-epoch tag `sk·HashToG1(SHA256(prefix))`.
pub fn tag(sk: &Scalar, prefix: &[u8]) -> G1 {
    prefix_base(prefix) * *sk
}

/// Prove that the tag and the commitment open to the same secret key.
///
/// `extras` is arbitrary context folded into the challenge; verification
/// must present the identical sequence.
pub fn prove<R: RngCore>(
    prefix: &[u8],
    sk: &Scalar,
    witness: &TagWitness,
    extras: &[&[u8]],
    rng: &mut R,
) -> TagProof {
    let ar = Scalar::rand(rng);
    let br = Scalar::rand(rng);

    let a = prefix_base(prefix) * ar;
    let b = g1_generator() * ar + blinding_generator() * br;

    let c = challenge(&a, &b, extras);

    TagProof {
        a,
        b,
        za: ar + *sk * c,
        zb: br + witness.r * c,
    }
}

impl TagProof {
    /// Verify against a tag, a commitment, the epoch prefix and the same
    /// context bytes used when proving.
    pub fn verify(
        &self,
        tag: &G1,
        com: &G1,
        prefix: &[u8],
        extras: &[&[u8]],
    ) -> Result<(), VerifyError> {
        let c = challenge(&self.a, &self.b, extras);

        if prefix_base(prefix) * self.za != *tag * c + self.a {
            return Err(VerifyError::TagMismatch);
        }

        if g1_generator() * self.za + blinding_generator() * self.zb != self.b + *com * c {
            return Err(VerifyError::CommitmentMismatch);
        }

        Ok(())
    }

    /// DER-encode as a SEQUENCE of four OCTET STRINGs `(A, B, Za, Zb)`.
    pub fn to_bytes(&self) -> Vec<u8> {
        RawTagProof {
            a: octet(element_bytes(&self.a)),
            b: octet(element_bytes(&self.b)),
            za: octet(element_bytes(&self.za)),
            zb: octet(element_bytes(&self.zb)),
        }
        .to_der()
        .expect("DER encoding of a well-formed structure")
    }

    /// Decode from the wire encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        let raw = RawTagProof::from_der(bytes)?;
        Ok(TagProof {
            a: decode_element(&raw.a)?,
            b: decode_element(&raw.b)?,
            za: decode_element(&raw.za)?,
            zb: decode_element(&raw.zb)?,
        })
    }
}

#[derive(Sequence)]
struct RawTagProof {
    a: OctetString,
    b: OctetString,
    za: OctetString,
    zb: OctetString,
}

/// The epoch base point `HashToG1(SHA256(prefix))`.
fn prefix_base(prefix: &[u8]) -> G1 {
    hash_to_g1(Sha256::digest(prefix).as_slice())
}

fn challenge(a: &G1, b: &G1, extras: &[&[u8]]) -> Scalar {
    let a_bytes = element_bytes(a);
    let b_bytes = element_bytes(b);
    let mut parts: Vec<&[u8]> = Vec::with_capacity(2 + extras.len());
    parts.push(&a_bytes);
    parts.push(&b_bytes);
    parts.extend_from_slice(extras);
    transcript::challenge_scalar(&parts)
}

//! The Dory reduction proof object and its wire format.
//!
//! A proof is the ordered list of per-round message bundles plus the
//! base-case pair `(E1, E2)`. Its digest - SHA-256 over the DER encoding -
//! is cached at construction and binds the proof into the tag proof's
//! transcript.
//!
//! The wire format is a DER SEQUENCE of three fields: the step-1 bundles as
//! a SEQUENCE OF SEQUENCE OF OCTET STRING (eight entries per round), the
//! step-2 bundles likewise (two entries per round), and one OCTET STRING
//! holding the DER-encoded base-case pair. No public parameters are ever
//! transmitted; the verifier rebuilds them from the agreed chain.

use ark_ff::{Field, Zero};
use ark_serialize::CanonicalDeserialize;
use ark_std::UniformRand;
use der::asn1::OctetString;
use der::{Decode, Encode, Sequence};
use rand::rngs::OsRng;

use crate::curve::{element_bytes, gt_exp, pairing, Scalar, G1, G2};
use crate::error::{EncodingError, VerifyError};
use crate::messages::{ReduceStep1, ReduceStep2};
use crate::reduce::Commitment;
use crate::setup::PublicParams;
use crate::transcript::{self, TranscriptDigest};

/// Base-case scalar-product proof: the fully reduced witness pair.
#[derive(Clone, Debug)]
pub struct ScalarProductElements {
    /// The length-1 remainder of v1.
    pub e1: G1,
    /// The length-1 remainder of v2.
    pub e2: G2,
}

impl ScalarProductElements {
    /// Check the scalar-product relation against a length-1 commitment.
    ///
    /// Draws a fresh verifier-local challenge `d` and folds the four
    /// pairing relations into one:
    /// `e(E1 + d·Γ1, E2 + d⁻¹·Γ2) = χ · C · D2^d · D1^(1/d)`.
    ///
    /// The challenge is local randomness rather than Fiat-Shamir, matching
    /// the interactive protocol where the verifier samples `d` honestly.
    pub fn verify(&self, pp: &PublicParams, cmt: &Commitment) -> Result<(), VerifyError> {
        assert_eq!(pp.size(), 1, "scalar-product check requires base-level parameters");

        let mut rng = OsRng;
        let d = loop {
            let d = Scalar::rand(&mut rng);
            if !d.is_zero() {
                break d;
            }
        };
        let d_inv = d.inverse().expect("nonzero challenge is invertible");

        let left = pairing(
            &(self.e1 + pp.gamma1.0[0] * d),
            &(self.e2 + pp.gamma2.0[0] * d_inv),
        );
        let right = pp.chi + cmt.c + gt_exp(&cmt.d2, &d) + gt_exp(&cmt.d1, &d_inv);

        if left == right {
            Ok(())
        } else {
            Err(VerifyError::InvalidProof)
        }
    }
}

/// A complete non-interactive Dory reduction proof.
#[derive(Clone, Debug)]
pub struct DoryProof {
    /// First message of every round, largest level first.
    pub step1: Vec<ReduceStep1>,
    /// Second message of every round, largest level first.
    pub step2: Vec<ReduceStep2>,
    /// The base-case pair.
    pub scalar_product: ScalarProductElements,
    digest: TranscriptDigest,
}

impl DoryProof {
    pub(crate) fn new(
        step1: Vec<ReduceStep1>,
        step2: Vec<ReduceStep2>,
        scalar_product: ScalarProductElements,
    ) -> Self {
        assert_eq!(step1.len(), step2.len(), "unbalanced round messages");
        let mut proof = DoryProof {
            step1,
            step2,
            scalar_product,
            digest: [0u8; 32],
        };
        proof.digest = transcript::digest(&[&proof.to_bytes()]);
        proof
    }

    /// Number of reduction rounds recorded in the proof.
    pub fn rounds(&self) -> usize {
        self.step1.len()
    }

    /// SHA-256 over the proof's wire encoding, cached at construction.
    pub fn digest(&self) -> &TranscriptDigest {
        &self.digest
    }

    /// DER-encode the proof.
    pub fn to_bytes(&self) -> Vec<u8> {
        let raw = RawDoryProof {
            step1: self.step1.iter().map(step1_octets).collect(),
            step2: self.step2.iter().map(step2_octets).collect(),
            scalar_product: octet(
                RawScalarProduct {
                    e1: octet(element_bytes(&self.scalar_product.e1)),
                    e2: octet(element_bytes(&self.scalar_product.e2)),
                }
                .to_der()
                .expect("DER encoding of a well-formed structure"),
            ),
        };
        raw.to_der().expect("DER encoding of a well-formed structure")
    }

    /// Decode a proof from its wire encoding, validating every element.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        let raw = RawDoryProof::from_der(bytes)?;
        if raw.step1.len() != raw.step2.len() {
            return Err(EncodingError::FieldCount {
                context: "reduction rounds",
                expected: raw.step1.len(),
                actual: raw.step2.len(),
            });
        }

        let step1 = raw
            .step1
            .iter()
            .map(|fields| parse_step1(fields))
            .collect::<Result<Vec<_>, _>>()?;
        let step2 = raw
            .step2
            .iter()
            .map(|fields| parse_step2(fields))
            .collect::<Result<Vec<_>, _>>()?;

        let sp = RawScalarProduct::from_der(raw.scalar_product.as_bytes())?;
        let scalar_product = ScalarProductElements {
            e1: decode_element(&sp.e1)?,
            e2: decode_element(&sp.e2)?,
        };

        Ok(DoryProof::new(step1, step2, scalar_product))
    }
}

#[derive(Sequence)]
struct RawDoryProof {
    step1: Vec<Vec<OctetString>>,
    step2: Vec<Vec<OctetString>>,
    scalar_product: OctetString,
}

#[derive(Sequence)]
struct RawScalarProduct {
    e1: OctetString,
    e2: OctetString,
}

const STEP1_FIELDS: usize = 8;
const STEP2_FIELDS: usize = 2;

fn step1_octets(step: &ReduceStep1) -> Vec<OctetString> {
    vec![
        octet(step.pp_digest.to_vec()),
        octet(element_bytes(&step.d1l)),
        octet(element_bytes(&step.d1r)),
        octet(element_bytes(&step.d2l)),
        octet(element_bytes(&step.d2r)),
        octet(element_bytes(&step.c)),
        octet(element_bytes(&step.d1)),
        octet(element_bytes(&step.d2)),
    ]
}

fn step2_octets(step: &ReduceStep2) -> Vec<OctetString> {
    vec![
        octet(element_bytes(&step.c_plus)),
        octet(element_bytes(&step.c_minus)),
    ]
}

fn parse_step1(fields: &[OctetString]) -> Result<ReduceStep1, EncodingError> {
    if fields.len() != STEP1_FIELDS {
        return Err(EncodingError::FieldCount {
            context: "step-1 bundle",
            expected: STEP1_FIELDS,
            actual: fields.len(),
        });
    }
    Ok(ReduceStep1 {
        pp_digest: decode_digest(&fields[0])?,
        d1l: decode_element(&fields[1])?,
        d1r: decode_element(&fields[2])?,
        d2l: decode_element(&fields[3])?,
        d2r: decode_element(&fields[4])?,
        c: decode_element(&fields[5])?,
        d1: decode_element(&fields[6])?,
        d2: decode_element(&fields[7])?,
    })
}

fn parse_step2(fields: &[OctetString]) -> Result<ReduceStep2, EncodingError> {
    if fields.len() != STEP2_FIELDS {
        return Err(EncodingError::FieldCount {
            context: "step-2 bundle",
            expected: STEP2_FIELDS,
            actual: fields.len(),
        });
    }
    Ok(ReduceStep2 {
        // The verifier rebinds this digest from its own transcript; the
        // placeholder never reaches a challenge derivation.
        step1_digest: [0u8; 32],
        c_plus: decode_element(&fields[0])?,
        c_minus: decode_element(&fields[1])?,
    })
}

pub(crate) fn octet(bytes: Vec<u8>) -> OctetString {
    OctetString::new(bytes).expect("octet string length fits DER")
}

pub(crate) fn decode_element<T: CanonicalDeserialize>(
    os: &OctetString,
) -> Result<T, EncodingError> {
    T::deserialize_compressed(os.as_bytes()).map_err(|_| EncodingError::InvalidElement)
}

pub(crate) fn decode_digest(os: &OctetString) -> Result<TranscriptDigest, EncodingError> {
    os.as_bytes()
        .try_into()
        .map_err(|_| EncodingError::InvalidElement)
}

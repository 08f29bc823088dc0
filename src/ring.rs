//! Linkable threshold ring signatures.
//!
//! The outer protocol is a DualRing-style one-out-of-n sigma argument: the
//! signer draws `n − 1` random challenge shares, derives the transcript
//! hash `h`, and splices its own share in so that the shares sum to `h`.
//! Two Dory reductions compress the `n`-sized checks - that the challenge
//! shares open the ring against the tag commitment, and that the blinding
//! relation holds - into logarithmic proofs, and the tag proof binds both
//! proof digests together with the message.
//!
//! Rings must have power-of-two length. The preprocessed ring material and
//! the parameter chain are immutable and may be shared freely across
//! concurrent signers and verifiers.

use std::collections::HashSet;
use std::panic;
use std::sync::OnceLock;
use std::thread;

use ark_std::UniformRand;
use der::asn1::OctetString;
use der::{Decode, Encode, Sequence};
use rand_core::RngCore;
use sha2::{Digest, Sha256};

use crate::algebra::{G1Vector, G2Vector};
use crate::curve::{
    blinding_generator, element_bytes, g1_generator, g2_generator, msm_g1, pairing, Scalar, G1,
    G2, Gt,
};
use crate::error::{EncodingError, VerifyError};
use crate::proof::{decode_element, octet, DoryProof};
use crate::reduce::{reduce, verify_reduce, Commitment, Witness};
use crate::setup::ParamChain;
use crate::tag::{self, TagProof, TagWitness};
use crate::transcript::{self, TranscriptDigest};

/// A ring member's private key.
#[derive(Clone)]
pub struct PrivateKey(Scalar);

/// A ring member's public key, `sk·g1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey(pub(crate) G1);

/// The anonymity set: an ordered sequence of public keys.
#[derive(Clone, Debug)]
pub struct Ring(pub Vec<PublicKey>);

/// Generate a fresh key pair.
pub fn keygen<R: RngCore>(rng: &mut R) -> (PublicKey, PrivateKey) {
    let sk = Scalar::rand(rng);
    (PublicKey(g1_generator() * sk), PrivateKey(sk))
}

impl PrivateKey {
    /// The matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(g1_generator() * self.0)
    }

    /// Position of this key's public key in the ring.
    ///
    /// Panics when absent: signing with a key outside the ring is a caller
    /// bug, not an adversarial input.
    fn locate(&self, ring: &Ring) -> usize {
        let pk = g1_generator() * self.0;
        ring.0
            .iter()
            .position(|member| member.0 == pk)
            .expect("signer's public key not found in the ring")
    }
}

impl Ring {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn to_g1_vector(&self) -> G1Vector {
        G1Vector(self.0.iter().map(|pk| pk.0).collect())
    }
}

/// Ring-dependent material computed once and reused for every signature
/// over the same `(chain, ring)` pair.
#[derive(Clone, Debug)]
pub struct PreProcessed {
    /// Inverse of the ring inner product `A0 = ⟨ring, Γ2⟩`.
    pub a0_inverse: Gt,
    /// Commitment to the constant blinding vector, `D = ⟨H1, Γ2⟩`.
    pub d: Gt,
    /// Γ̄2 = Σ Γ2.
    pub gamma2_sum: G2,
    /// The constant vector `(H, …, H)` of ring length.
    pub h1: G1Vector,
    digest: TranscriptDigest,
}

impl PreProcessed {
    /// Digest binding this ring to its parameter chain.
    pub fn digest(&self) -> &TranscriptDigest {
        &self.digest
    }
}

/// Precompute the ring-dependent parameters.
#[tracing::instrument(skip_all, name = "ring::preprocess", fields(n = ring.len()))]
pub fn preprocess(chain: &ParamChain, ring: &Ring) -> PreProcessed {
    let n = ring.len();
    assert!(
        n.is_power_of_two() && n >= 2,
        "ring length must be a power of two >= 2, got {n}"
    );
    assert_eq!(
        chain.top().size(),
        n,
        "parameter chain size must match the ring length"
    );

    let pp = chain.top();
    let a0_inverse = -ring.to_g1_vector().inner_prod(&pp.gamma2);
    let h1 = G1Vector::duplicate(&blinding_generator(), n);
    let d = h1.inner_prod(&pp.gamma2);
    let gamma2_sum = pp.gamma2.sum();

    let mut h = Sha256::new();
    h.update(element_bytes(&d));
    h.update(element_bytes(&a0_inverse));
    h.update(element_bytes(&gamma2_sum));
    h.update(h1.bytes());
    // The base level's digest chains over every level above it, so this
    // commits to the entire ladder.
    h.update(chain.base().digest());
    let digest = h.finalize().into();

    PreProcessed {
        a0_inverse,
        d,
        gamma2_sum,
        h1,
        digest,
    }
}

/// Everything a signer or verifier needs: the parameter chain and the
/// ring-bound precomputation.
#[derive(Clone, Debug)]
pub struct RingParams {
    pub chain: ParamChain,
    pub preprocessed: PreProcessed,
}

impl RingParams {
    /// Bundle a chain with the preprocessing for `ring`.
    pub fn new(chain: ParamChain, ring: &Ring) -> Self {
        let preprocessed = preprocess(&chain, ring);
        RingParams {
            chain,
            preprocessed,
        }
    }
}

/// A ring proof awaiting its tag proof.
///
/// Produced by [`PrivateKey::preprocess_ring_proof`] before the message is
/// known; it cannot be verified until [`PrivateKey::append_tag_proof`]
/// turns it into a [`RingSignature`].
#[derive(Clone, Debug)]
pub struct PendingSignature {
    tag_commitment: G1,
    proof1: DoryProof,
    proof2: DoryProof,
    b: Gt,
    z: Scalar,
    y: G1,
}

/// A complete linkable ring signature.
#[derive(Clone, Debug)]
pub struct RingSignature {
    /// Sigma proof tying the tag to the commitment and the transcript.
    pub tag_proof: TagProof,
    /// Pedersen commitment to the signer's key.
    pub tag_commitment: G1,
    /// The per-epoch linkability tag.
    pub tag: G1,
    /// Dory proof for the ring relation.
    pub proof1: DoryProof,
    /// Dory proof for the blinding relation.
    pub proof2: DoryProof,
    /// B = ⟨Γ1, G2c⟩ - commitment to the challenge shares.
    pub b: Gt,
    /// Response scalar `z = y + c_j·r`.
    pub z: Scalar,
    /// Blinded challenge combination `Y`.
    pub y: G1,
}

impl PrivateKey {
    /// Sign `msg` under the given epoch prefix as an anonymous member of
    /// `ring`.
    #[tracing::instrument(skip_all, name = "ring::sign", fields(n = ring.len()))]
    pub fn sign<R: RngCore>(
        &self,
        params: &RingParams,
        msg: &[u8],
        prefix: &[u8],
        ring: &Ring,
        rng: &mut R,
    ) -> RingSignature {
        let (witness, pending) = self.preprocess_ring_proof(params, ring, rng);
        self.append_tag_proof(pending, &witness, msg, prefix, rng)
    }

    /// Run the message-independent part of signing: the tag commitment and
    /// the full ring proof. The returned witness must be kept for
    /// [`Self::append_tag_proof`].
    pub fn preprocess_ring_proof<R: RngCore>(
        &self,
        params: &RingParams,
        ring: &Ring,
        rng: &mut R,
    ) -> (TagWitness, PendingSignature) {
        let (witness, com) = tag::commit(&self.0, rng);
        let pending = self.ring_proof(params, ring, &witness, com, rng);
        (witness, pending)
    }

    /// Bind a pending ring proof to a message and epoch prefix.
    pub fn append_tag_proof<R: RngCore>(
        &self,
        pending: PendingSignature,
        witness: &TagWitness,
        msg: &[u8],
        prefix: &[u8],
        rng: &mut R,
    ) -> RingSignature {
        let tag_proof = tag::prove(
            prefix,
            &self.0,
            witness,
            &[
                msg,
                pending.proof1.digest().as_slice(),
                pending.proof2.digest().as_slice(),
            ],
            rng,
        );
        let tag = tag::tag(&self.0, prefix);

        RingSignature {
            tag_proof,
            tag_commitment: pending.tag_commitment,
            tag,
            proof1: pending.proof1,
            proof2: pending.proof2,
            b: pending.b,
            z: pending.z,
            y: pending.y,
        }
    }

    fn ring_proof<R: RngCore>(
        &self,
        params: &RingParams,
        ring: &Ring,
        witness: &TagWitness,
        com: G1,
        rng: &mut R,
    ) -> PendingSignature {
        let n = ring.len();
        let pre = &params.preprocessed;
        let top = params.chain.top();
        assert_eq!(top.size(), n, "parameter chain size must match the ring length");

        let a = pairing(&com, &pre.gamma2_sum) + pre.a0_inverse;

        let y_nonce = Scalar::rand(rng);
        let mut challenges: Vec<Scalar> = (0..n - 1).map(|_| Scalar::rand(rng)).collect();

        let index = self.locate(ring);
        let y = compute_y(&y_nonce, &challenges, &com, ring, index);

        let a_bytes = element_bytes(&a);
        let y_bytes = element_bytes(&y);
        let h = transcript::challenge_scalar(&[&a_bytes, &y_bytes, pre.digest().as_slice()]);

        let own_share = h - challenges.iter().sum::<Scalar>();
        let z = y_nonce + own_share * *witness.r();
        challenges.insert(index, own_share);

        let share_sum: Scalar = challenges.iter().sum();
        assert_eq!(share_sum, h, "challenge shares must sum to the transcript hash");

        let g2c = G2Vector::duplicate(&g2_generator(), n).mulv(&challenges);

        let c = pairing(&(blinding_generator() * z - y), &g2_generator());
        let e = pairing(&(blinding_generator() * h), &g2_generator());
        let b = top.gamma1.inner_prod(&g2c);

        let cmt1 = Commitment { c, d1: a, d2: b };
        let w1 = Witness {
            v1: ring
                .to_g1_vector()
                .neg()
                .add(&G1Vector::duplicate(&com, n)),
            v2: g2c.clone(),
        };

        let cmt2 = Commitment {
            c: e,
            d1: pre.d,
            d2: b,
        };
        let w2 = Witness {
            v1: pre.h1.clone(),
            v2: g2c,
        };

        let chain = &params.chain;
        let (proof1, proof2) = thread::scope(|s| {
            let first = s.spawn(move || reduce(chain, w1, cmt1));
            let proof2 = reduce(chain, w2, cmt2);
            let proof1 = first
                .join()
                .unwrap_or_else(|payload| panic::resume_unwind(payload));
            (proof1, proof2)
        });

        PendingSignature {
            tag_commitment: com,
            proof1,
            proof2,
            b,
            z,
            y,
        }
    }
}

/// `Y = y·H + Σ_{i≠skip} c_k·(ring[i] − com)`.
fn compute_y(y_nonce: &Scalar, challenges: &[Scalar], com: &G1, ring: &Ring, skip: usize) -> G1 {
    let bases: Vec<G1> = ring
        .0
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != skip)
        .map(|(_, member)| member.0 - *com)
        .collect();
    blinding_generator() * *y_nonce + msm_g1(&bases, challenges)
}

impl RingSignature {
    /// Verify against the ring parameters, message and epoch prefix.
    ///
    /// The two Dory verifications and the tag verification run
    /// concurrently; all three complete before the first recorded failure
    /// is returned.
    #[tracing::instrument(skip_all, name = "ring::verify")]
    pub fn verify(
        &self,
        params: &RingParams,
        msg: &[u8],
        prefix: &[u8],
    ) -> Result<(), VerifyError> {
        let pre = &params.preprocessed;

        let a = pairing(&self.tag_commitment, &pre.gamma2_sum) + pre.a0_inverse;
        let c = pairing(&(blinding_generator() * self.z - self.y), &g2_generator());

        let a_bytes = element_bytes(&a);
        let y_bytes = element_bytes(&self.y);
        let h = transcript::challenge_scalar(&[&a_bytes, &y_bytes, pre.digest().as_slice()]);
        let e = pairing(&(blinding_generator() * h), &g2_generator());

        let failure: OnceLock<VerifyError> = OnceLock::new();
        thread::scope(|s| {
            s.spawn(|| {
                let cmt = Commitment {
                    c,
                    d1: a,
                    d2: self.b,
                };
                if verify_reduce(&params.chain, &cmt, &self.proof1).is_err() {
                    let _ = failure.set(VerifyError::FirstDoryProof);
                }
            });
            s.spawn(|| {
                let cmt = Commitment {
                    c: e,
                    d1: pre.d,
                    d2: self.b,
                };
                if verify_reduce(&params.chain, &cmt, &self.proof2).is_err() {
                    let _ = failure.set(VerifyError::SecondDoryProof);
                }
            });
            if let Err(err) = self.tag_proof.verify(
                &self.tag,
                &self.tag_commitment,
                prefix,
                &[
                    msg,
                    self.proof1.digest().as_slice(),
                    self.proof2.digest().as_slice(),
                ],
            ) {
                let _ = failure.set(err);
            }
        });

        match failure.into_inner() {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }

    /// DER-encode the signature in the canonical field order.
    pub fn to_bytes(&self) -> Vec<u8> {
        RawRingSignature {
            tag_proof: octet(self.tag_proof.to_bytes()),
            tag_commitment: octet(element_bytes(&self.tag_commitment)),
            tag_value: octet(element_bytes(&self.tag)),
            dory_proof1: octet(self.proof1.to_bytes()),
            dory_proof2: octet(self.proof2.to_bytes()),
            b: octet(element_bytes(&self.b)),
            z: octet(element_bytes(&self.z)),
            y: octet(element_bytes(&self.y)),
        }
        .to_der()
        .expect("DER encoding of a well-formed structure")
    }

    /// Decode a signature, validating every element.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        let raw = RawRingSignature::from_der(bytes)?;
        Ok(RingSignature {
            tag_proof: TagProof::from_bytes(raw.tag_proof.as_bytes())?,
            tag_commitment: decode_element(&raw.tag_commitment)?,
            tag: decode_element(&raw.tag_value)?,
            proof1: DoryProof::from_bytes(raw.dory_proof1.as_bytes())?,
            proof2: DoryProof::from_bytes(raw.dory_proof2.as_bytes())?,
            b: decode_element(&raw.b)?,
            z: decode_element(&raw.z)?,
            y: decode_element(&raw.y)?,
        })
    }
}

#[derive(Sequence)]
struct RawRingSignature {
    tag_proof: OctetString,
    tag_commitment: OctetString,
    tag_value: OctetString,
    dory_proof1: OctetString,
    dory_proof2: OctetString,
    b: OctetString,
    z: OctetString,
    y: OctetString,
}

/// Verify a threshold set: `k` signatures over the same message and epoch
/// from `k` distinct signers.
///
/// Linkability is enforced first - duplicated tags mean a signer
/// contributed twice - then every signature is verified on its own thread.
pub fn verify_threshold_signatures(
    params: &RingParams,
    msg: &[u8],
    prefix: &[u8],
    signatures: &[RingSignature],
) -> Result<(), VerifyError> {
    let distinct: HashSet<Vec<u8>> = signatures
        .iter()
        .map(|sig| element_bytes(&sig.tag))
        .collect();
    if distinct.len() != signatures.len() {
        return Err(VerifyError::DuplicateTags {
            distinct: distinct.len(),
            total: signatures.len(),
        });
    }

    let failure: OnceLock<VerifyError> = OnceLock::new();
    let failure_ref = &failure;
    thread::scope(|s| {
        for sig in signatures {
            s.spawn(move || {
                if let Err(err) = sig.verify(params, msg, prefix) {
                    let _ = failure_ref.set(err);
                }
            });
        }
    });

    match failure.into_inner() {
        None => Ok(()),
        Some(err) => Err(err),
    }
}

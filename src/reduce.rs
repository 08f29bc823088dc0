//! The Dory inner-pairing-product argument: commitment, recursive prover
//! and verifier.
//!
//! The prover walks the parameter chain level by level, halving the
//! witness each round and emitting the two message bundles whose digests
//! yield the round challenges. The verifier re-derives both challenges
//! from its own transcript - binding the level digest and its *own*
//! running commitment, never the prover's claims - folds the commitment by
//! the same formulas, and finishes with the randomized scalar-product
//! check at the base level.

use ark_ff::Field;

use crate::algebra::{fold_g1, fold_g2, inner_pairing_product, G1Vector, G2Vector};
use crate::curve::{gt_exp, Gt, Scalar};
use crate::error::VerifyError;
use crate::messages::{ReduceStep1, ReduceStep2};
use crate::proof::{DoryProof, ScalarProductElements};
use crate::setup::{ParamChain, PublicParams};
use crate::transcript;

/// A Dory commitment: the inner pairing product of the witness pair and
/// the two cross products against the level generators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Commitment {
    /// C = ⟨v1, v2⟩
    pub c: Gt,
    /// D1 = ⟨v1, Γ2⟩
    pub d1: Gt,
    /// D2 = ⟨Γ1, v2⟩
    pub d2: Gt,
}

/// The committed vector pair. Prover-only; shrinks by half each round.
#[derive(Clone, Debug)]
pub struct Witness {
    pub v1: G1Vector,
    pub v2: G2Vector,
}

/// Commit to a vector pair under the given level parameters.
pub fn commit(v1: G1Vector, v2: G2Vector, pp: &PublicParams) -> (Commitment, Witness) {
    assert_eq!(v1.len(), pp.size(), "witness length must match the parameters");
    let commitment = Commitment {
        c: v1.inner_prod(&v2),
        d1: v1.inner_prod(&pp.gamma2),
        d2: pp.gamma1.inner_prod(&v2),
    };
    (commitment, Witness { v1, v2 })
}

/// Run the full reduction, producing a proof for the given commitment.
#[tracing::instrument(skip_all, name = "dory::reduce", fields(n = witness.v1.len()))]
pub fn reduce(chain: &ParamChain, witness: Witness, commitment: Commitment) -> DoryProof {
    assert_eq!(
        witness.v1.len(),
        chain.top().size(),
        "witness length must match the top of the parameter chain"
    );
    assert!(chain.len() > 1, "reduction needs at least one halving level");

    let mut step1s = Vec::with_capacity(chain.len() - 1);
    let mut step2s = Vec::with_capacity(chain.len() - 1);
    let mut w = witness;
    let mut cmt = commitment;

    for level in 0..chain.len() - 1 {
        let pp = &chain[level];
        let reduce_pp = pp.reduce.as_ref().expect("non-base level has reduce parameters");
        let m = pp.size() / 2;

        let (v1l, v1r) = w.v1.0.split_at(m);
        let (v2l, v2r) = w.v2.0.split_at(m);

        let step1 = ReduceStep1 {
            pp_digest: *pp.digest(),
            c: cmt.c,
            d1: cmt.d1,
            d2: cmt.d2,
            d1l: inner_pairing_product(v1l, &reduce_pp.gamma2_prime.0),
            d1r: inner_pairing_product(v1r, &reduce_pp.gamma2_prime.0),
            d2l: inner_pairing_product(&reduce_pp.gamma1_prime.0, v2l),
            d2r: inner_pairing_product(&reduce_pp.gamma1_prime.0, v2r),
        };
        let step1_digest = step1.digest();
        let beta = transcript::scalar_from_digest(&step1_digest);
        let beta_inv = beta.inverse().expect("challenge is invertible");

        // Combine with the generators before crossing the halves.
        let v1 = w.v1.add(&pp.gamma1.mul(&beta));
        let v2 = w.v2.add(&pp.gamma2.mul(&beta_inv));
        let (v1l, v1r) = v1.0.split_at(m);
        let (v2l, v2r) = v2.0.split_at(m);

        let step2 = ReduceStep2 {
            step1_digest,
            c_plus: inner_pairing_product(v1l, v2r),
            c_minus: inner_pairing_product(v1r, v2l),
        };
        let alpha = step2.challenge();
        let alpha_inv = alpha.inverse().expect("challenge is invertible");

        cmt = next_commitment(pp, &step1, &step2, &beta, &beta_inv, &alpha, &alpha_inv);
        w = Witness {
            v1: fold_g1(v1l, v1r, &alpha),
            v2: fold_g2(v2l, v2r, &alpha_inv),
        };

        step1s.push(step1);
        step2s.push(step2);
    }

    debug_assert_eq!(w.v1.len(), 1);
    DoryProof::new(
        step1s,
        step2s,
        ScalarProductElements {
            e1: w.v1.0[0],
            e2: w.v2.0[0],
        },
    )
}

/// Verify a reduction proof against a commitment.
#[tracing::instrument(skip_all, name = "dory::verify_reduce", fields(rounds = proof.rounds()))]
pub fn verify_reduce(
    chain: &ParamChain,
    commitment: &Commitment,
    proof: &DoryProof,
) -> Result<(), VerifyError> {
    if proof.rounds() != chain.len() - 1 {
        return Err(VerifyError::InvalidProof);
    }

    let mut cmt = *commitment;
    for (level, (s1, s2)) in proof.step1.iter().zip(&proof.step2).enumerate() {
        let pp = &chain[level];

        // Rebind the transcript to this verifier's view: the chain's level
        // digest and the running commitment, with only the cross terms
        // taken from the prover.
        let step1 = ReduceStep1 {
            pp_digest: *pp.digest(),
            c: cmt.c,
            d1: cmt.d1,
            d2: cmt.d2,
            d1l: s1.d1l,
            d1r: s1.d1r,
            d2l: s1.d2l,
            d2r: s1.d2r,
        };
        let step1_digest = step1.digest();
        let beta = transcript::scalar_from_digest(&step1_digest);
        let beta_inv = beta.inverse().expect("challenge is invertible");

        let step2 = ReduceStep2 {
            step1_digest,
            c_plus: s2.c_plus,
            c_minus: s2.c_minus,
        };
        let alpha = step2.challenge();
        let alpha_inv = alpha.inverse().expect("challenge is invertible");

        cmt = next_commitment(pp, &step1, &step2, &beta, &beta_inv, &alpha, &alpha_inv);
    }

    proof.scalar_product.verify(chain.base(), &cmt)
}

/// Fold a commitment into the next level's commitment.
///
/// Shared verbatim by prover and verifier:
/// `C' = C · χ · D2^β · D1^(1/β) · C+^α · C−^(1/α)`
/// `D1' = D1L^α · D1R · Δ1L^(αβ) · Δ1R^β`
/// `D2' = D2L^(1/α) · D2R · Δ2L^(1/αβ) · Δ2R^(1/β)`
fn next_commitment(
    pp: &PublicParams,
    step1: &ReduceStep1,
    step2: &ReduceStep2,
    beta: &Scalar,
    beta_inv: &Scalar,
    alpha: &Scalar,
    alpha_inv: &Scalar,
) -> Commitment {
    let reduce_pp = pp.reduce.as_ref().expect("non-base level has reduce parameters");

    let c = step1.c
        + pp.chi
        + gt_exp(&step1.d2, beta)
        + gt_exp(&step1.d1, beta_inv)
        + gt_exp(&step2.c_plus, alpha)
        + gt_exp(&step2.c_minus, alpha_inv);

    let d1 = gt_exp(&step1.d1l, alpha)
        + step1.d1r
        + gt_exp(&reduce_pp.delta_1l, &(*alpha * *beta))
        + gt_exp(&reduce_pp.delta_1r, beta);

    let d2 = gt_exp(&step1.d2l, alpha_inv)
        + step1.d2r
        + gt_exp(&reduce_pp.delta_2l, &(*alpha_inv * *beta_inv))
        + gt_exp(&reduce_pp.delta_2r, beta_inv);

    Commitment { c, d1, d2 }
}

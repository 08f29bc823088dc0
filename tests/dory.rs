//! Integration tests for the Dory reduction.

use ark_std::UniformRand;
use dualdory::algebra::{G1Vector, G2Vector};
use dualdory::proof::ScalarProductElements;
use dualdory::{commit, reduce, verify_reduce, DoryProof, ParamChain, VerifyError, G1, G2};

fn random_g1_vector(n: usize) -> G1Vector {
    let mut rng = rand::thread_rng();
    G1Vector((0..n).map(|_| G1::rand(&mut rng)).collect())
}

fn random_g2_vector(n: usize) -> G2Vector {
    let mut rng = rand::thread_rng();
    G2Vector((0..n).map(|_| G2::rand(&mut rng)).collect())
}

#[test]
fn scalar_product_proof_verifies() {
    let chain = ParamChain::generate(1);
    let pp = chain.base();

    let v1 = random_g1_vector(1);
    let v2 = random_g2_vector(1);
    let (cmt, witness) = commit(v1, v2, pp);

    let proof = ScalarProductElements {
        e1: witness.v1.0[0],
        e2: witness.v2.0[0],
    };

    // The verifier challenge is drawn fresh each time; repeat to make sure
    // the relation holds for many challenges.
    for _ in 0..16 {
        proof.verify(pp, &cmt).unwrap();
    }
}

#[test]
fn scalar_product_proof_rejects_wrong_witness() {
    let chain = ParamChain::generate(1);
    let pp = chain.base();

    let (cmt, _) = commit(random_g1_vector(1), random_g2_vector(1), pp);
    let other = ScalarProductElements {
        e1: random_g1_vector(1).0[0],
        e2: random_g2_vector(1).0[0],
    };

    assert_eq!(other.verify(pp, &cmt), Err(VerifyError::InvalidProof));
}

#[test]
fn reduce_and_verify_roundtrip() {
    let chain = ParamChain::generate(8);

    let v1 = random_g1_vector(8);
    let v2 = random_g2_vector(8);
    let (cmt, witness) = commit(v1, v2, chain.top());

    let proof = reduce(&chain, witness, cmt);
    assert_eq!(proof.step1.len(), 3);
    assert_eq!(proof.step2.len(), 3);

    verify_reduce(&chain, &cmt, &proof).unwrap();
}

#[test]
fn chain_shape_for_eight() {
    let chain = ParamChain::generate(8);

    let gamma_lens: Vec<usize> = chain.levels().iter().map(|pp| pp.gamma1.len()).collect();
    assert_eq!(gamma_lens, [8, 4, 2, 1]);

    let prime_lens: Vec<usize> = chain
        .levels()
        .iter()
        .map(|pp| pp.reduce.as_ref().map_or(0, |r| r.gamma1_prime.len()))
        .collect();
    assert_eq!(prime_lens, [4, 2, 1, 0]);
}

#[test]
fn verify_rejects_wrong_commitment() {
    let chain = ParamChain::generate(4);

    let (cmt, witness) = commit(random_g1_vector(4), random_g2_vector(4), chain.top());
    let proof = reduce(&chain, witness, cmt);

    let (other_cmt, _) = commit(random_g1_vector(4), random_g2_vector(4), chain.top());
    assert!(verify_reduce(&chain, &other_cmt, &proof).is_err());
}

#[test]
fn verify_rejects_tampered_cross_terms() {
    let chain = ParamChain::generate(4);

    let (cmt, witness) = commit(random_g1_vector(4), random_g2_vector(4), chain.top());
    let proof = reduce(&chain, witness, cmt);

    let mut tampered = proof.clone();
    tampered.step2[0].c_plus = tampered.step2[0].c_plus + tampered.step2[0].c_minus;
    assert!(verify_reduce(&chain, &cmt, &tampered).is_err());
}

#[test]
fn verify_rejects_wrong_round_count() {
    let small = ParamChain::generate(4);
    let large = ParamChain::generate(8);

    let (cmt, witness) = commit(random_g1_vector(4), random_g2_vector(4), small.top());
    let proof = reduce(&small, witness, cmt);

    assert_eq!(
        verify_reduce(&large, &cmt, &proof),
        Err(VerifyError::InvalidProof)
    );
}

#[test]
fn proof_wire_roundtrip() {
    let chain = ParamChain::generate(4);

    let (cmt, witness) = commit(random_g1_vector(4), random_g2_vector(4), chain.top());
    let proof = reduce(&chain, witness, cmt);

    let decoded = DoryProof::from_bytes(&proof.to_bytes()).unwrap();
    assert_eq!(decoded.digest(), proof.digest());
    verify_reduce(&chain, &cmt, &decoded).unwrap();
}

#[test]
fn proof_decoding_rejects_garbage() {
    assert!(DoryProof::from_bytes(b"not a proof").is_err());
}

//! BN254 curve glue.
//!
//! Concrete group and field types for the scheme, the fixed blinding
//! generator `H`, Shallue-van de Woestijne hash-to-curve for both source
//! groups, and the pairing / MSM helpers the rest of the crate routes its
//! heavy arithmetic through.
//!
//! Gt is [`PairingOutput`], a multiplicative subgroup of Fq12 written in
//! additive notation: group "addition" is field multiplication and scalar
//! "multiplication" is exponentiation.

use ark_bn254::{Bn254, Fr, G1Projective, G2Projective};
use ark_ec::hashing::{
    curve_maps::svdw::SVDWMap, map_to_curve_hasher::MapToCurveBasedHasher, HashToCurve,
};
use ark_ec::pairing::{Pairing, PairingOutput};
use ark_ec::{CurveGroup, PrimeGroup, VariableBaseMSM};
use ark_ff::field_hashers::DefaultFieldHasher;
use ark_serialize::CanonicalSerialize;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

use crate::stats;

/// Element of the scalar field Zq.
pub type Scalar = Fr;
/// Element of the first pairing source group.
pub type G1 = G1Projective;
/// Element of the second pairing source group.
pub type G2 = G2Projective;
/// Element of the pairing target group.
pub type Gt = PairingOutput<Bn254>;

/// Domain string for the scheme-level blinding generator.
const SCHEME_DOMAIN: &[u8] = b"DualDory";

/// Domain separation tag for the hash-to-curve field expander.
const HASH_TO_CURVE_DST: &[u8] = b"DualDory";

static BLINDING_GENERATOR: OnceLock<G1> = OnceLock::new();

/// The canonical G1 generator.
pub fn g1_generator() -> G1 {
    G1Projective::generator()
}

/// The canonical G2 generator.
pub fn g2_generator() -> G2 {
    G2Projective::generator()
}

/// The independent blinding generator `H = HashToG1(SHA256("DualDory"))`.
///
/// Computed once per process and never mutated afterwards; its discrete
/// logarithm with respect to the G1 generator is unknown.
pub fn blinding_generator() -> G1 {
    *BLINDING_GENERATOR.get_or_init(|| hash_to_g1(Sha256::digest(SCHEME_DOMAIN).as_slice()))
}

type G1Hasher =
    MapToCurveBasedHasher<G1Projective, DefaultFieldHasher<Sha256, 128>, SVDWMap<ark_bn254::g1::Config>>;
type G2Hasher =
    MapToCurveBasedHasher<G2Projective, DefaultFieldHasher<Sha256, 128>, SVDWMap<ark_bn254::g2::Config>>;

/// Hash arbitrary bytes to a G1 element (SvdW map).
pub fn hash_to_g1(msg: &[u8]) -> G1 {
    stats::record_hash_to_curve();
    let hasher = G1Hasher::new(HASH_TO_CURVE_DST).expect("hash-to-curve parameters are valid");
    hasher.hash(msg).expect("hash-to-curve is total").into()
}

/// Hash arbitrary bytes to a G2 element (SvdW map).
pub fn hash_to_g2(msg: &[u8]) -> G2 {
    stats::record_hash_to_curve();
    let hasher = G2Hasher::new(HASH_TO_CURVE_DST).expect("hash-to-curve parameters are valid");
    hasher.hash(msg).expect("hash-to-curve is total").into()
}

/// Single pairing with final exponentiation.
pub fn pairing(p: &G1, q: &G2) -> Gt {
    stats::record_pairings(1);
    Bn254::pairing(*p, *q)
}

/// Product of pairings: all Miller loops first, one final exponentiation.
pub fn multi_pairing(ps: &[G1], qs: &[G2]) -> Gt {
    assert_eq!(ps.len(), qs.len(), "multi-pairing requires equal length inputs");
    stats::record_pairings(ps.len() as u64);
    Bn254::multi_pairing(ps.iter().copied(), qs.iter().copied())
}

/// Scalar exponentiation in Gt.
pub fn gt_exp(x: &Gt, k: &Scalar) -> Gt {
    stats::record_gt_exponentiation();
    *x * *k
}

/// Multi-scalar multiplication in G1.
pub fn msm_g1(bases: &[G1], scalars: &[Scalar]) -> G1 {
    assert_eq!(bases.len(), scalars.len(), "MSM requires equal length vectors");
    stats::record_msm_g1();
    let affine: Vec<_> = bases.iter().map(|b| b.into_affine()).collect();
    G1Projective::msm(&affine, scalars).expect("MSM over equal-length inputs")
}

/// Multi-scalar multiplication in G2.
pub fn msm_g2(bases: &[G2], scalars: &[Scalar]) -> G2 {
    assert_eq!(bases.len(), scalars.len(), "MSM requires equal length vectors");
    stats::record_msm_g2();
    let affine: Vec<_> = bases.iter().map(|b| b.into_affine()).collect();
    G2Projective::msm(&affine, scalars).expect("MSM over equal-length inputs")
}

/// Canonical compressed byte encoding of a group element or scalar.
pub fn element_bytes<T: CanonicalSerialize>(el: &T) -> Vec<u8> {
    let mut buf = Vec::with_capacity(el.compressed_size());
    el.serialize_compressed(&mut buf)
        .expect("canonical serialization of an in-memory element");
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::Zero;

    #[test]
    fn blinding_generator_is_stable_and_nontrivial() {
        let h = blinding_generator();
        assert_eq!(h, blinding_generator());
        assert!(!h.is_zero());
        assert_ne!(h, g1_generator());
    }

    #[test]
    fn hash_to_g1_separates_inputs() {
        assert_ne!(hash_to_g1(b"a"), hash_to_g1(b"b"));
        assert_eq!(hash_to_g1(b"a"), hash_to_g1(b"a"));
    }

    #[test]
    fn multi_pairing_matches_pairing_product() {
        let p = g1_generator();
        let q = g2_generator();
        let expected = pairing(&p, &q) + pairing(&(p + p), &q);
        assert_eq!(multi_pairing(&[p, p + p], &[q, q]), expected);
    }
}

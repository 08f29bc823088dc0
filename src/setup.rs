//! Dory public parameters.
//!
//! Parameters are layered: the level for vectors of length `n` carries the
//! generator vectors `Γ1, Γ2`, their inner pairing product `χ`, and the
//! reduction sub-parameters - half-length generators `Γ1', Γ2'` together
//! with the four cross commitments `Δ` used when folding commitments. The
//! level for `n/2` reuses `Γ1', Γ2'` as its own generators, so the whole
//! chain `n, n/2, …, 1` is determined by `n`.
//!
//! Generation is deterministic: every generator is hashed from the `"Dory"`
//! domain, the vector length and the index, so provers and verifiers only
//! need to agree on `n`.

use sha2::{Digest, Sha256};
use std::ops::Index;

use crate::algebra::{G1Vector, G2Vector};
use crate::curve::{element_bytes, hash_to_g1, hash_to_g2, G1, G2, Gt};
use crate::transcript::{self, TranscriptDigest};

/// Domain string for deterministic generator derivation.
const GENERATOR_DOMAIN: &[u8] = b"Dory";

/// Reduction sub-parameters of one level: the half-length generators and
/// the cross commitments between them and the level's own generators.
#[derive(Clone, Debug)]
pub struct ReduceParams {
    /// Γ1' - generators of the next level.
    pub gamma1_prime: G1Vector,
    /// Γ2' - generators of the next level.
    pub gamma2_prime: G2Vector,
    /// Δ1L = ⟨Γ1[..m], Γ2'⟩
    pub delta_1l: Gt,
    /// Δ1R = ⟨Γ1[m..], Γ2'⟩
    pub delta_1r: Gt,
    /// Δ2L = ⟨Γ1', Γ2[..m]⟩
    pub delta_2l: Gt,
    /// Δ2R = ⟨Γ1', Γ2[m..]⟩
    pub delta_2r: Gt,
}

impl ReduceParams {
    fn digest(&self) -> TranscriptDigest {
        let mut h = Sha256::new();
        h.update(self.gamma1_prime.bytes());
        h.update(self.gamma2_prime.bytes());
        h.update(element_bytes(&self.delta_1r));
        h.update(element_bytes(&self.delta_1l));
        h.update(element_bytes(&self.delta_2r));
        h.update(element_bytes(&self.delta_2l));
        h.finalize().into()
    }
}

/// Public parameters of a single level.
#[derive(Clone, Debug)]
pub struct PublicParams {
    /// Γ1 - G1 generator vector of this level.
    pub gamma1: G1Vector,
    /// Γ2 - G2 generator vector of this level.
    pub gamma2: G2Vector,
    /// χ = ⟨Γ1, Γ2⟩
    pub chi: Gt,
    /// Reduction sub-parameters; `None` at the base level (`n = 1`).
    pub reduce: Option<ReduceParams>,
    digest: TranscriptDigest,
}

impl PublicParams {
    /// Number of generators at this level.
    pub fn size(&self) -> usize {
        self.gamma1.len()
    }

    /// Digest binding this level and, through chaining, every level above.
    pub fn digest(&self) -> &TranscriptDigest {
        &self.digest
    }

    /// Build the top level for vectors of length `n`.
    fn top(n: usize) -> Self {
        let gamma1 = random_g1_vector(n);
        let gamma2 = random_g2_vector(n);
        Self::assemble(gamma1, gamma2, None)
    }

    /// Derive the next (half-size) level from this one.
    fn child(&self) -> Self {
        let reduce = self
            .reduce
            .as_ref()
            .expect("the base level has no child parameters");
        Self::assemble(
            reduce.gamma1_prime.clone(),
            reduce.gamma2_prime.clone(),
            Some(&self.digest),
        )
    }

    fn assemble(gamma1: G1Vector, gamma2: G2Vector, prev_digest: Option<&TranscriptDigest>) -> Self {
        let n = gamma1.len();
        assert_eq!(n, gamma2.len(), "generator vectors must have equal length");
        let chi = gamma1.inner_prod(&gamma2);
        let reduce = (n > 1).then(|| {
            let m = n / 2;
            let gamma1_prime = random_g1_vector(m);
            let gamma2_prime = random_g2_vector(m);
            ReduceParams {
                delta_1l: inner(&gamma1.0[..m], &gamma2_prime.0),
                delta_1r: inner(&gamma1.0[m..], &gamma2_prime.0),
                delta_2l: inner(&gamma1_prime.0, &gamma2.0[..m]),
                delta_2r: inner(&gamma1_prime.0, &gamma2.0[m..]),
                gamma1_prime,
                gamma2_prime,
            }
        });

        let mut h = Sha256::new();
        if let Some(prev) = prev_digest {
            h.update(prev);
        }
        if let Some(reduce) = &reduce {
            h.update(reduce.digest());
        }
        h.update(element_bytes(&chi));
        h.update(gamma1.bytes());
        h.update(gamma2.bytes());
        let digest = h.finalize().into();

        PublicParams {
            gamma1,
            gamma2,
            chi,
            reduce,
            digest,
        }
    }
}

fn inner(v1: &[G1], v2: &[G2]) -> Gt {
    crate::algebra::inner_pairing_product(v1, v2)
}

/// The full parameter ladder for vectors of length `n` down to length 1.
#[derive(Clone, Debug)]
pub struct ParamChain(Vec<PublicParams>);

impl ParamChain {
    /// Deterministically generate the chain for vectors of length `n`.
    ///
    /// `n` must be a power of two; the chain has `log2(n) + 1` levels of
    /// sizes `n, n/2, …, 1`.
    pub fn generate(n: usize) -> Self {
        assert!(
            n.is_power_of_two(),
            "parameter chain size must be a power of two, got {n}"
        );
        let mut levels = Vec::with_capacity(n.trailing_zeros() as usize + 1);
        let mut current = PublicParams::top(n);
        while current.size() > 1 {
            let next = current.child();
            levels.push(current);
            current = next;
        }
        levels.push(current);
        ParamChain(levels)
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The full-size level.
    pub fn top(&self) -> &PublicParams {
        &self.0[0]
    }

    /// The length-1 level; its chained digest commits to the whole ladder.
    pub fn base(&self) -> &PublicParams {
        self.0.last().expect("chain has at least one level")
    }

    /// All levels, largest first.
    pub fn levels(&self) -> &[PublicParams] {
        &self.0
    }
}

impl Index<usize> for ParamChain {
    type Output = PublicParams;

    fn index(&self, level: usize) -> &PublicParams {
        &self.0[level]
    }
}

fn generator_seed(n: usize, i: usize) -> TranscriptDigest {
    assert!(n <= u16::MAX as usize, "vector length exceeds the generator domain");
    transcript::digest(&[
        GENERATOR_DOMAIN,
        &(n as u16).to_le_bytes(),
        &(i as u16).to_le_bytes(),
    ])
}

fn random_g1_vector(n: usize) -> G1Vector {
    G1Vector((0..n).map(|i| hash_to_g1(&generator_seed(n, i))).collect())
}

fn random_g2_vector(n: usize) -> G2Vector {
    G2Vector((0..n).map(|i| hash_to_g2(&generator_seed(n, i))).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_levels_halve_down_to_one() {
        let chain = ParamChain::generate(8);
        assert_eq!(chain.len(), 4);
        let sizes: Vec<usize> = chain.levels().iter().map(|pp| pp.size()).collect();
        assert_eq!(sizes, [8, 4, 2, 1]);

        let prime_sizes: Vec<usize> = chain
            .levels()
            .iter()
            .map(|pp| pp.reduce.as_ref().map_or(0, |r| r.gamma1_prime.len()))
            .collect();
        assert_eq!(prime_sizes, [4, 2, 1, 0]);
    }

    #[test]
    fn child_generators_are_the_parent_primes() {
        let chain = ParamChain::generate(4);
        for level in 0..chain.len() - 1 {
            let reduce = chain[level].reduce.as_ref().unwrap();
            assert_eq!(reduce.gamma1_prime, chain[level + 1].gamma1);
            assert_eq!(reduce.gamma2_prime, chain[level + 1].gamma2);
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let a = ParamChain::generate(4);
        let b = ParamChain::generate(4);
        for (x, y) in a.levels().iter().zip(b.levels()) {
            assert_eq!(x.digest(), y.digest());
            assert_eq!(x.gamma1, y.gamma1);
        }
    }

    #[test]
    fn level_digests_chain() {
        let a = ParamChain::generate(2);
        let b = ParamChain::generate(4);
        // Same sizes at the tail, but different ancestry: digests differ.
        assert_eq!(a.base().size(), 1);
        assert_eq!(b[2].size(), 1);
        assert_ne!(a.base().digest(), b[2].digest());
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn rejects_non_power_of_two() {
        let _ = ParamChain::generate(6);
    }
}

//! Vector algebra over the pairing source groups.
//!
//! Ordered sequences of G1 / G2 elements with pointwise operations and the
//! inner pairing product `⟨v1, v2⟩ = Π e(v1_i, v2_i)`. Length mismatches
//! and empty inputs are programmer errors and panic.

use crate::curve::{element_bytes, multi_pairing, Scalar, G1, G2, Gt};

/// Ordered sequence of G1 elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct G1Vector(pub Vec<G1>);

/// Ordered sequence of G2 elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct G2Vector(pub Vec<G2>);

/// Inner pairing product of two equal-length slices.
///
/// Evaluates every Miller loop first and applies a single final
/// exponentiation; the result equals the naive per-index pairing product.
pub fn inner_pairing_product(v1: &[G1], v2: &[G2]) -> Gt {
    assert_eq!(v1.len(), v2.len(), "inner pairing product: length mismatch");
    assert!(!v1.is_empty(), "inner pairing product: empty vectors");
    multi_pairing(v1, v2)
}

/// Fold two equal-length halves as `k·left + right`.
pub fn fold_g1(left: &[G1], right: &[G1], k: &Scalar) -> G1Vector {
    assert_eq!(left.len(), right.len(), "fold: length mismatch");
    G1Vector(
        left.iter()
            .zip(right)
            .map(|(l, r)| *l * *k + *r)
            .collect(),
    )
}

/// Fold two equal-length halves as `k·left + right`.
pub fn fold_g2(left: &[G2], right: &[G2], k: &Scalar) -> G2Vector {
    assert_eq!(left.len(), right.len(), "fold: length mismatch");
    G2Vector(
        left.iter()
            .zip(right)
            .map(|(l, r)| *l * *k + *r)
            .collect(),
    )
}

impl G1Vector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pointwise sum with another vector of the same length.
    pub fn add(&self, rhs: &G1Vector) -> G1Vector {
        assert_eq!(self.len(), rhs.len(), "vector addition: length mismatch");
        G1Vector(self.0.iter().zip(&rhs.0).map(|(a, b)| *a + *b).collect())
    }

    /// Pointwise negation.
    pub fn neg(&self) -> G1Vector {
        G1Vector(self.0.iter().map(|a| -*a).collect())
    }

    /// Pointwise multiplication by a single scalar.
    pub fn mul(&self, k: &Scalar) -> G1Vector {
        G1Vector(self.0.iter().map(|a| *a * *k).collect())
    }

    /// `n` copies of a single element.
    pub fn duplicate(base: &G1, n: usize) -> G1Vector {
        G1Vector(vec![*base; n])
    }

    /// Inner pairing product against a G2 vector of the same length.
    pub fn inner_prod(&self, rhs: &G2Vector) -> Gt {
        inner_pairing_product(&self.0, &rhs.0)
    }

    /// Concatenated canonical encodings of all entries.
    pub fn bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|a| element_bytes(a)).collect()
    }
}

impl G2Vector {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pointwise sum with another vector of the same length.
    pub fn add(&self, rhs: &G2Vector) -> G2Vector {
        assert_eq!(self.len(), rhs.len(), "vector addition: length mismatch");
        G2Vector(self.0.iter().zip(&rhs.0).map(|(a, b)| *a + *b).collect())
    }

    /// Pointwise multiplication by a single scalar.
    pub fn mul(&self, k: &Scalar) -> G2Vector {
        G2Vector(self.0.iter().map(|a| *a * *k).collect())
    }

    /// Pointwise multiplication by a scalar vector of the same length.
    pub fn mulv(&self, ks: &[Scalar]) -> G2Vector {
        assert_eq!(self.len(), ks.len(), "vector scaling: length mismatch");
        G2Vector(self.0.iter().zip(ks).map(|(a, k)| *a * *k).collect())
    }

    /// `n` copies of a single element.
    pub fn duplicate(base: &G2, n: usize) -> G2Vector {
        G2Vector(vec![*base; n])
    }

    /// Sum of all entries.
    pub fn sum(&self) -> G2 {
        assert!(!self.is_empty(), "sum of an empty vector");
        self.0.iter().skip(1).fold(self.0[0], |acc, a| acc + *a)
    }

    /// Concatenated canonical encodings of all entries.
    pub fn bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|a| element_bytes(a)).collect()
    }
}

//! # dualdory
//!
//! Linkable threshold ring signatures with logarithmic-size signatures and
//! logarithmic verifier cost, over the BN254 pairing curve.
//!
//! A signer holding one key out of a public ring of `n` keys produces a
//! signature proving that *some* ring member signed, without revealing
//! which one. Each signature exposes a deterministic per-epoch tag, so two
//! signatures by the same signer under the same epoch prefix are linkable
//! and a threshold set can reject duplicates.
//!
//! The construction layers a Dory inner-pairing-product argument (a
//! bilinear Bulletproof variant, [eprint 2020/1274]) beneath a
//! DualRing-style sigma protocol, plus a discrete-log-equality proof tying
//! the tag to a Pedersen commitment of the signing key.
//!
//! [eprint 2020/1274]: https://eprint.iacr.org/2020/1274
//!
//! ## Structure
//!
//! - [`curve`] - BN254 types, hash-to-curve, pairing and MSM helpers
//! - [`algebra`] - G1/G2 vectors and the inner pairing product
//! - [`transcript`] - Fiat-Shamir hashing
//! - [`setup`] - layered Dory public parameters, derived from `n`
//! - [`reduce`] - the recursive inner-pairing-product argument
//! - [`messages`] / [`proof`] - round bundles and the proof object
//! - [`tag`] - per-epoch linkability tags and their sigma proof
//! - [`ring`] - key generation, preprocessing, sign, verify, threshold
//! - [`stats`] - operation counters for benchmarking
//! - [`error`] - error types
//!
//! ## Usage
//!
//! ```ignore
//! use dualdory::{keygen, verify_threshold_signatures, ParamChain, Ring, RingParams};
//!
//! let mut rng = rand::thread_rng();
//! let (keys, members): (Vec<_>, Vec<_>) = (0..4).map(|_| keygen(&mut rng)).unzip();
//! let ring = Ring(keys);
//!
//! // Shared, reusable parameters for rings of this size.
//! let params = RingParams::new(ParamChain::generate(4), &ring);
//!
//! let sig = members[0].sign(&params, b"message", b"epoch-1", &ring, &mut rng);
//! sig.verify(&params, b"message", b"epoch-1")?;
//! ```

pub mod algebra;
pub mod curve;
pub mod error;
pub mod messages;
pub mod proof;
pub mod reduce;
pub mod ring;
pub mod setup;
pub mod stats;
pub mod tag;
pub mod transcript;

pub use curve::{Scalar, G1, G2, Gt};
pub use error::{EncodingError, VerifyError};
pub use proof::{DoryProof, ScalarProductElements};
pub use reduce::{commit, reduce, verify_reduce, Commitment, Witness};
pub use ring::{
    keygen, preprocess, verify_threshold_signatures, PendingSignature, PreProcessed, PrivateKey,
    PublicKey, Ring, RingParams, RingSignature,
};
pub use setup::{ParamChain, PublicParams};
pub use stats::Stats;
pub use tag::{TagProof, TagWitness};

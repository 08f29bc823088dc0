//! Integration tests for the linkability tag proof.

use ark_std::UniformRand;
use dualdory::tag::{self, TagProof};
use dualdory::{Scalar, VerifyError};

#[test]
fn tag_proof_verifies() {
    let mut rng = rand::thread_rng();
    let sk = Scalar::rand(&mut rng);
    let (witness, com) = tag::commit(&sk, &mut rng);

    let prefix = [1u8, 2, 3];
    let t = tag::tag(&sk, &prefix);

    let proof = tag::prove(&prefix, &sk, &witness, &[], &mut rng);
    proof.verify(&t, &com, &prefix, &[]).unwrap();

    assert_eq!(
        proof.verify(&t, &com, &[3, 2, 1], &[]),
        Err(VerifyError::TagMismatch)
    );
}

#[test]
fn tag_is_deterministic_per_key_and_prefix() {
    let mut rng = rand::thread_rng();
    let sk1 = Scalar::rand(&mut rng);
    let sk2 = Scalar::rand(&mut rng);

    assert_eq!(tag::tag(&sk1, b"epoch"), tag::tag(&sk1, b"epoch"));
    assert_ne!(tag::tag(&sk1, b"epoch"), tag::tag(&sk1, b"other"));
    assert_ne!(tag::tag(&sk1, b"epoch"), tag::tag(&sk2, b"epoch"));
}

#[test]
fn proof_binds_extras() {
    let mut rng = rand::thread_rng();
    let sk = Scalar::rand(&mut rng);
    let (witness, com) = tag::commit(&sk, &mut rng);

    let prefix = b"epoch";
    let t = tag::tag(&sk, prefix);

    let msg = b"attached message";
    let context = [0xAAu8; 32];
    let proof = tag::prove(prefix, &sk, &witness, &[msg, &context], &mut rng);

    proof.verify(&t, &com, prefix, &[msg, &context]).unwrap();

    // A single flipped context byte invalidates the challenge.
    let mut flipped = context;
    flipped[0] ^= 1;
    assert_eq!(
        proof.verify(&t, &com, prefix, &[msg, &flipped]),
        Err(VerifyError::TagMismatch)
    );

    assert_eq!(
        proof.verify(&t, &com, prefix, &[b"attached messagf", &context]),
        Err(VerifyError::TagMismatch)
    );
}

#[test]
fn proof_rejects_foreign_commitment() {
    let mut rng = rand::thread_rng();
    let sk = Scalar::rand(&mut rng);
    let (witness, com) = tag::commit(&sk, &mut rng);
    let (_, other_com) = tag::commit(&sk, &mut rng);

    let prefix = b"epoch";
    let t = tag::tag(&sk, prefix);
    let proof = tag::prove(prefix, &sk, &witness, &[], &mut rng);

    proof.verify(&t, &com, prefix, &[]).unwrap();
    assert_eq!(
        proof.verify(&t, &other_com, prefix, &[]),
        Err(VerifyError::CommitmentMismatch)
    );
}

#[test]
fn proof_rejects_foreign_tag() {
    let mut rng = rand::thread_rng();
    let sk = Scalar::rand(&mut rng);
    let other_sk = Scalar::rand(&mut rng);
    let (witness, com) = tag::commit(&sk, &mut rng);

    let prefix = b"epoch";
    let proof = tag::prove(prefix, &sk, &witness, &[], &mut rng);

    assert_eq!(
        proof.verify(&tag::tag(&other_sk, prefix), &com, prefix, &[]),
        Err(VerifyError::TagMismatch)
    );
}

#[test]
fn proof_wire_roundtrip() {
    let mut rng = rand::thread_rng();
    let sk = Scalar::rand(&mut rng);
    let (witness, com) = tag::commit(&sk, &mut rng);

    let prefix = b"epoch";
    let t = tag::tag(&sk, prefix);
    let proof = tag::prove(prefix, &sk, &witness, &[], &mut rng);

    let decoded = TagProof::from_bytes(&proof.to_bytes()).unwrap();
    assert_eq!(decoded, proof);
    decoded.verify(&t, &com, prefix, &[]).unwrap();

    assert!(TagProof::from_bytes(b"garbage").is_err());
}

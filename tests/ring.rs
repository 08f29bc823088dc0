//! End-to-end tests for the threshold ring signature.

use rand_core::RngCore;

use dualdory::{
    keygen, verify_threshold_signatures, ParamChain, PrivateKey, Ring, RingParams, RingSignature,
    VerifyError,
};

fn make_ring(n: usize) -> (Vec<PrivateKey>, Ring, RingParams) {
    let mut rng = rand::thread_rng();
    let (members, keys): (Vec<_>, Vec<_>) = (0..n).map(|_| keygen(&mut rng)).unzip();
    let ring = Ring(members);
    let params = RingParams::new(ParamChain::generate(n), &ring);
    (keys, ring, params)
}

fn random_msg() -> [u8; 32] {
    let mut msg = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut msg);
    msg
}

#[test]
fn threshold_ring_signature() {
    let (keys, ring, params) = make_ring(4);
    let mut rng = rand::thread_rng();

    let msg = random_msg();
    let prefix = [1u8, 2, 3];

    let sig1 = keys[0].sign(&params, &msg, &prefix, &ring, &mut rng);
    let sig2 = keys[1].sign(&params, &msg, &prefix, &ring, &mut rng);

    verify_threshold_signatures(&params, &msg, &prefix, &[sig1.clone(), sig2]).unwrap();

    let err = verify_threshold_signatures(&params, &msg, &prefix, &[sig1.clone(), sig1])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "signature set was signed by 1 out of 2 distinct signers"
    );
}

#[test]
fn every_ring_member_can_sign() {
    let (keys, ring, params) = make_ring(4);
    let mut rng = rand::thread_rng();

    let msg = random_msg();
    let prefix = b"epoch-7";

    for key in &keys {
        let sig = key.sign(&params, &msg, prefix, &ring, &mut rng);
        sig.verify(&params, &msg, prefix).unwrap();
    }
}

#[test]
fn tags_link_same_signer_and_separate_distinct_signers() {
    let (keys, ring, params) = make_ring(4);
    let mut rng = rand::thread_rng();

    let prefix = b"audit-window-1";

    let first = keys[2].sign(&params, &random_msg(), prefix, &ring, &mut rng);
    let second = keys[2].sign(&params, &random_msg(), prefix, &ring, &mut rng);
    assert_eq!(first.tag, second.tag);

    let other_signer = keys[3].sign(&params, &random_msg(), prefix, &ring, &mut rng);
    assert_ne!(first.tag, other_signer.tag);

    let other_epoch = keys[2].sign(&params, &random_msg(), b"audit-window-2", &ring, &mut rng);
    assert_ne!(first.tag, other_epoch.tag);
}

#[test]
fn tampered_message_fails_tag_check() {
    let (keys, ring, params) = make_ring(4);
    let mut rng = rand::thread_rng();

    let msg = random_msg();
    let prefix = b"epoch";
    let sig = keys[0].sign(&params, &msg, prefix, &ring, &mut rng);

    let mut tampered = msg;
    tampered[0] ^= 1;
    assert_eq!(
        sig.verify(&params, &tampered, prefix),
        Err(VerifyError::TagMismatch)
    );

    // Unchanged message still verifies.
    sig.verify(&params, &msg, prefix).unwrap();
}

#[test]
fn tampered_b_fails_a_dory_check() {
    let (keys, ring, params) = make_ring(4);
    let mut rng = rand::thread_rng();

    let msg = random_msg();
    let prefix = b"epoch";
    let mut sig = keys[0].sign(&params, &msg, prefix, &ring, &mut rng);

    sig.b = sig.b + sig.b;
    let err = sig.verify(&params, &msg, prefix).unwrap_err();
    assert!(
        matches!(
            err,
            VerifyError::FirstDoryProof | VerifyError::SecondDoryProof
        ),
        "unexpected error: {err}"
    );
}

#[test]
fn threshold_surfaces_member_failure() {
    let (keys, ring, params) = make_ring(4);
    let mut rng = rand::thread_rng();

    let msg = random_msg();
    let prefix = b"epoch";

    let good = keys[0].sign(&params, &msg, prefix, &ring, &mut rng);
    let mut bad = keys[1].sign(&params, &msg, prefix, &ring, &mut rng);
    bad.z = bad.z + bad.z;

    assert!(verify_threshold_signatures(&params, &msg, prefix, &[good, bad]).is_err());
}

#[test]
fn offline_online_split_matches_direct_signing() {
    let (keys, ring, params) = make_ring(4);
    let mut rng = rand::thread_rng();

    // The ring proof can be prepared before the message exists.
    let (witness, pending) = keys[1].preprocess_ring_proof(&params, &ring, &mut rng);

    let msg = random_msg();
    let prefix = b"late-binding-epoch";
    let sig = keys[1].append_tag_proof(pending, &witness, &msg, prefix, &mut rng);

    sig.verify(&params, &msg, prefix).unwrap();

    // Same signer, same epoch: the split flow produces the same tag as
    // direct signing.
    let direct = keys[1].sign(&params, &msg, prefix, &ring, &mut rng);
    assert_eq!(sig.tag, direct.tag);
}

#[test]
fn signature_wire_roundtrip() {
    let (keys, ring, params) = make_ring(4);
    let mut rng = rand::thread_rng();

    let msg = random_msg();
    let prefix = b"epoch";
    let sig = keys[0].sign(&params, &msg, prefix, &ring, &mut rng);

    let decoded = RingSignature::from_bytes(&sig.to_bytes()).unwrap();
    assert_eq!(decoded.to_bytes(), sig.to_bytes());
    decoded.verify(&params, &msg, prefix).unwrap();

    assert!(RingSignature::from_bytes(b"garbage").is_err());
}

#[test]
fn signatures_by_different_members_are_indistinguishable_in_size() {
    let (keys, ring, params) = make_ring(4);
    let mut rng = rand::thread_rng();

    let msg = random_msg();
    let prefix = b"epoch";

    let by_first = keys[0].sign(&params, &msg, prefix, &ring, &mut rng);
    let by_last = keys[3].sign(&params, &msg, prefix, &ring, &mut rng);
    assert_eq!(by_first.to_bytes().len(), by_last.to_bytes().len());
}

#[test]
fn signature_size_grows_logarithmically() {
    let mut rng = rand::thread_rng();
    let mut sizes = Vec::new();

    for n in [4usize, 8, 16] {
        let (keys, ring, params) = make_ring(n);
        let sig = keys[0].sign(&params, &random_msg(), b"epoch", &ring, &mut rng);
        sizes.push(sig.to_bytes().len());
    }

    // One extra reduction round per doubling: constant byte growth, no
    // linear-in-n term. DER length prefixes can wiggle by a few bytes.
    let first_delta = sizes[1] as i64 - sizes[0] as i64;
    let second_delta = sizes[2] as i64 - sizes[1] as i64;
    assert!(first_delta > 0 && second_delta > 0);
    assert!(
        (first_delta - second_delta).abs() <= 8,
        "per-doubling growth not constant: {sizes:?}"
    );
}

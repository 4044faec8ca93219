use por_stark::fft::fft;
use por_stark::field::FieldElement;
use por_stark::fri::{
    prove_committed_low_degree, prove_low_degree, round_count, verify_low_degree_proof, FriError,
};
use por_stark::hash::Digest;
use por_stark::merkle::MerkleTree;
use proptest::prelude::*;

const EXCLUDE: usize = 8;
const QUERIES: usize = 16;

fn domain_root(size: u64) -> FieldElement {
    FieldElement::root_of_unity(FieldElement::GENERATOR, size)
}

fn codeword(coefficients: &[FieldElement], root: FieldElement) -> Vec<FieldElement> {
    fft(coefficients, root)
}

fn sample_coefficients(degree_bound: usize, seed: u64) -> Vec<FieldElement> {
    (0..degree_bound as u64)
        .map(|i| FieldElement::new(seed.wrapping_mul(0x9e37_79b9).wrapping_add(i * i + 17)))
        .collect()
}

fn commit(values: &[FieldElement]) -> Digest {
    MerkleTree::commit_elements(values)
        .expect("commitment")
        .root()
}

#[test]
fn round_count_follows_the_quartic_reduction() {
    assert_eq!(round_count(16), 0);
    assert_eq!(round_count(64), 1);
    assert_eq!(round_count(256), 2);
    assert_eq!(round_count(1024), 3);
}

#[test]
fn honest_codeword_verifies_over_two_rounds() {
    let root = domain_root(2048);
    let values = codeword(&sample_coefficients(256, 3), root);
    let proof = prove_low_degree(&values, root, 256, EXCLUDE, QUERIES).expect("proof");
    assert_eq!(proof.rounds.len(), 2);
    assert_eq!(proof.remainder.len(), 128);
    verify_low_degree_proof(&commit(&values), root, &proof, 256, EXCLUDE, QUERIES)
        .expect("honest proof verifies");
}

#[test]
fn small_bounds_are_checked_directly() {
    let root = domain_root(128);
    let values = codeword(&sample_coefficients(16, 5), root);
    let proof = prove_low_degree(&values, root, 16, EXCLUDE, QUERIES).expect("proof");
    assert!(proof.rounds.is_empty());
    assert_eq!(proof.remainder, values);
    verify_low_degree_proof(&commit(&values), root, &proof, 16, EXCLUDE, QUERIES)
        .expect("direct proof verifies");
}

#[test]
fn random_values_are_not_low_degree() {
    let root = domain_root(512);
    let values: Vec<FieldElement> = (0..512u64)
        .map(|i| FieldElement::new(i.wrapping_mul(0x5851_f42d_4c95_7f2d)))
        .collect();
    let proof = prove_low_degree(&values, root, 64, EXCLUDE, QUERIES).expect("proof");
    assert!(matches!(
        verify_low_degree_proof(&commit(&values), root, &proof, 64, EXCLUDE, QUERIES),
        Err(FriError::RemainderDegree { .. })
    ));
}

#[test]
fn degree_just_above_the_bound_is_rejected() {
    let root = domain_root(512);
    let values = codeword(&sample_coefficients(65, 9), root);
    let proof = prove_low_degree(&values, root, 64, EXCLUDE, QUERIES).expect("proof");
    assert!(verify_low_degree_proof(&commit(&values), root, &proof, 64, EXCLUDE, QUERIES).is_err());
}

#[test]
fn tampered_remainder_fails_its_commitment() {
    let root = domain_root(512);
    let values = codeword(&sample_coefficients(64, 11), root);
    let mut proof = prove_low_degree(&values, root, 64, EXCLUDE, QUERIES).expect("proof");
    proof.remainder[1] += FieldElement::ONE;
    assert_eq!(
        verify_low_degree_proof(&commit(&values), root, &proof, 64, EXCLUDE, QUERIES),
        Err(FriError::RemainderRootMismatch)
    );
}

#[test]
fn missing_round_is_rejected() {
    let root = domain_root(2048);
    let values = codeword(&sample_coefficients(256, 13), root);
    let mut proof = prove_low_degree(&values, root, 256, EXCLUDE, QUERIES).expect("proof");
    proof.rounds.pop();
    assert_eq!(
        verify_low_degree_proof(&commit(&values), root, &proof, 256, EXCLUDE, QUERIES),
        Err(FriError::RoundCountMismatch {
            expected: 2,
            got: 1
        })
    );
}

#[test]
fn foreign_commitment_is_rejected() {
    let root = domain_root(512);
    let values = codeword(&sample_coefficients(64, 21), root);
    let proof = prove_low_degree(&values, root, 64, EXCLUDE, QUERIES).expect("proof");
    let other = Digest::from_bytes([3u8; 32]);
    assert!(matches!(
        verify_low_degree_proof(&other, root, &proof, 64, EXCLUDE, QUERIES),
        Err(FriError::Merkle { round: 0, .. })
    ));
}

#[test]
fn existing_commitment_is_reused() {
    let root = domain_root(1024);
    let values = codeword(&sample_coefficients(128, 11), root);
    let tree = MerkleTree::commit_elements(&values).expect("commitment");
    let tree_root = tree.root();
    let proof = prove_committed_low_degree(&values, tree, root, 128, EXCLUDE, QUERIES)
        .expect("proof");
    assert_eq!(
        proof,
        prove_low_degree(&values, root, 128, EXCLUDE, QUERIES).expect("proof")
    );
    verify_low_degree_proof(&tree_root, root, &proof, 128, EXCLUDE, QUERIES)
        .expect("proof over the caller's tree verifies");

    let short = MerkleTree::commit_elements(&values[..512]).expect("commitment");
    assert_eq!(
        prove_committed_low_degree(&values, short, root, 128, EXCLUDE, QUERIES).unwrap_err(),
        FriError::DomainMismatch {
            len: 512,
            domain: 1024
        }
    );
}

#[test]
fn degree_bound_must_fit_the_domain() {
    let root = domain_root(64);
    let values = vec![FieldElement::ONE; 64];
    assert_eq!(
        prove_low_degree(&values, root, 64, EXCLUDE, QUERIES).unwrap_err(),
        FriError::DegreeBoundTooLarge {
            maxdeg_plus_1: 64,
            domain: 64
        }
    );
    assert!(matches!(
        prove_low_degree(&values[..32], root, 16, EXCLUDE, QUERIES),
        Err(FriError::DomainMismatch { len: 32, domain: 64 })
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn low_degree_codewords_always_verify(
        coefficients in prop::collection::vec(any::<u64>(), 1..=64usize),
    ) {
        let root = domain_root(512);
        let coefficients: Vec<FieldElement> =
            coefficients.into_iter().map(FieldElement::new).collect();
        let values = codeword(&coefficients, root);
        let proof = prove_low_degree(&values, root, 64, EXCLUDE, QUERIES).expect("proof");
        prop_assert!(
            verify_low_degree_proof(&commit(&values), root, &proof, 64, EXCLUDE, QUERIES).is_ok()
        );
    }
}

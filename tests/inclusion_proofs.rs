mod _fixtures;

use _fixtures::{solvency_fixture, test_params, user_balances, user_ids, USERS, UTS};
use por_stark::hash::Digest;
use por_stark::params::PorParamsBuilder;
use por_stark::proof::{
    prove_with_artifacts, verify, verify_inclusion_proof, InclusionProof, ProverError,
    VerifierError,
};
use por_stark::FieldElement;

fn proof_for(user: usize) -> InclusionProof {
    solvency_fixture()
        .artifacts
        .inclusion_proof(user)
        .expect("inclusion proof")
}

#[test]
fn every_real_user_has_a_valid_inclusion_proof() {
    let output = solvency_fixture();
    let params = test_params();
    let balances = user_balances(USERS);
    let ids = user_ids(USERS);
    assert_eq!(output.artifacts.user_count(), USERS);
    assert_eq!(output.artifacts.trace_root(), output.proof.trace_root);

    for user in 0..USERS {
        let proof = proof_for(user);
        let expected: Vec<i64> = balances.iter().map(|coin| coin[user]).collect();
        assert_eq!(proof.balances, expected);
        assert_eq!(proof.user_id, ids[user]);
        assert_eq!(proof.uts, UTS);
        assert_eq!(
            proof.net_value,
            FieldElement::new(expected.iter().sum::<i64>() as u64)
        );
        verify_inclusion_proof(&params, &output.proof.trace_root, &proof)
            .expect("inclusion verifies");
    }
}

#[test]
fn negative_balances_are_reported_signed() {
    let proof = proof_for(4);
    assert_eq!(proof.balances[1], -5);
}

#[test]
fn padding_users_have_no_inclusion_proof() {
    let err = solvency_fixture()
        .artifacts
        .inclusion_proof(USERS)
        .unwrap_err();
    assert_eq!(err, ProverError::UnknownUser { user: USERS, users: USERS });
}

#[test]
fn altered_balance_breaks_the_sum() {
    let mut proof = proof_for(2);
    proof.balances[0] += 1;
    assert_eq!(
        verify_inclusion_proof(&test_params(), &solvency_fixture().proof.trace_root, &proof),
        Err(VerifierError::InclusionSumMismatch)
    );
}

#[test]
fn consistent_forgery_breaks_the_leaf_hash() {
    let mut proof = proof_for(2);
    proof.balances[0] += 1;
    proof.net_value += FieldElement::ONE;
    assert_eq!(
        verify_inclusion_proof(&test_params(), &solvency_fixture().proof.trace_root, &proof),
        Err(VerifierError::InclusionLeafHash)
    );
}

#[test]
fn moving_balance_between_coins_breaks_the_leaf_hash() {
    let mut proof = proof_for(7);
    proof.balances[0] -= 1;
    proof.balances[2] += 1;
    assert_eq!(
        verify_inclusion_proof(&test_params(), &solvency_fixture().proof.trace_root, &proof),
        Err(VerifierError::InclusionLeafHash)
    );
}

#[test]
fn proof_for_another_position_fails_the_branch() {
    let mut proof = proof_for(3);
    proof.user_index = 5;
    assert!(matches!(
        verify_inclusion_proof(&test_params(), &solvency_fixture().proof.trace_root, &proof),
        Err(VerifierError::InclusionBranch(_))
    ));
}

#[test]
fn wrong_root_fails_the_branch() {
    let proof = proof_for(0);
    let root = Digest::from_bytes([7u8; 32]);
    assert!(matches!(
        verify_inclusion_proof(&test_params(), &root, &proof),
        Err(VerifierError::InclusionBranch(_))
    ));
}

#[test]
fn oversized_balances_are_rejected() {
    let params = test_params();
    let mut proof = proof_for(1);
    let huge = params.max_user_value() as i64 + 1;
    proof.balances[0] = huge;
    assert_eq!(
        verify_inclusion_proof(&params, &solvency_fixture().proof.trace_root, &proof),
        Err(VerifierError::InclusionBalanceOutOfRange { value: huge })
    );
}

#[test]
fn net_value_above_the_balance_limit_is_accepted() {
    let params = PorParamsBuilder::new()
        .pow_bits(4)
        .max_user_value(1_000)
        .build()
        .expect("params");
    let balances = vec![vec![1_000, 1, 1], vec![1_000, 1, 1]];
    let output = prove_with_artifacts(&params, &user_ids(3), &balances, 8, 2).expect("proof");
    verify(&params, &output.claimed_sums, &output.proof, 2).expect("solvency verifies");

    let proof = output.artifacts.inclusion_proof(0).expect("inclusion proof");
    assert_eq!(proof.net_value, FieldElement::new(2_000));
    verify_inclusion_proof(&params, &output.proof.trace_root, &proof)
        .expect("net value may exceed the per-balance limit");
}

#[test]
fn inclusion_proof_round_trips_through_json() {
    let proof = proof_for(9);
    let json = serde_json::to_string(&proof).expect("serialise");
    let decoded: InclusionProof = serde_json::from_str(&json).expect("parse");
    assert_eq!(decoded, proof);
}

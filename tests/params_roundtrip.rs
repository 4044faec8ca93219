use por_stark::params::{ParamsError, PorParams, PorParamsBuilder};
use proptest::prelude::*;

#[test]
fn defaults_match_the_documented_values() {
    let params = PorParams::default();
    assert_eq!(PorParams::modulus(), 0xffff_ffff_0000_0001);
    assert_eq!(params.nonresidue().as_u64(), 7);
    assert_eq!(params.extension_factor(), 8);
    assert_eq!(params.spot_check_security_factor(), 80);
    assert_eq!(params.fri_query_count(), 16);
    assert_eq!(params.pow_bits(), 12);
    assert_eq!(params.max_uts(), 16);
    assert_eq!(params.max_user_num_for_one_batch(), 1 << 16);
    assert_eq!(params.max_user_value(), 1 << 40);
}

#[test]
fn partial_json_takes_defaults() {
    let params = PorParams::from_json_str(r#"{"pow_bits": 4, "max_uts": 8}"#).expect("params");
    assert_eq!(params.pow_bits(), 4);
    assert_eq!(params.max_uts(), 8);
    assert_eq!(params.extension_factor(), 8);
}

#[test]
fn invalid_json_values_are_rejected() {
    assert_eq!(
        PorParams::from_json_str(r#"{"extension_factor": 12}"#),
        Err(ParamsError::InvalidExtensionFactor(12))
    );
    assert_eq!(
        PorParams::from_json_str(r#"{"spot_check_security_factor": 0}"#),
        Err(ParamsError::ZeroSpotChecks)
    );
    assert!(matches!(
        PorParams::from_json_str("{not json"),
        Err(ParamsError::Json(_))
    ));
}

#[test]
fn limits_that_let_batch_sums_wrap_are_rejected() {
    let half = (PorParams::modulus() / 2) as u128;
    let err = PorParams::from_json_str(r#"{"max_user_value": 1152921504606846976}"#).unwrap_err();
    assert_eq!(
        err,
        ParamsError::SumMayWrap {
            max_users: 1 << 16,
            per_user: 1 << 60,
        }
    );
    assert!(matches!(
        PorParams::from_json_str(r#"{"max_uts": 32}"#),
        Err(ParamsError::SumMayWrap { .. })
    ));

    let params =
        PorParams::from_json_str(r#"{"max_uts": 32, "max_user_num_for_one_batch": 4}"#)
            .expect("small batches may use the widest trace");
    assert_eq!(params.max_net_total(), 1 << 62);
    assert!(params.max_net_total() < half);
}

#[test]
fn deserialising_params_revalidates() {
    let err = serde_json::from_str::<PorParams>(r#"{"max_user_value": 0}"#).unwrap_err();
    assert!(err.to_string().contains("max user value"));
}

proptest! {
    #[test]
    fn valid_params_round_trip_through_json(
        ef_log2 in 3u32..6,
        spot_checks in 1usize..200,
        queries in 1usize..40,
        pow_bits in 0u32..=32,
        uts_log2 in 2u32..=4,
        batch_log2 in 1u32..=16,
        max_value in 1u64..(1 << 46),
    ) {
        let params = PorParamsBuilder::new()
            .extension_factor(1 << ef_log2)
            .spot_check_security_factor(spot_checks)
            .fri_query_count(queries)
            .pow_bits(pow_bits)
            .max_uts(1 << uts_log2)
            .max_user_num_for_one_batch(1 << batch_log2)
            .max_user_value(max_value)
            .build()
            .expect("valid params");
        let half = (PorParams::modulus() / 2) as u128;
        prop_assert!(params.max_coin_sum() < half);
        prop_assert!(params.max_net_total() < half);
        let json = serde_json::to_string(&params).expect("serialise");
        prop_assert_eq!(PorParams::from_json_str(&json).expect("parse"), params);
    }
}

use thiserror::Error;

use super::PorParams;
use crate::field::{FieldElement, MODULUS};

/// Largest user trace size whose base-4 range check stays below the modulus.
pub(crate) const UTS_CEILING: usize = 32;

/// Error enumeration for parameter validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// The nonresidue does not generate the full two-adic subgroup.
    #[error("nonresidue {0} is a quadratic residue modulo p")]
    InvalidNonresidue(u64),
    /// Extension factor must be a power of two of at least 8.
    #[error("extension factor {0} must be a power of two >= 8")]
    InvalidExtensionFactor(usize),
    /// Spot-check count must be positive.
    #[error("spot check security factor must be positive")]
    ZeroSpotChecks,
    /// FRI query count must be positive.
    #[error("fri query count must be positive")]
    ZeroFriQueries,
    /// Proof-of-work difficulty out of range.
    #[error("pow bits {got} exceed the maximum of {max}")]
    PowBitsTooLarge { max: u32, got: u32 },
    /// `max_uts` must be a power of two in `[4, 32]`.
    #[error("max uts {0} must be a power of two in [4, {UTS_CEILING}]")]
    InvalidMaxUts(usize),
    /// Batch limit must be a power of two of at least 2.
    #[error("max users per batch {0} must be a power of two >= 2")]
    InvalidBatchLimit(usize),
    /// `max_user_value` must be positive and below `p / 2`.
    #[error("max user value {0} must lie in (0, p/2)")]
    InvalidMaxUserValue(u64),
    /// A full batch could push a running sum past `p / 2`, where a wrapped
    /// total becomes indistinguishable from the real one.
    #[error("{max_users} users of up to {per_user} each can wrap a batch sum modulo p")]
    SumMayWrap { max_users: usize, per_user: u128 },
    /// JSON input could not be parsed.
    #[error("invalid parameter json: {0}")]
    Json(String),
}

const MAX_POW_BITS: u32 = 32;

/// Validates every parameter invariant.
pub(crate) fn validate(params: &PorParams) -> Result<(), ParamsError> {
    validate_domain(params.nonresidue, params.extension_factor)?;
    validate_soundness(
        params.spot_check_security_factor,
        params.fri_query_count,
        params.pow_bits,
    )?;
    validate_limits(
        params.max_uts,
        params.max_user_num_for_one_batch,
        params.max_user_value,
    )
}

fn validate_domain(nonresidue: u64, extension_factor: usize) -> Result<(), ParamsError> {
    let candidate = FieldElement::new(nonresidue);
    if candidate.is_zero() || candidate.pow((MODULUS - 1) / 2) == FieldElement::ONE {
        return Err(ParamsError::InvalidNonresidue(nonresidue));
    }
    if extension_factor < 8 || !extension_factor.is_power_of_two() {
        return Err(ParamsError::InvalidExtensionFactor(extension_factor));
    }
    Ok(())
}

fn validate_soundness(
    spot_checks: usize,
    fri_queries: usize,
    pow_bits: u32,
) -> Result<(), ParamsError> {
    if spot_checks == 0 {
        return Err(ParamsError::ZeroSpotChecks);
    }
    if fri_queries == 0 {
        return Err(ParamsError::ZeroFriQueries);
    }
    if pow_bits > MAX_POW_BITS {
        return Err(ParamsError::PowBitsTooLarge {
            max: MAX_POW_BITS,
            got: pow_bits,
        });
    }
    Ok(())
}

fn validate_limits(
    max_uts: usize,
    max_users: usize,
    max_user_value: u64,
) -> Result<(), ParamsError> {
    if !(4..=UTS_CEILING).contains(&max_uts) || !max_uts.is_power_of_two() {
        return Err(ParamsError::InvalidMaxUts(max_uts));
    }
    if max_users < 2 || !max_users.is_power_of_two() {
        return Err(ParamsError::InvalidBatchLimit(max_users));
    }
    if max_user_value == 0 || max_user_value >= MODULUS / 2 {
        return Err(ParamsError::InvalidMaxUserValue(max_user_value));
    }
    for per_user in [max_user_value as u128, net_value_bound(max_uts)] {
        if batch_sum_bound(max_users, per_user) >= SIGNED_HALF {
            return Err(ParamsError::SumMayWrap {
                max_users,
                per_user,
            });
        }
    }
    Ok(())
}

/// Values at or above this read as negative.
const SIGNED_HALF: u128 = (MODULUS / 2) as u128 + 1;

/// Exclusive bound on a net value the base-4 unfolding of `uts` rows accepts.
pub(crate) fn net_value_bound(uts: usize) -> u128 {
    1u128 << (2 * (uts - 2))
}

/// Bound on a running sum over `users` values of magnitude up to `per_user`.
pub(crate) fn batch_sum_bound(users: usize, per_user: u128) -> u128 {
    (users as u128).saturating_mul(per_user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PorParamsBuilder;

    #[test]
    fn defaults_validate() {
        let params = PorParamsBuilder::new().build().expect("defaults");
        assert_eq!(params, PorParams::default());
        assert_eq!(params.extension_factor(), 8);
    }

    #[test]
    fn quadratic_residue_rejected() {
        let err = PorParamsBuilder::new().nonresidue(4).build().unwrap_err();
        assert_eq!(err, ParamsError::InvalidNonresidue(4));
    }

    #[test]
    fn small_extension_rejected() {
        let err = PorParamsBuilder::new()
            .extension_factor(4)
            .build()
            .unwrap_err();
        assert_eq!(err, ParamsError::InvalidExtensionFactor(4));
    }

    #[test]
    fn wrapping_net_sums_rejected() {
        let err = PorParamsBuilder::new().max_uts(32).build().unwrap_err();
        assert_eq!(
            err,
            ParamsError::SumMayWrap {
                max_users: 1 << 16,
                per_user: 1 << 60,
            }
        );
        PorParamsBuilder::new()
            .max_uts(32)
            .max_user_num_for_one_batch(4)
            .build()
            .expect("four users of 4^30 stay below p/2");
    }

    #[test]
    fn wrapping_coin_sums_rejected() {
        let err = PorParamsBuilder::new()
            .max_user_value(1 << 60)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ParamsError::SumMayWrap {
                max_users: 1 << 16,
                per_user: 1 << 60,
            }
        );
        let params = PorParamsBuilder::new()
            .max_user_value(1 << 46)
            .build()
            .expect("2^62 stays below p/2");
        assert!(params.max_coin_sum() < SIGNED_HALF);
        assert!(params.max_net_total() < SIGNED_HALF);
    }

    #[test]
    fn uts_bounds() {
        for bad in [2, 12, 64] {
            let err = PorParamsBuilder::new().max_uts(bad).build().unwrap_err();
            assert_eq!(err, ParamsError::InvalidMaxUts(bad));
        }
    }
}

use serde::{Deserialize, Serialize};

use super::builder::PorParamsBuilder;
use super::validate::{batch_sum_bound, net_value_bound, validate, ParamsError};
use crate::field::{FieldElement, MODULUS};

/// Validated protocol parameters shared by prover and verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PorParamsBuilder", into = "PorParamsBuilder")]
pub struct PorParams {
    pub(crate) nonresidue: u64,
    pub(crate) extension_factor: usize,
    pub(crate) spot_check_security_factor: usize,
    pub(crate) fri_query_count: usize,
    pub(crate) pow_bits: u32,
    pub(crate) max_uts: usize,
    pub(crate) max_user_num_for_one_batch: usize,
    pub(crate) max_user_value: u64,
}

impl PorParams {
    /// Prime modulus of the underlying field.
    pub const fn modulus() -> u64 {
        MODULUS
    }

    /// Generator of the multiplicative group used to derive roots of unity.
    pub fn nonresidue(&self) -> FieldElement {
        FieldElement::new(self.nonresidue)
    }

    /// Blow-up between trace and evaluation domain; also the spot-check
    /// exclusion stride.
    pub const fn extension_factor(&self) -> usize {
        self.extension_factor
    }

    /// Number of spot-checked positions.
    pub const fn spot_check_security_factor(&self) -> usize {
        self.spot_check_security_factor
    }

    /// Number of indices sampled per FRI round.
    pub const fn fri_query_count(&self) -> usize {
        self.fri_query_count
    }

    /// Leading zero bits required of the proof-of-work hash.
    pub const fn pow_bits(&self) -> u32 {
        self.pow_bits
    }

    /// Largest accepted user trace size.
    pub const fn max_uts(&self) -> usize {
        self.max_uts
    }

    /// Upper bound on the padded number of users in a batch.
    pub const fn max_user_num_for_one_batch(&self) -> usize {
        self.max_user_num_for_one_batch
    }

    /// Largest magnitude accepted for a single balance.
    pub const fn max_user_value(&self) -> u64 {
        self.max_user_value
    }

    /// Largest magnitude an honest per-coin sum can reach.
    pub fn max_coin_sum(&self) -> u128 {
        batch_sum_bound(self.max_user_num_for_one_batch, self.max_user_value as u128)
    }

    /// Exclusive bound on the sum of every net value in a batch.
    pub fn max_net_total(&self) -> u128 {
        batch_sum_bound(self.max_user_num_for_one_batch, net_value_bound(self.max_uts))
    }

    /// Parses and validates parameters from JSON; missing fields take their
    /// defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ParamsError> {
        let builder: PorParamsBuilder =
            serde_json::from_str(json).map_err(|err| ParamsError::Json(err.to_string()))?;
        builder.build()
    }

    pub(crate) fn try_from_builder(builder: &PorParamsBuilder) -> Result<Self, ParamsError> {
        let params = Self {
            nonresidue: builder.nonresidue,
            extension_factor: builder.extension_factor,
            spot_check_security_factor: builder.spot_check_security_factor,
            fri_query_count: builder.fri_query_count,
            pow_bits: builder.pow_bits,
            max_uts: builder.max_uts,
            max_user_num_for_one_batch: builder.max_user_num_for_one_batch,
            max_user_value: builder.max_user_value,
        };
        validate(&params)?;
        Ok(params)
    }
}

impl Default for PorParams {
    fn default() -> Self {
        Self::try_from_builder(&PorParamsBuilder::new())
            .expect("default parameters satisfy validation")
    }
}

impl TryFrom<PorParamsBuilder> for PorParams {
    type Error = ParamsError;

    fn try_from(builder: PorParamsBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl From<PorParams> for PorParamsBuilder {
    fn from(params: PorParams) -> Self {
        Self {
            nonresidue: params.nonresidue,
            extension_factor: params.extension_factor,
            spot_check_security_factor: params.spot_check_security_factor,
            fri_query_count: params.fri_query_count,
            pow_bits: params.pow_bits,
            max_uts: params.max_uts,
            max_user_num_for_one_batch: params.max_user_num_for_one_batch,
            max_user_value: params.max_user_value,
        }
    }
}

use serde::{Deserialize, Serialize};

use super::{ParamsError, PorParams};

/// Builder used to assemble [`PorParams`] with validation.
///
/// The input limits are jointly bounded: a full batch of `max_uts` nets or of
/// `max_user_value` balances must sum to less than `p / 2`.
///
/// | Field | Default |
/// |-------|---------|
/// | `nonresidue` | `7` |
/// | `extension_factor` | `8` |
/// | `spot_check_security_factor` | `80` |
/// | `fri_query_count` | `16` |
/// | `pow_bits` | `12` |
/// | `max_uts` | `16` |
/// | `max_user_num_for_one_batch` | `2^16` |
/// | `max_user_value` | `2^40` |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PorParamsBuilder {
    pub nonresidue: u64,
    pub extension_factor: usize,
    pub spot_check_security_factor: usize,
    pub fri_query_count: usize,
    pub pow_bits: u32,
    pub max_uts: usize,
    pub max_user_num_for_one_batch: usize,
    pub max_user_value: u64,
}

impl PorParamsBuilder {
    /// Returns a builder initialised with the production defaults.
    pub fn new() -> Self {
        Self {
            nonresidue: 7,
            extension_factor: 8,
            spot_check_security_factor: 80,
            fri_query_count: 16,
            pow_bits: 12,
            max_uts: 16,
            max_user_num_for_one_batch: 1 << 16,
            max_user_value: 1 << 40,
        }
    }

    pub fn nonresidue(mut self, value: u64) -> Self {
        self.nonresidue = value;
        self
    }

    pub fn extension_factor(mut self, value: usize) -> Self {
        self.extension_factor = value;
        self
    }

    pub fn spot_check_security_factor(mut self, value: usize) -> Self {
        self.spot_check_security_factor = value;
        self
    }

    pub fn fri_query_count(mut self, value: usize) -> Self {
        self.fri_query_count = value;
        self
    }

    pub fn pow_bits(mut self, value: u32) -> Self {
        self.pow_bits = value;
        self
    }

    pub fn max_uts(mut self, value: usize) -> Self {
        self.max_uts = value;
        self
    }

    pub fn max_user_num_for_one_batch(mut self, value: usize) -> Self {
        self.max_user_num_for_one_batch = value;
        self
    }

    pub fn max_user_value(mut self, value: u64) -> Self {
        self.max_user_value = value;
        self
    }

    /// Validates the builder fields and emits a [`PorParams`] instance.
    pub fn build(&self) -> Result<PorParams, ParamsError> {
        PorParams::try_from_builder(self)
    }
}

impl Default for PorParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

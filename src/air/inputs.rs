//! Normalisation of raw batch inputs.
//!
//! Each step is a pure transform returning new buffers: validation, reduction
//! of signed balances into the field, padding to a power-of-two user count
//! and spreading per-user values over the `uts` rows of their block.

use crate::field::FieldElement;
use crate::params::PorParams;
use crate::utils::MAX_SAMPLE_MODULUS;

use super::errors::AirError;

/// Validated, reduced and padded batch ready for trace construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInputs {
    pub uts: usize,
    /// Users after padding, including the leading zero user.
    pub user_num: usize,
    /// Number of real users supplied by the caller.
    pub real_users: usize,
    /// Ids of the padded users, excluding the leading zero user.
    pub ids: Vec<FieldElement>,
    /// Coin-major balances of the padded users, excluding the leading zero user.
    pub balances: Vec<Vec<FieldElement>>,
}

impl BatchInputs {
    /// Runs every normalisation step on raw inputs.
    pub fn normalise(
        params: &PorParams,
        ids: &[FieldElement],
        balances: &[Vec<i64>],
        uts: usize,
        main_coins: usize,
    ) -> Result<Self, AirError> {
        validate_inputs(params, ids, balances, uts, main_coins)?;
        let reduced = reduce_balances(balances);
        let user_num = padded_user_count(ids.len());
        let (padded_ids, padded_balances) = pad_users(ids, &reduced, user_num);
        Ok(Self {
            uts,
            user_num,
            real_users: ids.len(),
            ids: padded_ids,
            balances: padded_balances,
        })
    }

    pub fn coin_count(&self) -> usize {
        self.balances.len()
    }

    pub fn steps(&self) -> usize {
        self.uts * self.user_num
    }
}

/// Number of users after padding: the batch plus the leading zero user,
/// rounded up to a power of two.
pub fn padded_user_count(users: usize) -> usize {
    (users + 1).next_power_of_two()
}

/// Checks batch shape and configured limits.
pub fn validate_inputs(
    params: &PorParams,
    ids: &[FieldElement],
    balances: &[Vec<i64>],
    uts: usize,
    main_coins: usize,
) -> Result<(), AirError> {
    let max_uts = params.max_uts();
    if !uts.is_power_of_two() || uts < 4 || uts > max_uts {
        return Err(AirError::InvalidUts { uts, max_uts });
    }
    if balances.is_empty() {
        return Err(AirError::NoCoins);
    }
    if ids.is_empty() {
        return Err(AirError::NoUsers);
    }
    if main_coins > balances.len() {
        return Err(AirError::TooManyMainCoins {
            main_coins,
            coins: balances.len(),
        });
    }
    for (coin, column) in balances.iter().enumerate() {
        if column.len() != ids.len() {
            return Err(AirError::BalanceShape {
                coin,
                expected: ids.len(),
                got: column.len(),
            });
        }
    }

    let padded = padded_user_count(ids.len());
    let max = params.max_user_num_for_one_batch();
    if padded > max {
        return Err(AirError::BatchTooLarge {
            users: ids.len(),
            padded,
            max,
        });
    }
    let precision = uts * padded * params.extension_factor();
    if precision >= MAX_SAMPLE_MODULUS {
        return Err(AirError::DomainTooLarge { precision });
    }

    let limit = params.max_user_value();
    for (coin, column) in balances.iter().enumerate() {
        if let Some(user) = column.iter().position(|value| value.unsigned_abs() > limit) {
            return Err(AirError::BalanceOutOfRange {
                coin,
                user,
                value: column[user],
            });
        }
    }
    Ok(())
}

/// Maps signed balances into the field; negatives become `p - |v|`.
pub fn reduce_balances(balances: &[Vec<i64>]) -> Vec<Vec<FieldElement>> {
    balances
        .iter()
        .map(|column| column.iter().copied().map(FieldElement::from_i64).collect())
        .collect()
}

/// Appends zero users until the batch holds `user_num - 1` users.
pub fn pad_users(
    ids: &[FieldElement],
    balances: &[Vec<FieldElement>],
    user_num: usize,
) -> (Vec<FieldElement>, Vec<Vec<FieldElement>>) {
    let target = user_num - 1;
    let pad = |values: &[FieldElement]| {
        let mut out = values.to_vec();
        out.resize(target.max(values.len()), FieldElement::ZERO);
        out
    };
    (pad(ids), balances.iter().map(|column| pad(column)).collect())
}

/// Spreads one value per user onto row `uts - 2` of its block, behind an
/// all-zero leading block.
pub fn spread_over_rows(values: &[FieldElement], uts: usize) -> Vec<FieldElement> {
    let mut out = vec![FieldElement::ZERO; uts * (values.len() + 1)];
    for (user, value) in values.iter().enumerate() {
        out[uts * (user + 1) + uts - 2] = *value;
    }
    out
}

//! Solvency trace construction.
//!
//! The main column holds, per user block of `uts` rows:
//!
//! | row            | value                                   |
//! |----------------|-----------------------------------------|
//! | `0..uts-2`     | `row[k] = row[k + 1] div 4`              |
//! | `uts - 2`      | net value (sum of the user's balances)  |
//! | `uts - 1`      | running sum of net values               |
//!
//! A row-0 value of zero proves the net value lies in `[0, 4^(uts-2))`.  Coin
//! columns carry the balance on row `uts - 2` and the per-coin running sum on
//! row `uts - 1`; the id column carries the id on row `uts - 2`.

use tracing::{debug, instrument};

use crate::fft::EvaluationDomain;
use crate::field::FieldElement;
use crate::utils::map_weighted;

use super::errors::AirError;
use super::inputs::{spread_over_rows, BatchInputs};

/// One column of `steps` trace values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceColumn(Vec<FieldElement>);

impl TraceColumn {
    pub fn new(values: Vec<FieldElement>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[FieldElement] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Low-degree extension onto the evaluation domain.
    pub fn extend(&self, domain: &EvaluationDomain) -> Vec<FieldElement> {
        domain.extend(&self.0)
    }
}

/// Trace columns and the sums they accumulate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvencyTrace {
    pub uts: usize,
    pub user_num: usize,
    pub main: TraceColumn,
    pub coins: Vec<TraceColumn>,
    pub ids: TraceColumn,
    /// Per-coin sums, as field elements.
    pub coin_sums: Vec<FieldElement>,
    /// Sum of every net value, equal to the signed sum of `coin_sums`.
    pub total: u128,
}

impl SolvencyTrace {
    /// Builds every column from normalised inputs.
    ///
    /// Fails with [`AirError::NetValueOutOfRange`] when a user's base-4
    /// unfolding does not reach zero on row 0, which happens exactly for net
    /// values that are negative (huge in the field) or at least `4^(uts-2)`.
    #[instrument(
        skip_all,
        name = "air::SolvencyTrace::build",
        fields(users = batch.user_num, uts = batch.uts)
    )]
    pub fn build(batch: &BatchInputs) -> Result<Self, AirError> {
        let uts = batch.uts;
        let user_num = batch.user_num;
        let steps = batch.steps();

        let mut coins: Vec<Vec<FieldElement>> = batch
            .balances
            .iter()
            .map(|column| spread_over_rows(column, uts))
            .collect();
        let ids = spread_over_rows(&batch.ids, uts);

        let mut main = vec![FieldElement::ZERO; steps];
        for block in 0..user_num {
            let net_row = uts * block + uts - 2;
            main[net_row] = coins.iter().map(|column| column[net_row]).sum();
        }
        for block in 1..user_num {
            let sum_row = uts * block + uts - 1;
            main[sum_row] = main[sum_row - uts] + main[sum_row - 1];
            for column in coins.iter_mut() {
                column[sum_row] = column[sum_row - uts] + column[sum_row - 1];
            }
        }
        for block in 0..user_num {
            let base = uts * block;
            for row in (0..uts - 2).rev() {
                main[base + row] = FieldElement::new(main[base + row + 1].as_u64() / 4);
            }
            if !main[base].is_zero() {
                // Block 0 is the leading zero user; real users start at 1.
                return Err(AirError::NetValueOutOfRange { user: block - 1 });
            }
        }

        let coin_sums: Vec<FieldElement> = coins.iter().map(|column| column[steps - 1]).collect();
        // Parameter limits keep the running sum of nets below p / 2, so the
        // last row is the exact integer total.
        let total = main[steps - 1].as_u64() as u128;
        debug!(steps, coins = coins.len(), "solvency trace built");

        Ok(Self {
            uts,
            user_num,
            main: TraceColumn::new(main),
            coins: coins.into_iter().map(TraceColumn::new).collect(),
            ids: TraceColumn::new(ids),
            coin_sums,
            total,
        })
    }

    pub fn steps(&self) -> usize {
        self.main.len()
    }

    /// Extends the main, coin and id columns, one column per task.
    #[instrument(skip_all, name = "air::SolvencyTrace::extend")]
    pub fn extend(&self, domain: &EvaluationDomain) -> ExtendedTrace {
        let columns: Vec<&TraceColumn> = core::iter::once(&self.main)
            .chain(&self.coins)
            .chain(core::iter::once(&self.ids))
            .collect();
        let mut extended = map_weighted(columns.len(), domain.precision(), |i| {
            columns[i].extend(domain)
        });
        let ids = extended.pop().unwrap_or_default();
        let main = extended.remove(0);
        ExtendedTrace {
            main,
            coins: extended,
            ids,
        }
    }
}

/// Trace columns evaluated over the extended domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedTrace {
    pub main: Vec<FieldElement>,
    pub coins: Vec<Vec<FieldElement>>,
    pub ids: Vec<FieldElement>,
}

impl ExtendedTrace {
    pub fn len(&self) -> usize {
        self.main.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }

    /// Balances of every coin at `position`.
    pub fn coins_at(&self, position: usize) -> Vec<FieldElement> {
        self.coins.iter().map(|column| column[position]).collect()
    }
}

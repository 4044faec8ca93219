//! Arithmetization of the solvency statement.
//!
//! [`BatchInputs`] normalises raw balances, [`SolvencyTrace`] lays them out
//! as base-4 unfoldings plus running sums, [`ConstraintSet`] evaluates the
//! constraint quotients over the extended domain and
//! [`linear_combination`] folds everything into the single codeword handed
//! to FRI.

pub mod composition;
pub mod constraints;
pub mod context;
pub mod errors;
pub mod inputs;
pub mod trace;

pub use composition::{
    component_count, linear_combination, point_components, CombinationCoefficients,
};
pub use constraints::{base4_digits, constraint_salt, ConstraintSet, TRACE_CONSTRAINTS};
pub use context::{PointZerofiers, SolvencyLayout};
pub use errors::AirError;
pub use inputs::{
    pad_users, padded_user_count, reduce_balances, spread_over_rows, validate_inputs, BatchInputs,
};
pub use trace::{ExtendedTrace, SolvencyTrace, TraceColumn};

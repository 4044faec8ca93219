#![forbid(unsafe_code)]

//! Protocol configuration for the solvency prover and verifier.
//!
//! [`PorParams`] is the single source of truth for every constant both sides
//! must agree on.  Values are immutable once built and are passed by
//! reference into every component.
//!
//! | Group | Fields |
//! |-------|--------|
//! | Domain | `nonresidue`, `extension_factor` |
//! | Soundness | `spot_check_security_factor`, `fri_query_count`, `pow_bits` |
//! | Input limits | `max_uts`, `max_user_num_for_one_batch`, `max_user_value` |
//!
//! The modulus is fixed by [`crate::field::FieldElement`] and exposed through
//! [`PorParams::modulus`].  Use [`PorParamsBuilder`] to start from defaults;
//! parameters deserialised from JSON go through the same validation.

mod builder;
mod por_params;
mod validate;

pub use builder::PorParamsBuilder;
pub use por_params::PorParams;
pub use validate::ParamsError;

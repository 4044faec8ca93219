//! Solvency verifier.
//!
//! Cheap structural checks run before any hashing: claimed sums, proof shape,
//! then proof-of-work.  FRI follows, then the spot checks replay the sample
//! derivation, authenticate the openings and re-evaluate every constraint
//! identity and the linear combination at each sampled point.

use tracing::{debug, instrument};

use crate::air::{
    base4_digits, component_count, point_components, CombinationCoefficients, PointZerofiers,
    SolvencyLayout,
};
use crate::field::{FieldElement, Polynomial};
use crate::fri::verify_low_degree_proof;
use crate::merkle::verify_multi_branch;
use crate::params::PorParams;
use crate::utils::{get_pseudorandom_indices, MAX_SAMPLE_MODULUS};

use super::errors::{Constraint, VerifierError};
use super::pow::check_proof_of_work;
use super::types::{ClaimedSums, SolvencyProof, SpotCheck};

/// Verifies `proof` against the claimed sums.
#[instrument(
    skip_all,
    name = "proof::verify",
    fields(steps = proof.steps, uts = proof.uts)
)]
pub fn verify(
    params: &PorParams,
    claimed_sums: &ClaimedSums,
    proof: &SolvencyProof,
    main_coins: usize,
) -> Result<(), VerifierError> {
    let prechecked = precheck(params, claimed_sums, proof, main_coins)?;
    if !check_proof_of_work(&proof.trace_root, &proof.pow_nonce, params.pow_bits()) {
        return Err(VerifierError::ProofOfWork);
    }
    verify_low_degree_proof(
        &proof.combination_root,
        prechecked.layout.domain.extended_root,
        &proof.low_degree_proof,
        4 * proof.steps,
        params.extension_factor(),
        params.fri_query_count(),
    )?;
    execute_spot_checks(params, &prechecked, proof)
}

/// [`verify`] reduced to a yes/no answer.
pub fn verify_por_proof(
    params: &PorParams,
    claimed_sums: &ClaimedSums,
    proof: &SolvencyProof,
    main_coins: usize,
) -> bool {
    match verify(params, claimed_sums, proof, main_coins) {
        Ok(()) => true,
        Err(err) => {
            debug!(%err, "solvency proof rejected");
            false
        }
    }
}

struct Prechecked {
    layout: SolvencyLayout,
    coin_sums: Vec<FieldElement>,
    total: FieldElement,
    main_coins: usize,
}

/// Each coin sum is canonical and no larger than a batch can hold, and the
/// claimed total is their signed sum.
///
/// The total must stay below [`PorParams::max_net_total`].  The trace only
/// pins it modulo p, and the parameter limits keep every honest total under
/// p / 2, so a total in range has exactly one value the proof can attest to.
pub fn check_sum_values(
    params: &PorParams,
    claimed_sums: &ClaimedSums,
) -> Result<Vec<FieldElement>, VerifierError> {
    if claimed_sums.coin_totals.is_empty() {
        return Err(VerifierError::NoCoins);
    }
    let coin_limit = params.max_coin_sum();
    let coin_sums = claimed_sums
        .coin_totals
        .iter()
        .enumerate()
        .map(|(coin, value)| {
            FieldElement::try_from(*value)
                .ok()
                .filter(|sum| sum.as_signed().unsigned_abs() as u128 <= coin_limit)
                .ok_or(VerifierError::CoinSumOutOfRange { coin })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let max = params.max_net_total();
    if claimed_sums.total >= max {
        return Err(VerifierError::TotalOutOfRange {
            total: claimed_sums.total,
            max,
        });
    }
    let computed: i128 = coin_sums.iter().map(|sum| sum.as_signed() as i128).sum();
    if computed != claimed_sums.total as i128 {
        return Err(VerifierError::TotalMismatch {
            claimed: claimed_sums.total,
            computed,
        });
    }
    Ok(coin_sums)
}

fn precheck(
    params: &PorParams,
    claimed_sums: &ClaimedSums,
    proof: &SolvencyProof,
    main_coins: usize,
) -> Result<Prechecked, VerifierError> {
    let coin_sums = check_sum_values(params, claimed_sums)?;
    if main_coins > coin_sums.len() {
        return Err(VerifierError::TooManyMainCoins {
            main_coins,
            coins: coin_sums.len(),
        });
    }

    let (steps, uts) = (proof.steps, proof.uts);
    let ef = params.extension_factor();
    let shape_ok = steps.is_power_of_two()
        && steps <= (1usize << 32) / ef
        && steps * ef < MAX_SAMPLE_MODULUS
        && uts.is_power_of_two()
        && (4..=params.max_uts()).contains(&uts)
        && steps >= 2 * uts
        && steps / uts <= params.max_user_num_for_one_batch();
    if !shape_ok {
        return Err(VerifierError::InvalidShape { steps, uts });
    }

    let layout = SolvencyLayout::new(params.nonresidue(), uts, steps / uts, ef);
    Ok(Prechecked {
        layout,
        coin_sums,
        total: FieldElement::from_u128(claimed_sums.total),
        main_coins,
    })
}

fn check_entry_shapes(spot: &SpotCheck, coins: usize, main_coins: usize) -> bool {
    spot.current.coins.len() == coins
        && spot.current.coin_constraints.len() == 2 * main_coins
        && spot.block_offset.coins.len() == coins
        && spot.next_block.coins.len() == coins
}

#[instrument(skip_all, name = "proof::execute_spot_checks")]
fn execute_spot_checks(
    params: &PorParams,
    prechecked: &Prechecked,
    proof: &SolvencyProof,
) -> Result<(), VerifierError> {
    let layout = &prechecked.layout;
    let precision = layout.precision();
    let coins = prechecked.coin_sums.len();

    let positions = get_pseudorandom_indices(
        proof.combination_root.as_bytes(),
        precision,
        params.spot_check_security_factor(),
        params.extension_factor(),
    );
    if proof.spot_checks.len() != positions.len() {
        return Err(VerifierError::SpotCheckCount {
            expected: positions.len(),
            got: proof.spot_checks.len(),
        });
    }
    for (index, spot) in proof.spot_checks.iter().enumerate() {
        if !check_entry_shapes(spot, coins, prechecked.main_coins) {
            return Err(VerifierError::EntryShape { index });
        }
    }

    let augmented: Vec<usize> = positions
        .iter()
        .flat_map(|position| layout.augmented_positions(*position))
        .collect();
    let opened = verify_multi_branch(
        &proof.trace_root,
        precision,
        &augmented,
        &proof.trace_branches,
    )
    .map_err(VerifierError::TraceOpening)?;
    for (index, spot) in proof.spot_checks.iter().enumerate() {
        if spot.leaves()[..] != opened[4 * index..4 * index + 4] {
            return Err(VerifierError::EntryHash { index });
        }
    }

    let combination = verify_multi_branch(
        &proof.combination_root,
        precision,
        &positions,
        &proof.combination_branches,
    )
    .map_err(VerifierError::CombinationOpening)?;

    let coefficients = CombinationCoefficients::derive(
        &proof.pow_nonce,
        component_count(coins, prechecked.main_coins),
    );
    let boundary = layout.boundary_interpolant(prechecked.total);
    let coin_boundaries: Vec<_> = prechecked
        .coin_sums
        .iter()
        .take(prechecked.main_coins)
        .map(|sum| layout.boundary_interpolant(*sum))
        .collect();

    for (index, (position, spot)) in positions.iter().zip(&proof.spot_checks).enumerate() {
        let x = layout.domain.point(*position);
        let z = layout
            .zerofiers_at(x)
            .ok_or(VerifierError::DegeneratePosition { index })?;
        check_constraints(index, x, &z, spot, &boundary, &coin_boundaries)?;

        let l_of_x = FieldElement::from_bytes(combination[index].as_bytes())
            .map_err(|_| VerifierError::NonCanonicalValue { index })?;
        let shift = x.pow(3 * proof.steps as u64);
        let current = &spot.current;
        let components = point_components(
            current.t,
            &current.coins,
            current.id,
            &current.constraints,
            &current.coin_constraints,
        );
        if coefficients.combine(shift, components, current.constraints[1]) != l_of_x {
            return Err(VerifierError::LinearCombination { index });
        }
    }
    debug!(samples = positions.len(), "spot checks passed");
    Ok(())
}

/// Re-evaluates the five trace identities and both identities of every main
/// coin at `x`.
fn check_constraints(
    index: usize,
    x: FieldElement,
    z: &PointZerofiers,
    spot: &SpotCheck,
    boundary: &Polynomial,
    coin_boundaries: &[Polynomial],
) -> Result<(), VerifierError> {
    let current = &spot.current;
    let t = current.t;
    let [c1, c2, c3, c4, c5] = current.constraints;
    let ensure = |holds: bool, constraint: Constraint| {
        if holds {
            Ok(())
        } else {
            Err(VerifierError::Constraint { index, constraint })
        }
    };

    ensure(t == c1 * z.z1, Constraint::FirstRowZero)?;
    ensure(
        base4_digits(spot.next_row.t, t) == c2 * z.z2,
        Constraint::BaseFourUnfolding,
    )?;
    ensure(
        spot.next_block.t - spot.block_offset.t - t == c3 * z.z3,
        Constraint::Accumulation,
    )?;
    ensure(t - boundary.evaluate(x) == c4 * z.z4, Constraint::Boundary)?;
    let coins: FieldElement = current.coins.iter().copied().sum();
    ensure(t - coins == c5 * z.z5, Constraint::CoinSplit)?;

    for (coin, interpolant) in coin_boundaries.iter().enumerate() {
        let b = current.coins[coin];
        let cc_accumulation = current.coin_constraints[2 * coin];
        let cc_boundary = current.coin_constraints[2 * coin + 1];
        ensure(
            spot.next_block.coins[coin] - spot.block_offset.coins[coin] - b
                == cc_accumulation * z.z3,
            Constraint::CoinAccumulation { coin },
        )?;
        ensure(
            b - interpolant.evaluate(x) == cc_boundary * z.z4,
            Constraint::CoinBoundary { coin },
        )?;
    }
    Ok(())
}

//! Solvency prover.
//!
//! The pipeline runs: normalise inputs, build the trace, extend it, evaluate
//! the constraint set, commit the trace, grind the proof-of-work nonce,
//! combine, commit the combination, open spot checks and finally prove the
//! combination low degree.  Every buffer is owned by the call and dropped
//! once the proof is assembled, except the trace tree and the per-user
//! entries kept in [`ProverArtifacts`] for inclusion proofs.

use tracing::{debug, info_span, instrument};

use crate::air::{
    component_count, linear_combination, BatchInputs, CombinationCoefficients, ConstraintSet,
    ExtendedTrace, SolvencyLayout, SolvencyTrace,
};
use crate::field::FieldElement;
use crate::fri::prove_committed_low_degree;
use crate::hash::Digest;
use crate::merkle::MerkleTree;
use crate::params::PorParams;
use crate::utils::{get_pseudorandom_indices, map_indices};

use super::errors::ProverError;
use super::inclusion::{InclusionProof, UserEntry};
use super::pow::proof_of_work;
use super::types::{
    coins_digest, trace_leaf, ClaimedSums, CoinEntry, CompactEntry, FullEntry, SolvencyProof,
    SpotCheck,
};

/// Everything a proving call produces.
#[derive(Debug, Clone)]
pub struct ProverOutput {
    pub proof: SolvencyProof,
    pub claimed_sums: ClaimedSums,
    pub artifacts: ProverArtifacts,
}

/// Prover-side state retained for user inclusion proofs.
#[derive(Debug, Clone)]
pub struct ProverArtifacts {
    layout: SolvencyLayout,
    trace_tree: MerkleTree,
    entries: Vec<UserEntry>,
}

impl ProverArtifacts {
    pub fn trace_root(&self) -> Digest {
        self.trace_tree.root()
    }

    /// Number of real users in the batch.
    pub fn user_count(&self) -> usize {
        self.entries.len()
    }

    /// Entry and trace branch of real user `user`.
    pub fn inclusion_proof(&self, user: usize) -> Result<InclusionProof, ProverError> {
        let entry = self.entries.get(user).ok_or(ProverError::UnknownUser {
            user,
            users: self.entries.len(),
        })?;
        let branch = self
            .trace_tree
            .branch(self.layout.user_entry_position(user))?;
        Ok(InclusionProof::new(user, self.layout.uts, entry, branch))
    }
}

/// Proves that `balances` (coin-major, one list per coin with one signed
/// balance per user) are solvent.
///
/// Returns the proof and the sums it attests to.
pub fn prove(
    params: &PorParams,
    ids: &[FieldElement],
    balances: &[Vec<i64>],
    uts: usize,
    main_coins: usize,
) -> Result<(SolvencyProof, ClaimedSums), ProverError> {
    let output = prove_with_artifacts(params, ids, balances, uts, main_coins)?;
    Ok((output.proof, output.claimed_sums))
}

/// [`prove`], additionally retaining what inclusion proofs need.
#[instrument(
    skip_all,
    name = "proof::prove",
    fields(users = ids.len(), coins = balances.len(), uts = uts)
)]
pub fn prove_with_artifacts(
    params: &PorParams,
    ids: &[FieldElement],
    balances: &[Vec<i64>],
    uts: usize,
    main_coins: usize,
) -> Result<ProverOutput, ProverError> {
    let batch = BatchInputs::normalise(params, ids, balances, uts, main_coins)?;
    let trace = SolvencyTrace::build(&batch)?;
    let layout = SolvencyLayout::new(
        params.nonresidue(),
        uts,
        trace.user_num,
        params.extension_factor(),
    );
    let precision = layout.precision();
    let steps = layout.steps();
    debug!(steps, precision, "domain fixed");

    let extended = trace.extend(&layout.domain);
    let constraints = ConstraintSet::evaluate(
        &layout,
        &extended,
        &trace.coin_sums,
        FieldElement::from_u128(trace.total),
        main_coins,
    );

    let salts = map_indices(precision, |i| constraints.salt_at(i));
    let leaves = info_span!("commit_trace").in_scope(|| {
        map_indices(precision, |i| {
            trace_leaf(
                extended.main[i],
                &coins_digest(&extended.coins_at(i)),
                extended.ids[i],
                &salts[i],
            )
        })
    });
    let trace_tree = MerkleTree::commit(&leaves)?;
    let pow_nonce = proof_of_work(&trace_tree.root(), params.pow_bits());

    let coefficients = CombinationCoefficients::derive(
        &pow_nonce,
        component_count(extended.coins.len(), main_coins),
    );
    let combination = linear_combination(&layout, &coefficients, &extended, &constraints);
    let combination_tree = MerkleTree::commit_elements(&combination)?;

    let positions = get_pseudorandom_indices(
        combination_tree.root().as_bytes(),
        precision,
        params.spot_check_security_factor(),
        params.extension_factor(),
    );
    let augmented: Vec<usize> = positions
        .iter()
        .flat_map(|position| layout.augmented_positions(*position))
        .collect();
    let spot_checks = positions
        .iter()
        .map(|position| spot_check(&layout, *position, &extended, &constraints, &salts))
        .collect();
    debug!(samples = positions.len(), "spot checks opened");

    let combination_root = combination_tree.root();
    let combination_branches = combination_tree.multi_branch(&positions)?;
    let low_degree_proof = prove_committed_low_degree(
        &combination,
        combination_tree,
        layout.domain.extended_root,
        4 * steps,
        params.extension_factor(),
        params.fri_query_count(),
    )?;

    let proof = SolvencyProof {
        steps,
        uts,
        trace_root: trace_tree.root(),
        combination_root,
        pow_nonce,
        trace_branches: trace_tree.multi_branch(&augmented)?,
        spot_checks,
        combination_branches,
        low_degree_proof,
    };
    let claimed_sums = ClaimedSums {
        coin_totals: trace.coin_sums.iter().map(|sum| sum.as_u64()).collect(),
        total: trace.total,
    };

    let entries = (0..batch.real_users)
        .map(|user| {
            let position = layout.user_entry_position(user);
            UserEntry {
                net_value: extended.main[position],
                balances: extended.coins_at(position),
                id: extended.ids[position],
                salt: salts[position],
            }
        })
        .collect();

    Ok(ProverOutput {
        proof,
        claimed_sums,
        artifacts: ProverArtifacts {
            layout,
            trace_tree,
            entries,
        },
    })
}

fn spot_check(
    layout: &SolvencyLayout,
    position: usize,
    extended: &ExtendedTrace,
    constraints: &ConstraintSet,
    salts: &[Digest],
) -> SpotCheck {
    let [current, next_row, block_offset, next_block] = layout.augmented_positions(position);
    let coin_entry = |at: usize| CoinEntry {
        t: extended.main[at],
        coins: extended.coins_at(at),
        id: extended.ids[at],
        salt: salts[at],
    };
    SpotCheck {
        current: FullEntry {
            t: extended.main[current],
            coins: extended.coins_at(current),
            id: extended.ids[current],
            constraints: constraints.trace_at(current),
            coin_constraints: constraints.coins_at(current),
        },
        next_row: CompactEntry {
            t: extended.main[next_row],
            coins_digest: coins_digest(&extended.coins_at(next_row)),
            id: extended.ids[next_row],
            salt: salts[next_row],
        },
        block_offset: coin_entry(block_offset),
        next_block: coin_entry(next_block),
    }
}

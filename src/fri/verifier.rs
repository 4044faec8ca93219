use tracing::{debug, instrument};

use super::folding::{quartic_roots_of_unity, row_positions};
use super::types::{FriError, FriProof};
use super::{round_count, DIRECT_PROOF_THRESHOLD};
use crate::fft::root_order;
use crate::field::{eval_quartic, lagrange_interp, multi_interp_4, FieldElement};
use crate::hash::Digest;
use crate::merkle::{verify_multi_branch, MerkleTree};
use crate::utils::get_pseudorandom_indices;

fn decode_leaves(leaves: &[Digest], round: usize) -> Result<Vec<FieldElement>, FriError> {
    leaves
        .iter()
        .map(|leaf| {
            FieldElement::from_bytes(leaf.as_bytes())
                .map_err(|_| FriError::NonCanonicalValue { round })
        })
        .collect()
}

/// Verifies a proof produced by [`prove_low_degree`](super::prove_low_degree)
/// against the commitment `merkle_root`.
#[instrument(
    skip_all,
    name = "fri::verify_low_degree_proof",
    fields(maxdeg_plus_1 = maxdeg_plus_1)
)]
pub fn verify_low_degree_proof(
    merkle_root: &Digest,
    root_of_unity: FieldElement,
    proof: &FriProof,
    maxdeg_plus_1: usize,
    exclude_multiples_of: usize,
    query_count: usize,
) -> Result<(), FriError> {
    let mut domain = root_order(root_of_unity);
    if maxdeg_plus_1 >= domain {
        return Err(FriError::DegreeBoundTooLarge {
            maxdeg_plus_1,
            domain,
        });
    }
    let expected = round_count(maxdeg_plus_1);
    if proof.rounds.len() != expected {
        return Err(FriError::RoundCountMismatch {
            expected,
            got: proof.rounds.len(),
        });
    }

    let mut root = root_of_unity;
    let mut maxdeg = maxdeg_plus_1;
    let mut current_root = *merkle_root;
    let mut samples: Vec<usize> = Vec::new();

    for (round, fri_round) in proof.rounds.iter().enumerate() {
        let special_x = current_root.to_field();
        let column_len = domain / 4;

        samples = if round == 0 {
            get_pseudorandom_indices(
                fri_round.column_root.as_bytes(),
                column_len,
                query_count,
                exclude_multiples_of,
            )
        } else {
            samples.iter().map(|y| y % column_len).collect()
        };
        let positions = row_positions(&samples, domain);

        let column_leaves = verify_multi_branch(
            &fri_round.column_root,
            column_len,
            &samples,
            &fri_round.column_branch,
        )
        .map_err(FriError::merkle(round))?;
        let column = decode_leaves(&column_leaves, round)?;

        let row_leaves =
            verify_multi_branch(&current_root, domain, &positions, &fri_round.poly_branch)
                .map_err(FriError::merkle(round))?;
        let row_values = decode_leaves(&row_leaves, round)?;

        let quartic = quartic_roots_of_unity(root, domain);
        let xsets: Vec<[FieldElement; 4]> = samples
            .iter()
            .map(|y| {
                let base = root.pow(*y as u64);
                quartic.map(|q| q * base)
            })
            .collect();
        let ysets: Vec<[FieldElement; 4]> = row_values
            .chunks_exact(4)
            .map(|row| [row[0], row[1], row[2], row[3]])
            .collect();

        let polys = multi_interp_4(&xsets, &ysets);
        for (index, (poly, value)) in polys.iter().zip(&column).enumerate() {
            if eval_quartic(poly, special_x) != *value {
                return Err(FriError::ColumnMismatch { round, index });
            }
        }
        debug!(round, domain, "fri round verified");

        current_root = fri_round.column_root;
        root = root.pow(4);
        maxdeg /= 4;
        domain = column_len;
    }

    verify_remainder(
        &current_root,
        root,
        &proof.remainder,
        maxdeg,
        domain,
        exclude_multiples_of,
        proof.rounds.len(),
    )
}

fn verify_remainder(
    commitment: &Digest,
    root: FieldElement,
    remainder: &[FieldElement],
    maxdeg: usize,
    domain: usize,
    exclude_multiples_of: usize,
    round: usize,
) -> Result<(), FriError> {
    debug_assert!(maxdeg <= DIRECT_PROOF_THRESHOLD);
    if remainder.len() != domain {
        return Err(FriError::DomainMismatch {
            len: remainder.len(),
            domain,
        });
    }
    let tree = MerkleTree::commit_elements(remainder).map_err(FriError::merkle(round))?;
    if tree.root() != *commitment {
        return Err(FriError::RemainderRootMismatch);
    }

    let points: Vec<usize> = (0..domain)
        .filter(|x| exclude_multiples_of == 0 || x % exclude_multiples_of != 0)
        .collect();
    if points.len() <= maxdeg {
        return Err(FriError::RemainderTooShort {
            available: points.len(),
            maxdeg_plus_1: maxdeg,
        });
    }

    let xs: Vec<FieldElement> = points.iter().map(|x| root.pow(*x as u64)).collect();
    let ys: Vec<FieldElement> = points.iter().map(|x| remainder[*x]).collect();
    let poly = lagrange_interp(&xs[..maxdeg], &ys[..maxdeg]);
    for (position, (x, y)) in xs.iter().zip(&ys).enumerate().skip(maxdeg) {
        if poly.evaluate(*x) != *y {
            return Err(FriError::RemainderDegree { position });
        }
    }
    Ok(())
}

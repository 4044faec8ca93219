//! Proof objects exchanged between the prover and the verifier.
//!
//! Every type derives `serde` traits.  Digests serialise as hex strings
//! and field elements as their canonical `u64`, so a JSON round trip is
//! exact and non-canonical field values are rejected while decoding.

use serde::{Deserialize, Serialize};

use crate::field::FieldElement;
use crate::fri::FriProof;
use crate::hash::{Digest, Hasher};
use crate::merkle::MultiBranch;

/// Sums the prover claims: one per coin plus the total liabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimedSums {
    /// Canonical field representative of every coin sum; negative sums
    /// appear as `p - |s|`.
    pub coin_totals: Vec<u64>,
    /// Signed sum of `coin_totals`, which is the sum of every net value.
    pub total: u128,
}

impl ClaimedSums {
    pub fn coin_count(&self) -> usize {
        self.coin_totals.len()
    }
}

/// Trace opening at a sampled position: every committed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullEntry {
    pub t: FieldElement,
    pub coins: Vec<FieldElement>,
    pub id: FieldElement,
    pub constraints: [FieldElement; 5],
    pub coin_constraints: Vec<FieldElement>,
}

impl FullEntry {
    pub fn leaf(&self) -> Digest {
        trace_leaf(
            self.t,
            &coins_digest(&self.coins),
            self.id,
            &crate::air::constraint_salt(&self.constraints, &self.coin_constraints),
        )
    }
}

/// Trace opening where only `t` is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactEntry {
    pub t: FieldElement,
    pub coins_digest: Digest,
    pub id: FieldElement,
    pub salt: Digest,
}

impl CompactEntry {
    pub fn leaf(&self) -> Digest {
        trace_leaf(self.t, &self.coins_digest, self.id, &self.salt)
    }
}

/// Trace opening where `t` and the coin balances are needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinEntry {
    pub t: FieldElement,
    pub coins: Vec<FieldElement>,
    pub id: FieldElement,
    pub salt: Digest,
}

impl CoinEntry {
    pub fn leaf(&self) -> Digest {
        trace_leaf(self.t, &coins_digest(&self.coins), self.id, &self.salt)
    }
}

/// Openings at `x`, `x + ef`, `x + (uts-1) ef` and `x + uts ef`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotCheck {
    pub current: FullEntry,
    pub next_row: CompactEntry,
    pub block_offset: CoinEntry,
    pub next_block: CoinEntry,
}

impl SpotCheck {
    pub fn leaves(&self) -> [Digest; 4] {
        [
            self.current.leaf(),
            self.next_row.leaf(),
            self.block_offset.leaf(),
            self.next_block.leaf(),
        ]
    }
}

/// STARK proof that a batch of balances is solvent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvencyProof {
    pub steps: usize,
    pub uts: usize,
    pub trace_root: Digest,
    pub combination_root: Digest,
    pub pow_nonce: Digest,
    /// Trace openings at every augmented spot-check position.
    pub trace_branches: MultiBranch,
    pub spot_checks: Vec<SpotCheck>,
    /// Combination openings at every spot-check position.
    pub combination_branches: MultiBranch,
    pub low_degree_proof: FriProof,
}

impl SolvencyProof {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// `keccak(enc(b_0) || enc(b_1) || ..)`.
pub fn coins_digest(coins: &[FieldElement]) -> Digest {
    let mut hasher = Hasher::new();
    hasher.update_elements(coins);
    hasher.finalize()
}

/// Trace tree leaf: `keccak(enc(t) || coins_digest || enc(id) || salt)`.
pub fn trace_leaf(
    t: FieldElement,
    coins_digest: &Digest,
    id: FieldElement,
    salt: &Digest,
) -> Digest {
    let mut hasher = Hasher::new();
    hasher
        .update_element(t)
        .update(coins_digest.as_bytes())
        .update_element(id)
        .update(salt.as_bytes());
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_kinds_hash_to_the_same_leaf() {
        let full = FullEntry {
            t: FieldElement::new(9),
            coins: vec![FieldElement::new(4), FieldElement::new(5)],
            id: FieldElement::new(77),
            constraints: [FieldElement::new(1); 5],
            coin_constraints: vec![FieldElement::new(2), FieldElement::new(3)],
        };
        let salt = crate::air::constraint_salt(&full.constraints, &full.coin_constraints);
        let compact = CompactEntry {
            t: full.t,
            coins_digest: coins_digest(&full.coins),
            id: full.id,
            salt,
        };
        let coin = CoinEntry {
            t: full.t,
            coins: full.coins.clone(),
            id: full.id,
            salt,
        };
        assert_eq!(full.leaf(), compact.leaf());
        assert_eq!(full.leaf(), coin.leaf());
    }

    #[test]
    fn claimed_sums_round_trip_through_json() {
        let sums = ClaimedSums {
            coin_totals: vec![1, FieldElement::MODULUS - 1],
            total: FieldElement::MODULUS as u128,
        };
        let json = serde_json::to_string(&sums).expect("serialise");
        assert_eq!(serde_json::from_str::<ClaimedSums>(&json).expect("parse"), sums);
    }
}

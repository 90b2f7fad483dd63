use chia_protocol::Bytes32;
use clvm_traits::{FromClvm, ToClvm};

/// The lineage proof a tokenized-asset completion spend needs to satisfy the
/// tokenization wrapper's inner-puzzle-hash assertion: the offered coin's
/// parent's `(parent_id, inner_puzzle_hash, amount)`. Adapted from the
/// teacher crate's `Proof`/`LineageProof`, dropping the singleton `EveProof`
/// arm — offers never spend an eve coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ToClvm, FromClvm)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[clvm(list)]
pub struct LineageProof {
    pub parent_parent_coin_info: Bytes32,
    pub parent_inner_puzzle_hash: Bytes32,
    pub parent_amount: u64,
}

impl LineageProof {
    pub fn new(
        parent_parent_coin_info: Bytes32,
        parent_inner_puzzle_hash: Bytes32,
        parent_amount: u64,
    ) -> Self {
        Self {
            parent_parent_coin_info,
            parent_inner_puzzle_hash,
            parent_amount,
        }
    }
}

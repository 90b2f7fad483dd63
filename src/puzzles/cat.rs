use chia_protocol::{Bytes32, Coin, CoinSpend, Program};
use clvm_traits::{FromClvm, ToClvm};
use clvm_utils::{curry_tree_hash, tree_hash_from_bytes, CurriedProgram, TreeHash};
use clvmr::{serde::node_from_bytes, Allocator, NodePtr};
use hex_literal::hex;

use crate::error::{OfferError, Result};
use crate::primitives::LineageProof;

/// Curried arguments of the CAT2 tokenization wrapper: `(mod_hash tail_hash
/// inner_puzzle)`. This is the injection spec §4.2 calls `construct_wrapper`
/// / `match_wrapper` — currying builds a wrapped puzzle, uncurrying recovers
/// the three arguments it was built from.
#[derive(Debug, Clone, PartialEq, Eq, ToClvm, FromClvm)]
#[clvm(curry)]
pub struct CatArgs<I> {
    pub mod_hash: Bytes32,
    pub tail_hash: Bytes32,
    pub inner_puzzle: I,
}

impl<I> CatArgs<I> {
    pub fn new(tail_hash: Bytes32, inner_puzzle: I) -> Self {
        Self {
            mod_hash: CAT_PUZZLE_HASH.into(),
            tail_hash,
            inner_puzzle,
        }
    }
}

/// Builds the tokenized settlement puzzle for `tail`, currying the CAT
/// module over the tail hash and the native settlement puzzle. Corresponds
/// to `construct_wrapper(TOK_MOD, tail, OFFER_MOD)`.
pub fn construct_wrapper(
    a: &mut Allocator,
    tail_hash: Bytes32,
    inner_puzzle: NodePtr,
) -> Result<NodePtr, clvm_traits::ToClvmError> {
    let cat_mod = node_from_bytes(a, &CAT_PUZZLE).expect("CAT_PUZZLE is a well-formed program");
    CurriedProgram {
        program: cat_mod,
        args: CatArgs::new(tail_hash, inner_puzzle),
    }
    .to_clvm(a)
}

/// Attempts to uncurry `puzzle_reveal` as a tokenization wrapper, returning
/// the tail hash and inner puzzle on a match. Corresponds to
/// `match_wrapper(program) -> Option<(mod, tail, inner)>`.
pub fn match_wrapper(a: &Allocator, puzzle: NodePtr) -> Option<(Bytes32, NodePtr)> {
    let curried = CurriedProgram::<NodePtr, CatArgs<NodePtr>>::from_clvm(a, puzzle).ok()?;
    Some((curried.args.tail_hash, curried.args.inner_puzzle))
}

/// Computes the tokenized settlement puzzle-hash for `tail` without
/// allocating a full CLVM tree, using the same curry-tree-hash identity
/// `construct_wrapper`'s tree hash must satisfy.
pub fn tokenized_settlement_puzzle_hash(
    tail_hash: Bytes32,
    inner_puzzle_hash: TreeHash,
) -> Bytes32 {
    let program_hash = cat_puzzle_hash();
    let tail_hash_tree: TreeHash = tail_hash.into();
    let mod_hash_tree: TreeHash = CAT_PUZZLE_HASH.into();
    curry_tree_hash(
        program_hash,
        &[mod_hash_tree, tail_hash_tree, inner_puzzle_hash],
    )
    .into()
}

fn cat_puzzle_hash() -> TreeHash {
    tree_hash_from_bytes(&CAT_PUZZLE).expect("CAT_PUZZLE is a well-formed compiled puzzle")
}

/// Proof and solution shape a CAT2 inner-puzzle spend must provide; mirrors
/// `chia.wallet.cat_wallet.cat_utils.SpendableCAT` / `CatSolution`. Only the
/// single-spend (non-ring) path is needed here: an offer's tokenized
/// settlement coins are spent one at a time, each carrying its own lineage
/// proof back to its CAT parent. A lone coin forms a ring of one: it is its
/// own predecessor and successor, so `prev_coin_id` and `next_coin_proof`
/// both describe `coin` itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendableCat {
    pub coin: Coin,
    pub tail_hash: Bytes32,
    pub inner_puzzle: NodePtr,
    pub inner_solution: NodePtr,
    pub lineage_proof: LineageProof,
}

impl SpendableCat {
    /// Builds the wrapped [`CoinSpend`] for this tokenized coin: the
    /// tokenization wrapper curried over `tail_hash` and `inner_puzzle`, run
    /// against a single-member-ring [`CatSolution`].
    pub fn to_coin_spend(&self, a: &mut Allocator) -> Result<CoinSpend> {
        let solution = CatSolution {
            inner_puzzle_solution: self.inner_solution,
            lineage_proof: Some(self.lineage_proof),
            prev_coin_id: self.coin.coin_id(),
            this_coin_info: self.coin,
            next_coin_proof: CoinProof {
                parent_coin_info: self.coin.parent_coin_info,
                inner_puzzle_hash: clvm_utils::tree_hash(a, self.inner_puzzle).into(),
                amount: self.coin.amount,
            },
            prev_subtotal: 0,
            extra_delta: 0,
        };

        let puzzle_ptr = construct_wrapper(a, self.tail_hash, self.inner_puzzle)
            .map_err(|e| OfferError::Eval(e.to_string()))?;
        let solution_ptr = solution
            .to_clvm(a)
            .map_err(|e| OfferError::Eval(e.to_string()))?;

        Ok(CoinSpend::new(
            self.coin,
            Program::from_clvm(a, puzzle_ptr).map_err(|e| OfferError::Eval(e.to_string()))?,
            Program::from_clvm(a, solution_ptr).map_err(|e| OfferError::Eval(e.to_string()))?,
        ))
    }
}

/// The solution shape every CAT2 ring member provides; see
/// `chia-wallet`'s original `CatSolution` type.
#[derive(Debug, Clone, PartialEq, Eq, ToClvm, FromClvm)]
#[clvm(list)]
pub struct CatSolution<I> {
    pub inner_puzzle_solution: I,
    pub lineage_proof: Option<LineageProof>,
    pub prev_coin_id: Bytes32,
    pub this_coin_info: Coin,
    pub next_coin_proof: CoinProof,
    pub prev_subtotal: i64,
    pub extra_delta: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, ToClvm, FromClvm)]
#[clvm(list)]
pub struct CoinProof {
    pub parent_coin_info: Bytes32,
    pub inner_puzzle_hash: Bytes32,
    pub amount: u64,
}

/// This is the puzzle reveal of the [CAT2 standard](https://chialisp.com/cats) puzzle.
pub static CAT_PUZZLE: [u8; 1672] = hex!(
    "
    ff02ffff01ff02ff5effff04ff02ffff04ffff04ff05ffff04ffff0bff34ff05
    80ffff04ff0bff80808080ffff04ffff02ff17ff2f80ffff04ff5fffff04ffff
    02ff2effff04ff02ffff04ff17ff80808080ffff04ffff02ff2affff04ff02ff
    ff04ff82027fffff04ff82057fffff04ff820b7fff808080808080ffff04ff81
    bfffff04ff82017fffff04ff8202ffffff04ff8205ffffff04ff820bffff8080
    8080808080808080808080ffff04ffff01ffffffff3d46ff02ff333cffff0401
    ff01ff81cb02ffffff20ff02ffff03ff05ffff01ff02ff32ffff04ff02ffff04
    ff0dffff04ffff0bff7cffff0bff34ff2480ffff0bff7cffff0bff7cffff0bff
    34ff2c80ff0980ffff0bff7cff0bffff0bff34ff8080808080ff8080808080ff
    ff010b80ff0180ffff02ffff03ffff22ffff09ffff0dff0580ff2280ffff09ff
    ff0dff0b80ff2280ffff15ff17ffff0181ff8080ffff01ff0bff05ff0bff1780
    ffff01ff088080ff0180ffff02ffff03ff0bffff01ff02ffff03ffff09ffff02
    ff2effff04ff02ffff04ff13ff80808080ff820b9f80ffff01ff02ff56ffff04
    ff02ffff04ffff02ff13ffff04ff5fffff04ff17ffff04ff2fffff04ff81bfff
    ff04ff82017fffff04ff1bff8080808080808080ffff04ff82017fff80808080
    80ffff01ff088080ff0180ffff01ff02ffff03ff17ffff01ff02ffff03ffff20
    ff81bf80ffff0182017fffff01ff088080ff0180ffff01ff088080ff018080ff
    0180ff04ffff04ff05ff2780ffff04ffff10ff0bff5780ff778080ffffff02ff
    ff03ff05ffff01ff02ffff03ffff09ffff02ffff03ffff09ff11ff5880ffff01
    59ff8080ff0180ffff01818f80ffff01ff02ff26ffff04ff02ffff04ff0dffff
    04ff0bffff04ffff04ff81b9ff82017980ff808080808080ffff01ff02ff7aff
    ff04ff02ffff04ffff02ffff03ffff09ff11ff5880ffff01ff04ff58ffff04ff
    ff02ff76ffff04ff02ffff04ff13ffff04ff29ffff04ffff0bff34ff5b80ffff
    04ff2bff80808080808080ff398080ffff01ff02ffff03ffff09ff11ff7880ff
    ff01ff02ffff03ffff20ffff02ffff03ffff09ffff0121ffff0dff298080ffff
    01ff02ffff03ffff09ffff0cff29ff80ff3480ff5c80ffff01ff0101ff8080ff
    0180ff8080ff018080ffff0109ffff01ff088080ff0180ffff010980ff018080
    ff0180ffff04ffff02ffff03ffff09ff11ff5880ffff0159ff8080ff0180ffff
    04ffff02ff26ffff04ff02ffff04ff0dffff04ff0bffff04ff17ff8080808080
    80ff80808080808080ff0180ffff01ff04ff80ffff04ff80ff17808080ff0180
    ffff02ffff03ff05ffff01ff04ff09ffff02ff56ffff04ff02ffff04ff0dffff
    04ff0bff808080808080ffff010b80ff0180ff0bff7cffff0bff34ff2880ffff
    0bff7cffff0bff7cffff0bff34ff2c80ff0580ffff0bff7cffff02ff32ffff04
    ff02ffff04ff07ffff04ffff0bff34ff3480ff8080808080ffff0bff34ff8080
    808080ffff02ffff03ffff07ff0580ffff01ff0bffff0102ffff02ff2effff04
    ff02ffff04ff09ff80808080ffff02ff2effff04ff02ffff04ff0dff80808080
    80ffff01ff0bffff0101ff058080ff0180ffff04ffff04ff30ffff04ff5fff80
    8080ffff02ff7effff04ff02ffff04ffff04ffff04ff2fff0580ffff04ff5fff
    82017f8080ffff04ffff02ff26ffff04ff02ffff04ff0bffff04ff05ffff01ff
    808080808080ffff04ff17ffff04ff81bfffff04ff82017fffff04ffff02ff2a
    ffff04ff02ffff04ff8204ffffff04ffff02ff76ffff04ff02ffff04ff09ffff
    04ff820affffff04ffff0bff34ff2d80ffff04ff15ff80808080808080ffff04
    ff8216ffff808080808080ffff04ff8205ffffff04ff820bffff808080808080
    808080808080ff02ff5affff04ff02ffff04ff5fffff04ff3bffff04ffff02ff
    ff03ff17ffff01ff09ff2dffff02ff2affff04ff02ffff04ff27ffff04ffff02
    ff76ffff04ff02ffff04ff29ffff04ff57ffff04ffff0bff34ff81b980ffff04
    ff59ff80808080808080ffff04ff81b7ff80808080808080ff8080ff0180ffff
    04ff17ffff04ff05ffff04ff8202ffffff04ffff04ffff04ff78ffff04ffff0e
    ff5cffff02ff2effff04ff02ffff04ffff04ff2fffff04ff82017fff808080ff
    8080808080ff808080ffff04ffff04ff20ffff04ffff0bff81bfff5cffff02ff
    2effff04ff02ffff04ffff04ff15ffff04ffff10ff82017fffff11ff8202dfff
    2b80ff8202ff80ff808080ff8080808080ff808080ff138080ff808080808080
    80808080ff018080
    "
);

/// This is the puzzle hash of the [CAT2 standard](https://chialisp.com/cats) puzzle.
pub static CAT_PUZZLE_HASH: [u8; 32] = hex!(
    "
    37bef360ee858133b69d595a906dc45d01af50379dad515eb9518abb7c1d2a7a
    "
);

use chia_protocol::Bytes32;
use clvm_utils::tree_hash_from_bytes;
use hex_literal::hex;
use std::sync::OnceLock;

/// This is the puzzle reveal of the [offer settlement payments](https://chialisp.com/offers) puzzle.
/// It asserts a list of notarized-payment conditions as announcements,
/// making every settlement coin's spend a commitment to exactly the
/// payments named in its solution.
pub static SETTLEMENT_PAYMENTS_PUZZLE: [u8; 293] = hex!(
    "
    ff02ffff01ff02ff0affff04ff02ffff04ff03ff80808080ffff04ffff01ffff
    333effff02ffff03ff05ffff01ff04ffff04ff0cffff04ffff02ff1effff04ff
    02ffff04ff09ff80808080ff808080ffff02ff16ffff04ff02ffff04ff19ffff
    04ffff02ff0affff04ff02ffff04ff0dff80808080ff808080808080ff8080ff
    0180ffff02ffff03ff05ffff01ff02ffff03ffff15ff29ff8080ffff01ff04ff
    ff04ff08ff0980ffff02ff16ffff04ff02ffff04ff0dffff04ff0bff80808080
    8080ffff01ff088080ff0180ffff010b80ff0180ff02ffff03ffff07ff0580ff
    ff01ff0bffff0102ffff02ff1effff04ff02ffff04ff09ff80808080ffff02ff
    1effff04ff02ffff04ff0dff8080808080ffff01ff0bffff0101ff058080ff01
    80ff018080
    "
);

/// Process-wide, lazily-initialized native settlement puzzle-hash
/// (`NATIVE_PH` in spec terms: `tree_hash(OFFER_MOD)`). Initialization is
/// idempotent and the constant is immutable once published, so it is safe
/// to share across threads without synchronization beyond `OnceLock`.
pub fn native_settlement_puzzle_hash() -> Bytes32 {
    static HASH: OnceLock<Bytes32> = OnceLock::new();
    *HASH.get_or_init(|| {
        tree_hash_from_bytes(&SETTLEMENT_PAYMENTS_PUZZLE)
            .expect("SETTLEMENT_PAYMENTS_PUZZLE is a well-formed compiled puzzle")
            .into()
    })
}

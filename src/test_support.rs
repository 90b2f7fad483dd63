//! Shared test-only fixtures: a throwaway coin and a spend whose puzzle is
//! the CLVM identity quote `(q . conditions)`, so its solution *is* the
//! condition list it reveals. Good enough to exercise [`crate::analyzer`]
//! and [`crate::serialize`] without a real standard-transaction puzzle.

use chia_protocol::{Bytes32, Coin, CoinSpend, Program};
use clvm_traits::ToClvm;
use clvmr::{serde::node_to_bytes, Allocator};

const CREATE_COIN: u64 = 51;

pub fn test_coin(amount: u64) -> Coin {
    Coin::new([0xab; 32].into(), [0xcd; 32].into(), amount)
}

/// Builds a spend of `coin` whose revealed conditions are one `CREATE_COIN`
/// per `(puzzle_hash, amount)` target. The puzzle is the CLVM identity quote
/// `1` (`(a 1 1)` quoted as `1`), whose solution *is* its output.
pub fn native_coin_spend(coin: Coin, create_coin_targets: Vec<(Bytes32, u64)>) -> CoinSpend {
    let mut a = Allocator::new();

    let conditions: Vec<(u64, (Bytes32, (u64, ())))> = create_coin_targets
        .into_iter()
        .map(|(ph, amount)| (CREATE_COIN, (ph, (amount, ()))))
        .collect();

    let solution_ptr = conditions
        .to_clvm(&mut a)
        .expect("condition list always encodes");
    let solution_bytes = node_to_bytes(&a, solution_ptr).expect("serialization never fails");

    CoinSpend::new(
        coin,
        Program::new(vec![1].into()),
        Program::new(solution_bytes.into()),
    )
}

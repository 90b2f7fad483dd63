//! Offer builder: payment notarization and announcement derivation (spec
//! §4.3). Pure functions over a caller-supplied coin set and payment
//! request map — no I/O, no mutable state.

use chia_protocol::{Bytes32, Coin};
use clvm_traits::ToClvm;
use clvm_utils::tree_hash_from_bytes;
use clvmr::{serde::node_to_bytes, Allocator};

use crate::primitives::{Announcement, NotarizedPayment, Payment};
use crate::puzzles::cat::tokenized_settlement_puzzle_hash;
use crate::puzzles::offer::native_settlement_puzzle_hash;
use crate::AssetKey;

/// Derives the nonce a single offer binds all of its requested payments to:
/// the tree-hash of the sorted, canonically-serialized list of the
/// offerer's input coins. Sorting by coin name (not presentation order)
/// means two parties who assemble the same coin set — in any order —
/// derive the same nonce.
pub fn derive_nonce(coins: &[Coin]) -> Bytes32 {
    let mut sorted: Vec<Coin> = coins.to_vec();
    sorted.sort_by_key(Coin::coin_id);

    let mut a = Allocator::new();
    let ptr = sorted.to_clvm(&mut a).expect("coin list always encodes");
    let bytes = node_to_bytes(&a, ptr).expect("serialization never fails for a built tree");
    tree_hash_from_bytes(&bytes)
        .expect("coin list serialization is always well formed")
        .into()
}

/// Notarizes every requested payment against `coins`: derives the nonce
/// (see [`derive_nonce`]) and binds every payment in `requested_payments`
/// to it, preserving per-asset ordering and the map's key set. Returns the
/// notarized payments alongside the nonce they share, since callers need
/// the nonce to wire announcements into the offerer's own spend solutions.
pub fn notarize_payments(
    requested_payments: &[Payment],
    coins: &[Coin],
) -> (Vec<NotarizedPayment>, Bytes32) {
    let nonce = derive_nonce(coins);
    let notarized = requested_payments
        .iter()
        .map(|p| NotarizedPayment::new(nonce, p.clone()))
        .collect();
    (notarized, nonce)
}

/// Notarizes a full per-asset payment request map, returning the same
/// key set with every payment list replaced by its notarized form.
pub fn notarize_payment_map(
    requested_payments: &indexmap::IndexMap<AssetKey, Vec<Payment>>,
    coins: &[Coin],
) -> indexmap::IndexMap<AssetKey, Vec<NotarizedPayment>> {
    let nonce = derive_nonce(coins);
    requested_payments
        .iter()
        .map(|(asset, payments)| {
            let notarized = payments
                .iter()
                .map(|p| NotarizedPayment::new(nonce, p.clone()))
                .collect();
            (*asset, notarized)
        })
        .collect()
}

/// Derives the announcement set a notarized payment map implies: for every
/// asset's settlement puzzle-hash, one announcement per payment, in
/// payment order, concatenated across assets in map iteration order. The
/// caller wires these into the offered coins' spend solutions so a
/// completing spend's assertions are checkable on-chain.
pub fn calculate_announcements(
    notarized_payments: &indexmap::IndexMap<AssetKey, Vec<NotarizedPayment>>,
) -> Vec<Announcement> {
    let mut announcements = Vec::new();

    for (asset, payments) in notarized_payments {
        let settlement_ph = match asset {
            None => native_settlement_puzzle_hash(),
            Some(tail) => {
                tokenized_settlement_puzzle_hash(*tail, native_settlement_puzzle_hash().into())
            }
        };

        for payment in payments {
            let message = condition_tree_hash(payment);
            announcements.push(Announcement::new(settlement_ph, message));
        }
    }

    announcements
}

fn condition_tree_hash(payment: &NotarizedPayment) -> Bytes32 {
    let mut a = Allocator::new();
    let ptr = payment
        .as_condition()
        .to_clvm(&mut a)
        .expect("condition always encodes to CLVM");
    let bytes = node_to_bytes(&a, ptr).expect("serialization never fails for a built tree");
    tree_hash_from_bytes(&bytes)
        .expect("condition serialization is always well formed")
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;

    fn coin(parent: u8, puzzle: u8, amount: u64) -> Coin {
        Coin::new([parent; 32].into(), [puzzle; 32].into(), amount)
    }

    #[test]
    fn nonce_is_order_independent() {
        let a = coin(1, 2, 100);
        let b = coin(3, 4, 200);

        let nonce_ab = derive_nonce(&[a, b]);
        let nonce_ba = derive_nonce(&[b, a]);

        assert_eq!(nonce_ab, nonce_ba);
    }

    #[test]
    fn nonce_is_sensitive_to_coin_set() {
        let a = coin(1, 2, 100);
        let b = coin(3, 4, 200);
        let c = coin(5, 6, 300);

        assert_ne!(derive_nonce(&[a, b]), derive_nonce(&[a, c]));
    }

    #[test]
    fn notarize_preserves_order_and_shares_one_nonce() {
        let coins = vec![coin(1, 2, 100)];
        let payments = vec![
            Payment::new([9u8; 32].into(), 1),
            Payment::new([8u8; 32].into(), 2),
        ];

        let (notarized, nonce) = notarize_payments(&payments, &coins);

        assert_eq!(notarized.len(), 2);
        assert_eq!(notarized[0].payment.puzzle_hash, [9u8; 32].into());
        assert_eq!(notarized[1].payment.puzzle_hash, [8u8; 32].into());
        assert!(notarized.iter().all(|p| p.nonce == nonce));
    }

    #[test]
    fn announcements_are_ordered_and_injective() {
        let coins = vec![coin(1, 2, 100)];
        let requested = indexmap! {
            None => vec![Payment::new([1u8; 32].into(), 10), Payment::new([2u8; 32].into(), 20)],
            Some([7u8; 32].into()) => vec![Payment::new([3u8; 32].into(), 30)],
        };

        let notarized = notarize_payment_map(&requested, &coins);
        let announcements = calculate_announcements(&notarized);

        assert_eq!(announcements.len(), 3);
        let messages: std::collections::HashSet<_> =
            announcements.iter().map(|a| a.message).collect();
        assert_eq!(messages.len(), 3, "distinct payments must have distinct announcements");

        assert_eq!(announcements[0].originator_puzzle_hash, native_settlement_puzzle_hash());
        assert_eq!(announcements[1].originator_puzzle_hash, native_settlement_puzzle_hash());
        assert_ne!(announcements[2].originator_puzzle_hash, native_settlement_puzzle_hash());
    }
}

//! Byte-exact (de)serialization and aggregation of offers (spec §4.5.1-3).
//!
//! An offer is wire-compatible with a plain [`SpendBundle`]: its requested
//! payments are carried as extra "dummy" coin spends whose coin has
//! `parent_coin_info == Bytes32::default()` (the all-zero sentinel `Z32`).
//! Nothing ever creates a coin with that parent in a real transaction, so
//! the sentinel unambiguously marks a spend as offer metadata rather than a
//! real settlement spend.

use chia_bls::G2Element;
use chia_protocol::{Bytes32, Coin, CoinSpend, Program, SpendBundle};
use clvm_traits::{FromClvm, ToClvm};
use clvmr::Allocator;
use indexmap::IndexMap;

use crate::error::{OfferError, Result};
use crate::offer::{AssetKey, Offer};
use crate::primitives::NotarizedPayment;
use crate::puzzles::cat::construct_wrapper;
use crate::puzzles::offer::SETTLEMENT_PAYMENTS_PUZZLE;

const Z32: Bytes32 = Bytes32::new([0u8; 32]);

/// Serializes `offer` to the bytes of the [`SpendBundle`] it is wire-compatible
/// with: one dummy spend per requested asset, prepended to the offer's real
/// spends.
pub fn bytes(offer: &Offer) -> Result<Vec<u8>> {
    let mut a = Allocator::new();
    let mut dummy_spends = Vec::with_capacity(offer.requested_payments.len());

    for (asset, payments) in &offer.requested_payments {
        let puzzle_ptr = settlement_puzzle_ptr(&mut a, *asset)?;
        let puzzle_reveal =
            Program::from_clvm(&a, puzzle_ptr).map_err(|e| OfferError::Malformed(e.to_string()))?;
        let puzzle_hash = clvm_utils::tree_hash(&a, puzzle_ptr);

        let conditions: Vec<_> = payments.iter().map(NotarizedPayment::as_condition).collect();
        let solution_ptr = conditions
            .to_clvm(&mut a)
            .map_err(|e| OfferError::Malformed(e.to_string()))?;
        let solution = Program::from_clvm(&a, solution_ptr)
            .map_err(|e| OfferError::Malformed(e.to_string()))?;

        dummy_spends.push(CoinSpend::new(
            Coin::new(Z32, puzzle_hash.into(), 0),
            puzzle_reveal,
            solution,
        ));
    }

    let dummy_bundle = SpendBundle::new(dummy_spends, G2Element::default());
    let combined = SpendBundle::aggregate(&[dummy_bundle, offer.bundle.clone()]);
    Ok(combined.to_bytes().map_err(|e| OfferError::Malformed(e.to_string()))?)
}

/// Parses an offer out of its wire bytes, splitting dummy request spends
/// (`parent_coin_info == Z32`) back out from the real settlement bundle.
pub fn from_bytes(data: &[u8]) -> Result<Offer> {
    let bundle =
        SpendBundle::from_bytes(data).map_err(|e| OfferError::Malformed(e.to_string()))?;

    let mut a = Allocator::new();
    let mut requested_payments = IndexMap::new();
    let mut leftover = Vec::with_capacity(bundle.coin_spends.len());

    for coin_spend in bundle.coin_spends {
        if coin_spend.coin.parent_coin_info != Z32 {
            leftover.push(coin_spend);
            continue;
        }

        let puzzle_ptr = coin_spend
            .puzzle_reveal
            .to_clvm(&mut a)
            .map_err(|e| OfferError::Malformed(e.to_string()))?;
        let asset = match crate::puzzles::cat::match_wrapper(&a, puzzle_ptr) {
            Some((tail, _inner)) => Some(tail),
            None => None,
        };

        let solution_ptr = coin_spend
            .solution
            .to_clvm(&mut a)
            .map_err(|e| OfferError::Malformed(e.to_string()))?;
        let conditions = <Vec<crate::primitives::NotarizedPaymentCondition>>::from_clvm(
            &a,
            solution_ptr,
        )
        .map_err(|e| OfferError::Malformed(e.to_string()))?;

        let payments = conditions.into_iter().map(NotarizedPayment::from_condition).collect();
        requested_payments.insert(asset, payments);
    }

    Offer::new(requested_payments, SpendBundle::new(leftover, bundle.aggregated_signature))
}

/// Folds `offers` into a single offer: unions requested payments per asset
/// (preserving each source offer's order), concatenates and signs the
/// combined bundle, and rejects the aggregation if any two offers spend a
/// coin of the same name.
pub fn aggregate(offers: &[Offer]) -> Result<Offer> {
    let mut total_requested: IndexMap<AssetKey, Vec<NotarizedPayment>> = IndexMap::new();
    let mut total_bundle = SpendBundle::new(Vec::new(), G2Element::default());

    for offer in offers {
        let seen: std::collections::HashSet<Bytes32> =
            total_bundle.coin_spends.iter().map(|cs| cs.coin.coin_id()).collect();
        if offer
            .bundle
            .coin_spends
            .iter()
            .any(|cs| seen.contains(&cs.coin.coin_id()))
        {
            return Err(OfferError::OverlappingInputs);
        }

        for (asset, payments) in &offer.requested_payments {
            total_requested
                .entry(*asset)
                .or_default()
                .extend(payments.iter().cloned());
        }

        total_bundle = SpendBundle::aggregate(&[total_bundle, offer.bundle.clone()]);
    }

    Offer::new(total_requested, total_bundle)
}

fn settlement_puzzle_ptr(
    a: &mut Allocator,
    asset: AssetKey,
) -> Result<clvmr::NodePtr> {
    let native = clvmr::serde::node_from_bytes(a, &SETTLEMENT_PAYMENTS_PUZZLE)
        .map_err(|e| OfferError::Malformed(e.to_string()))?;
    match asset {
        None => Ok(native),
        Some(tail_hash) => construct_wrapper(a, tail_hash, native)
            .map_err(|e| OfferError::Malformed(e.to_string())),
    }
}

impl Offer {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bytes(self)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        from_bytes(data)
    }

    pub fn aggregate(offers: &[Offer]) -> Result<Offer> {
        aggregate(offers)
    }
}

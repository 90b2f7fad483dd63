//! Offer analyzer: what an assembled offer actually offers, what it
//! requests, and whether the two balance (spec §4.4).

use chia_protocol::{Coin, SpendBundle};
use clvmr::{serde::node_from_bytes_backrefs, Allocator};
use indexmap::IndexMap;

use crate::error::{OfferError, Result};
use crate::offer::{AssetKey, Offer};
use crate::puzzles::cat::{match_wrapper, tokenized_settlement_puzzle_hash};
use crate::puzzles::offer::native_settlement_puzzle_hash;

/// Enumerates every addition of `bundle` that lands on a settlement
/// puzzle-hash, grouped by the asset it settles. An addition counts as
/// "offered" only if its parent spend's puzzle reveal resolves (via
/// [`match_wrapper`]) to the expected settlement puzzle for that asset;
/// anything else — change, intermediate coins — is ignored. Coins within
/// an asset group preserve first-seen order.
pub fn get_offered_coins(bundle: &SpendBundle) -> Result<IndexMap<AssetKey, Vec<Coin>>> {
    let additions = bundle.additions().map_err(|e| OfferError::Eval(e.1))?;

    let mut a = Allocator::new();
    let mut offered: IndexMap<AssetKey, Vec<Coin>> = IndexMap::new();

    for addition in additions {
        let parent_spend = bundle
            .coin_spends
            .iter()
            .find(|cs| cs.coin.coin_id() == addition.parent_coin_info)
            .ok_or_else(|| {
                OfferError::Malformed("addition's parent spend is missing from the bundle".into())
            })?;

        let puzzle_ptr = node_from_bytes_backrefs(&mut a, parent_spend.puzzle_reveal.as_slice())
            .map_err(|e| OfferError::Malformed(e.to_string()))?;

        let (asset_key, expected_ph) = match match_wrapper(&a, puzzle_ptr) {
            Some((tail, inner)) => {
                let inner_hash = clvm_utils::tree_hash(&a, inner);
                (Some(tail), tokenized_settlement_puzzle_hash(tail, inner_hash))
            }
            None => (None, native_settlement_puzzle_hash()),
        };

        if addition.puzzle_hash == expected_ph {
            offered.entry(asset_key).or_default().push(addition);
        }
    }

    Ok(offered)
}

/// Sums offered coin amounts per asset, widening into `u128` to make
/// overflow detectable before truncating back into the `u64` callers
/// expect from this protocol.
pub fn get_offered_amounts(bundle: &SpendBundle) -> Result<IndexMap<AssetKey, u64>> {
    let offered = get_offered_coins(bundle)?;
    let mut amounts = IndexMap::new();
    for (asset, coins) in offered {
        let total = sum_amounts(coins.iter().map(|c| c.amount))?;
        amounts.insert(asset, total);
    }
    Ok(amounts)
}

fn sum_amounts(values: impl Iterator<Item = u64>) -> Result<u64> {
    let mut total: u128 = 0;
    for v in values {
        total += u128::from(v);
    }
    u64::try_from(total).map_err(|_| OfferError::Overflow)
}

impl Offer {
    /// See [`get_offered_coins`].
    pub fn get_offered_coins(&self) -> Result<IndexMap<AssetKey, Vec<Coin>>> {
        get_offered_coins(&self.bundle)
    }

    /// See [`get_offered_amounts`].
    pub fn get_offered_amounts(&self) -> Result<IndexMap<AssetKey, u64>> {
        get_offered_amounts(&self.bundle)
    }

    pub fn get_requested_payments(&self) -> &IndexMap<AssetKey, Vec<crate::primitives::NotarizedPayment>> {
        &self.requested_payments
    }

    pub fn get_requested_amounts(&self) -> Result<IndexMap<AssetKey, u64>> {
        let mut amounts = IndexMap::new();
        for (asset, payments) in &self.requested_payments {
            let total = sum_amounts(payments.iter().map(|p| p.amount()))?;
            amounts.insert(*asset, total);
        }
        Ok(amounts)
    }

    /// Signed per-asset `offered - requested`, for every asset appearing in
    /// either view. An asset missing from one side is treated as zero on
    /// that side.
    pub fn arbitrage(&self) -> Result<IndexMap<AssetKey, i128>> {
        let offered = self.get_offered_amounts()?;
        let requested = self.get_requested_amounts()?;

        let mut result = IndexMap::new();
        for asset in requested.keys().chain(offered.keys()) {
            result.entry(*asset).or_insert_with(|| {
                let o = i128::from(offered.get(asset).copied().unwrap_or(0));
                let r = i128::from(requested.get(asset).copied().unwrap_or(0));
                o - r
            });
        }
        Ok(result)
    }

    /// True if every asset's arbitrage is non-negative: nothing requested
    /// exceeds what was offered.
    pub fn is_valid(&self) -> Result<bool> {
        Ok(self.arbitrage()?.values().all(|&v| v >= 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::notarize_payments;
    use crate::primitives::Payment;
    use crate::test_support::{native_coin_spend, test_coin};
    use chia_bls::G2Element;

    #[test]
    fn offered_coins_are_grouped_by_asset_and_ordered() {
        let coin = test_coin(1000);
        let spend = native_coin_spend(
            coin,
            vec![
                (native_settlement_puzzle_hash(), 400),
                (native_settlement_puzzle_hash(), 600),
                ([0xffu8; 32].into(), 1), // not a settlement hash: ignored
            ],
        );
        let bundle = SpendBundle::new(vec![spend], G2Element::default());

        let offered = get_offered_coins(&bundle).unwrap();
        assert_eq!(offered.len(), 1);
        let native = &offered[&None];
        assert_eq!(native.len(), 2);
        assert_eq!(native[0].amount, 400);
        assert_eq!(native[1].amount, 600);
    }

    #[test]
    fn arbitrage_reflects_unbalanced_native_for_token_swap() {
        let coin = test_coin(1000);
        let spend = native_coin_spend(coin, vec![(native_settlement_puzzle_hash(), 1000)]);
        let bundle = SpendBundle::new(vec![spend], G2Element::default());

        let requested_token = [0x11u8; 32];
        let (payments, _nonce) =
            notarize_payments(&[Payment::new([0x22u8; 32].into(), 500)], &[coin]);

        let mut requested = IndexMap::new();
        requested.insert(Some(requested_token.into()), payments);

        let offer = Offer::new(requested, bundle).unwrap();
        let arbitrage = offer.arbitrage().unwrap();

        assert_eq!(arbitrage[&None], 1000);
        assert_eq!(arbitrage[&Some(requested_token.into())], -500);
        assert!(!offer.is_valid().unwrap());
    }
}

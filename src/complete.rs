//! Completion: turning a fully funded [`Offer`] into a broadcastable
//! [`SpendBundle`] (spec §4.5.4).

use chia_bls::G2Element;
use chia_protocol::{Bytes32, CoinSpend, Program, SpendBundle};
use clvm_traits::ToClvm;
use clvmr::{
    serde::{node_from_bytes, node_from_bytes_backrefs},
    Allocator,
};

use crate::error::{OfferError, Result};
use crate::offer::Offer;
use crate::primitives::{LineageProof, NotarizedPayment, NotarizedPaymentCondition, Payment};
use crate::puzzles::cat::{match_wrapper, SpendableCat};
use crate::puzzles::offer::SETTLEMENT_PAYMENTS_PUZZLE;

impl Offer {
    /// Completes the offer into a valid spend bundle: every requested
    /// payment is attached to the offered coins' solutions so the
    /// settlement puzzle asserts the matching announcements, and any surplus
    /// (`arbitrage(asset) > 0`) is paid out to `arbitrage_ph` as an extra
    /// notarized payment with an all-zero nonce — it belongs to no offer's
    /// coin set, only to the act of completing this one.
    ///
    /// Only the first offered coin of each asset carries the full payment
    /// list in its solution; every other coin of that asset carries an
    /// empty one, since a single announcement per payment is all the
    /// settlement puzzle requires.
    pub fn to_valid_spend(&self, arbitrage_ph: Bytes32) -> Result<SpendBundle> {
        if !self.is_valid()? {
            return Err(OfferError::Incomplete);
        }

        let offered = self.get_offered_coins()?;
        let arbitrage = self.arbitrage()?;
        let mut a = Allocator::new();
        let mut completion_spends = Vec::new();

        for (asset, payments) in &self.requested_payments {
            let coins = offered.get(asset).ok_or(OfferError::Incomplete)?;
            let surplus = arbitrage.get(asset).copied().unwrap_or(0);

            let mut all_payments = payments.clone();
            if surplus > 0 {
                let amount = u64::try_from(surplus).map_err(|_| OfferError::Overflow)?;
                all_payments.push(NotarizedPayment::new(
                    Bytes32::default(),
                    Payment::new(arbitrage_ph, amount),
                ));
            }
            let full_conditions: Vec<NotarizedPaymentCondition> =
                all_payments.iter().map(NotarizedPayment::as_condition).collect();
            let empty_conditions: Vec<NotarizedPaymentCondition> = Vec::new();

            for (i, coin) in coins.iter().enumerate() {
                let conditions = if i == 0 { &full_conditions } else { &empty_conditions };
                let inner_solution_ptr = conditions
                    .to_clvm(&mut a)
                    .map_err(|e| OfferError::Eval(e.to_string()))?;

                let spend = match asset {
                    None => {
                        let puzzle_ptr = node_from_bytes(&mut a, &SETTLEMENT_PAYMENTS_PUZZLE)
                            .map_err(|e| OfferError::Malformed(e.to_string()))?;
                        CoinSpend::new(
                            *coin,
                            Program::from_clvm(&a, puzzle_ptr)
                                .map_err(|e| OfferError::Malformed(e.to_string()))?,
                            Program::from_clvm(&a, inner_solution_ptr)
                                .map_err(|e| OfferError::Malformed(e.to_string()))?,
                        )
                    }
                    Some(tail_hash) => {
                        let parent_spend = self
                            .bundle
                            .coin_spends
                            .iter()
                            .find(|cs| cs.coin.coin_id() == coin.parent_coin_info)
                            .ok_or_else(|| {
                                OfferError::Malformed(
                                    "offered coin's parent spend is missing from the bundle".into(),
                                )
                            })?;
                        let parent_coin = parent_spend.coin;

                        let parent_puzzle_ptr = node_from_bytes_backrefs(
                            &mut a,
                            parent_spend.puzzle_reveal.as_slice(),
                        )
                        .map_err(|e| OfferError::Malformed(e.to_string()))?;
                        let (_, inner_puzzle) = match_wrapper(&a, parent_puzzle_ptr)
                            .ok_or_else(|| {
                                OfferError::Malformed(
                                    "offered CAT coin's parent is not a tokenization wrapper".into(),
                                )
                            })?;
                        let inner_puzzle_hash = clvm_utils::tree_hash(&a, inner_puzzle);

                        let spendable = SpendableCat {
                            coin: *coin,
                            tail_hash: *tail_hash,
                            inner_puzzle,
                            inner_solution: inner_solution_ptr,
                            lineage_proof: LineageProof::new(
                                parent_coin.parent_coin_info,
                                inner_puzzle_hash.into(),
                                parent_coin.amount,
                            ),
                        };
                        spendable.to_coin_spend(&mut a)?
                    }
                };

                completion_spends.push(spend);
            }
        }

        let completion_bundle = SpendBundle::new(completion_spends, G2Element::default());
        Ok(SpendBundle::aggregate(&[completion_bundle, self.bundle.clone()]))
    }
}

use chia_bls::G2Element;
use chia_protocol::{Bytes32, SpendBundle};
use indexmap::IndexMap;

use crate::error::{OfferError, Result};
use crate::primitives::NotarizedPayment;

/// `None` for the native asset, `Some(tail_hash)` for a tokenized asset
/// identified by its CAT tail.
pub type AssetKey = Option<Bytes32>;

/// A partially constructed, non-interactive, self-contained transaction
/// proposal. One party commits coins to a settlement puzzle, declaring a
/// set of payments it requests in return; any counterparty that can satisfy
/// those payments may complete the offer into a broadcastable spend bundle,
/// or aggregate it with other offers into a larger atomic swap.
///
/// Constructed once and thereafter immutable: every derived view
/// ([`crate::analyzer`]) is a pure function of these two fields, and
/// validation (non-empty offering, no duplicate requests) is performed
/// exactly once, here.
#[derive(Debug, Clone)]
pub struct Offer {
    pub(crate) requested_payments: IndexMap<AssetKey, Vec<NotarizedPayment>>,
    pub(crate) bundle: SpendBundle,
}

impl Offer {
    /// Builds and validates an offer from its two fields. Fails if the
    /// bundle offers nothing reachable through a settlement puzzle
    /// ([`OfferError::EmptyOffer`]), or if any asset's payment list
    /// contains two payments with the same
    /// [`NotarizedPayment::name`][crate::primitives::NotarizedPayment::name]
    /// ([`OfferError::DuplicatePayment`]).
    pub fn new(
        requested_payments: IndexMap<AssetKey, Vec<NotarizedPayment>>,
        bundle: SpendBundle,
    ) -> Result<Self> {
        let offer = Self {
            requested_payments,
            bundle,
        };
        offer.validate()?;
        Ok(offer)
    }

    fn validate(&self) -> Result<()> {
        if crate::analyzer::get_offered_coins(&self.bundle)?.is_empty() {
            return Err(OfferError::EmptyOffer);
        }

        for (asset, payments) in &self.requested_payments {
            let mut names = std::collections::HashSet::with_capacity(payments.len());
            for payment in payments {
                if !names.insert(payment.name()) {
                    return Err(OfferError::DuplicatePayment { asset: *asset });
                }
            }
        }

        Ok(())
    }

    pub fn requested_payments(&self) -> &IndexMap<AssetKey, Vec<NotarizedPayment>> {
        &self.requested_payments
    }

    pub fn bundle(&self) -> &SpendBundle {
        &self.bundle
    }
}

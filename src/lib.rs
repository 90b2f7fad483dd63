//! Construction, analysis, and settlement of Chia offer files: payment
//! notarization, settlement-puzzle binding for native and CAT2 assets, offer
//! aggregation, and completion into a broadcastable [`chia_protocol::SpendBundle`].
//!
//! The crate is deliberately I/O-free: every public function is a pure
//! transformation over caller-supplied coins, payments, and bundles. Callers
//! own persistence, networking, and key management.

pub mod analyzer;
pub mod builder;
pub mod complete;
pub mod error;
mod offer;
pub mod primitives;
pub mod puzzles;
pub mod serialize;

#[cfg(test)]
mod test_support;

pub use error::{OfferError, Result};
pub use offer::{AssetKey, Offer};

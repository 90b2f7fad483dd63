use chia_protocol::Bytes32;
use thiserror::Error;

/// Every fallible condition the offer core can raise (spec §7). The core
/// performs no I/O and never retries or recovers — every error is surfaced
/// to the caller exactly once, at the point it is detected.
#[derive(Debug, Error)]
pub enum OfferError {
    /// Construction-time: the bundle's additions contain no settlement
    /// coin, so the offer commits nothing.
    #[error("offer does not offer any coins")]
    EmptyOffer,

    /// Construction-time: two requested payments under the same asset
    /// share a `NotarizedPayment::name()`.
    #[error("offer has duplicate requested payments for asset {asset:?}")]
    DuplicatePayment { asset: Option<Bytes32> },

    /// Aggregation: two source offers spend a coin with the same name.
    #[error("aggregated offers spend overlapping input coins")]
    OverlappingInputs,

    /// Completion: `is_valid()` was false — some asset is under-funded.
    #[error("offer is not fully funded; cannot complete to a valid spend")]
    Incomplete,

    /// Decoding: a dummy spend's solution could not be parsed as a list of
    /// notarized-payment conditions, or its puzzle reveal failed to match
    /// either the native or tokenized settlement puzzle shape.
    #[error("offer bytes are malformed: {0}")]
    Malformed(String),

    /// An offered or requested amount sum exceeded the 64-bit range.
    #[error("amount sum overflowed u64")]
    Overflow,

    /// Running a puzzle/solution pair (to compute additions, or to curry a
    /// tokenization wrapper) failed.
    #[error("puzzle evaluation failed: {0}")]
    Eval(String),
}

pub type Result<T> = std::result::Result<T, OfferError>;

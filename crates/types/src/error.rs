use crate::bid::Bid;
use crate::board::Seat;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BiddingError {
    /// Malformed construction input. Always a caller bug.
    #[error("domain error: {0}")]
    Domain(String),

    #[error("inconsistent bidding by {seat}: {bid} does not outrank {previous}")]
    InconsistentBidding { seat: Seat, previous: Bid, bid: Bid },

    #[error("reference bid {bid} appears in {rounds} rounds")]
    AmbiguousReference { bid: Bid, rounds: usize },

    #[error("reference bid {bid} not found in auction")]
    NotFound { bid: Bid },

    #[error("format error: {0}")]
    Format(String),
}

impl BiddingError {
    pub(crate) fn domain(message: impl Into<String>) -> Self {
        BiddingError::Domain(message.into())
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        BiddingError::Format(message.into())
    }
}

pub type Result<T> = std::result::Result<T, BiddingError>;

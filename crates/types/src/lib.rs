//! Contract bridge auction bookkeeping and the board-record text format.

pub mod auction;
pub mod bid;
pub mod board;
pub mod contract;
pub mod error;
pub mod io;
pub mod strain;

pub use auction::{Auction, Round};
pub use bid::{AnnotatedBid, Bid, CallKind};
pub use board::{Board, Seat};
pub use contract::ContractTarget;
pub use error::{BiddingError, Result};
pub use strain::Strain;

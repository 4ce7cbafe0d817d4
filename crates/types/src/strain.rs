use crate::error::{BiddingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strain {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
    NoTrump,
}

impl Strain {
    pub const ALL: [Strain; 5] = [
        Strain::Clubs,
        Strain::Diamonds,
        Strain::Hearts,
        Strain::Spades,
        Strain::NoTrump,
    ];

    pub fn idx(self) -> usize {
        match self {
            Strain::Clubs => 0,
            Strain::Diamonds => 1,
            Strain::Hearts => 2,
            Strain::Spades => 3,
            Strain::NoTrump => 4,
        }
    }

    pub fn from_idx(idx: usize) -> Result<Self> {
        Strain::ALL
            .get(idx)
            .copied()
            .ok_or_else(|| BiddingError::domain(format!("strain index {idx} out of range")))
    }

    /// Token used by the board-record codec.
    pub fn ascii(self) -> &'static str {
        match self {
            Strain::Clubs => "C",
            Strain::Diamonds => "D",
            Strain::Hearts => "H",
            Strain::Spades => "S",
            Strain::NoTrump => "NT",
        }
    }

    pub fn from_ascii(s: &str) -> Result<Self> {
        match s {
            "C" => Ok(Strain::Clubs),
            "D" => Ok(Strain::Diamonds),
            "H" => Ok(Strain::Hearts),
            "S" => Ok(Strain::Spades),
            "NT" => Ok(Strain::NoTrump),
            _ => Err(BiddingError::domain(format!("unknown strain {s:?}"))),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Strain::Clubs => "\u{2663}",
            Strain::Diamonds => "\u{2666}",
            Strain::Hearts => "\u{2665}",
            Strain::Spades => "\u{2660}",
            Strain::NoTrump => "NT",
        }
    }

    pub fn from_symbol(s: &str) -> Result<Self> {
        match s {
            "\u{2663}" => Ok(Strain::Clubs),
            "\u{2666}" => Ok(Strain::Diamonds),
            "\u{2665}" => Ok(Strain::Hearts),
            "\u{2660}" => Ok(Strain::Spades),
            "NT" => Ok(Strain::NoTrump),
            _ => Err(BiddingError::domain(format!("unknown strain symbol {s:?}"))),
        }
    }

    pub fn is_major(self) -> bool {
        matches!(self, Strain::Hearts | Strain::Spades)
    }

    pub fn is_minor(self) -> bool {
        matches!(self, Strain::Clubs | Strain::Diamonds)
    }
}

impl fmt::Display for Strain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

use crate::auction::Auction;
use crate::error::{BiddingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use time::Date;

/// Table seats in rotation order. The ordinal order fixes the direction of
/// play: West, North, East, South, then back to West.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Seat {
    West,
    North,
    East,
    South,
}

impl Seat {
    pub const ALL: [Seat; 4] = [Seat::West, Seat::North, Seat::East, Seat::South];

    pub fn idx(self) -> usize {
        match self {
            Seat::West => 0,
            Seat::North => 1,
            Seat::East => 2,
            Seat::South => 3,
        }
    }

    pub fn from_idx(idx: usize) -> Result<Self> {
        Seat::ALL
            .get(idx)
            .copied()
            .ok_or_else(|| BiddingError::domain(format!("seat index {idx} out of range")))
    }

    pub fn next(self) -> Self {
        self.offset(1)
    }

    /// The seat `n` places further round the table.
    pub fn offset(self, n: usize) -> Self {
        Seat::ALL[(self.idx() + n) % 4]
    }

    pub fn partner(self) -> Self {
        self.offset(2)
    }

    pub fn same_team(self, other: Seat) -> bool {
        self == other || self.partner() == other
    }

    pub fn to_char(self) -> char {
        match self {
            Seat::North => 'N',
            Seat::East => 'E',
            Seat::South => 'S',
            Seat::West => 'W',
        }
    }

    /// Absent or unrecognised letters map to an unknown seat.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'N' => Some(Seat::North),
            'E' => Some(Seat::East),
            'S' => Some(Seat::South),
            'W' => Some(Seat::West),
            _ => None,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// One deal's metadata, hands and optional auction.
///
/// Hands are stored per seat as four comma-separated suit strings in the
/// order Spades, Hearts, Diamonds, Clubs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub event: String,
    pub date: Option<Date>,
    pub board_number: u32,
    pub dealer: Option<Seat>,
    pub vulnerable: String,
    pub deal: BTreeMap<Seat, String>,
    pub declarer: Option<Seat>,
    pub auction: Option<Auction>,
    pub description: Option<String>,
}

impl Board {
    pub fn new(board_number: u32, dealer: Seat) -> Self {
        Self {
            board_number,
            dealer: Some(dealer),
            ..Self::default()
        }
    }

    pub fn hand(&self, seat: Seat) -> Option<&str> {
        self.deal.get(&seat).map(String::as_str)
    }

    /// Stores a hand given as `spades,hearts,diamonds,clubs`.
    pub fn set_hand(&mut self, seat: Seat, hand: &str) -> Result<()> {
        if hand.split(',').count() != 4 {
            return Err(BiddingError::domain(format!(
                "hand {hand:?} must have four suits"
            )));
        }
        self.deal.insert(seat, hand.to_string());
        Ok(())
    }
}

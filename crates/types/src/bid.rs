use crate::error::{BiddingError, Result};
use crate::strain::Strain;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

static ASCII_CONTRACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([1-7])(C|D|H|S|NT)$").expect("static regex"));

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 7;

/// Highest id on the contract scale (7NT).
pub const MAX_ID: i32 = 35;

/// Declaration order doubles as the kind rank used when comparing bids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CallKind {
    Contract,
    Pass,
    Double,
    Redouble,
    Invalid,
    Align,
}

/// A call in the auction, or one of the two structural markers.
///
/// Bids order by kind first (Contract < Pass < Double < Redouble < Invalid <
/// Align), then by level, then by strain. Only Contract-to-Contract
/// comparisons carry bridge meaning.
///
/// `Align` fills the first-round seats that act before the dealer and never
/// shows up in rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Bid {
    Contract { level: u8, strain: Strain },
    Pass,
    Double,
    Redouble,
    Invalid,
    Align,
}

impl Bid {
    pub fn contract(level: u8, strain: Strain) -> Result<Self> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(BiddingError::domain(format!(
                "bid level {level} outside {MIN_LEVEL}..={MAX_LEVEL}"
            )));
        }
        Ok(Bid::Contract { level, strain })
    }

    pub fn kind(self) -> CallKind {
        match self {
            Bid::Contract { .. } => CallKind::Contract,
            Bid::Pass => CallKind::Pass,
            Bid::Double => CallKind::Double,
            Bid::Redouble => CallKind::Redouble,
            Bid::Invalid => CallKind::Invalid,
            Bid::Align => CallKind::Align,
        }
    }

    pub fn is_contract(self) -> bool {
        matches!(self, Bid::Contract { .. })
    }

    pub fn level(self) -> Option<u8> {
        match self {
            Bid::Contract { level, .. } => Some(level),
            _ => None,
        }
    }

    pub fn strain(self) -> Option<Strain> {
        match self {
            Bid::Contract { strain, .. } => Some(strain),
            _ => None,
        }
    }

    /// Position on the linear call scale: Double is -1, Pass is 0 and the 35
    /// contract bids run 1 (1C) to 35 (7NT).
    ///
    /// Redouble, Invalid and Align have no place on the scale.
    pub fn id(self) -> Result<i32> {
        match self {
            Bid::Double => Ok(-1),
            Bid::Pass => Ok(0),
            Bid::Contract { level, strain } => {
                Ok((i32::from(level) - 1) * 5 + strain.idx() as i32 + 1)
            }
            other => Err(BiddingError::domain(format!(
                "{:?} has no id on the call scale",
                other.kind()
            ))),
        }
    }

    pub fn from_id(id: i32) -> Result<Self> {
        match id {
            -1 => Ok(Bid::Double),
            0 => Ok(Bid::Pass),
            1..=MAX_ID => {
                let level = ((id - 1) / 5 + 1) as u8;
                let strain = Strain::from_idx(((id - 1) % 5) as usize)?;
                Ok(Bid::Contract { level, strain })
            }
            _ => Err(BiddingError::domain(format!("call id {id} out of range"))),
        }
    }

    /// Moves a contract bid `i` steps along the call scale. Other calls are
    /// returned unchanged.
    pub fn offset(self, i: i32) -> Result<Self> {
        match self {
            Bid::Contract { .. } => Bid::from_id(self.id()? + i),
            other => Ok(other),
        }
    }

    /// The next contract bid above this one; Pass is followed by 1C.
    pub fn next(self) -> Result<Self> {
        match self {
            Bid::Pass => Ok(Bid::Contract {
                level: 1,
                strain: Strain::Clubs,
            }),
            Bid::Contract {
                level,
                strain: Strain::NoTrump,
            } => Bid::contract(level + 1, Strain::Clubs),
            Bid::Contract { level, strain } => Ok(Bid::Contract {
                level,
                strain: Strain::from_idx(strain.idx() + 1)?,
            }),
            other => Err(BiddingError::domain(format!(
                "no bid follows {:?}",
                other.kind()
            ))),
        }
    }

    /// Number of scale steps from `other` up to `self`.
    pub fn distance(self, other: Bid) -> Result<i32> {
        Ok(self.id()? - other.id()?)
    }

    /// True when both are contract bids and `self` is the higher one.
    pub fn outranks(self, other: Bid) -> bool {
        self.is_contract() && other.is_contract() && self > other
    }

    /// The cheapest contract in `target`'s strain that clears `current`.
    ///
    /// Same strain: `target` if it is higher, otherwise Pass. Different
    /// strains: `target` when it already clears `current` (by one extra step
    /// unless `can_use_current_level`), otherwise `target` raised by whole
    /// levels. A non-contract `current` means nothing has been bid yet.
    pub fn cheapest_contract_at_or_above(
        current: Bid,
        target: Bid,
        can_use_current_level: bool,
    ) -> Result<Bid> {
        let Bid::Contract {
            strain: target_strain,
            ..
        } = target
        else {
            return Err(BiddingError::domain("target must be a contract bid"));
        };
        let Bid::Contract {
            strain: current_strain,
            ..
        } = current
        else {
            return Ok(target);
        };

        if current_strain == target_strain {
            return Ok(if target > current { target } else { Bid::Pass });
        }

        let margin = if can_use_current_level { 0 } else { 1 };
        let current_id = current.id()?;
        let target_id = target.id()?;
        if current_id + margin < target_id {
            return Ok(target);
        }
        let levels = (current_id + 1 - target_id) / 5 + 1;
        target.offset(5 * levels)
    }

    /// The cheapest bid in `strain` over `current`; Pass when `current` is
    /// already in that strain.
    pub fn cheapest_contract_in(current: Bid, strain: Strain) -> Result<Bid> {
        match current {
            Bid::Contract {
                strain: current_strain,
                ..
            } if current_strain == strain => Ok(Bid::Pass),
            Bid::Contract {
                level,
                strain: current_strain,
            } => {
                let level = if current_strain > strain { level + 1 } else { level };
                Bid::contract(level, strain)
            }
            _ => Bid::contract(MIN_LEVEL, strain),
        }
    }

    /// Strict ASCII token used by the board-record codec.
    pub fn to_ascii(self) -> Result<String> {
        match self {
            Bid::Contract { level, strain } => Ok(format!("{}{}", level, strain.ascii())),
            Bid::Pass => Ok("Pass".to_string()),
            Bid::Double => Ok("X".to_string()),
            Bid::Redouble => Ok("XX".to_string()),
            Bid::Align => Ok(String::new()),
            Bid::Invalid => Err(BiddingError::domain("invalid bid has no ASCII form")),
        }
    }

    pub fn parse_ascii(s: &str) -> Result<Self> {
        match s {
            "Pass" => return Ok(Bid::Pass),
            "X" => return Ok(Bid::Double),
            "XX" => return Ok(Bid::Redouble),
            _ => {}
        }
        let caps = ASCII_CONTRACT
            .captures(s)
            .ok_or_else(|| BiddingError::format(format!("unrecognised call {s:?}")))?;
        let level = caps[1]
            .parse::<u8>()
            .map_err(|e| BiddingError::format(format!("bad level in {s:?}: {e}")))?;
        Bid::contract(level, Strain::from_ascii(&caps[2])?)
    }
}

impl FromStr for Bid {
    type Err = BiddingError;

    fn from_str(s: &str) -> Result<Self> {
        Bid::parse_ascii(s)
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bid::Contract { level, strain } => write!(f, "{}{}", level, strain.symbol()),
            Bid::Pass => write!(f, "Pass"),
            Bid::Double => write!(f, "Dbl"),
            Bid::Redouble => write!(f, "Rdbl"),
            Bid::Invalid => write!(f, "Invalid"),
            Bid::Align => Ok(()),
        }
    }
}

/// A bid with a free-text note attached for display.
///
/// The note rides along through scale arithmetic but is ignored by equality,
/// ordering and hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedBid {
    pub bid: Bid,
    pub description: String,
}

impl AnnotatedBid {
    pub fn new(bid: Bid, description: impl Into<String>) -> Self {
        Self {
            bid,
            description: description.into(),
        }
    }

    pub fn offset(&self, i: i32) -> Result<Self> {
        Ok(Self::new(self.bid.offset(i)?, self.description.clone()))
    }

    pub fn next(&self) -> Result<Self> {
        Ok(Self::new(self.bid.next()?, self.description.clone()))
    }
}

impl From<Bid> for AnnotatedBid {
    fn from(bid: Bid) -> Self {
        Self::new(bid, String::new())
    }
}

impl PartialEq for AnnotatedBid {
    fn eq(&self, other: &Self) -> bool {
        self.bid == other.bid
    }
}

impl Eq for AnnotatedBid {}

impl PartialOrd for AnnotatedBid {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AnnotatedBid {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bid.cmp(&other.bid)
    }
}

impl Hash for AnnotatedBid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bid.hash(state);
    }
}

impl fmt::Display for AnnotatedBid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bid)
    }
}

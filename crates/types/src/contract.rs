use crate::bid::Bid;
use crate::error::{BiddingError, Result};
use crate::strain::Strain;
use serde::{Deserialize, Serialize};

/// Highest level at which a game contract is still worth bidding.
const MAX_GAME_LEVEL: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractTarget {
    Game,
    SmallSlam,
    GrandSlam,
}

pub fn game_level(strain: Strain) -> u8 {
    match strain {
        Strain::NoTrump => 3,
        Strain::Hearts | Strain::Spades => 4,
        Strain::Clubs | Strain::Diamonds => 5,
    }
}

impl Bid {
    pub fn is_game_bid(self) -> bool {
        match self {
            Bid::Contract { level, strain } => level >= game_level(strain),
            _ => false,
        }
    }

    pub fn is_slam_bid(self) -> bool {
        self.level().is_some_and(|level| level >= 6)
    }

    /// The cheapest game contract in `trump` over `current`.
    ///
    /// Returns Invalid once game can only be reached above the five level,
    /// and Pass when the auction already sits in `trump` at or above game.
    pub fn game_contract(trump: Strain, current: Bid, can_use_current_level: bool) -> Result<Bid> {
        let game = Bid::contract(game_level(trump), trump)?;
        match Bid::cheapest_contract_at_or_above(current, game, can_use_current_level) {
            Ok(bid) if bid.level().map_or(true, |level| level <= MAX_GAME_LEVEL) => Ok(bid),
            Ok(_) | Err(BiddingError::Domain(_)) => Ok(Bid::Invalid),
            Err(e) => Err(e),
        }
    }

    pub fn game_contract_or_pass(
        trump: Strain,
        current: Bid,
        can_use_current_level: bool,
    ) -> Result<Bid> {
        match Bid::game_contract(trump, current, can_use_current_level)? {
            Bid::Invalid => Ok(Bid::Pass),
            bid => Ok(bid),
        }
    }

    pub fn best_contract(target: ContractTarget, strain: Strain, current: Bid) -> Result<Bid> {
        match target {
            ContractTarget::Game => Bid::game_contract(strain, current, false),
            ContractTarget::SmallSlam => Bid::contract(6, strain),
            ContractTarget::GrandSlam => Bid::contract(7, strain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid(s: &str) -> Bid {
        s.parse().unwrap()
    }

    #[test]
    fn test_game_levels() {
        assert_eq!(game_level(Strain::NoTrump), 3);
        assert_eq!(game_level(Strain::Spades), 4);
        assert_eq!(game_level(Strain::Clubs), 5);
        assert!(bid("4H").is_game_bid());
        assert!(!bid("4D").is_game_bid());
        assert!(bid("3NT").is_game_bid());
        assert!(!Bid::Pass.is_game_bid());
        assert!(bid("6C").is_slam_bid());
        assert!(!bid("5NT").is_slam_bid());
    }

    #[test]
    fn test_game_contract() {
        assert_eq!(Bid::game_contract(Strain::Spades, Bid::Pass, false), Ok(bid("4S")));
        assert_eq!(Bid::game_contract(Strain::NoTrump, bid("1S"), false), Ok(bid("3NT")));
        assert_eq!(Bid::game_contract(Strain::Hearts, bid("4S"), false), Ok(bid("5H")));
        assert_eq!(Bid::game_contract(Strain::Spades, bid("4S"), false), Ok(Bid::Pass));
        // Five of a minor already passed: game is out of reach.
        assert_eq!(Bid::game_contract(Strain::Diamonds, bid("5H"), false), Ok(Bid::Invalid));
        assert_eq!(Bid::game_contract(Strain::Clubs, bid("7NT"), false), Ok(Bid::Invalid));
        assert_eq!(
            Bid::game_contract_or_pass(Strain::Diamonds, bid("5H"), false),
            Ok(Bid::Pass)
        );
        assert_eq!(
            Bid::game_contract_or_pass(Strain::Diamonds, bid("3NT"), false),
            Ok(bid("5D"))
        );
    }

    #[test]
    fn test_best_contract() {
        assert_eq!(
            Bid::best_contract(ContractTarget::Game, Strain::Hearts, bid("2S")),
            Ok(bid("4H"))
        );
        assert_eq!(
            Bid::best_contract(ContractTarget::SmallSlam, Strain::Clubs, bid("4NT")),
            Ok(bid("6C"))
        );
        assert_eq!(
            Bid::best_contract(ContractTarget::GrandSlam, Strain::NoTrump, bid("5NT")),
            Ok(bid("7NT"))
        );
    }
}

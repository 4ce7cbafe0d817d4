use crate::bid::{Bid, CallKind};
use crate::board::Seat;
use crate::error::{BiddingError, Result};
use crate::strain::Strain;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// One pass round the table, one slot per seat in West, North, East, South
/// order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    calls: [Option<Bid>; 4],
}

impl Round {
    pub fn get(&self, seat: Seat) -> Option<Bid> {
        self.calls[seat.idx()]
    }

    fn set(&mut self, seat: Seat, bid: Bid) {
        self.calls[seat.idx()] = Some(bid);
    }

    /// Recorded calls in seat order, Align placeholders included.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, Bid)> + '_ {
        Seat::ALL
            .iter()
            .filter_map(|&seat| self.get(seat).map(|bid| (seat, bid)))
    }

    pub fn contains(&self, bid: Bid) -> bool {
        self.calls.contains(&Some(bid))
    }
}

/// The bidding state of one board.
///
/// Calls are kept per round so that round 1 always starts at West: seats
/// between West and the dealer hold `Bid::Align`. `add_bid` records
/// unconditionally; callers check `is_legal` and `is_end_of_bidding` first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AuctionRecord")]
pub struct Auction {
    dealer: Seat,
    current_seat: Seat,
    current_round: usize,
    rounds: Vec<Round>,
    current_contract: Bid,
    live_call: CallKind,
}

/// Unchecked serialized form of `Auction`.
#[derive(Deserialize)]
struct AuctionRecord {
    dealer: Seat,
    current_seat: Seat,
    current_round: usize,
    rounds: Vec<Round>,
    current_contract: Bid,
    live_call: CallKind,
}

impl TryFrom<AuctionRecord> for Auction {
    type Error = BiddingError;

    /// Rounds are numbered from 1 and only the current round may be
    /// missing from `rounds`.
    fn try_from(record: AuctionRecord) -> Result<Self> {
        if record.current_round == 0 || record.rounds.len() > record.current_round {
            return Err(BiddingError::domain(format!(
                "auction at round {} cannot hold {} rounds",
                record.current_round,
                record.rounds.len()
            )));
        }
        Ok(Self {
            dealer: record.dealer,
            current_seat: record.current_seat,
            current_round: record.current_round,
            rounds: record.rounds,
            current_contract: record.current_contract,
            live_call: record.live_call,
        })
    }
}

impl Default for Auction {
    fn default() -> Self {
        Self::new(Seat::West)
    }
}

impl Auction {
    pub fn new(dealer: Seat) -> Self {
        let mut auction = Self {
            dealer,
            current_seat: dealer,
            current_round: 1,
            rounds: Vec::new(),
            current_contract: Bid::Pass,
            live_call: CallKind::Pass,
        };
        auction.clear(dealer);
        auction
    }

    /// Build an auction from space-separated ASCII calls like "1C Pass 1S X".
    pub fn bidding(dealer: Seat, calls: &str) -> Result<Self> {
        let mut auction = Self::new(dealer);
        auction.bids(calls)?;
        Ok(auction)
    }

    /// Parse and record space-separated ASCII calls. No legality checks.
    pub fn bids(&mut self, calls: &str) -> Result<()> {
        for token in calls.split_whitespace() {
            self.add_bid(Bid::parse_ascii(token)?);
        }
        Ok(())
    }

    pub fn clear(&mut self, dealer: Seat) {
        self.rounds.clear();
        self.dealer = dealer;
        self.current_seat = dealer;
        self.current_round = 1;
        self.current_contract = Bid::Pass;
        self.live_call = CallKind::Pass;

        let mut first = Round::default();
        for seat in Seat::ALL.iter().take(dealer.idx()) {
            first.set(*seat, Bid::Align);
        }
        self.rounds.push(first);
    }

    pub fn dealer(&self) -> Seat {
        self.dealer
    }

    pub fn current_seat(&self) -> Seat {
        self.current_seat
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    /// Last contract bid made, or Pass.
    pub fn current_contract(&self) -> Bid {
        self.current_contract
    }

    /// Kind of the last non-Pass call, or Pass.
    pub fn live_call(&self) -> CallKind {
        self.live_call
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn add_bid(&mut self, bid: Bid) {
        let index = self.current_round - 1;
        while self.rounds.len() <= index {
            self.rounds.push(Round::default());
        }
        self.rounds[index].set(self.current_seat, bid);
        trace!(round = self.current_round, seat = %self.current_seat, bid = ?bid, "recorded call");

        if self.current_seat == Seat::South {
            self.current_seat = Seat::West;
            self.current_round += 1;
        } else {
            self.current_seat = self.current_seat.next();
        }

        if bid.is_contract() {
            self.current_contract = bid;
        }
        if bid != Bid::Pass {
            self.live_call = bid.kind();
        }
    }

    /// Whether `bid` may be made by the seat to act.
    pub fn is_legal(&self, bid: Bid) -> Result<bool> {
        match bid {
            Bid::Pass => Ok(true),
            Bid::Contract { .. } => {
                Ok(!self.current_contract.is_contract() || bid.outranks(self.current_contract))
            }
            Bid::Double => Ok(self.live_call == CallKind::Contract
                && self
                    .declarer()
                    .is_some_and(|declarer| !declarer.same_team(self.current_seat))),
            Bid::Redouble => Ok(self.live_call == CallKind::Double
                && self
                    .declarer()
                    .is_some_and(|declarer| declarer.same_team(self.current_seat))),
            Bid::Invalid | Bid::Align => Err(BiddingError::domain(format!(
                "{:?} is not a call",
                bid.kind()
            ))),
        }
    }

    /// Every call the seat to act may make, or nothing once the auction is
    /// over.
    pub fn legal_calls(&self) -> Vec<Bid> {
        if self.is_end_of_bidding() {
            return Vec::new();
        }
        let mut result = vec![Bid::Pass];
        let mut next = Bid::Pass.next();
        while let Ok(bid) = next {
            if bid.outranks(self.current_contract) || !self.current_contract.is_contract() {
                result.push(bid);
            }
            next = bid.next();
        }
        for call in [Bid::Double, Bid::Redouble] {
            if self.is_legal(call).unwrap_or(false) {
                result.push(call);
            }
        }
        result
    }

    /// All recorded calls in chronological order as (round, seat, bid),
    /// Align placeholders included.
    pub fn calls(&self) -> impl Iterator<Item = (usize, Seat, Bid)> + '_ {
        self.rounds
            .iter()
            .enumerate()
            .flat_map(|(i, round)| round.iter().map(move |(seat, bid)| (i + 1, seat, bid)))
    }

    /// First seat to name the strain of the current contract.
    pub fn declarer(&self) -> Option<Seat> {
        self.current_contract
            .strain()
            .and_then(|strain| self.declarer_for(strain))
    }

    pub fn declarer_for(&self, strain: Strain) -> Option<Seat> {
        self.calls()
            .find(|(_, _, bid)| bid.strain() == Some(strain))
            .map(|(_, seat, _)| seat)
    }

    pub fn declarer_or_north(&self, strain: Strain) -> Seat {
        self.declarer_for(strain).unwrap_or(Seat::North)
    }

    pub fn is_end_of_bidding(&self) -> bool {
        let calls: Vec<Bid> = self
            .calls()
            .map(|(_, _, bid)| bid)
            .filter(|bid| *bid != Bid::Align)
            .collect();
        // Four passes with nothing else is the pass-out; it also satisfies
        // the trailing-three-passes rule.
        calls.len() > 3 && calls[calls.len() - 3..].iter().all(|bid| *bid == Bid::Pass)
    }

    /// The call `seat` made `level_offset` rounds after the round holding
    /// `reference`.
    pub fn relative_bid(
        &self,
        reference: Bid,
        level_offset: i32,
        seat: Seat,
    ) -> Result<Option<Bid>> {
        let found: Vec<usize> = self
            .rounds
            .iter()
            .enumerate()
            .filter(|(_, round)| round.contains(reference))
            .map(|(i, _)| i + 1)
            .collect();
        let round = match found.as_slice() {
            [round] => *round as i64,
            [] => return Err(BiddingError::NotFound { bid: reference }),
            _ => {
                return Err(BiddingError::AmbiguousReference {
                    bid: reference,
                    rounds: found.len(),
                })
            }
        };

        let target = round + i64::from(level_offset);
        if target < 1 {
            return Ok(None);
        }
        Ok(self
            .rounds
            .get(target as usize - 1)
            .and_then(|round| round.get(seat)))
    }

    /// Every call recorded for `seat`, one per round it acted in.
    pub fn bids_of(&self, seat: Seat) -> impl Iterator<Item = Bid> + '_ {
        self.rounds.iter().filter_map(move |round| round.get(seat))
    }

    pub fn bids_as_string(&self, seat: Seat) -> String {
        self.bids_of(seat).map(|bid| bid.to_string()).collect()
    }

    /// Each contract bid by `seat` must outrank that seat's previous one.
    pub fn check_consistency(&self, seat: Seat) -> Result<()> {
        let mut previous: Option<Bid> = None;
        for bid in self.bids_of(seat).filter(|bid| bid.is_contract()) {
            if let Some(prev) = previous {
                if !bid.outranks(prev) {
                    return Err(BiddingError::InconsistentBidding {
                        seat,
                        previous: prev,
                        bid,
                    });
                }
            }
            previous = Some(bid);
        }
        Ok(())
    }

    /// North and South calls only, one round per row.
    pub fn pretty_auction_rows(&self, separator: &str) -> String {
        self.rows(separator, |seat| matches!(seat, Seat::North | Seat::South))
    }

    pub fn full_auction_rows(&self, separator: &str) -> String {
        self.rows(separator, |_| true)
    }

    fn rows(&self, separator: &str, include: impl Fn(Seat) -> bool) -> String {
        let mut out = String::new();
        for round in &self.rounds {
            let row: Vec<String> = round
                .iter()
                .filter(|(seat, bid)| include(*seat) && *bid != Bid::Align)
                .map(|(_, bid)| bid.to_string())
                .collect();
            out.push_str(&row.join(" "));
            out.push_str(separator);
        }
        out
    }

    /// ASCII tokens of every call from the opening bid on; leading passes
    /// are dropped.
    pub fn ascii_sequence(&self) -> Result<String> {
        let mut out = String::new();
        for (_, _, bid) in self
            .calls()
            .skip_while(|(_, _, bid)| matches!(bid, Bid::Pass | Bid::Align))
        {
            out.push_str(&bid.to_ascii()?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid(s: &str) -> Bid {
        s.parse().unwrap()
    }

    #[test]
    fn test_deserialize_checks_round() {
        let auction = Auction::bidding(Seat::East, "1H Pass 2H Pass Pass").unwrap();
        let value = serde_yaml::to_value(&auction).unwrap();
        assert_eq!(serde_yaml::from_value::<Auction>(value.clone()).unwrap(), auction);

        let mut zero = value.clone();
        zero["current_round"] = serde_yaml::Value::from(0);
        assert!(serde_yaml::from_value::<Auction>(zero).is_err());

        let mut behind = value;
        behind["current_round"] = serde_yaml::Value::from(1);
        assert!(serde_yaml::from_value::<Auction>(behind).is_err());
    }

    #[test]
    fn test_clear_aligns_first_round() {
        let auction = Auction::new(Seat::East);
        let first = auction.rounds()[0];
        assert_eq!(first.get(Seat::West), Some(Bid::Align));
        assert_eq!(first.get(Seat::North), Some(Bid::Align));
        assert_eq!(first.get(Seat::East), None);
        assert_eq!(auction.current_seat(), Seat::East);
        assert_eq!(auction.current_round(), 1);
        assert_eq!(auction.current_contract(), Bid::Pass);
        assert_eq!(auction.live_call(), CallKind::Pass);

        let auction = Auction::new(Seat::West);
        assert_eq!(auction.rounds()[0].iter().count(), 0);
    }

    #[test]
    fn test_clear_resets() {
        let mut auction = Auction::bidding(Seat::North, "1C X XX").unwrap();
        auction.clear(Seat::South);
        assert_eq!(auction, Auction::new(Seat::South));
        assert!(!auction.is_end_of_bidding());
        assert_eq!(auction.declarer(), None);
    }

    #[test]
    fn test_add_bid_advances() {
        let mut auction = Auction::new(Seat::East);
        auction.add_bid(bid("1H"));
        assert_eq!(auction.current_seat(), Seat::South);
        auction.add_bid(Bid::Pass);
        assert_eq!(auction.current_seat(), Seat::West);
        assert_eq!(auction.current_round(), 2);
        auction.add_bid(Bid::Double);
        assert_eq!(auction.current_contract(), bid("1H"));
        assert_eq!(auction.live_call(), CallKind::Double);
        auction.add_bid(Bid::Pass);
        assert_eq!(auction.live_call(), CallKind::Double);
        assert_eq!(auction.rounds()[1].get(Seat::West), Some(Bid::Double));
    }

    #[test]
    fn test_pass_out() {
        let auction = Auction::bidding(Seat::South, "Pass Pass Pass").unwrap();
        assert!(!auction.is_end_of_bidding());
        let auction = Auction::bidding(Seat::South, "Pass Pass Pass Pass").unwrap();
        assert!(auction.is_end_of_bidding());
        assert_eq!(auction.declarer(), None);
    }

    #[test]
    fn test_end_after_three_passes() {
        let mut auction = Auction::bidding(Seat::West, "1C Pass Pass").unwrap();
        assert!(!auction.is_end_of_bidding());
        auction.add_bid(Bid::Pass);
        assert!(auction.is_end_of_bidding());
        assert_eq!(auction.declarer(), Some(Seat::West));
        assert_eq!(auction.declarer_for(Strain::Clubs), Some(Seat::West));

        let auction = Auction::bidding(Seat::North, "Pass 1S Pass 2S Pass Pass").unwrap();
        assert!(!auction.is_end_of_bidding());
    }

    #[test]
    fn test_contract_legality() {
        let auction = Auction::new(Seat::North);
        assert_eq!(auction.is_legal(bid("1C")), Ok(true));
        let auction = Auction::bidding(Seat::North, "1H").unwrap();
        assert_eq!(auction.is_legal(bid("1S")), Ok(true));
        assert_eq!(auction.is_legal(bid("1H")), Ok(false));
        assert_eq!(auction.is_legal(bid("1D")), Ok(false));
        assert_eq!(auction.is_legal(bid("2C")), Ok(true));
        assert_eq!(auction.is_legal(Bid::Pass), Ok(true));
        assert!(auction.is_legal(Bid::Align).is_err());
        assert!(auction.is_legal(Bid::Invalid).is_err());
    }

    #[test]
    fn test_double_legality() {
        // West opens; North is an opponent and may double.
        let auction = Auction::bidding(Seat::West, "1S").unwrap();
        assert_eq!(auction.current_seat(), Seat::North);
        assert_eq!(auction.is_legal(Bid::Double), Ok(true));
        assert_eq!(auction.is_legal(Bid::Redouble), Ok(false));

        // East is the opener's partner.
        let auction = Auction::bidding(Seat::West, "1S Pass").unwrap();
        assert_eq!(auction.is_legal(Bid::Double), Ok(false));

        // Balancing double by South.
        let auction = Auction::bidding(Seat::West, "1S Pass Pass").unwrap();
        assert_eq!(auction.is_legal(Bid::Double), Ok(true));

        // Nothing to double yet.
        let auction = Auction::bidding(Seat::West, "Pass").unwrap();
        assert_eq!(auction.is_legal(Bid::Double), Ok(false));
    }

    #[test]
    fn test_redouble_legality() {
        let auction = Auction::bidding(Seat::West, "1S X").unwrap();
        assert_eq!(auction.is_legal(Bid::Redouble), Ok(true));
        assert_eq!(auction.is_legal(Bid::Double), Ok(false));

        let auction = Auction::bidding(Seat::West, "1S X Pass").unwrap();
        assert_eq!(auction.is_legal(Bid::Redouble), Ok(false));

        let auction = Auction::bidding(Seat::West, "1S X Pass Pass").unwrap();
        assert_eq!(auction.is_legal(Bid::Redouble), Ok(true));

        let auction = Auction::bidding(Seat::West, "1S X XX").unwrap();
        assert_eq!(auction.is_legal(Bid::Redouble), Ok(false));
        assert_eq!(auction.is_legal(Bid::Double), Ok(false));
    }

    #[test]
    fn test_legal_calls() {
        let auction = Auction::new(Seat::North);
        let calls = auction.legal_calls();
        // Pass + 35 bids (7 levels x 5 strains)
        assert_eq!(calls.len(), 36);
        assert_eq!(calls[0], Bid::Pass);
        assert_eq!(calls[1], bid("1C"));

        let auction = Auction::bidding(Seat::North, "1H").unwrap();
        let calls = auction.legal_calls();
        assert!(calls.contains(&Bid::Double));
        assert!(!calls.contains(&Bid::Redouble));
        assert!(!calls.contains(&bid("1C")));
        assert!(calls.contains(&bid("1S")));
        assert_eq!(calls.len(), 1 + 32 + 1);

        let auction = Auction::bidding(Seat::North, "Pass Pass Pass Pass").unwrap();
        assert!(auction.legal_calls().is_empty());
    }

    #[test]
    fn test_declarer_first_to_name_strain() {
        let auction = Auction::bidding(Seat::North, "1H Pass 2C Pass 2H Pass 4H").unwrap();
        assert_eq!(auction.declarer(), Some(Seat::North));
        assert_eq!(auction.declarer_for(Strain::Clubs), Some(Seat::South));
        assert_eq!(auction.declarer_for(Strain::Spades), None);
        assert_eq!(auction.declarer_or_north(Strain::Spades), Seat::North);
        assert_eq!(auction.declarer_or_north(Strain::Clubs), Seat::South);
    }

    #[test]
    fn test_relative_bid() {
        let auction = Auction::bidding(Seat::West, "1C Pass 1H Pass 1NT Pass 3NT Pass").unwrap();
        assert_eq!(
            auction.relative_bid(bid("1H"), 1, Seat::East),
            Ok(Some(bid("3NT")))
        );
        assert_eq!(
            auction.relative_bid(bid("1NT"), -1, Seat::West),
            Ok(Some(bid("1C")))
        );
        assert_eq!(auction.relative_bid(bid("1C"), -1, Seat::West), Ok(None));
        assert_eq!(auction.relative_bid(bid("1C"), 2, Seat::West), Ok(None));
        assert_eq!(
            auction.relative_bid(bid("2C"), 0, Seat::West),
            Err(BiddingError::NotFound { bid: bid("2C") })
        );
        assert_eq!(
            auction.relative_bid(Bid::Pass, 0, Seat::West),
            Err(BiddingError::AmbiguousReference {
                bid: Bid::Pass,
                rounds: 2
            })
        );
    }

    #[test]
    fn test_check_consistency() {
        let auction = Auction::bidding(Seat::South, "1S Pass Pass Pass 2S").unwrap();
        assert_eq!(auction.check_consistency(Seat::South), Ok(()));

        // Recorded without legality checks: South goes backwards.
        let auction = Auction::bidding(Seat::South, "1NT Pass Pass Pass 1S").unwrap();
        assert_eq!(
            auction.check_consistency(Seat::South),
            Err(BiddingError::InconsistentBidding {
                seat: Seat::South,
                previous: bid("1NT"),
                bid: bid("1S"),
            })
        );

        // Passes and doubles in between are skipped.
        let auction = Auction::bidding(Seat::South, "Pass Pass 1C X Pass Pass 2C").unwrap();
        assert_eq!(auction.check_consistency(Seat::South), Ok(()));
        assert_eq!(auction.check_consistency(Seat::North), Ok(()));
    }

    #[test]
    fn test_bids_of() {
        let auction = Auction::bidding(Seat::East, "1H Pass 2H Pass Pass").unwrap();
        let north: Vec<Bid> = auction.bids_of(Seat::North).collect();
        assert_eq!(north, vec![Bid::Align, Bid::Pass]);
        let east: Vec<Bid> = auction.bids_of(Seat::East).collect();
        assert_eq!(east, vec![bid("1H"), Bid::Pass]);
        assert_eq!(auction.bids_as_string(Seat::North), "Pass");
        assert_eq!(auction.bids_as_string(Seat::West), "2\u{2665}");
    }

    #[test]
    fn test_rendering() {
        let auction = Auction::bidding(Seat::East, "1H Pass 2H Pass Pass Pass").unwrap();
        assert_eq!(
            auction.full_auction_rows("\n"),
            "1\u{2665} Pass\n2\u{2665} Pass Pass Pass\n"
        );
        assert_eq!(auction.pretty_auction_rows("|"), "Pass|Pass Pass|");
        assert_eq!(auction.ascii_sequence().unwrap(), "1HPass2HPassPassPass");

        let auction = Auction::bidding(Seat::North, "Pass Pass 1S X").unwrap();
        assert_eq!(auction.ascii_sequence().unwrap(), "1SX");
    }

    #[test]
    fn test_rendering_rejects_invalid() {
        let mut auction = Auction::new(Seat::West);
        auction.add_bid(Bid::Invalid);
        assert!(auction.ascii_sequence().is_err());
        assert_eq!(auction.full_auction_rows(";"), "Invalid;");
    }
}

use bidding_types::{Auction, Bid, Board, Seat};
use serde::Serialize;

/// Outcome of replaying one board's auction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardReport {
    pub board_number: u32,
    pub calls: usize,
    pub ended: bool,
    pub contract: Bid,
    pub declarer: Option<Seat>,
    pub issues: Vec<String>,
}

impl BoardReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Replays the auction call by call from a fresh table, collecting every
/// illegal call, per-seat consistency failure and Declarer tag mismatch.
pub fn check_board(board: &Board) -> BoardReport {
    let mut report = BoardReport {
        board_number: board.board_number,
        calls: 0,
        ended: false,
        contract: Bid::Pass,
        declarer: None,
        issues: Vec::new(),
    };
    let Some(auction) = &board.auction else {
        return report;
    };

    let mut replay = Auction::new(auction.dealer());
    for (round, seat, bid) in auction.calls() {
        if bid == Bid::Align {
            continue;
        }
        if replay.is_end_of_bidding() {
            report
                .issues
                .push(format!("round {round}: {seat} calls {bid} after the auction ended"));
        } else {
            match replay.is_legal(bid) {
                Ok(true) => {}
                Ok(false) => report
                    .issues
                    .push(format!("round {round}: {seat} calls {bid} illegally")),
                Err(e) => report.issues.push(format!("round {round}: {seat}: {e}")),
            }
        }
        replay.add_bid(bid);
        report.calls += 1;
    }

    for seat in Seat::ALL {
        if let Err(e) = auction.check_consistency(seat) {
            report.issues.push(e.to_string());
        }
    }

    report.ended = auction.is_end_of_bidding();
    report.contract = auction.current_contract();
    report.declarer = auction.declarer();
    if let (Some(tagged), true) = (board.declarer, report.ended) {
        if report.declarer != Some(tagged) {
            report.issues.push(format!(
                "Declarer tag is {tagged} but the auction gives {}",
                seat_name(report.declarer)
            ));
        }
    }
    report
}

pub fn format_report(report: &BoardReport) -> String {
    let mut out = String::new();
    let state = if report.ended { "complete" } else { "in progress" };
    let contract = if report.contract.is_contract() {
        format!("{} by {}", report.contract, seat_name(report.declarer))
    } else if report.ended {
        "passed out".to_string()
    } else {
        "no contract yet".to_string()
    };
    out.push_str(&format!(
        "Board {}: {} calls, {}, {}\n",
        report.board_number, report.calls, state, contract
    ));
    for issue in &report.issues {
        out.push_str(&format!("  ! {issue}\n"));
    }
    out
}

fn seat_name(seat: Option<Seat>) -> String {
    seat.map_or_else(|| "?".to_string(), |s| s.to_string())
}

/// Suit lines of a stored `spades,hearts,diamonds,clubs` hand.
pub fn get_hand_suits(hand: Option<&str>) -> Vec<String> {
    let groups: Vec<&str> = hand.map(|h| h.split(',').collect()).unwrap_or_default();
    ['S', 'H', 'D', 'C']
        .iter()
        .enumerate()
        .map(|(i, suit)| {
            let cards = groups.get(i).copied().unwrap_or("");
            format!("{}: {}", suit, if cards.is_empty() { "-" } else { cards })
        })
        .collect()
}

pub fn format_hands_table(board: &Board) -> String {
    let mut out = String::new();
    let n = get_hand_suits(board.hand(Seat::North));
    let e = get_hand_suits(board.hand(Seat::East));
    let s = get_hand_suits(board.hand(Seat::South));
    let w = get_hand_suits(board.hand(Seat::West));

    let indent = "        ";

    out.push_str(&format!("{indent}North\n"));
    for line in &n {
        out.push_str(&format!("{indent}{line}\n"));
    }
    out.push('\n');

    out.push_str(&format!("{:<20} East\n", "West"));
    for (west, east) in w.iter().zip(&e) {
        out.push_str(&format!("{:<20} {}\n", west, east));
    }
    out.push('\n');

    out.push_str(&format!("{indent}South\n"));
    for line in &s {
        out.push_str(&format!("{indent}{line}\n"));
    }
    out
}

pub fn format_table_header() -> String {
    format!("{:<8}{:<8}{:<8}{}\n", "West", "North", "East", "South")
}

/// One line per round, columns in West, North, East, South order.
pub fn format_auction_table(auction: &Auction) -> String {
    let mut out = format_table_header();
    for round in auction.rounds() {
        let cells: Vec<String> = Seat::ALL
            .iter()
            .map(|seat| {
                let call = round.get(*seat).map(|bid| bid.to_string()).unwrap_or_default();
                format!("{call:<8}")
            })
            .collect();
        out.push_str(cells.concat().trim_end());
        out.push('\n');
    }
    out
}

pub fn format_board(board: &Board, separator: &str, north_south_only: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("Board {}", board.board_number));
    if !board.event.is_empty() {
        out.push_str(&format!(" ({})", board.event));
    }
    out.push('\n');
    out.push_str(&format!(
        "Dealer: {}  Vulnerable: {}\n",
        seat_name(board.dealer),
        if board.vulnerable.is_empty() { "-" } else { &board.vulnerable }
    ));
    if let Some(date) = board.date {
        out.push_str(&format!("Date: {date}\n"));
    }
    if let Some(description) = &board.description {
        out.push_str(&format!("{description}\n"));
    }
    if !board.deal.is_empty() {
        out.push('\n');
        out.push_str(&format_hands_table(board));
    }
    if let Some(auction) = &board.auction {
        out.push('\n');
        if north_south_only {
            out.push_str(&auction.pretty_auction_rows(separator));
            out.push('\n');
        } else {
            out.push_str(&format_auction_table(auction));
            out.push_str(&format!("Calls: {}\n", auction.full_auction_rows(separator)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(dealer: Seat, calls: &str) -> Board {
        let mut board = Board::new(3, dealer);
        board.auction = Some(Auction::bidding(dealer, calls).unwrap());
        board
    }

    #[test]
    fn test_check_clean_auction() {
        let mut board = board_with(Seat::North, "1S Pass 2S Pass 4S Pass Pass Pass");
        board.declarer = Some(Seat::North);
        let report = check_board(&board);
        assert!(report.is_clean(), "{:?}", report.issues);
        assert_eq!(report.calls, 8);
        assert!(report.ended);
        assert_eq!(report.contract, "4S".parse::<Bid>().unwrap());
        assert_eq!(report.declarer, Some(Seat::North));
        assert_eq!(
            format_report(&report),
            "Board 3: 8 calls, complete, 4\u{2660} by N\n"
        );
    }

    #[test]
    fn test_check_flags_illegal_calls() {
        let board = board_with(Seat::West, "1H 1C X");
        let report = check_board(&board);
        assert!(!report.ended);
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].contains("N calls 1\u{2663} illegally"));
    }

    #[test]
    fn test_check_flags_declarer_mismatch() {
        let mut board = board_with(Seat::East, "1NT Pass Pass Pass");
        board.declarer = Some(Seat::West);
        let report = check_board(&board);
        assert_eq!(report.declarer, Some(Seat::East));
        assert_eq!(
            report.issues,
            vec!["Declarer tag is W but the auction gives E".to_string()]
        );
    }

    #[test]
    fn test_check_passed_out_and_empty() {
        let report = check_board(&board_with(Seat::South, "Pass Pass Pass Pass"));
        assert!(report.is_clean());
        assert_eq!(format_report(&report), "Board 3: 4 calls, complete, passed out\n");

        let report = check_board(&Board::new(9, Seat::West));
        assert_eq!(report.calls, 0);
        assert!(!report.ended);
        assert_eq!(format_report(&report), "Board 9: 0 calls, in progress, no contract yet\n");
    }

    #[test]
    fn test_hand_suits() {
        assert_eq!(
            get_hand_suits(Some("AKQ2,,Q94,A82")),
            vec!["S: AKQ2", "H: -", "D: Q94", "C: A82"]
        );
        assert_eq!(get_hand_suits(None), vec!["S: -", "H: -", "D: -", "C: -"]);
    }

    #[test]
    fn test_auction_table() {
        let auction = Auction::bidding(Seat::East, "1H Pass 2H Pass").unwrap();
        assert_eq!(
            format_auction_table(&auction),
            "West    North   East    South\n\
             \x20               1\u{2665}      Pass\n\
             2\u{2665}      Pass\n"
        );
    }
}

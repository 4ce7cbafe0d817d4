use crate::auction::Auction;
use crate::bid::Bid;
use crate::board::{Board, Seat};
use crate::error::{BiddingError, Result};
use std::collections::BTreeMap;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::Date;
use tracing::{debug, warn};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year].[month].[day]");
const LOOSE_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year].[month padding:none].[day padding:none]");

/// Placeholder for a hand that is not known.
const UNKNOWN_HAND: &str = "-";

/// Serializes one board as tag lines, followed by the auction rows when an
/// auction is present.
pub fn export_board(board: &Board) -> Result<String> {
    let dealer = board
        .dealer
        .ok_or_else(|| BiddingError::domain("board has no dealer"))?;

    let mut s = String::new();
    push_tag(&mut s, "Event", &board.event);
    if let Some(date) = board.date {
        let date = date
            .format(DATE_FORMAT)
            .map_err(|e| BiddingError::format(format!("cannot format date: {e}")))?;
        push_tag(&mut s, "Date", &date);
    }
    push_tag(&mut s, "Board", &board.board_number.to_string());
    push_tag(&mut s, "Dealer", &dealer.to_string());
    push_tag(&mut s, "Vulnerable", &board.vulnerable);
    if let Some(description) = board.description.as_deref() {
        if !description.trim().is_empty() {
            push_tag(&mut s, "Description", description);
        }
    }
    if !board.deal.is_empty() {
        push_tag(&mut s, "Deal", &export_deal(dealer, &board.deal));
    }
    if let Some(declarer) = board.declarer {
        push_tag(&mut s, "Declarer", &declarer.to_string());
    }
    if let Some(auction) = &board.auction {
        push_tag(&mut s, "Auction", &auction.dealer().to_string());
        for round in auction.rounds() {
            if round.iter().all(|(_, bid)| bid == Bid::Align) {
                continue;
            }
            // Align renders as an empty token, keeping the columns seat-aligned.
            let row = round
                .iter()
                .map(|(_, bid)| bid.to_ascii())
                .collect::<Result<Vec<_>>>()?;
            s.push_str(&row.join("\t"));
            s.push('\n');
        }
    }
    Ok(s)
}

fn push_tag(s: &mut String, tag: &str, value: &str) {
    s.push_str(&format!("[{} \"{}\"]\n", tag, value));
}

/// The first hand listed is the dealer's, then clockwise.
fn export_deal(dealer: Seat, deal: &BTreeMap<Seat, String>) -> String {
    let hands: Vec<String> = (0..4)
        .map(|i| match deal.get(&dealer.offset(i)) {
            Some(hand) => hand.replace(',', "."),
            None => UNKNOWN_HAND.to_string(),
        })
        .collect();
    format!("{}:{}", dealer, hands.join(" "))
}

/// Parses one board. Tags that cannot be understood are skipped, as are
/// unparsable Date and Board values and malformed hands; only broken auction
/// rows are errors.
pub fn import_board(text: &str) -> Result<Board> {
    let mut board = Board::default();
    let mut lines = text.lines().peekable();

    while let Some(line) = lines.next() {
        let Some((key, value)) = parse_tag(line) else {
            continue;
        };
        match key {
            "Event" => board.event = value.to_string(),
            "Date" => board.date = parse_date(value),
            "Board" => match value.parse() {
                Ok(number) => board.board_number = number,
                Err(_) => debug!(value, "ignoring unparsable board number"),
            },
            "Dealer" => board.dealer = parse_seat(value),
            "Vulnerable" => board.vulnerable = value.to_string(),
            "Deal" => board.deal = import_deal(value),
            "Declarer" => board.declarer = parse_seat(value),
            "Description" => board.description = Some(value.to_string()),
            "Auction" => {
                let dealer = parse_seat(value)
                    .or(board.dealer)
                    .ok_or_else(|| BiddingError::format("auction section without a dealer"))?;
                let mut rows = Vec::new();
                while let Some(row) = lines.next_if(|l| !l.trim_start().starts_with('[')) {
                    rows.push(row);
                }
                board.auction = Some(import_auction(dealer, &rows)?);
            }
            other => debug!(tag = other, "ignoring tag"),
        }
    }
    Ok(board)
}

/// Splits `[Tag "value"]` into its name and quoted content. Lines without a
/// double quote are not tags.
fn parse_tag(line: &str) -> Option<(&str, &str)> {
    let quote = line.find('"')?;
    let key = line.get(1..quote)?.trim();
    let value = line[quote..]
        .trim()
        .trim_end_matches(']')
        .trim()
        .trim_matches('"');
    Some((key, value))
}

fn parse_seat(value: &str) -> Option<Seat> {
    value.chars().next().and_then(Seat::from_char)
}

fn parse_date(value: &str) -> Option<Date> {
    let normalized = value.replace(['-', '/'], ".");
    let parsed = Date::parse(&normalized, DATE_FORMAT)
        .or_else(|_| Date::parse(&normalized, LOOSE_DATE_FORMAT));
    match parsed {
        Ok(date) => Some(date),
        Err(e) => {
            debug!(value, error = %e, "ignoring unparsable date");
            None
        }
    }
}

fn import_deal(value: &str) -> BTreeMap<Seat, String> {
    let mut deal = BTreeMap::new();
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return deal;
    };
    let first = Seat::from_char(first).unwrap_or_else(|| {
        warn!(deal = value, "deal does not name its first seat, assuming West");
        Seat::West
    });
    // Skip the ':' after the seat letter.
    chars.next();

    for (i, group) in chars.as_str().split(' ').filter(|g| !g.is_empty()).enumerate() {
        if i >= 4 {
            warn!(deal = value, hand = group, "ignoring hand past the fourth");
            continue;
        }
        if group == UNKNOWN_HAND {
            continue;
        }
        let hand = group.replace('.', ",");
        if hand.split(',').count() != 4 {
            warn!(deal = value, hand = group, "ignoring hand without four suits");
            continue;
        }
        deal.insert(first.offset(i), hand);
    }
    deal
}

/// Replays auction rows from `dealer` so the seat layout, including the
/// first-round Align slots, is rebuilt by the auction itself.
fn import_auction(dealer: Seat, rows: &[&str]) -> Result<Auction> {
    let mut auction = Auction::new(dealer);
    for row in rows {
        for token in row
            .split(['\t', ' '])
            .filter(|t| !t.is_empty() && !t.starts_with('='))
        {
            match token {
                "AP" => {
                    while !auction.is_end_of_bidding() {
                        auction.add_bid(Bid::Pass);
                    }
                }
                "*" => {}
                _ => {
                    let bid = Bid::parse_ascii(token)?;
                    if auction.is_end_of_bidding() || !auction.is_legal(bid)? {
                        warn!(
                            call = token,
                            seat = %auction.current_seat(),
                            round = auction.current_round(),
                            "recording illegal call"
                        );
                    }
                    auction.add_bid(bid);
                }
            }
        }
    }
    Ok(auction)
}

/// Splits a multi-board document into one text block per board. Blank
/// lines separate boards and lines starting with `%` are comments.
pub fn split_boards(text: &str) -> Vec<String> {
    let mut boards = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.trim().is_empty() {
                boards.push(std::mem::take(&mut current));
            }
            current.clear();
        } else if !line.starts_with('%') {
            current.push_str(line);
            current.push('\n');
        }
    }
    if !current.trim().is_empty() {
        boards.push(current);
    }
    boards
}

pub fn read_boards(text: &str) -> Result<Vec<Board>> {
    split_boards(text)
        .iter()
        .map(|block| import_board(block))
        .collect()
}

pub fn write_boards(boards: &[Board]) -> Result<String> {
    let mut s = String::new();
    for board in boards {
        s.push_str(&export_board(board)?);
        s.push('\n');
    }
    Ok(s)
}

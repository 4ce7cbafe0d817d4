use bidding_types::io::pbn;
use bidding_types::{Auction, Bid, Board, Seat, Strain};
use proptest::prelude::*;
use proptest::sample::Index;

proptest! {
    #[test]
    fn id_roundtrip(id in -1i32..=35) {
        let bid = Bid::from_id(id).unwrap();
        prop_assert_eq!(bid.id().unwrap(), id);
        prop_assert_eq!(Bid::from_id(bid.id().unwrap()).unwrap(), bid);
    }

    #[test]
    fn contract_order_is_level_then_strain(
        a in 1u8..=7,
        sa in 0usize..5,
        b in 1u8..=7,
        sb in 0usize..5,
    ) {
        let x = Bid::contract(a, Strain::ALL[sa]).unwrap();
        let y = Bid::contract(b, Strain::ALL[sb]).unwrap();
        prop_assert_eq!(x.cmp(&y), (a, sa).cmp(&(b, sb)));
        prop_assert_eq!(x.cmp(&y), x.id().unwrap().cmp(&y.id().unwrap()));
    }

    #[test]
    fn legal_auctions_survive_the_codec(
        dealer in 0usize..4,
        choices in prop::collection::vec(any::<Index>(), 0..40),
    ) {
        let dealer = Seat::ALL[dealer];
        let mut auction = Auction::new(dealer);
        for choice in choices {
            let legal = auction.legal_calls();
            if legal.is_empty() {
                break;
            }
            auction.add_bid(*choice.get(&legal));
        }
        for seat in Seat::ALL {
            prop_assert!(auction.check_consistency(seat).is_ok());
        }

        let mut board = Board::new(1, dealer);
        board.auction = Some(auction.clone());
        let text = pbn::export_board(&board).unwrap();
        let parsed = pbn::import_board(&text).unwrap();
        prop_assert_eq!(parsed.auction, Some(auction));
    }
}

#[test]
fn test_next_walks_the_contract_scale() {
    let mut bid = Bid::Pass;
    let mut seen = Vec::new();
    while let Ok(next) = bid.next() {
        seen.push(next);
        bid = next;
    }
    assert_eq!(seen.len(), 35);
    for (i, b) in seen.iter().enumerate() {
        assert_eq!(b.id().unwrap(), i as i32 + 1);
    }
    assert_eq!(bid, Bid::contract(7, Strain::NoTrump).unwrap());
}

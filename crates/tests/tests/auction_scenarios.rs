// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use sealbid_auction::{
    AuctionState, Finalize, GetAuctionInfo, GetWinnerCipher, GrantError, GrantView,
};
use sealbid_events::{
    AuctionCreated, AuctionEvent, AuctionFinalized, Event, TakeEvents, ViewGranted,
};
use sealbid_fhe::FheBackend;
use sealbid_test_helpers::{alice, bob, charlie, dave, seller, with_test_tracing, AuctionSystem};
use sealbid_utils::Identity;

const PERIOD: u64 = 3600;

#[actix::test]
async fn test_highest_bid_wins_and_grant_reveals_it() -> Result<()> {
    let _guard = with_test_tracing("info");

    ///////////////////////////////////////////////////////////////////////////////////
    // 1. Deploy an auction and collect three sealed bids
    ///////////////////////////////////////////////////////////////////////////////////
    let mut system = AuctionSystem::new(1);
    let auction = system.deploy(&seller(), PERIOD)?;

    system.bid(&auction, &alice(), 50).await??;
    system.bid(&auction, &bob(), 70).await??;
    system.bid(&auction, &charlie(), 65).await??;

    let info = auction.addr.send(GetAuctionInfo).await?;
    assert_eq!(info.bid_count(), 3);
    assert!(info.has_bid(&bob()));
    assert!(!info.has_bid(&dave()));
    assert_eq!(info.state, AuctionState::Open);

    ///////////////////////////////////////////////////////////////////////////////////
    // 2. Close and finalize, the operator can read the result
    ///////////////////////////////////////////////////////////////////////////////////
    let deadline = system.close_bidding(&auction).await?;
    auction.addr.send(Finalize { caller: seller() }).await??;
    assert_eq!(system.reveal(&auction, &seller()).await?, (bob(), 70));

    ///////////////////////////////////////////////////////////////////////////////////
    // 3. Grant the winner a view, nobody else gets one
    ///////////////////////////////////////////////////////////////////////////////////
    assert!(system.reveal(&auction, &bob()).await.is_err());
    auction
        .addr
        .send(GrantView {
            caller: seller(),
            grantee: bob(),
        })
        .await??;
    assert_eq!(system.reveal(&auction, &bob()).await?, (bob(), 70));

    assert_eq!(
        auction.addr.send(GetWinnerCipher { caller: alice() }).await?,
        Err(GrantError::Unauthorized(alice()))
    );
    assert!(system.reveal(&auction, &alice()).await.is_err());

    ///////////////////////////////////////////////////////////////////////////////////
    // 4. The bus saw exactly the lifecycle, without amounts
    ///////////////////////////////////////////////////////////////////////////////////
    let events = system.history.send(TakeEvents::new(6)).await?;
    let types: Vec<String> = events.iter().map(|e| e.event_type()).collect();
    assert_eq!(
        types,
        vec![
            "AuctionCreated",
            "BidAccepted",
            "BidAccepted",
            "BidAccepted",
            "AuctionFinalized",
            "ViewGranted"
        ]
    );
    assert!(events.iter().all(|e| e.auction() == auction.id));
    assert_eq!(
        events[0],
        AuctionEvent::from(AuctionCreated {
            auction: auction.id,
            operator: seller(),
            deadline,
        })
    );
    assert_eq!(
        events[4],
        AuctionEvent::from(AuctionFinalized {
            auction: auction.id,
            finalized_at: deadline,
            bid_count: 3,
        })
    );
    assert_eq!(
        events[5],
        AuctionEvent::from(ViewGranted {
            auction: auction.id,
            grantee: bob(),
        })
    );
    Ok(())
}

#[actix::test]
async fn test_tie_goes_to_first_bidder() -> Result<()> {
    let mut system = AuctionSystem::new(2);
    let auction = system.deploy(&seller(), PERIOD)?;

    system.bid(&auction, &bob(), 70).await??;
    system.bid(&auction, &charlie(), 70).await??;

    system.close_bidding(&auction).await?;
    auction.addr.send(Finalize { caller: seller() }).await??;
    assert_eq!(system.reveal(&auction, &seller()).await?, (bob(), 70));
    Ok(())
}

#[actix::test]
async fn test_auction_without_bids_has_null_winner() -> Result<()> {
    let mut system = AuctionSystem::new(3);
    let auction = system.deploy(&seller(), PERIOD)?;

    system.close_bidding(&auction).await?;
    auction.addr.send(Finalize { caller: seller() }).await??;
    assert_eq!(
        system.reveal(&auction, &seller()).await?,
        (Identity::NULL, 0)
    );
    Ok(())
}

#[actix::test]
async fn test_zero_bid_is_credited_to_its_bidder() -> Result<()> {
    let mut system = AuctionSystem::new(5);
    let auction = system.deploy(&seller(), PERIOD)?;

    system.bid(&auction, &alice(), 0).await??;
    system.bid(&auction, &bob(), 0).await??;

    system.close_bidding(&auction).await?;
    auction.addr.send(Finalize { caller: seller() }).await??;
    assert_eq!(system.reveal(&auction, &seller()).await?, (alice(), 0));
    Ok(())
}

#[actix::test]
async fn test_auctions_are_independent() -> Result<()> {
    let mut system = AuctionSystem::new(4);
    let first = system.deploy(&seller(), PERIOD)?;
    let second = system.deploy(&seller(), PERIOD * 2)?;
    assert_ne!(first.id, second.id);

    // One identity may bid once in each auction.
    system.bid(&first, &alice(), 10).await??;
    system.bid(&second, &alice(), 99).await??;
    system.bid(&second, &bob(), 20).await??;

    system.close_bidding(&first).await?;
    first.addr.send(Finalize { caller: seller() }).await??;
    assert_eq!(system.reveal(&first, &seller()).await?, (alice(), 10));

    // Results of one auction cannot be decrypted in the context of the other.
    let handle = first.addr.send(GetWinnerCipher { caller: seller() }).await??;
    assert!(system
        .fhe
        .user_decrypt(&handle, &second.id, &seller())
        .is_err());

    let info = second.addr.send(GetAuctionInfo).await?;
    assert_eq!(info.state, AuctionState::Open);
    assert_eq!(info.bid_count(), 2);

    // Only the second auction's creation and bids reach its history.
    let second_events = second.history.send(TakeEvents::new(3)).await?;
    assert!(second_events.iter().all(|e| e.auction() == second.id));
    let first_events = first.history.send(TakeEvents::new(3)).await?;
    assert!(first_events.iter().all(|e| e.auction() == first.id));
    assert_eq!(
        second_events
            .iter()
            .map(|e| e.event_type())
            .collect::<Vec<_>>(),
        vec!["AuctionCreated", "BidAccepted", "BidAccepted"]
    );
    Ok(())
}

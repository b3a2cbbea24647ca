// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use sealbid_auction::{
    AuctionState, BidError, Finalize, FinalizeError, GetAuctionInfo, GetHighestBidCipher,
    GetWinnerCipher, GrantError, GrantView, PlaceBid,
};
use sealbid_fhe::{FheBackend, FheError};
use sealbid_test_helpers::{alice, bob, charlie, seller, with_test_tracing, AuctionSystem, GENESIS};

const PERIOD: u64 = 600;

#[actix::test]
async fn test_second_bid_from_same_bidder_is_rejected() -> Result<()> {
    let _guard = with_test_tracing("warn");
    let mut system = AuctionSystem::new(10);
    let auction = system.deploy(&seller(), PERIOD)?;

    system.bid(&auction, &alice(), 40).await??;
    assert_eq!(
        system.bid(&auction, &alice(), 90).await?,
        Err(BidError::DuplicateBid(alice()))
    );
    system.bid(&auction, &bob(), 60).await??;

    // The rejected 90 never entered the comparison.
    system.close_bidding(&auction).await?;
    auction.addr.send(Finalize { caller: seller() }).await??;
    assert_eq!(system.reveal(&auction, &seller()).await?, (bob(), 60));
    Ok(())
}

#[actix::test]
async fn test_bids_at_or_after_deadline_are_rejected() -> Result<()> {
    let mut system = AuctionSystem::new(11);
    let auction = system.deploy(&seller(), PERIOD)?;

    system.clock.set(GENESIS + PERIOD - 1);
    system.bid(&auction, &alice(), 1).await??;

    system.clock.set(GENESIS + PERIOD);
    assert_eq!(
        system.bid(&auction, &bob(), 2).await?,
        Err(BidError::AuctionClosed)
    );

    auction.addr.send(Finalize { caller: seller() }).await??;
    system.clock.advance(PERIOD);
    assert_eq!(
        system.bid(&auction, &charlie(), 3).await?,
        Err(BidError::AuctionClosed)
    );
    // Closing is reported ahead of duplication.
    assert_eq!(
        system.bid(&auction, &alice(), 4).await?,
        Err(BidError::AuctionClosed)
    );

    let info = auction.addr.send(GetAuctionInfo).await?;
    assert_eq!(info.bidders, vec![alice()]);
    Ok(())
}

#[actix::test]
async fn test_input_bound_to_someone_else_is_rejected() -> Result<()> {
    let mut system = AuctionSystem::new(12);
    let auction = system.deploy(&seller(), PERIOD)?;
    let other = system.deploy(&seller(), PERIOD)?;

    // Bob's ciphertext replayed by alice.
    let stolen = system.fhe.encrypt_u64(500, &auction.id, &bob())?;
    let result = auction
        .addr
        .send(PlaceBid {
            caller: alice(),
            input: stolen,
        })
        .await?;
    assert_eq!(
        result,
        Err(BidError::InvalidInput(FheError::InvalidInputProof(
            *stolen.handle.id()
        )))
    );

    // A ciphertext produced for another auction.
    let foreign = system.fhe.encrypt_u64(500, &other.id, &alice())?;
    let result = auction
        .addr
        .send(PlaceBid {
            caller: alice(),
            input: foreign,
        })
        .await?;
    assert!(matches!(result, Err(BidError::InvalidInput(_))));

    // Nothing was recorded so alice can still bid.
    let info = auction.addr.send(GetAuctionInfo).await?;
    assert_eq!(info.bid_count(), 0);
    system.bid(&auction, &alice(), 5).await??;
    Ok(())
}

#[actix::test]
async fn test_finalize_rules() -> Result<()> {
    let mut system = AuctionSystem::new(13);
    let auction = system.deploy(&seller(), PERIOD)?;
    system.bid(&auction, &alice(), 7).await??;

    assert_eq!(
        auction.addr.send(Finalize { caller: seller() }).await?,
        Err(FinalizeError::TooEarly {
            deadline: GENESIS + PERIOD,
            now: GENESIS
        })
    );

    system.close_bidding(&auction).await?;
    assert_eq!(
        auction.addr.send(Finalize { caller: alice() }).await?,
        Err(FinalizeError::Unauthorized)
    );
    auction.addr.send(Finalize { caller: seller() }).await??;
    assert_eq!(
        auction.addr.send(Finalize { caller: seller() }).await?,
        Err(FinalizeError::AlreadyFinalized)
    );

    let info = auction.addr.send(GetAuctionInfo).await?;
    assert_eq!(
        info.state,
        AuctionState::Finalized {
            at: GENESIS + PERIOD
        }
    );
    Ok(())
}

#[actix::test]
async fn test_results_are_sealed_until_finalized() -> Result<()> {
    let mut system = AuctionSystem::new(14);
    let auction = system.deploy(&seller(), PERIOD)?;
    system.bid(&auction, &alice(), 7).await??;

    assert_eq!(
        auction.addr.send(GetWinnerCipher { caller: seller() }).await?,
        Err(GrantError::NotFinalized)
    );
    assert_eq!(
        auction
            .addr
            .send(GetHighestBidCipher { caller: seller() })
            .await?,
        Err(GrantError::NotFinalized)
    );
    assert_eq!(
        auction
            .addr
            .send(GrantView {
                caller: seller(),
                grantee: alice(),
            })
            .await?,
        Err(GrantError::NotFinalized)
    );
    Ok(())
}

#[actix::test]
async fn test_only_operator_grants_views() -> Result<()> {
    let mut system = AuctionSystem::new(15);
    let auction = system.deploy(&seller(), PERIOD)?;
    system.bid(&auction, &alice(), 7).await??;
    system.close_bidding(&auction).await?;
    auction.addr.send(Finalize { caller: seller() }).await??;

    assert_eq!(
        auction
            .addr
            .send(GrantView {
                caller: alice(),
                grantee: alice(),
            })
            .await?,
        Err(GrantError::Unauthorized(alice()))
    );
    assert_eq!(
        auction
            .addr
            .send(GetHighestBidCipher { caller: alice() })
            .await?,
        Err(GrantError::Unauthorized(alice()))
    );

    // Granting twice is accepted and changes nothing.
    for _ in 0..2 {
        auction
            .addr
            .send(GrantView {
                caller: seller(),
                grantee: alice(),
            })
            .await??;
    }
    assert_eq!(system.reveal(&auction, &alice()).await?, (alice(), 7));
    Ok(())
}

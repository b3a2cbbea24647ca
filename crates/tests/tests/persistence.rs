// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Actor;
use anyhow::{bail, Result};
use sealbid_auction::{
    AuctionParams, AuctionRepositoryFactory, AuctionSnapshot, AuctionState, BidError, Finalize,
    GetAuctionInfo, GrantView,
};
use sealbid_config::{AuctionSettings, StoreKeys};
use sealbid_data::{DataStore, GetDump, InMemStore, RepositoriesFactory};
use sealbid_test_helpers::{
    alice, bob, charlie, seller, with_test_tracing, AuctionSystem, DeployedAuction, MockAuction,
    GENESIS,
};
use sealbid_utils::Identity;
use std::sync::Arc;

#[actix::test]
async fn test_every_mutation_is_checkpointed() -> Result<()> {
    let _guard = with_test_tracing("info");
    let mut system = AuctionSystem::new(20);
    let auction = system.deploy(&seller(), 60)?;
    let store = system.store().scope(StoreKeys::auction(&auction.id));

    let Some(snapshot) = store.read::<AuctionSnapshot>().await? else {
        bail!("deploy must write a snapshot");
    };
    assert_eq!(snapshot.id, auction.id);
    assert_eq!(snapshot.config.deadline, GENESIS + 60);
    assert!(snapshot.bids.is_empty());

    system.bid(&auction, &alice(), 12).await??;
    system.bid(&auction, &bob(), 30).await??;
    let Some(snapshot) = store.read::<AuctionSnapshot>().await? else {
        bail!("snapshot missing");
    };
    assert_eq!(snapshot.bids.bidders(), vec![alice(), bob()]);
    assert_eq!(snapshot.state, AuctionState::Open);

    system.close_bidding(&auction).await?;
    auction.addr.send(Finalize { caller: seller() }).await??;
    auction
        .addr
        .send(GrantView {
            caller: seller(),
            grantee: alice(),
        })
        .await??;
    let Some(snapshot) = store.read::<AuctionSnapshot>().await? else {
        bail!("snapshot missing");
    };
    assert_eq!(snapshot.state, AuctionState::Finalized { at: GENESIS + 60 });
    assert_eq!(snapshot.grantees, vec![alice()]);
    Ok(())
}

#[actix::test]
async fn test_auction_resumes_after_restart() -> Result<()> {
    let mut system = AuctionSystem::new(21);
    let auction = system.deploy(&seller(), 60)?;
    system.bid(&auction, &alice(), 12).await??;
    system.bid(&auction, &bob(), 30).await??;

    // Rebuild the store from its serialized form and start a fresh actor on top of it.
    let dump = system.store.send(GetDump).await??;
    let store = InMemStore::from_dump(dump, false)?.start();
    let params = AuctionParams {
        fhe: system.fhe.clone(),
        bus: system.bus.clone(),
        clock: Arc::new(system.clock.clone()),
        repo: DataStore::from(&store).repositories().auction(&auction.id),
    };
    let Some(restored) = MockAuction::load(params).await? else {
        bail!("auction should have been restored");
    };

    let info = restored.send(GetAuctionInfo).await?;
    assert_eq!(info.id, auction.id);
    assert_eq!(info.operator, seller());
    assert_eq!(info.bidders, vec![alice(), bob()]);

    let resumed = DeployedAuction {
        addr: restored,
        ..auction
    };
    assert_eq!(
        system.bid(&resumed, &alice(), 99).await?,
        Err(BidError::DuplicateBid(alice()))
    );
    system.bid(&resumed, &charlie(), 25).await??;

    system.close_bidding(&resumed).await?;
    resumed.addr.send(Finalize { caller: seller() }).await??;
    assert_eq!(system.reveal(&resumed, &seller()).await?, (bob(), 30));
    Ok(())
}

#[actix::test]
async fn test_load_without_snapshot_returns_none() -> Result<()> {
    let system = AuctionSystem::new(22);
    let unknown = Identity::derive(&seller(), 99);
    assert!(MockAuction::load(system.params(&unknown)).await?.is_none());
    Ok(())
}

#[actix::test]
async fn test_deploy_from_settings() -> Result<()> {
    let system = AuctionSystem::new(23);
    let id = Identity::derive(&seller(), 0);
    let settings = AuctionSettings {
        name: "paintings".to_string(),
        operator: Some(seller()),
        bidding_period_secs: 120,
        ..Default::default()
    };

    let addr = MockAuction::deploy_with_settings(system.params(&id), id, &settings)?;
    let info = addr.send(GetAuctionInfo).await?;
    assert_eq!(info.operator, seller());
    assert_eq!(info.deadline, GENESIS + 120);

    let missing_operator = AuctionSettings {
        operator: None,
        ..settings.clone()
    };
    let other = Identity::derive(&seller(), 1);
    let result = MockAuction::deploy_with_settings(system.params(&other), other, &missing_operator);
    assert!(result.is_err());

    let no_period = AuctionSettings {
        bidding_period_secs: 0,
        ..settings
    };
    assert!(MockAuction::deploy_with_settings(system.params(&other), other, &no_period).is_err());
    assert!(MockAuction::load(system.params(&other)).await?.is_none());
    Ok(())
}

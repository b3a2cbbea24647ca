// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::{Actor, Addr};
use anyhow::Result;
use sealbid_auction::{
    AuctionActor, AuctionParams, AuctionRepositoryFactory, BidError, GetAuctionInfo,
    GetHighestBidCipher, GetWinnerCipher, PlaceBid,
};
use sealbid_data::{DataStore, InMemStore, RepositoriesFactory};
use sealbid_events::{AuctionEvent, EventBus, EventBusConfig, HistoryCollector};
use sealbid_fhe::{FheBackend, MockCoprocessor};
use sealbid_logger::SimpleLogger;
use sealbid_utils::{Clock, Identity, ManualClock, Timestamp};
use std::sync::Arc;

pub const GENESIS: Timestamp = 1_700_000_000;

pub type MockAuction = AuctionActor<MockCoprocessor>;

/// Everything an auction needs, wired together in memory: a bus with a history collector and a
/// logger, a capturing store, a deterministic coprocessor and a clock that only moves when told.
pub struct AuctionSystem {
    pub bus: Addr<EventBus<AuctionEvent>>,
    pub history: Addr<HistoryCollector<AuctionEvent>>,
    pub store: Addr<InMemStore>,
    pub fhe: MockCoprocessor,
    pub clock: ManualClock,
    deployments: u64,
}

/// A running auction, who deployed it and the events it has published.
#[derive(Clone)]
pub struct DeployedAuction {
    pub id: Identity,
    pub operator: Identity,
    pub addr: Addr<MockAuction>,
    pub history: Addr<HistoryCollector<AuctionEvent>>,
}

impl AuctionSystem {
    /// Must be called from within an actix system.
    pub fn new(seed: u64) -> Self {
        let bus = EventBus::<AuctionEvent>::new(EventBusConfig { deduplicate: true }).start();
        let history = EventBus::history(&bus);
        SimpleLogger::attach("test", bus.clone());
        Self {
            bus,
            history,
            store: InMemStore::new(true).start(),
            fhe: MockCoprocessor::from_seed(seed),
            clock: ManualClock::new(GENESIS),
            deployments: 0,
        }
    }

    pub fn store(&self) -> DataStore {
        DataStore::from(&self.store)
    }

    /// Parameters for the auction instance `auction_id`, backed by this system.
    pub fn params(&self, auction_id: &Identity) -> AuctionParams<MockCoprocessor> {
        AuctionParams {
            fhe: self.fhe.clone(),
            bus: self.bus.clone(),
            clock: Arc::new(self.clock.clone()),
            repo: self.store().repositories().auction(auction_id),
        }
    }

    /// Deploy a fresh auction. Instance identities are derived from the operator and a
    /// per-system counter, as a contract address would be.
    pub fn deploy(
        &mut self,
        operator: &Identity,
        bidding_period_secs: u64,
    ) -> Result<DeployedAuction> {
        let id = Identity::derive(operator, self.deployments);
        self.deployments += 1;
        // Subscribed before deploying so the creation event is captured too.
        let history = HistoryCollector::<AuctionEvent>::new().start();
        EventBus::pipe_filter(
            &self.bus,
            move |event: &AuctionEvent| event.auction() == id,
            history.clone().recipient(),
        );
        let addr = MockAuction::deploy(self.params(&id), id, *operator, bidding_period_secs)?;
        Ok(DeployedAuction {
            id,
            operator: *operator,
            addr,
            history,
        })
    }

    /// Encrypt `amount` as `bidder` for `auction` and submit it.
    pub async fn bid(
        &self,
        auction: &DeployedAuction,
        bidder: &Identity,
        amount: u64,
    ) -> Result<Result<(), BidError>> {
        let input = self.fhe.encrypt_u64(amount, &auction.id, bidder)?;
        Ok(auction
            .addr
            .send(PlaceBid {
                caller: *bidder,
                input,
            })
            .await?)
    }

    /// Fetch both result handles as `requester` and decrypt them through the coprocessor.
    pub async fn reveal(
        &self,
        auction: &DeployedAuction,
        requester: &Identity,
    ) -> Result<(Identity, u64)> {
        let winner = auction
            .addr
            .send(GetWinnerCipher { caller: *requester })
            .await??;
        let price = auction
            .addr
            .send(GetHighestBidCipher { caller: *requester })
            .await??;
        Ok((
            self.fhe.user_decrypt(&winner, &auction.id, requester)?,
            self.fhe.user_decrypt(&price, &auction.id, requester)?,
        ))
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Move the clock to the auction's deadline, the first instant at which it can be finalized.
    pub async fn close_bidding(&self, auction: &DeployedAuction) -> Result<Timestamp> {
        let info = auction.addr.send(GetAuctionInfo).await?;
        self.clock.set(info.deadline);
        Ok(info.deadline)
    }
}

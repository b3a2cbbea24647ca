// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{AuctionSnapshot, AuctionState, BidError, FinalizeError, GrantError, SealedAuction};
use actix::prelude::*;
use anyhow::{Context as _, Result};
use async_trait::async_trait;
use sealbid_config::AuctionSettings;
use sealbid_data::{Checkpoint, FromSnapshotWithParams, Repository, Snapshot};
use sealbid_events::{AuctionEvent, EventBus};
use sealbid_fhe::{CiphertextHandle, EAddress, EUint64, EncryptedInput, FheBackend};
use sealbid_utils::{Identity, SharedClock, Timestamp};
use tracing::{info, warn};

/// Submit an encrypted bid as `caller`.
#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), BidError>")]
pub struct PlaceBid {
    pub caller: Identity,
    pub input: EncryptedInput<EUint64>,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), FinalizeError>")]
pub struct Finalize {
    pub caller: Identity,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), GrantError>")]
pub struct GrantView {
    pub caller: Identity,
    pub grantee: Identity,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<CiphertextHandle<EAddress>, GrantError>")]
pub struct GetWinnerCipher {
    pub caller: Identity,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<CiphertextHandle<EUint64>, GrantError>")]
pub struct GetHighestBidCipher {
    pub caller: Identity,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "AuctionInfo")]
pub struct GetAuctionInfo;

/// Public view of an auction. Participation is public, amounts are not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuctionInfo {
    pub id: Identity,
    pub operator: Identity,
    pub deadline: Timestamp,
    pub state: AuctionState,
    pub bidders: Vec<Identity>,
}

impl AuctionInfo {
    pub fn bid_count(&self) -> usize {
        self.bidders.len()
    }

    pub fn has_bid(&self, identity: &Identity) -> bool {
        self.bidders.contains(identity)
    }
}

pub struct AuctionParams<F: FheBackend> {
    pub fhe: F,
    pub bus: Addr<EventBus<AuctionEvent>>,
    pub clock: SharedClock,
    pub repo: Repository<AuctionSnapshot>,
}

/// Runs one [`SealedAuction`]. The mailbox gives every call a single total order, the clock
/// supplies the time for deadline checks and every accepted mutation is checkpointed before
/// its event is published.
pub struct AuctionActor<F: FheBackend> {
    auction: SealedAuction<F>,
    bus: Addr<EventBus<AuctionEvent>>,
    clock: SharedClock,
    repo: Repository<AuctionSnapshot>,
}

impl<F: FheBackend + Unpin> Actor for AuctionActor<F> {
    type Context = Context<Self>;
}

impl<F: FheBackend + Unpin> AuctionActor<F> {
    fn assemble(
        auction: SealedAuction<F>,
        bus: Addr<EventBus<AuctionEvent>>,
        clock: SharedClock,
        repo: Repository<AuctionSnapshot>,
    ) -> Self {
        Self {
            auction,
            bus,
            clock,
            repo,
        }
    }

    /// Deploy a new auction at the current time and announce it on the bus.
    pub fn deploy(
        params: AuctionParams<F>,
        auction_id: Identity,
        operator: Identity,
        bidding_period_secs: u64,
    ) -> Result<Addr<Self>> {
        let AuctionParams {
            fhe,
            bus,
            clock,
            repo,
        } = params;
        let auction =
            SealedAuction::new(fhe, auction_id, operator, clock.now(), bidding_period_secs)
                .with_context(|| format!("Could not initialise auction {auction_id}"))?;
        let actor = Self::assemble(auction, bus, clock, repo);
        actor.checkpoint();
        actor.publish(actor.auction.created_event());
        Ok(actor.start())
    }

    pub fn deploy_with_settings(
        params: AuctionParams<F>,
        auction_id: Identity,
        settings: &AuctionSettings,
    ) -> Result<Addr<Self>> {
        settings.validate()?;
        let operator = settings.operator()?;
        info!(name = %settings.name, auction = %auction_id, "deploying auction from settings");
        Self::deploy(params, auction_id, operator, settings.bidding_period_secs)
    }

    /// Restart the auction checkpointed in `params.repo`, if there is one.
    pub async fn load(params: AuctionParams<F>) -> Result<Option<Addr<Self>>> {
        let Some(snapshot) = params.repo.read().await? else {
            return Ok(None);
        };
        let actor = Self::from_snapshot(params, snapshot).await?;
        Ok(Some(actor.start()))
    }

    fn publish(&self, event: impl Into<AuctionEvent>) {
        self.bus.do_send(event.into());
    }
}

impl<F: FheBackend + Unpin> Snapshot for AuctionActor<F> {
    type Snapshot = AuctionSnapshot;

    fn snapshot(&self) -> Result<Self::Snapshot> {
        Ok(self.auction.snapshot())
    }
}

impl<F: FheBackend + Unpin> Checkpoint for AuctionActor<F> {
    fn repository(&self) -> &Repository<AuctionSnapshot> {
        &self.repo
    }
}

#[async_trait]
impl<F: FheBackend + Unpin> FromSnapshotWithParams for AuctionActor<F> {
    type Params = AuctionParams<F>;

    async fn from_snapshot(params: AuctionParams<F>, snapshot: AuctionSnapshot) -> Result<Self> {
        info!(auction = %snapshot.id, state = %snapshot.state, "restoring auction");
        let AuctionParams {
            fhe,
            bus,
            clock,
            repo,
        } = params;
        let auction = SealedAuction::restore(fhe, snapshot);
        Ok(Self::assemble(auction, bus, clock, repo))
    }
}

impl<F: FheBackend + Unpin> Handler<PlaceBid> for AuctionActor<F> {
    type Result = Result<(), BidError>;

    fn handle(&mut self, msg: PlaceBid, _: &mut Self::Context) -> Self::Result {
        let now = self.clock.now();
        let auction_id = self.auction.id();
        let event = self
            .auction
            .submit(&msg.caller, &msg.input, now)
            .inspect_err(|err| {
                warn!(auction = %auction_id, caller = %msg.caller, "bid rejected: {err}")
            })?;
        self.checkpoint();
        self.publish(event);
        Ok(())
    }
}

impl<F: FheBackend + Unpin> Handler<Finalize> for AuctionActor<F> {
    type Result = Result<(), FinalizeError>;

    fn handle(&mut self, msg: Finalize, _: &mut Self::Context) -> Self::Result {
        let now = self.clock.now();
        let auction_id = self.auction.id();
        let event = self
            .auction
            .finalize(&msg.caller, now)
            .inspect_err(|err| {
                warn!(auction = %auction_id, caller = %msg.caller, "finalize rejected: {err}")
            })?;
        self.checkpoint();
        self.publish(event);
        Ok(())
    }
}

impl<F: FheBackend + Unpin> Handler<GrantView> for AuctionActor<F> {
    type Result = Result<(), GrantError>;

    fn handle(&mut self, msg: GrantView, _: &mut Self::Context) -> Self::Result {
        let auction_id = self.auction.id();
        let granted = self
            .auction
            .grant_view(&msg.caller, &msg.grantee)
            .inspect_err(|err| {
                warn!(auction = %auction_id, caller = %msg.caller, "grant rejected: {err}")
            })?;
        if let Some(event) = granted {
            self.checkpoint();
            self.publish(event);
        }
        Ok(())
    }
}

impl<F: FheBackend + Unpin> Handler<GetWinnerCipher> for AuctionActor<F> {
    type Result = Result<CiphertextHandle<EAddress>, GrantError>;

    fn handle(&mut self, msg: GetWinnerCipher, _: &mut Self::Context) -> Self::Result {
        self.auction.winner_cipher(&msg.caller)
    }
}

impl<F: FheBackend + Unpin> Handler<GetHighestBidCipher> for AuctionActor<F> {
    type Result = Result<CiphertextHandle<EUint64>, GrantError>;

    fn handle(&mut self, msg: GetHighestBidCipher, _: &mut Self::Context) -> Self::Result {
        self.auction.highest_bid_cipher(&msg.caller)
    }
}

impl<F: FheBackend + Unpin> Handler<GetAuctionInfo> for AuctionActor<F> {
    type Result = MessageResult<GetAuctionInfo>;

    fn handle(&mut self, _: GetAuctionInfo, _: &mut Self::Context) -> Self::Result {
        MessageResult(AuctionInfo {
            id: self.auction.id(),
            operator: self.auction.operator(),
            deadline: self.auction.deadline(),
            state: self.auction.state(),
            bidders: self.auction.bids().bidders(),
        })
    }
}

// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    AccessGrantRegistry, AuctionConfig, AuctionState, AuctionStateMachine, Bid, BidError,
    BidLedger, ComparisonEngine, FinalizeError, GrantError, RunningState,
};
use sealbid_events::{AuctionCreated, AuctionFinalized, BidAccepted, ViewGranted};
use sealbid_fhe::{
    CiphertextHandle, EAddress, EUint64, EncryptedInput, FheBackend, FheError, FheResult, FheType,
};
use sealbid_utils::{Identity, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Everything needed to rebuild an auction. Holds handles, identities and timestamps only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionSnapshot {
    pub id: Identity,
    pub config: AuctionConfig,
    pub state: AuctionState,
    pub bids: BidLedger,
    pub running: RunningState,
    pub grantees: Vec<Identity>,
}

/// One auction instance.
///
/// Mutating calls take `&mut self` and the current time, check every precondition first and
/// only then touch state, so a rejected call leaves the auction exactly as it was. Ordering
/// between calls is the caller's responsibility; [`crate::AuctionActor`] provides it.
pub struct SealedAuction<F: FheBackend> {
    id: Identity,
    fhe: F,
    machine: AuctionStateMachine,
    ledger: BidLedger,
    engine: ComparisonEngine,
    grants: AccessGrantRegistry,
}

impl<F: FheBackend> SealedAuction<F> {
    /// Deploy a new auction closing `bidding_period_secs` after `created_at`.
    pub fn new(
        fhe: F,
        id: Identity,
        operator: Identity,
        created_at: Timestamp,
        bidding_period_secs: u64,
    ) -> FheResult<Self> {
        let engine = ComparisonEngine::init(&fhe, &id)?;
        let deadline = created_at.saturating_add(bidding_period_secs);
        info!(auction = %id, %operator, deadline, "auction deployed");
        Ok(Self {
            id,
            fhe,
            machine: AuctionStateMachine::new(AuctionConfig { operator, deadline }),
            ledger: BidLedger::new(),
            engine,
            grants: AccessGrantRegistry::new(),
        })
    }

    pub fn restore(fhe: F, snapshot: AuctionSnapshot) -> Self {
        Self {
            id: snapshot.id,
            fhe,
            machine: AuctionStateMachine::restore(snapshot.config, snapshot.state),
            ledger: snapshot.bids,
            engine: ComparisonEngine::from_state(snapshot.running),
            grants: AccessGrantRegistry::from_grantees(snapshot.grantees),
        }
    }

    pub fn snapshot(&self) -> AuctionSnapshot {
        AuctionSnapshot {
            id: self.id,
            config: *self.machine.config(),
            state: self.machine.state(),
            bids: self.ledger.clone(),
            running: *self.engine.state(),
            grantees: self.grants.grantees().to_vec(),
        }
    }

    /// Place an encrypted bid on behalf of `caller`.
    ///
    /// The input must carry a proof binding it to this auction and to `caller`.
    pub fn submit(
        &mut self,
        caller: &Identity,
        input: &EncryptedInput<EUint64>,
        now: Timestamp,
    ) -> Result<BidAccepted, BidError> {
        self.machine.ensure_accepting(now)?;
        if self.ledger.contains(caller) {
            return Err(BidError::DuplicateBid(*caller));
        }
        let amount = self
            .fhe
            .verify_input(input, &self.id, caller)
            .map_err(BidError::InvalidInput)?;
        let first_bid = self.ledger.is_empty();
        self.engine
            .update(&self.fhe, &amount, caller, &self.id, first_bid)
            .map_err(BidError::Engine)?;
        self.ledger.record(Bid {
            bidder: *caller,
            amount,
        });
        info!(auction = %self.id, bidder = %caller, bids = self.ledger.len(), "bid accepted");

        Ok(BidAccepted {
            auction: self.id,
            bidder: *caller,
            amount,
        })
    }

    /// Close the auction and release both result ciphertexts to the operator.
    pub fn finalize(
        &mut self,
        caller: &Identity,
        now: Timestamp,
    ) -> Result<AuctionFinalized, FinalizeError> {
        self.machine.ensure_can_finalize(caller, now)?;
        self.release_to(caller).map_err(FinalizeError::Engine)?;
        self.machine.finalize(now);
        info!(auction = %self.id, bids = self.ledger.len(), "auction finalized");

        Ok(AuctionFinalized {
            auction: self.id,
            finalized_at: now,
            bid_count: self.ledger.len(),
        })
    }

    /// Let `grantee` fetch and decrypt the results. Returns `None` when nothing changed.
    pub fn grant_view(
        &mut self,
        caller: &Identity,
        grantee: &Identity,
    ) -> Result<Option<ViewGranted>, GrantError> {
        if !self.machine.is_operator(caller) {
            return Err(GrantError::Unauthorized(*caller));
        }
        if !self.machine.is_finalized() {
            return Err(GrantError::NotFinalized);
        }
        if self.grants.is_member(&self.operator(), grantee) {
            return Ok(None);
        }
        self.release_to(grantee).map_err(GrantError::Engine)?;
        self.grants.grant(*grantee);
        info!(auction = %self.id, %grantee, "view granted");

        Ok(Some(ViewGranted {
            auction: self.id,
            grantee: *grantee,
        }))
    }

    /// Encrypted identity of the winner.
    pub fn winner_cipher(
        &self,
        caller: &Identity,
    ) -> Result<CiphertextHandle<EAddress>, GrantError> {
        self.ensure_can_view(caller)?;
        Ok(self.engine.state().highest_bidder)
    }

    /// Encrypted winning amount.
    pub fn highest_bid_cipher(
        &self,
        caller: &Identity,
    ) -> Result<CiphertextHandle<EUint64>, GrantError> {
        self.ensure_can_view(caller)?;
        Ok(self.engine.state().highest_amount)
    }

    fn ensure_can_view(&self, caller: &Identity) -> Result<(), GrantError> {
        if !self.machine.is_finalized() {
            return Err(GrantError::NotFinalized);
        }
        if !self.grants.is_member(&self.operator(), caller) {
            warn!(auction = %self.id, %caller, "result access refused");
            return Err(GrantError::Unauthorized(*caller));
        }
        Ok(())
    }

    /// Grant both result handles or neither.
    fn release_to(&self, identity: &Identity) -> FheResult<()> {
        let running = self.engine.state();
        self.ensure_owned(&running.highest_amount)?;
        self.ensure_owned(&running.highest_bidder)?;
        self.fhe.allow(&running.highest_amount, identity, &self.id)?;
        self.fhe.allow(&running.highest_bidder, identity, &self.id)?;
        Ok(())
    }

    fn ensure_owned<T: FheType>(&self, handle: &CiphertextHandle<T>) -> FheResult<()> {
        if !self.fhe.is_allowed(handle, &self.id)? {
            return Err(FheError::AccessDenied {
                handle: *handle.id(),
                identity: self.id,
            });
        }
        Ok(())
    }

    pub fn created_event(&self) -> AuctionCreated {
        AuctionCreated {
            auction: self.id,
            operator: self.operator(),
            deadline: self.deadline(),
        }
    }

    pub fn id(&self) -> Identity {
        self.id
    }

    pub fn operator(&self) -> Identity {
        self.machine.config().operator
    }

    pub fn deadline(&self) -> Timestamp {
        self.machine.config().deadline
    }

    pub fn state(&self) -> AuctionState {
        self.machine.state()
    }

    pub fn bid_count(&self) -> usize {
        self.ledger.len()
    }

    pub fn has_bid(&self, identity: &Identity) -> bool {
        self.ledger.contains(identity)
    }

    pub fn bids(&self) -> &BidLedger {
        &self.ledger
    }

    pub fn backend(&self) -> &F {
        &self.fhe
    }
}

// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{BidError, FinalizeError};
use sealbid_utils::{Identity, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed at deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionConfig {
    pub operator: Identity,
    pub deadline: Timestamp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionState {
    Open,
    Finalized { at: Timestamp },
}

impl fmt::Display for AuctionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuctionState::Open => write!(f, "Open"),
            AuctionState::Finalized { at } => write!(f, "Finalized({at})"),
        }
    }
}

/// `Open -> Finalized`, once. There is no way back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionStateMachine {
    config: AuctionConfig,
    state: AuctionState,
}

impl AuctionStateMachine {
    pub fn new(config: AuctionConfig) -> Self {
        Self {
            config,
            state: AuctionState::Open,
        }
    }

    pub fn restore(config: AuctionConfig, state: AuctionState) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> &AuctionConfig {
        &self.config
    }

    pub fn state(&self) -> AuctionState {
        self.state
    }

    pub fn is_operator(&self, identity: &Identity) -> bool {
        self.config.operator == *identity
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.state, AuctionState::Finalized { .. })
    }

    /// Bids are only taken while open and strictly before the deadline.
    pub fn ensure_accepting(&self, now: Timestamp) -> Result<(), BidError> {
        if self.is_finalized() || now >= self.config.deadline {
            return Err(BidError::AuctionClosed);
        }
        Ok(())
    }

    pub fn ensure_can_finalize(
        &self,
        caller: &Identity,
        now: Timestamp,
    ) -> Result<(), FinalizeError> {
        if !self.is_operator(caller) {
            return Err(FinalizeError::Unauthorized);
        }
        if now < self.config.deadline {
            return Err(FinalizeError::TooEarly {
                deadline: self.config.deadline,
                now,
            });
        }
        if self.is_finalized() {
            return Err(FinalizeError::AlreadyFinalized);
        }
        Ok(())
    }

    pub(crate) fn finalize(&mut self, now: Timestamp) {
        self.state = AuctionState::Finalized { at: now };
    }
}

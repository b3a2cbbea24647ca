// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use sealbid_fhe::{CiphertextHandle, EUint64};
use sealbid_utils::Identity;
use serde::{Deserialize, Serialize};

/// An accepted bid. Never modified or removed once recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bid {
    pub bidder: Identity,
    pub amount: CiphertextHandle<EUint64>,
}

/// Append-only record of accepted bids in acceptance order, at most one per identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidLedger {
    bids: Vec<Bid>,
}

impl BidLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, bidder: &Identity) -> bool {
        self.bids.iter().any(|bid| bid.bidder == *bidder)
    }

    pub fn get(&self, bidder: &Identity) -> Option<&Bid> {
        self.bids.iter().find(|bid| bid.bidder == *bidder)
    }

    /// Append a bid. Callers must have checked [`BidLedger::contains`] first.
    pub(crate) fn record(&mut self, bid: Bid) {
        debug_assert!(!self.contains(&bid.bidder));
        self.bids.push(bid);
    }

    pub fn len(&self) -> usize {
        self.bids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bid> {
        self.bids.iter()
    }

    pub fn bidders(&self) -> Vec<Identity> {
        self.bids.iter().map(|bid| bid.bidder).collect()
    }
}

// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Message;
use sealbid_fhe::{CiphertextHandle, EUint64};
use sealbid_utils::Identity;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A bid entered the ledger. Carries the ciphertext handle only.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct BidAccepted {
    pub auction: Identity,
    pub bidder: Identity,
    pub amount: CiphertextHandle<EUint64>,
}

impl Display for BidAccepted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "auction: {}, bidder: {}, amount: {}",
            self.auction, self.bidder, self.amount
        )
    }
}

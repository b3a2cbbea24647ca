// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Message;
use sealbid_utils::{Identity, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct AuctionFinalized {
    pub auction: Identity,
    pub finalized_at: Timestamp,
    pub bid_count: usize,
}

impl Display for AuctionFinalized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "auction: {}, finalized_at: {}, bid_count: {}",
            self.auction, self.finalized_at, self.bid_count
        )
    }
}

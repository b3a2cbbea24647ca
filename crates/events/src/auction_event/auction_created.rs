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
pub struct AuctionCreated {
    pub auction: Identity,
    pub operator: Identity,
    pub deadline: Timestamp,
}

impl Display for AuctionCreated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "auction: {}, operator: {}, deadline: {}",
            self.auction, self.operator, self.deadline
        )
    }
}

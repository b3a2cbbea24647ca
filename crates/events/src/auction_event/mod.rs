// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod auction_created;
mod auction_finalized;
mod bid_accepted;
mod view_granted;

pub use auction_created::*;
pub use auction_finalized::*;
pub use bid_accepted::*;
pub use view_granted::*;

use crate::{Event, EventId};
use actix::Message;
use sealbid_utils::Identity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to help define From traits for AuctionEvent
macro_rules! impl_from_event {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for AuctionEvent {
                fn from(data: $variant) -> Self {
                    AuctionEvent::$variant {
                        id: EventId::hash(data.clone()),
                        data,
                    }
                }
            }
        )*
    };
}

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub enum AuctionEvent {
    AuctionCreated {
        id: EventId,
        data: AuctionCreated,
    },
    BidAccepted {
        id: EventId,
        data: BidAccepted,
    },
    AuctionFinalized {
        id: EventId,
        data: AuctionFinalized,
    },
    ViewGranted {
        id: EventId,
        data: ViewGranted,
    },
}

impl AuctionEvent {
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    pub fn get_id(&self) -> EventId {
        self.clone().into()
    }

    /// The auction instance that emitted this event.
    pub fn auction(&self) -> Identity {
        match self {
            AuctionEvent::AuctionCreated { data, .. } => data.auction,
            AuctionEvent::BidAccepted { data, .. } => data.auction,
            AuctionEvent::AuctionFinalized { data, .. } => data.auction,
            AuctionEvent::ViewGranted { data, .. } => data.auction,
        }
    }

    pub fn get_data(&self) -> String {
        match self {
            AuctionEvent::AuctionCreated { data, .. } => format!("{}", data),
            AuctionEvent::BidAccepted { data, .. } => format!("{}", data),
            AuctionEvent::AuctionFinalized { data, .. } => format!("{}", data),
            AuctionEvent::ViewGranted { data, .. } => format!("{}", data),
        }
    }
}

impl Event for AuctionEvent {
    type Id = EventId;

    fn event_type(&self) -> String {
        let s = format!("{:?}", self);
        extract_auction_event_name(&s).to_string()
    }

    fn event_id(&self) -> Self::Id {
        self.get_id()
    }
}

impl From<AuctionEvent> for EventId {
    fn from(value: AuctionEvent) -> Self {
        match value {
            AuctionEvent::AuctionCreated { id, .. } => id,
            AuctionEvent::BidAccepted { id, .. } => id,
            AuctionEvent::AuctionFinalized { id, .. } => id,
            AuctionEvent::ViewGranted { id, .. } => id,
        }
    }
}

impl_from_event!(AuctionCreated, BidAccepted, AuctionFinalized, ViewGranted);

impl fmt::Display for AuctionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format!("{}({})", self.event_type(), self.get_data()))
    }
}

fn extract_auction_event_name(s: &str) -> &str {
    let bytes = s.as_bytes();
    for (i, &item) in bytes.iter().enumerate() {
        if item == b' ' || item == b'(' || item == b'{' {
            return &s[..i];
        }
    }
    s
}

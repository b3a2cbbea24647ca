// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Sealed-bid auction whose bids stay encrypted for their whole lifetime.
//!
//! [`SealedAuction`] is the synchronous core. It records one bid per identity, folds every bid
//! into an encrypted running maximum with branch-free gadgets, finalizes once after the
//! deadline and controls who may fetch the frozen result ciphertexts. [`AuctionActor`] wraps it
//! so that calls are applied in mailbox order, events reach the bus and state is checkpointed.

mod actor;
mod auction;
mod engine;
mod error;
mod grants;
mod ledger;
mod repo;
mod state_machine;

pub use actor::*;
pub use auction::*;
pub use engine::*;
pub use error::*;
pub use grants::*;
pub use ledger::*;
pub use repo::*;
pub use state_machine::*;

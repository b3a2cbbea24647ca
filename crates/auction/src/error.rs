// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use sealbid_fhe::FheError;
use sealbid_utils::Identity;
use thiserror::Error;

/// Rejections of a bid submission. None of them leave a trace in the auction state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BidError {
    #[error("{0} has already placed a bid")]
    DuplicateBid(Identity),

    #[error("Bidding is closed")]
    AuctionClosed,

    #[error("Encrypted bid was rejected: {0}")]
    InvalidInput(FheError),

    #[error("Comparison failed: {0}")]
    Engine(FheError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinalizeError {
    #[error("Only the operator may finalize")]
    Unauthorized,

    #[error("Bidding ends at {deadline}, it is {now}")]
    TooEarly { deadline: u64, now: u64 },

    #[error("Auction is already finalized")]
    AlreadyFinalized,

    #[error("Could not release results to the operator: {0}")]
    Engine(FheError),
}

/// Failures on the decryption access paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrantError {
    #[error("{0} is not allowed to view the results")]
    Unauthorized(Identity),

    #[error("Auction is not finalized")]
    NotFinalized,

    #[error("Could not grant access: {0}")]
    Engine(FheError),
}

// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{FheKind, HandleId};
use sealbid_utils::Identity;
use thiserror::Error;

/// Failures reported by a coprocessor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FheError {
    #[error("Unknown ciphertext handle {0}")]
    UnknownHandle(HandleId),

    #[error("Ciphertext {handle} holds {actual:?} but {expected:?} was expected")]
    TypeMismatch {
        handle: HandleId,
        expected: FheKind,
        actual: FheKind,
    },

    #[error("{identity} is not allowed to use ciphertext {handle}")]
    AccessDenied { handle: HandleId, identity: Identity },

    #[error("Input proof rejected for ciphertext {0}")]
    InvalidInputProof(HandleId),

    #[error("Coprocessor state is unavailable")]
    Unavailable,
}

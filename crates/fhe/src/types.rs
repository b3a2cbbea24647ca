// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use sealbid_utils::Identity;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// The semantic type of an encrypted value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FheKind {
    Bool,
    Uint64,
    Address,
}

/// A decrypted value as understood by a coprocessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClearValue {
    Bool(bool),
    Uint64(u64),
    Address(Identity),
}

impl ClearValue {
    pub fn kind(&self) -> FheKind {
        match self {
            ClearValue::Bool(_) => FheKind::Bool,
            ClearValue::Uint64(_) => FheKind::Uint64,
            ClearValue::Address(_) => FheKind::Address,
        }
    }
}

/// Marker for an encrypted type, tying a handle to the plaintext it decrypts to.
pub trait FheType:
    Clone + Copy + Debug + PartialEq + Eq + Hash + Send + Sync + Unpin + 'static
{
    type Clear: Clone + Debug + PartialEq + Send + 'static;
    const KIND: FheKind;

    fn into_value(clear: Self::Clear) -> ClearValue;
    fn from_value(value: ClearValue) -> Option<Self::Clear>;
}

/// Encrypted boolean, the output of a comparison gadget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EBool;

/// Encrypted 64 bit unsigned integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EUint64;

/// Encrypted identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EAddress;

impl FheType for EBool {
    type Clear = bool;
    const KIND: FheKind = FheKind::Bool;

    fn into_value(clear: bool) -> ClearValue {
        ClearValue::Bool(clear)
    }

    fn from_value(value: ClearValue) -> Option<bool> {
        match value {
            ClearValue::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl FheType for EUint64 {
    type Clear = u64;
    const KIND: FheKind = FheKind::Uint64;

    fn into_value(clear: u64) -> ClearValue {
        ClearValue::Uint64(clear)
    }

    fn from_value(value: ClearValue) -> Option<u64> {
        match value {
            ClearValue::Uint64(v) => Some(v),
            _ => None,
        }
    }
}

impl FheType for EAddress {
    type Clear = Identity;
    const KIND: FheKind = FheKind::Address;

    fn into_value(clear: Identity) -> ClearValue {
        ClearValue::Address(clear)
    }

    fn from_value(value: ClearValue) -> Option<Identity> {
        match value {
            ClearValue::Address(v) => Some(v),
            _ => None,
        }
    }
}

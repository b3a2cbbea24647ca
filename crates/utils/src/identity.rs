// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// An authenticated principal: a bidder, an auction operator or an auction instance.
///
/// Identities are compared for equality only and expose no ordering. The caller identity is
/// attested by whoever sequences calls into an auction and is passed explicitly to every
/// operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(Address);

impl Identity {
    /// Sentinel used as the initial encrypted owner of an auction with no bids.
    pub const NULL: Identity = Identity(Address::ZERO);

    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(Address::from(bytes))
    }

    /// Derive the identity of an instance created by `deployer` at the given nonce.
    pub fn derive(deployer: &Identity, nonce: u64) -> Self {
        Self(deployer.0.create(nonce))
    }

    pub fn address(&self) -> &Address {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    pub fn to_bytes(&self) -> [u8; 20] {
        self.0 .0 .0
    }

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl From<Address> for Identity {
    fn from(value: Address) -> Self {
        Self(value)
    }
}

impl From<Identity> for Address {
    fn from(value: Identity) -> Self {
        value.0
    }
}

impl FromStr for Identity {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Identity(Address::from_str(s)?))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use sealbid_utils::Identity;
use serde::{Deserialize, Serialize};

/// Identities the operator has allowed to fetch the result ciphertexts. The operator itself is
/// an implicit member and is never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrantRegistry {
    grantees: Vec<Identity>,
}

impl AccessGrantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_grantees(grantees: Vec<Identity>) -> Self {
        let mut registry = Self::new();
        for grantee in grantees {
            registry.grant(grantee);
        }
        registry
    }

    pub fn is_member(&self, operator: &Identity, identity: &Identity) -> bool {
        identity == operator || self.grantees.contains(identity)
    }

    /// Returns false when the identity was already present.
    pub(crate) fn grant(&mut self, identity: Identity) -> bool {
        if self.grantees.contains(&identity) {
            return false;
        }
        self.grantees.push(identity);
        true
    }

    pub fn grantees(&self) -> &[Identity] {
        &self.grantees
    }
}

// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Get, InMemStore, Insert, InsertSync, IntoKey, Remove};
use actix::{Addr, Recipient};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::error;

/// Proxy for the KV store. A DataStore is scopable: every read and write goes to the key the
/// store is currently scoped at.
#[derive(Clone, Debug)]
pub struct DataStore {
    scope: Vec<u8>,
    get: Recipient<Get>,
    insert: Recipient<Insert>,
    insert_sync: Recipient<InsertSync>,
    remove: Recipient<Remove>,
}

impl DataStore {
    /// Read data at the scope location
    pub async fn read<T>(&self) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let Some(bytes) = self.get.send(Get::new(&self.scope)).await? else {
            return Ok(None);
        };

        let value = bincode::deserialize(&bytes).with_context(|| {
            format!("Could not deserialize value at {}", self.scope_lossy())
        })?;
        Ok(Some(value))
    }

    /// Writes data to the scope location
    pub fn write<T: Serialize>(&self, value: T) {
        let Ok(serialized) = bincode::serialize(&value) else {
            error!("Could not serialize value passed to {}", self.scope_lossy());
            return;
        };
        self.insert.do_send(Insert::new(&self.scope, serialized))
    }

    /// Writes data to the scope location and waits for the store to apply it
    pub async fn write_sync<T: Serialize>(&self, value: T) -> Result<()> {
        let serialized = bincode::serialize(&value)
            .with_context(|| {
                anyhow!("Could not serialize value passed to {}", self.scope_lossy())
            })?;

        self.insert_sync
            .send(InsertSync::new(&self.scope, serialized))
            .await??;
        Ok(())
    }

    /// Removes data from the scope location
    pub fn clear(&self) {
        self.remove.do_send(Remove::new(&self.scope))
    }

    /// Get the scope as a string
    pub fn get_scope(&self) -> Result<Cow<str>> {
        Ok(self.scope_lossy())
    }

    fn scope_lossy(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.scope)
    }

    /// Nest the scope. A separating slash is added unless the key starts with one.
    pub fn scope<K: IntoKey>(&self, key: K) -> Self {
        let mut scope = self.scope.clone();
        let encoded_key = key.into_key();
        if !encoded_key.starts_with(b"/") {
            scope.push(b'/');
        }
        scope.extend(encoded_key);
        Self {
            scope,
            ..self.clone()
        }
    }

    /// Replace the scope with `key`.
    pub fn base<K: IntoKey>(&self, key: K) -> Self {
        Self {
            scope: key.into_key(),
            ..self.clone()
        }
    }
}

impl From<&Addr<InMemStore>> for DataStore {
    fn from(addr: &Addr<InMemStore>) -> Self {
        Self {
            get: addr.clone().recipient(),
            insert: addr.clone().recipient(),
            insert_sync: addr.clone().recipient(),
            remove: addr.clone().recipient(),
            scope: vec![],
        }
    }
}

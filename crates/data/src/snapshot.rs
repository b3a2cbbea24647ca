// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::Repository;
use anyhow::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

/// Something that can be captured as plain serializable data.
pub trait Snapshot
where
    Self: Sized,
{
    type Snapshot: Serialize + DeserializeOwned;

    fn snapshot(&self) -> Result<Self::Snapshot>;
}

/// Rebuild an object from a snapshot plus runtime parameters that cannot be serialized, such
/// as actor addresses or a crypto backend.
#[async_trait]
pub trait FromSnapshotWithParams: Snapshot {
    type Params: Send + 'static;

    async fn from_snapshot(params: Self::Params, snapshot: Self::Snapshot) -> Result<Self>;
}

/// Write the current snapshot to the object's repository.
pub trait Checkpoint: Snapshot {
    fn repository(&self) -> &Repository<Self::Snapshot>;

    fn checkpoint(&self) {
        let snapshot = match self.snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!("Not saving data because '{}'", err);
                return;
            }
        };

        self.repository().write(&snapshot);
    }

    fn clear_checkpoint(&self) {
        self.repository().clear()
    }
}

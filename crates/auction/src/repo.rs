// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::AuctionSnapshot;
use sealbid_config::StoreKeys;
use sealbid_data::{Repositories, Repository};
use sealbid_utils::Identity;

pub trait AuctionRepositoryFactory {
    fn auction(&self, auction_id: &Identity) -> Repository<AuctionSnapshot>;
}

impl AuctionRepositoryFactory for Repositories {
    fn auction(&self, auction_id: &Identity) -> Repository<AuctionSnapshot> {
        Repository::new(self.store.scope(StoreKeys::auction(auction_id)))
    }
}

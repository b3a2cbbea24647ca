// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use sealbid_utils::Identity;

pub struct StoreKeys;

impl StoreKeys {
    pub fn auction(auction_id: &Identity) -> String {
        format!("//auction/{auction_id}")
    }
}

// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use sealbid_utils::Identity;

pub fn seller() -> Identity {
    Identity::from_bytes([0x5e; 20])
}

pub fn alice() -> Identity {
    Identity::from_bytes([0xa1; 20])
}

pub fn bob() -> Identity {
    Identity::from_bytes([0xb0; 20])
}

pub fn charlie() -> Identity {
    Identity::from_bytes([0xc4; 20])
}

pub fn dave() -> Identity {
    Identity::from_bytes([0xda; 20])
}

// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

pub mod load_config;
mod settings;
mod store_keys;
mod yaml;

pub use settings::*;
pub use store_keys::*;

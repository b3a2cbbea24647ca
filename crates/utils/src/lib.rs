// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod clock;
pub mod formatters;
mod identity;

pub use clock::*;
pub use formatters::*;
pub use identity::*;

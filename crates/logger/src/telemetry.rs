// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{anyhow, Result};
use sealbid_config::AuctionSettings;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install a global fmt subscriber filtered at `log_level`.
///
/// Fails if a global subscriber is already installed.
pub fn setup_simple_tracing(log_level: Level) -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .try_init()
        .map_err(|e| anyhow!("Could not install tracing subscriber: {e}"))
}

/// Install tracing at the level configured for an auction.
pub fn setup_tracing(settings: &AuctionSettings) -> Result<()> {
    setup_simple_tracing(settings.tracing_level()?)
}

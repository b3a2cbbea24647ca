// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::load_config::{find_in_parent, resolve_config_path, ConfigLocation};
use crate::yaml::load_yaml_with_env;
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use sealbid_utils::Identity;
use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "sealbid.config.yaml";
pub const ENV_PREFIX: &str = "SEALBID_";

/// Settings used to deploy a single auction instance.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct AuctionSettings {
    /// Label used in logs for this auction
    pub name: String,
    /// The identity allowed to finalize and grant views. Required at deploy time.
    pub operator: Option<Identity>,
    /// Length of the bidding window counted from deployment
    pub bidding_period_secs: u64,
    /// Tracing level for the process, eg. "info" or "debug"
    pub log_level: String,
}

impl Default for AuctionSettings {
    fn default() -> Self {
        Self {
            name: "auction".to_string(),
            operator: None,
            bidding_period_secs: 3600,
            log_level: "info".to_string(),
        }
    }
}

impl AuctionSettings {
    pub fn validate(&self) -> Result<()> {
        if self.bidding_period_secs == 0 {
            bail!("bidding_period_secs must be greater than zero");
        }
        self.log_level
            .parse::<tracing::Level>()
            .with_context(|| format!("Invalid log_level '{}'", self.log_level))?;
        Ok(())
    }

    /// The operator, or an error when none was configured.
    pub fn operator(&self) -> Result<Identity> {
        let Some(operator) = self.operator else {
            bail!(
                "No operator configured for auction '{}'. Set `operator` in {} or {}OPERATOR.",
                self.name,
                DEFAULT_CONFIG_NAME,
                ENV_PREFIX
            );
        };
        if operator.is_null() {
            bail!("The null identity cannot operate an auction");
        }
        Ok(operator)
    }

    pub fn tracing_level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .with_context(|| format!("Invalid log_level '{}'", self.log_level))
    }
}

/// Values passed programmatically, eg. from a command line. Highest precedence.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SettingsOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidding_period_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

#[derive(Serialize)]
struct NameOverride<'a> {
    name: &'a str,
}

pub struct OsDirs;
impl OsDirs {
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("sealbid"))
            .context("The OS did not provide a config dir. See https://docs.rs/dirs for details.")
    }
}

/// Load settings for the auction called `name`.
///
/// Sources, lowest precedence first: built in defaults, the YAML file (with `${ENV}`
/// substitution), `SEALBID_*` environment variables, then `overrides`. An explicitly passed
/// config file must exist; a discovered or default one may be absent.
pub fn load_config(
    name: &str,
    config_file: Option<String>,
    overrides: SettingsOverrides,
) -> Result<AuctionSettings> {
    let location = resolve_config_path(
        find_in_parent,
        env::current_dir()?,
        OsDirs::config_dir()?,
        DEFAULT_CONFIG_NAME,
        config_file.map(PathBuf::from),
    );

    let loaded_yaml = match &location {
        ConfigLocation::Explicit(path) => {
            load_yaml_with_env(path).context("Configuration file not found")?
        }
        ConfigLocation::Discovered(path) | ConfigLocation::Default(path) => {
            if path.exists() {
                load_yaml_with_env(path)
                    .with_context(|| format!("Could not read {}", path.display()))?
            } else {
                String::new()
            }
        }
    };
    debug!(path = %location.path().display(), "loading auction settings");

    let settings: AuctionSettings = Figment::from(Serialized::defaults(AuctionSettings::default()))
        .merge(Yaml::string(&loaded_yaml))
        .merge(Env::prefixed(ENV_PREFIX).only(&[
            "name",
            "operator",
            "bidding_period_secs",
            "log_level",
        ]))
        .merge(Serialized::defaults(NameOverride { name }))
        .merge(Serialized::defaults(overrides))
        .extract()
        .context("Could not parse configuration")?;

    settings.validate()?;
    Ok(settings)
}

// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use path_clean::clean;
use std::path::{Path, PathBuf};

pub type FindInParent = fn(&Path, &str) -> Option<PathBuf>;

/// Walk up from `path` looking for `filename`.
pub fn find_in_parent(path: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = path.to_path_buf();

    loop {
        let file_path = current.join(filename);
        if file_path.exists() {
            return Some(file_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Where the configuration lives, together with whether the caller asked for it explicitly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigLocation {
    Explicit(PathBuf),
    Discovered(PathBuf),
    Default(PathBuf),
}

impl ConfigLocation {
    pub fn path(&self) -> &Path {
        match self {
            ConfigLocation::Explicit(p)
            | ConfigLocation::Discovered(p)
            | ConfigLocation::Default(p) => p,
        }
    }
}

pub fn resolve_config_path<P: Into<PathBuf>>(
    find_in_parent: FindInParent,
    cwd: P,
    default_config_dir: P,
    default_filename: &str,
    cli_file: Option<P>,
) -> ConfigLocation {
    let cli_file: Option<PathBuf> = cli_file.map(Into::into);
    let default_config_dir = default_config_dir.into();
    let cwd = cwd.into();

    if let Some(cli_file) = cli_file {
        if cli_file.is_absolute() {
            return ConfigLocation::Explicit(cli_file);
        }

        return ConfigLocation::Explicit(clean(cwd.join(cli_file)));
    }

    if let Some(found) = find_in_parent(&cwd, default_filename) {
        return ConfigLocation::Discovered(found);
    }

    ConfigLocation::Default(clean(default_config_dir.join(default_filename)))
}

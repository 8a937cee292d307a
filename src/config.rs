// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::window::TimeRange;

pub const CONFIG_FILE_NAME: &str = "flashdeck.toml";

const DEFAULT_SECONDS_PER_REVIEW: u32 = 30;

/// Per-collection settings, read from `flashdeck.toml`.
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Range used by `stats` when none is given.
    pub default_range: TimeRange,
    /// Assumed length of one review, for the study time estimate.
    pub seconds_per_review: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_range: TimeRange::default(),
            seconds_per_review: DEFAULT_SECONDS_PER_REVIEW,
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(content)?;
        if config.seconds_per_review == 0 {
            return fail("seconds_per_review must be positive.");
        }
        Ok(config)
    }

    /// Load the config file in `directory`. A missing file means defaults.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE_NAME}, using defaults.");
            return Ok(Self::default());
        }
        let content = read_to_string(&path)?;
        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_empty_config() -> Fallible<()> {
        assert_eq!(Config::parse("")?, Config::default());
        Ok(())
    }

    #[test]
    fn test_config() -> Fallible<()> {
        let config = Config::parse("default_range = \"week\"\nseconds_per_review = 45\n")?;
        assert_eq!(config.default_range, TimeRange::Week);
        assert_eq!(config.seconds_per_review, 45);

        let config = Config::parse("default_range = \"14\"")?;
        assert_eq!(config.default_range, TimeRange::Days(14));
        assert_eq!(config.seconds_per_review, 30);
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::parse("colour = \"blue\"").is_err());
        assert!(Config::parse("default_range = \"fortnight\"").is_err());
        assert!(Config::parse("seconds_per_review = 0").is_err());
        assert!(Config::parse("seconds_per_review = -5").is_err());
    }

    #[test]
    fn test_load() -> Fallible<()> {
        let dir = tempdir()?;
        assert_eq!(Config::load(dir.path())?, Config::default());
        write(dir.path().join(CONFIG_FILE_NAME), "default_range = \"all\"")?;
        assert_eq!(Config::load(dir.path())?.default_range, TimeRange::All);
        Ok(())
    }
}

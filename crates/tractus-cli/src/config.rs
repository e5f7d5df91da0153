//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tractus_core::HolidayCalendar;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Input document read when `--input` is not given.
    pub input: PathBuf,

    /// Output document written when `--output` is not given.
    pub output: PathBuf,

    /// National holiday calendar excluded from workdays.
    pub national_holidays: HolidayCalendar,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data.json"),
            output: PathBuf::from("output.json"),
            national_holidays: HolidayCalendar::Italy,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, the user config file, `config_path`,
    /// then `TRACTUS_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("TRACTUS_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for tractus.
///
/// On Linux: `~/.config/tractus`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tractus"))
}

//! Configuration loading and management.

use std::path::{Path, PathBuf};

use fh_core::{CategoryRegistry, Grammar, GrammarError, LineParser};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log file read when `report` is given no path.
    pub data_file: Option<PathBuf>,

    /// File the rendered report is also written to.
    pub save_path: Option<PathBuf>,

    /// Custom line pattern replacing the built-in grammar.
    pub pattern: Option<String>,

    /// Direct and indirect category vocabulary.
    pub categories: CategoryRegistry,
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (FH_*)
        figment = figment.merge(Env::prefixed("FH_"));

        figment.extract()
    }

    /// Builds a line parser from the configured vocabulary.
    ///
    /// `pattern` takes precedence over the configured pattern.
    pub fn line_parser(&self, pattern: Option<&str>) -> Result<LineParser, GrammarError> {
        let grammar = match pattern.or(self.pattern.as_deref()) {
            Some(pattern) => Grammar::new(pattern)?,
            None => Grammar::default(),
        };
        Ok(LineParser::new(self.categories.clone(), grammar))
    }
}

/// Returns the platform-specific config directory for fh.
///
/// On Linux: `~/.config/fh`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("fh"))
}

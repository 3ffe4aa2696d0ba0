//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use dayline_core::DecodeLimits;
use dayline_core::record::DEFAULT_MAX_DEPTH;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Deepest lineage nesting accepted when reading stored or supplied records.
    pub max_lineage_depth: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("max_lineage_depth", &self.max_lineage_depth)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("dayline.db"),
            max_lineage_depth: DEFAULT_MAX_DEPTH,
        }
    }
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

        // Load from environment variables (DAYLINE_*)
        figment = figment.merge(Env::prefixed("DAYLINE_"));

        figment.extract()
    }

    /// Decode limits derived from this configuration.
    pub const fn decode_limits(&self) -> DecodeLimits {
        DecodeLimits {
            max_depth: self.max_lineage_depth,
        }
    }
}

/// Returns the platform-specific config directory for dayline.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dayline"))
}

/// Returns the platform-specific data directory for dayline.
///
/// On Linux: `~/.local/share/dayline`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("dayline"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_dayline() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "dayline");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("dayline.db"));
        assert_eq!(config.max_lineage_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "database_path = \"/srv/dayline/claims.db\"\nmax_lineage_depth = 8\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/srv/dayline/claims.db"));
        assert_eq!(config.decode_limits(), DecodeLimits { max_depth: 8 });
    }
}

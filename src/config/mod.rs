mod file_config;

pub use file_config::FileConfig;

use crate::server::{RequestsLoggingLevel, ServerConfig};
use crate::training::MissingMenuPolicy;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

/// CLI arguments that can be overridden by the TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub missing_menu_policy: MissingMenuPolicy,
    pub store_timeout_ms: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            db_path: None,
            port: 3001,
            metrics_port: 9091,
            logging_level: RequestsLoggingLevel::Path,
            missing_menu_policy: MissingMenuPolicy::Allow,
            store_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub missing_menu_policy: MissingMenuPolicy,
    pub store_timeout_ms: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified via --db-path or in config file")
            })?;

        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = match file.logging_level {
            Some(s) => match parse_logging_level(&s) {
                Some(level) => level,
                None => bail!("Invalid logging_level in config file: {:?}", s),
            },
            None => cli.logging_level.clone(),
        };

        let missing_menu_policy = match file.missing_menu_policy {
            Some(s) => match parse_missing_menu_policy(&s) {
                Some(policy) => policy,
                None => bail!("Invalid missing_menu_policy in config file: {:?}", s),
            },
            None => cli.missing_menu_policy,
        };

        let store_timeout_ms = file.store_timeout_ms.unwrap_or(cli.store_timeout_ms);
        if store_timeout_ms == 0 {
            bail!("store_timeout_ms must be greater than zero");
        }

        Ok(Self {
            db_path,
            port,
            metrics_port,
            logging_level,
            missing_menu_policy,
            store_timeout_ms,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            metrics_port: self.metrics_port,
            store_timeout: Duration::from_millis(self.store_timeout_ms),
        }
    }
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

fn parse_missing_menu_policy(s: &str) -> Option<MissingMenuPolicy> {
    MissingMenuPolicy::from_str(s, true).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_logging_level() {
        assert!(matches!(
            parse_logging_level("none"),
            Some(RequestsLoggingLevel::None)
        ));
        assert!(matches!(
            parse_logging_level("body"),
            Some(RequestsLoggingLevel::Body)
        ));
        // Case insensitive
        assert!(matches!(
            parse_logging_level("PATH"),
            Some(RequestsLoggingLevel::Path)
        ));
        assert!(parse_logging_level("invalid").is_none());
    }

    #[test]
    fn test_parse_missing_menu_policy() {
        assert_eq!(
            parse_missing_menu_policy("allow"),
            Some(MissingMenuPolicy::Allow)
        );
        assert_eq!(
            parse_missing_menu_policy("Reject"),
            Some(MissingMenuPolicy::Reject)
        );
        assert_eq!(parse_missing_menu_policy("maybe"), None);
    }

    #[test]
    fn test_resolve_cli_only() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("training.db");
        let cli = CliConfig {
            db_path: Some(db_path.clone()),
            port: 8080,
            metrics_port: 9191,
            logging_level: RequestsLoggingLevel::Headers,
            missing_menu_policy: MissingMenuPolicy::Reject,
            store_timeout_ms: 2500,
        };

        let config = AppConfig::resolve(&cli, None).unwrap();

        assert_eq!(config.db_path, db_path);
        assert_eq!(config.port, 8080);
        assert_eq!(config.metrics_port, 9191);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Headers);
        assert_eq!(config.missing_menu_policy, MissingMenuPolicy::Reject);

        let server_config = config.server_config();
        assert_eq!(server_config.store_timeout, Duration::from_millis(2500));
        assert_eq!(server_config.port, 8080);
    }

    #[test]
    fn test_resolve_toml_overrides_cli() {
        let temp_dir = TempDir::new().unwrap();
        let toml_db_path = temp_dir.path().join("from_toml.db");
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/should/be/overridden.db")),
            ..Default::default()
        };

        let file_config = FileConfig {
            db_path: Some(toml_db_path.to_string_lossy().to_string()),
            port: Some(4000),
            logging_level: Some("body".to_string()),
            missing_menu_policy: Some("reject".to_string()),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, Some(file_config)).unwrap();

        assert_eq!(config.db_path, toml_db_path);
        assert_eq!(config.port, 4000);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Body);
        assert_eq!(config.missing_menu_policy, MissingMenuPolicy::Reject);
        // CLI value used when TOML doesn't specify
        assert_eq!(config.metrics_port, 9091);
        assert_eq!(config.store_timeout_ms, 10_000);
    }

    #[test]
    fn test_resolve_missing_db_path_error() {
        let result = AppConfig::resolve(&CliConfig::default(), None);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("db_path must be specified"));
    }

    #[test]
    fn test_resolve_missing_parent_directory_error() {
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/nonexistent/path/training.db")),
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_resolve_directory_as_db_path_error() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            db_path: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.unwrap_err().to_string().contains("is a directory"));
    }

    #[test]
    fn test_resolve_rejects_invalid_file_values() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            db_path: Some(temp_dir.path().join("training.db")),
            ..Default::default()
        };

        let bad_policy = FileConfig {
            missing_menu_policy: Some("sometimes".to_string()),
            ..Default::default()
        };
        assert!(AppConfig::resolve(&cli, Some(bad_policy)).is_err());

        let zero_timeout = FileConfig {
            store_timeout_ms: Some(0),
            ..Default::default()
        };
        assert!(AppConfig::resolve(&cli, Some(zero_timeout)).is_err());
    }
}

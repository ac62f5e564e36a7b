//! Configuration loading from disk, environment and command line.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid environment variable {name}={value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values given on the command line. They win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub upstream_url: Option<String>,
    pub static_root: Option<PathBuf>,
}

/// Read a TOML configuration file without validating it.
pub fn read_config_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Apply environment overrides through `lookup`.
///
/// Recognised: `PORT`, `UPSTREAM_URL`, `STATIC_ROOT` and the four
/// `AZURE_STORAGE_*` values. Unset variables leave the config untouched.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup("PORT") {
        let port: u16 = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            name: "PORT",
            value: raw.clone(),
        })?;
        config.listener.bind_address = match config.listener.bind_address.parse::<SocketAddr>() {
            Ok(mut addr) => {
                addr.set_port(port);
                addr.to_string()
            }
            Err(_) => format!("0.0.0.0:{}", port),
        };
    }

    if let Some(url) = lookup("UPSTREAM_URL") {
        config.upstream.url = url;
    }
    if let Some(root) = lookup("STATIC_ROOT") {
        config.static_files.root = PathBuf::from(root);
    }

    let storage = &mut config.storage;
    for (name, field) in [
        ("AZURE_STORAGE_SAS_TOKEN", &mut storage.sas_token),
        ("AZURE_STORAGE_BLOB_URL", &mut storage.blob_url),
        ("AZURE_STORAGE_ACCOUNT_NAME", &mut storage.account_name),
        ("AZURE_STORAGE_CONTAINER_NAME", &mut storage.container_name),
    ] {
        if let Some(value) = lookup(name) {
            *field = value;
        }
    }

    Ok(())
}

/// Apply command-line overrides.
pub fn apply_overrides(config: &mut GatewayConfig, overrides: &ConfigOverrides) {
    if let Some(bind) = &overrides.bind_address {
        config.listener.bind_address = bind.clone();
    }
    if let Some(url) = &overrides.upstream_url {
        config.upstream.url = url.clone();
    }
    if let Some(root) = &overrides.static_root {
        config.static_files.root = root.clone();
    }
}

/// Build the startup configuration: defaults, then the optional file, then the
/// process environment, then command-line overrides. The result is validated.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    apply_overrides(&mut config, overrides);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn env_overrides_storage_and_port() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("PORT", "9000"),
                ("AZURE_STORAGE_SAS_TOKEN", "sv=2024&sig=abc"),
                ("AZURE_STORAGE_CONTAINER_NAME", "recordings"),
            ]),
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:9000");
        assert_eq!(config.storage.sas_token, "sv=2024&sig=abc");
        assert_eq!(config.storage.container_name, "recordings");
        assert_eq!(config.storage.blob_url, "");
        assert_eq!(config.storage.account_name, "");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut config = GatewayConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: "PORT", .. }));
    }

    #[test]
    fn unset_environment_changes_nothing() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(&mut config, env(&[])).unwrap();
        assert_eq!(config, GatewayConfig::default());
    }

    #[test]
    fn command_line_wins_over_environment() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(&mut config, env(&[("UPSTREAM_URL", "http://env:1")])).unwrap();
        apply_overrides(
            &mut config,
            &ConfigOverrides {
                upstream_url: Some("http://cli:2".into()),
                ..Default::default()
            },
        );
        assert_eq!(config.upstream.url, "http://cli:2");
    }

    #[test]
    fn reads_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[upstream]\nurl = \"http://127.0.0.1:5090\"\n[storage]\naccount_name = \"acct\""
        )
        .unwrap();

        let config = read_config_file(file.path()).unwrap();
        assert_eq!(config.upstream.url, "http://127.0.0.1:5090");
        assert_eq!(config.storage.account_name, "acct");
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener\nbind_address = 1").unwrap();
        assert!(matches!(
            read_config_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}

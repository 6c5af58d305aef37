use std::fs;
use std::path::{Path, PathBuf};

use alloy::primitives::Address;
use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::infrastructure::ethereum::ProviderConfig;

pub const CONFIG_ENV: &str = "ENTITLEMENT_CHECKER_CONFIG";
pub const DEFAULT_PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    pub name: Option<String>,
    pub rpc: Option<String>,
    pub ws: Option<String>,
    pub ipc: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Deployed checker address
    pub contract: Option<Address>,

    /// Environment variable holding the signing key
    pub private_key_env: Option<String>,

    /// Extra tracing filter directives, e.g. `entitlement_checker=debug`
    #[serde(default)]
    pub log_level: Vec<String>,

    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,

    pub export_dir: Option<PathBuf>,
}

impl EndpointConfig {
    /// IPC wins over WebSocket, which wins over HTTP
    pub fn provider_config(&self) -> Option<ProviderConfig> {
        #[cfg(unix)]
        if let Some(ipc) = non_empty(&self.ipc) {
            return Some(ProviderConfig::Ipc(PathBuf::from(ipc)));
        }
        if let Some(ws) = non_empty(&self.ws) {
            return Some(ProviderConfig::WebSocket(ws.to_string()));
        }
        non_empty(&self.rpc).map(|rpc| ProviderConfig::Http(normalize_http_endpoint(rpc)))
    }
}

impl Config {
    pub fn private_key_env(&self) -> &str {
        non_empty(&self.private_key_env).unwrap_or(DEFAULT_PRIVATE_KEY_ENV)
    }

    /// First usable endpoint, optionally selected by name
    pub fn endpoint(&self, name: Option<&str>) -> Option<ProviderConfig> {
        self.endpoints
            .iter()
            .filter(|endpoint| match name {
                Some(name) => endpoint.name.as_deref() == Some(name),
                None => true,
            })
            .find_map(EndpointConfig::provider_config)
    }

    /// `RUST_LOG`, then the configured `log_level` list, then `extra`
    pub fn tracing_env_filter(&self, extra: &[String]) -> Result<tracing_subscriber::EnvFilter> {
        let mut filter = tracing_subscriber::EnvFilter::from_default_env();
        for directive in self.log_level.iter().chain(extra) {
            match directive.parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(err) => bail!("{}: {}", err, directive),
            }
        }

        Ok(filter)
    }

    pub fn export_dir(&self) -> Option<PathBuf> {
        self.export_dir
            .clone()
            .or_else(|| data_dir().map(|dir| dir.join("exports")))
    }
}

/// Load the config file; a missing file yields defaults
pub fn load() -> Result<Config> {
    match config_path() {
        Some(path) => load_from(&path),
        None => Ok(Config::default()),
    }
}

pub fn load_from(path: &Path) -> Result<Config> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read {}", path.display()));
        }
    };
    toml::from_str::<Config>(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("entitlement-checker").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(
            home.join(".config")
                .join("entitlement-checker")
                .join("config.toml"),
        );
    }

    directories::ProjectDirs::from("xyz", "river", "entitlement-checker")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("entitlement-checker"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("entitlement-checker"));
    }
    directories::ProjectDirs::from("xyz", "river", "entitlement-checker")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Add a scheme to bare `host:port` endpoints
pub fn normalize_http_endpoint(value: &str) -> String {
    let value = value.trim();
    if value.contains("://") {
        value.to_string()
    } else {
        format!("http://{value}")
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use alloy::primitives::address;

    use super::*;

    const SAMPLE: &str = r#"
contract = "0x00000000000000000000000000000000000000cc"
private_key_env = "CHECKER_KEY"
log_level = ["entitlement_checker=debug", "alloy=warn"]
export_dir = "/tmp/checker-exports"

[[endpoints]]
name = "local"
rpc = "localhost:8545"

[[endpoints]]
name = "river"
ws = "wss://example.invalid/ws"
"#;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(
            config.contract,
            Some(address!("0x00000000000000000000000000000000000000cc"))
        );
        assert_eq!(config.private_key_env(), "CHECKER_KEY");
        assert_eq!(config.log_level.len(), 2);
        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(
            config.export_dir(),
            Some(PathBuf::from("/tmp/checker-exports"))
        );
    }

    #[test]
    fn test_endpoint_selection() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(
            config.endpoint(None),
            Some(ProviderConfig::Http("http://localhost:8545".to_string()))
        );
        assert_eq!(
            config.endpoint(Some("river")),
            Some(ProviderConfig::WebSocket("wss://example.invalid/ws".to_string()))
        );
        assert_eq!(config.endpoint(Some("missing")), None);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.private_key_env(), DEFAULT_PRIVATE_KEY_ENV);
        assert!(config.endpoint(None).is_none());
        assert!(config.contract.is_none());
    }

    #[test]
    fn test_tracing_env_filter() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert!(config.tracing_env_filter(&["debug".to_string()]).is_ok());

        let config = Config {
            log_level: vec!["entitlement_checker=verbose".to_string()],
            ..Config::default()
        };
        assert!(config.tracing_env_filter(&[]).is_err());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(config.endpoints.is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "contract = 42").unwrap();
        let err = load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_normalize_http_endpoint() {
        assert_eq!(normalize_http_endpoint("localhost:8545"), "http://localhost:8545");
        assert_eq!(normalize_http_endpoint(" https://rpc.example "), "https://rpc.example");
    }
}

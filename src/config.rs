//! Layered configuration for the storefront.
//!
//! Settings are read from `.storefront/storefront.toml` (or `--config`), then
//! environment variables, then CLI flags, each layer overriding the last.
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 5000
//! dev_mode = false
//!
//! [client]
//! server_url = "http://127.0.0.1:5000"
//!
//! [pricing]
//! unit_price_cents = 9999
//!
//! [logging]
//! format = "pretty"
//! dir = ".storefront/logs"
//! ```
//!
//! # Environment
//!
//! | Variable                | Overrides              |
//! |-------------------------|------------------------|
//! | `PORT`                  | `server.port`          |
//! | `STOREFRONT_HOST`       | `server.host`          |
//! | `STOREFRONT_SERVER_URL` | `client.server_url`    |
//! | `STOREFRONT_LOG_FORMAT` | `logging.format`       |

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::client::Pricing;
use crate::intake::server::ServerConfig;

pub const CONFIG_DIR: &str = ".storefront";
pub const CONFIG_FILE: &str = "storefront.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Invalid log format '{}'. Valid values: pretty, json", s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Enables permissive CORS for a locally served frontend
    #[serde(default)]
    pub dev_mode: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            dev_mode: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSection {
    #[serde(default = "default_server_url")]
    pub server_url: String,
}

fn default_server_url() -> String {
    format!("http://{}:{}", default_host(), default_port())
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingSection {
    #[serde(default = "default_unit_price_cents")]
    pub unit_price_cents: u64,
}

fn default_unit_price_cents() -> u64 {
    9999
}

impl Default for PricingSection {
    fn default() -> Self {
        Self {
            unit_price_cents: default_unit_price_cents(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default)]
    pub format: LogFormat,
    /// Directory for a daily-rolling JSON log file; stderr only when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Parsed `storefront.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontToml {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub client: ClientSection,
    #[serde(default)]
    pub pricing: PricingSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl StorefrontToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse storefront.toml")
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize storefront.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Host to bind, with fallback to `STOREFRONT_HOST`.
    pub fn host(&self) -> String {
        std::env::var("STOREFRONT_HOST").unwrap_or_else(|_| self.server.host.clone())
    }

    /// Port to bind. `PORT` overrides the file when it parses.
    pub fn port(&self) -> u16 {
        std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.server.port)
    }

    pub fn server_url(&self) -> String {
        std::env::var("STOREFRONT_SERVER_URL").unwrap_or_else(|_| self.client.server_url.clone())
    }

    pub fn log_format(&self) -> LogFormat {
        std::env::var("STOREFRONT_LOG_FORMAT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.logging.format)
    }

    /// Validate the configuration and return any warnings. Port and URL
    /// are checked after env overrides.
    pub fn validate(&self) -> Vec<String> {
        self.warnings(self.port(), &self.server_url())
    }

    /// Warnings for the given effective port and server URL.
    fn warnings(&self, port: u16, url: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        if port == 0 {
            warnings.push("port is 0: the OS will pick a random port".to_string());
        }

        if let Ok(port) = std::env::var("PORT")
            && port.parse::<u16>().is_err()
        {
            warnings.push(format!("Ignoring invalid PORT '{}'", port));
        }

        if let Ok(format) = std::env::var("STOREFRONT_LOG_FORMAT")
            && format.parse::<LogFormat>().is_err()
        {
            warnings.push(format!("Ignoring invalid STOREFRONT_LOG_FORMAT '{}'", format));
        }

        if reqwest::Url::parse(url).is_err() {
            warnings.push(format!("Invalid client.server_url '{}'", url));
        }

        if self.pricing.unit_price_cents == 0 {
            warnings.push("pricing.unit_price_cents is 0: every order totals $0.00".to_string());
        }

        warnings
    }
}

/// Path of the project-level config file under `base_dir`.
pub fn project_config_path(base_dir: &Path) -> PathBuf {
    base_dir.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Path of the per-user config file, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("storefront").join(CONFIG_FILE))
}

/// Runtime configuration: the parsed file plus CLI overrides.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// File the settings were read from; `None` when running on defaults
    pub source: Option<PathBuf>,
    pub toml: StorefrontToml,
    pub cli_host: Option<String>,
    pub cli_port: Option<u16>,
    pub cli_server_url: Option<String>,
    pub cli_dev_mode: bool,
    pub verbose: bool,
}

impl StorefrontConfig {
    /// Resolve the config file and load it.
    ///
    /// An explicit path must exist. Otherwise the project file under
    /// `base_dir` wins over the per-user file, and defaults apply when
    /// neither exists.
    pub fn load(explicit: Option<&Path>, base_dir: &Path) -> Result<Self> {
        let source = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => [Some(project_config_path(base_dir)), user_config_path()]
                .into_iter()
                .flatten()
                .find(|path| path.exists()),
        };

        let toml = match &source {
            Some(path) => StorefrontToml::load(path)?,
            None => StorefrontToml::default(),
        };

        Ok(Self::from_toml(toml, source))
    }

    pub fn from_toml(toml: StorefrontToml, source: Option<PathBuf>) -> Self {
        Self {
            source,
            toml,
            cli_host: None,
            cli_port: None,
            cli_server_url: None,
            cli_dev_mode: false,
            verbose: false,
        }
    }

    /// Host to bind (CLI → env → file → default).
    pub fn host(&self) -> String {
        self.cli_host.clone().unwrap_or_else(|| self.toml.host())
    }

    /// Port to bind (CLI → env → file → default).
    pub fn port(&self) -> u16 {
        self.cli_port.unwrap_or_else(|| self.toml.port())
    }

    pub fn dev_mode(&self) -> bool {
        self.cli_dev_mode || self.toml.server.dev_mode
    }

    /// Intake server the client commands talk to (CLI → env → file → default).
    pub fn server_url(&self) -> String {
        self.cli_server_url
            .clone()
            .unwrap_or_else(|| self.toml.server_url())
    }

    pub fn log_format(&self) -> LogFormat {
        self.toml.log_format()
    }

    pub fn log_dir(&self) -> Option<&Path> {
        self.toml.logging.dir.as_deref()
    }

    pub fn pricing(&self) -> Pricing {
        Pricing::new(self.toml.pricing.unit_price_cents)
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host(),
            port: self.port(),
            dev_mode: self.dev_mode(),
        }
    }

    /// Validate with CLI overrides applied on top of env and file.
    pub fn validate(&self) -> Vec<String> {
        self.toml.warnings(self.port(), &self.server_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 4] = [
        "PORT",
        "STOREFRONT_HOST",
        "STOREFRONT_SERVER_URL",
        "STOREFRONT_LOG_FORMAT",
    ];

    /// Clears the storefront env vars for the duration of a test and
    /// restores them afterwards.
    struct EnvSnapshot(Vec<(&'static str, Option<String>)>);

    impl EnvSnapshot {
        fn clear() -> Self {
            let saved = ENV_VARS
                .iter()
                .map(|key| (*key, std::env::var(key).ok()))
                .collect();
            for key in ENV_VARS {
                unsafe { std::env::remove_var(key) };
            }
            Self(saved)
        }
    }

    impl Drop for EnvSnapshot {
        fn drop(&mut self) {
            for (key, value) in &self.0 {
                match value {
                    Some(v) => unsafe { std::env::set_var(key, v) },
                    None => unsafe { std::env::remove_var(key) },
                }
            }
        }
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let _env = EnvSnapshot::clear();

        let toml = StorefrontToml::default();
        assert_eq!(toml.host(), "127.0.0.1");
        assert_eq!(toml.port(), 5000);
        assert_eq!(toml.server_url(), "http://127.0.0.1:5000");
        assert_eq!(toml.pricing.unit_price_cents, 9999);
        assert_eq!(toml.log_format(), LogFormat::Pretty);
        assert!(toml.logging.dir.is_none());
    }

    #[test]
    fn test_parse_partial_file_fills_defaults() {
        let content = r#"
[server]
port = 8080

[pricing]
unit_price_cents = 1250
"#;
        let toml = StorefrontToml::parse(content).unwrap();
        assert_eq!(toml.server.port, 8080);
        assert_eq!(toml.server.host, "127.0.0.1");
        assert!(!toml.server.dev_mode);
        assert_eq!(toml.pricing.unit_price_cents, 1250);
        assert_eq!(toml.client.server_url, "http://127.0.0.1:5000");
    }

    #[test]
    fn test_parse_log_format() {
        let toml = StorefrontToml::parse("[logging]\nformat = \"json\"\n").unwrap();
        assert_eq!(toml.logging.format, LogFormat::Json);

        assert!(StorefrontToml::parse("[logging]\nformat = \"xml\"\n").is_err());
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let _env = EnvSnapshot::clear();

        let toml = StorefrontToml::parse("[server]\nport = 8080\nhost = \"0.0.0.0\"\n").unwrap();
        unsafe { std::env::set_var("PORT", "9090") };
        unsafe { std::env::set_var("STOREFRONT_HOST", "10.0.0.1") };
        unsafe { std::env::set_var("STOREFRONT_LOG_FORMAT", "json") };

        assert_eq!(toml.port(), 9090);
        assert_eq!(toml.host(), "10.0.0.1");
        assert_eq!(toml.log_format(), LogFormat::Json);
    }

    #[test]
    fn test_invalid_port_env_is_ignored_and_warned() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let _env = EnvSnapshot::clear();

        let toml = StorefrontToml::default();
        unsafe { std::env::set_var("PORT", "not-a-port") };

        assert_eq!(toml.port(), 5000);
        let warnings = toml.validate();
        assert!(warnings.iter().any(|w| w.contains("PORT")));
    }

    #[test]
    fn test_cli_overrides_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let _env = EnvSnapshot::clear();
        unsafe { std::env::set_var("PORT", "9090") };
        unsafe { std::env::set_var("STOREFRONT_SERVER_URL", "http://env:1") };

        let mut config = StorefrontConfig::from_toml(StorefrontToml::default(), None);
        assert_eq!(config.port(), 9090);
        assert_eq!(config.server_url(), "http://env:1");

        config.cli_port = Some(7000);
        config.cli_server_url = Some("http://cli:2".into());
        config.cli_dev_mode = true;

        let server = config.server_config();
        assert_eq!(server.port, 7000);
        assert!(server.dev_mode);
        assert_eq!(config.server_url(), "http://cli:2");
    }

    #[test]
    fn test_validate_clean_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let _env = EnvSnapshot::clear();

        assert!(StorefrontToml::default().validate().is_empty());
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let _env = EnvSnapshot::clear();

        let content = r#"
[server]
port = 0

[client]
server_url = "not a url"

[pricing]
unit_price_cents = 0
"#;
        let warnings = StorefrontToml::parse(content).unwrap().validate();
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn test_validate_checks_effective_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let _env = EnvSnapshot::clear();

        let mut toml = StorefrontToml::default();
        toml.server.port = 0;
        unsafe { std::env::set_var("PORT", "8080") };
        assert!(!toml.validate().iter().any(|w| w.contains("port is 0")));

        let mut config = StorefrontConfig::from_toml(StorefrontToml::default(), None);
        assert!(config.validate().is_empty());
        config.cli_port = Some(0);
        assert!(config.validate().iter().any(|w| w.contains("port is 0")));

        unsafe { std::env::set_var("PORT", "0") };
        assert!(StorefrontToml::default().validate().iter().any(|w| w.contains("port is 0")));
    }

    #[test]
    fn test_validate_checks_cli_server_url() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let _env = EnvSnapshot::clear();

        let mut config = StorefrontConfig::from_toml(StorefrontToml::default(), None);
        config.cli_server_url = Some("not a url".into());
        assert!(config.validate().iter().any(|w| w.contains("not a url")));
    }

    #[test]
    fn test_save_and_load_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut toml = StorefrontToml::default();
        toml.server.port = 6123;
        toml.logging.dir = Some(PathBuf::from("logs"));
        toml.save(&path).unwrap();

        let loaded = StorefrontToml::load(&path).unwrap();
        assert_eq!(loaded.server.port, 6123);
        assert_eq!(loaded.logging.dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn test_load_prefers_project_file() {
        let dir = TempDir::new().unwrap();
        let path = project_config_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[server]\nport = 7777\n").unwrap();

        let config = StorefrontConfig::load(None, dir.path()).unwrap();
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
        assert_eq!(config.toml.server.port, 7777);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(StorefrontConfig::load(Some(&missing), dir.path()).is_err());
    }

    #[test]
    fn test_pricing_from_config() {
        let toml = StorefrontToml::parse("[pricing]\nunit_price_cents = 500\n").unwrap();
        let config = StorefrontConfig::from_toml(toml, None);
        assert_eq!(config.pricing().unit_price().cents(), 500);
    }
}

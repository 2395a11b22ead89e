//! Configuration settings for inventory gathering
//!
//! Defines the CLI arguments, environment overrides and runtime defaults
//! used to reach a BMC and the inventory API.

use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// Default inventory API host (development)
pub const DEFAULT_INVENTORY_HOST: &str = "http://localhost:8080";

/// Default BMC username (development)
pub const DEFAULT_USERNAME: &str = "root";

/// Default BMC password (development)
pub const DEFAULT_PASSWORD: &str = "password";

/// Fixed Redfish API root on every BMC
pub const REDFISH_ROOT: &str = "redfish/v1";

/// Systems collection, relative to the Redfish root
pub const SYSTEMS_PATH: &str = "Systems";

/// inventory-gather - Redfish hardware inventory collector
#[derive(Parser, Debug, Clone)]
#[command(name = "inventory-gather")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Gathers hardware inventory via Redfish and posts it to an inventory API")]
#[command(long_about = r#"
Walks the Redfish tree of a BMC (Systems -> Processors / Memory), normalizes
every node, CPU and DIMM into a device record, and registers each one with
the inventory API (POST /devices, then PUT /devices/{uid}/status).

Examples:
  inventory-gather --ip 10.0.0.5
  inventory-gather --ip 10.0.0.5 --inventory-host http://inventory:8080
  inventory-gather --ip 10.0.0.5 --dry-run --output-format json
"#)]
pub struct CliArgs {
    /// The IP address of the BMC to gather inventory from
    #[arg(short = 'i', long, value_name = "ADDRESS")]
    pub ip: String,

    /// BMC username for basic authentication
    #[arg(long, env = "BMC_USERNAME", default_value = DEFAULT_USERNAME)]
    pub username: String,

    /// BMC password for basic authentication
    #[arg(long, env = "BMC_PASSWORD", default_value = DEFAULT_PASSWORD, hide_env_values = true)]
    pub password: String,

    /// Inventory API base address
    #[arg(long, env = "INVENTORY_API_HOST", default_value = DEFAULT_INVENTORY_HOST, value_name = "URL")]
    pub inventory_host: String,

    /// PEM bundle used to verify the BMC certificate (default: accept any)
    #[arg(long, value_name = "PATH")]
    pub bmc_ca_cert: Option<PathBuf>,

    /// Discover devices and print them without registering
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Output format for the final report
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Log line format
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Log line format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl CliArgs {
    /// Default tracing filter for the selected verbosity
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Basic-auth credential pair for the BMC
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Runtime configuration for one collection run
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// BMC address (IP or hostname, optionally with port)
    pub target: String,
    /// BMC credentials
    pub credentials: Credentials,
    /// Inventory API base address
    pub inventory_host: String,
    /// PEM bundle for BMC certificate verification
    pub bmc_ca_cert: Option<PathBuf>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            credentials: Credentials::default(),
            inventory_host: DEFAULT_INVENTORY_HOST.to_string(),
            bmc_ca_cert: None,
        }
    }
}

impl CollectorConfig {
    /// Create config for a target with environment overrides applied
    pub fn from_env(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            credentials: Credentials::new(
                std::env::var("BMC_USERNAME").unwrap_or_else(|_| DEFAULT_USERNAME.to_string()),
                std::env::var("BMC_PASSWORD").unwrap_or_else(|_| DEFAULT_PASSWORD.to_string()),
            ),
            inventory_host: std::env::var("INVENTORY_API_HOST")
                .unwrap_or_else(|_| DEFAULT_INVENTORY_HOST.to_string()),
            bmc_ca_cert: None,
        }
    }

    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        let config = Self {
            target: args.ip.trim().to_string(),
            credentials: Credentials::new(&args.username, &args.password),
            inventory_host: args.inventory_host.trim().to_string(),
            bmc_ca_cert: args.bmc_ca_cert.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.target.is_empty() {
            return Err("BMC address is required".to_string());
        }
        if self.target.contains("://") || self.target.contains('/') {
            return Err(format!(
                "BMC address must be a host, not a URL: {}",
                self.target
            ));
        }
        if !(self.inventory_host.starts_with("http://")
            || self.inventory_host.starts_with("https://"))
        {
            return Err(format!(
                "Inventory host must be an http(s) URL: {}",
                self.inventory_host
            ));
        }
        Ok(())
    }

    /// Redfish base address for the target
    pub fn redfish_base(&self) -> String {
        format!("https://{}/{}", self.target, REDFISH_ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_ip_is_required() {
        assert!(CliArgs::try_parse_from(["inventory-gather"]).is_err());
    }

    #[test]
    fn test_from_cli() {
        let args = parse(&[
            "inventory-gather",
            "-i",
            "10.0.0.5",
            "--username",
            "admin",
            "--password",
            "secret",
            "--inventory-host",
            "http://inventory:8080",
        ]);
        let config = CollectorConfig::from_cli(&args).unwrap();
        assert_eq!(config.target, "10.0.0.5");
        assert_eq!(config.credentials, Credentials::new("admin", "secret"));
        assert_eq!(config.inventory_host, "http://inventory:8080");
        assert_eq!(config.redfish_base(), "https://10.0.0.5/redfish/v1");
    }

    #[test]
    fn test_validate() {
        let mut config = CollectorConfig {
            target: "10.0.0.5".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.target = "https://10.0.0.5".to_string();
        assert!(config.validate().is_err());

        config.target = "10.0.0.5:8443".to_string();
        config.inventory_host = "localhost:8080".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("root", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("root"));
        assert!(!debug.contains("hunter2"));

        let config = CollectorConfig {
            target: "10.0.0.5".to_string(),
            credentials: creds,
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(parse(&["inventory-gather", "-i", "h"]).log_level(), "info");
        assert_eq!(parse(&["inventory-gather", "-i", "h", "-vv"]).log_level(), "trace");
        assert_eq!(parse(&["inventory-gather", "-i", "h", "-q"]).log_level(), "error");
    }
}

//! Env parsing and constants.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const FIXTURE_ENV: &str = "VAULT_FIXTURE";
pub const FIXTURE_DELAY_ENV: &str = "VAULT_FIXTURE_DELAY_MS";
pub const OUTBOUND_ENV: &str = "VAULT_OUTBOUND";
pub const INITIAL_WALLET_ENV: &str = "VAULT_INITIAL_WALLET";

const DEFAULT_FIXTURE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} is not a whole number of milliseconds")]
    InvalidDelay { var: &'static str, value: String },
    #[error("invalid {var}: {value:?} (expected `stdout` or `log`)")]
    InvalidOutbound { var: &'static str, value: String },
}

/// Where outbound events go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutboundMode {
    /// JSON lines on stdout, read by the host process.
    #[default]
    Stdout,
    /// Log only; no host attached.
    Log,
}

impl FromStr for OutboundMode {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "log" => Ok(Self::Log),
            _ => Err(ConfigError::InvalidOutbound {
                var: OUTBOUND_ENV,
                value: raw.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VaultConfig {
    /// Replay this session file instead of reading stdin.
    pub fixture: Option<PathBuf>,
    pub fixture_delay: Duration,
    pub outbound: OutboundMode,
    /// Wallet payload applied before any host message.
    pub initial_wallet: Option<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            fixture: None,
            fixture_delay: DEFAULT_FIXTURE_DELAY,
            outbound: OutboundMode::default(),
            initial_wallet: None,
        }
    }
}

/// Read the vault configuration from the environment. Unset or blank
/// variables take their defaults; malformed ones are an error.
pub fn vault_config() -> Result<VaultConfig, ConfigError> {
    let mut config = VaultConfig::default();

    if let Some(path) = non_blank_var(FIXTURE_ENV) {
        config.fixture = Some(PathBuf::from(path));
    }
    if let Some(raw) = non_blank_var(FIXTURE_DELAY_ENV) {
        config.fixture_delay = parse_delay(&raw)?;
    }
    if let Some(raw) = non_blank_var(OUTBOUND_ENV) {
        config.outbound = raw.parse()?;
    }
    config.initial_wallet = non_blank_var(INITIAL_WALLET_ENV);

    Ok(config)
}

fn non_blank_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn parse_delay(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidDelay {
            var: FIXTURE_DELAY_ENV,
            value: raw.to_string(),
        })
}

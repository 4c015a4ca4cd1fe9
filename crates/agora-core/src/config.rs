//! Configuration loading and typed config structures for an Agora agent.
//!
//! The canonical configuration lives in `agora-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.

use std::collections::BTreeMap;
use std::path::Path;

use agora_ledger::Wallet;
use agora_types::{
    Address, CurrencyHoldings, ExchangeParams, GoodHoldings, LedgerId, StateUpdateMessage,
    UtilityParams,
};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level agent configuration.
///
/// Mirrors the structure of `agora-config.yaml`. Every section has
/// defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AgentConfig {
    /// Agent identity and drain-cycle settings.
    #[serde(default)]
    pub agent: AgentSection,

    /// Agent address per ledger.
    #[serde(default)]
    pub wallet: WalletConfig,

    /// In-memory ledger seed.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Optional initial endowment, sent as an INITIALIZE state update.
    #[serde(default)]
    pub endowment: Option<EndowmentConfig>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AgentConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `AGORA_LOG_LEVEL` overrides `logging.level`
    /// - `AGORA_AGENT_NAME` overrides `agent.name`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides on top of the parsed values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("AGORA_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("AGORA_AGENT_NAME") {
            self.agent.name = val;
        }
    }
}

/// Agent identity and drain-cycle settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentSection {
    /// Name used in log events.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Envelopes handled per drain cycle. Zero drains the whole queue.
    #[serde(default)]
    pub max_reactions: usize,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            max_reactions: 0,
        }
    }
}

/// The agent's address on each ledger it holds an identity on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WalletConfig {
    /// Address by ledger id.
    #[serde(default)]
    pub addresses: BTreeMap<LedgerId, Address>,
}

impl WalletConfig {
    /// Build the wallet described by this section.
    pub fn to_wallet(&self) -> Wallet {
        Wallet::from_addresses(
            self.addresses
                .iter()
                .map(|(ledger_id, address)| (ledger_id.clone(), address.clone())),
        )
    }
}

/// Seed of the in-memory ledger.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// Identifier the ledger answers to.
    #[serde(default = "default_ledger_id")]
    pub id: LedgerId,

    /// Tokens minted to each address at startup.
    #[serde(default)]
    pub balances: BTreeMap<Address, i64>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            id: default_ledger_id(),
            balances: BTreeMap::new(),
        }
    }
}

/// Initial holdings and preferences of the agent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EndowmentConfig {
    /// Starting currency holdings.
    #[serde(default)]
    pub amount_by_currency: CurrencyHoldings,

    /// Starting good holdings.
    #[serde(default)]
    pub quantities_by_good_id: GoodHoldings,

    /// Linear utility weight per currency.
    #[serde(default)]
    pub exchange_params_by_currency: ExchangeParams,

    /// Logarithmic utility weight per good.
    #[serde(default)]
    pub utility_params_by_good_id: UtilityParams,

    /// Total transaction fee, split between buyer and seller.
    #[serde(default)]
    pub tx_fee: i64,
}

impl EndowmentConfig {
    /// The INITIALIZE state update carrying this endowment.
    pub fn to_state_update(&self) -> StateUpdateMessage {
        StateUpdateMessage::Initialize {
            amount_by_currency: self.amount_by_currency.clone(),
            quantities_by_good_id: self.quantities_by_good_id.clone(),
            exchange_params_by_currency: self.exchange_params_by_currency.clone(),
            utility_params_by_good_id: self.utility_params_by_good_id.clone(),
            tx_fee: self.tx_fee,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `pretty` or `json`.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_agent_name() -> String {
    "agora-agent".to_owned()
}

fn default_ledger_id() -> LedgerId {
    LedgerId::new("fetchai")
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use agora_types::{CurrencyId, GoodId};

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AgentConfig::default();
        assert_eq!(config.agent.name, "agora-agent");
        assert_eq!(config.agent.max_reactions, 0);
        assert_eq!(config.ledger.id, LedgerId::new("fetchai"));
        assert!(config.endowment.is_none());
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
agent:
  name: "seller"
  max_reactions: 5

wallet:
  addresses:
    fetchai: "seller_address"

ledger:
  id: "fetchai"
  balances:
    seller_address: 1000
    buyer_address: 500

endowment:
  amount_by_currency:
    FET: 100
  quantities_by_good_id:
    apple: 10
  exchange_params_by_currency:
    FET: 1.0
  utility_params_by_good_id:
    apple: 20.0
  tx_fee: 2

logging:
  level: "debug"
  format: "json"
"#;
        let config = AgentConfig::parse(yaml).unwrap();
        assert_eq!(config.agent.max_reactions, 5);
        assert_eq!(config.ledger.balances.get("buyer_address"), Some(&500));
        assert_eq!(config.logging.format, LogFormat::Json);

        let wallet = config.wallet.to_wallet();
        let crypto = wallet.crypto_object(&LedgerId::new("fetchai")).unwrap();
        assert_eq!(crypto.address, Address::new("seller_address"));

        let endowment = config.endowment.unwrap();
        assert_eq!(endowment.amount_by_currency.get(&CurrencyId::new("FET")), Some(&100));
        assert_eq!(endowment.quantities_by_good_id.get(&GoodId::new("apple")), Some(&10));
        assert!(matches!(
            endowment.to_state_update(),
            StateUpdateMessage::Initialize { tx_fee: 2, .. }
        ));
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = AgentConfig::parse("agent:\n  max_reactions: 3\n").unwrap();
        assert_eq!(config.agent.max_reactions, 3);
        assert!(config.wallet.addresses.is_empty());
        assert_eq!(config.ledger.id, LedgerId::new("fetchai"));
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(AgentConfig::parse("").is_ok());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(matches!(
            AgentConfig::parse("agent: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("agora-config.yaml");
        if path.exists() {
            let config = AgentConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}

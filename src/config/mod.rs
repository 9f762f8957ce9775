//! Configuration Management Module
//!
//! This module handles loading and validating configuration for the proxy wallet
//! sweeper. Configuration includes the chain endpoint, contract addresses, the token
//! list to sweep, and gas settings for the final aggregate transaction.
//!
//! Private keys never live in the config file. The file names environment variables
//! and the keys are read from the environment at load time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// CONFIGURATION ERRORS
// ============================================================================

/// Fatal startup errors raised during configuration loading and validation.
///
/// Any of these aborts the run before the first on-chain interaction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MISSING_ENV: {0}")]
    MissingEnv(String),
    #[error("INVALID_ADDRESS: {field} = {value}")]
    InvalidAddress { field: String, value: String },
    #[error("NO_PROXY_WALLETS")]
    NoProxyWallets,
    #[error("NO_TOKEN_ADDRESSES")]
    NoTokenAddresses,
}

// ============================================================================
// CONFIGURATION STRUCTURES
// ============================================================================

/// Main configuration structure containing all sweeper settings.
///
/// This structure holds configuration for:
/// - Chain connection details (RPC endpoint, chain id)
/// - Contract addresses (delegation implementation, bulk executor)
/// - Sweep parameters (settlement address, token list, proxy key source)
/// - Submitter settings (funded key source, gas parameters)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chain connection configuration
    pub chain: ChainConfig,
    /// On-chain contract addresses
    pub contracts: ContractsConfig,
    /// Sweep parameters
    pub sweep: SweepConfig,
    /// Submitter account and gas configuration
    #[serde(default)]
    pub submitter: SubmitterConfig,
}

/// Configuration for the EVM chain connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// RPC endpoint URL for chain communication
    pub rpc_url: String,
    /// Chain ID (e.g., 11155111 for Sepolia, 31337 for Hardhat)
    pub chain_id: u64,
}

/// On-chain contract addresses the sweeper interacts with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractsConfig {
    /// Address of the batch execution implementation that proxy wallets must
    /// delegate to (the EIP-7702 delegation target)
    pub delegate_impl_addr: String,
    /// Address of the bulk executor contract that fans the aggregate
    /// transaction out to the individual proxy wallets
    pub bulk_executor_addr: String,
}

/// Sweep parameters: destination, tokens, and proxy key source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Destination account receiving all swept token balances
    pub settlement_addr: String,
    /// ERC20 token contract addresses to sweep, in scan order
    pub token_addrs: Vec<String>,
    /// Environment variable holding comma-separated proxy wallet private keys
    #[serde(default = "default_proxy_keys_env")]
    pub proxy_keys_env: String,
}

/// Submitter account and gas configuration.
///
/// Every field has a default, so the whole `[submitter]` section may be omitted.
/// Gas values are configured, not estimated: the sweeper is a periodic job and
/// deliberately carries no fee-market logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitterConfig {
    /// Environment variable holding the funded submitter private key
    #[serde(default = "default_submitter_key_env")]
    pub private_key_env: String,
    /// Gas limit for the aggregate transaction
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    /// Max fee per gas in wei
    #[serde(default = "default_max_fee_per_gas")]
    pub max_fee_per_gas: u64,
    /// Max priority fee per gas in wei
    #[serde(default = "default_max_priority_fee_per_gas")]
    pub max_priority_fee_per_gas: u64,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            private_key_env: default_submitter_key_env(),
            gas_limit: default_gas_limit(),
            max_fee_per_gas: default_max_fee_per_gas(),
            max_priority_fee_per_gas: default_max_priority_fee_per_gas(),
        }
    }
}

fn default_proxy_keys_env() -> String {
    "SWEEPER_PROXY_KEYS".to_string()
}

fn default_submitter_key_env() -> String {
    "SWEEPER_SUBMITTER_KEY".to_string()
}

fn default_gas_limit() -> u64 {
    3_000_000
}

fn default_max_fee_per_gas() -> u64 {
    30_000_000_000 // 30 gwei
}

fn default_max_priority_fee_per_gas() -> u64 {
    1_000_000_000 // 1 gwei
}

// ============================================================================
// CONFIGURATION LOADING AND VALIDATION
// ============================================================================

/// Returns true if `addr` is a 0x-prefixed 20-byte hex address.
pub fn is_address(addr: &str) -> bool {
    match addr.strip_prefix("0x") {
        Some(hex_part) => {
            hex_part.len() == 40 && hex_part.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

impl Config {
    /// Loads configuration from the TOML file.
    ///
    /// The path defaults to `config/sweeper.toml` and can be overridden via the
    /// `SWEEPER_CONFIG_PATH` environment variable (used by tests).
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated configuration
    /// * `Err(anyhow::Error)` - File missing, unparseable, or invalid
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("SWEEPER_CONFIG_PATH")
            .unwrap_or_else(|_| "config/sweeper.toml".to_string());

        if !std::path::Path::new(&config_path).exists() {
            return Err(anyhow::anyhow!(
                "Configuration file '{}' not found. Please copy the template:\n\
                cp config/sweeper.template.toml config/sweeper.toml\n\
                Then edit config/sweeper.toml with your actual values.",
                config_path
            ));
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates all address fields and the token list.
    ///
    /// Malformed token addresses are dropped with a warning; every other
    /// malformed field is fatal.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Configuration is usable
    /// * `Err(ConfigError)` - A required field is missing or invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_address(&self.contracts.delegate_impl_addr) {
            return Err(ConfigError::InvalidAddress {
                field: "contracts.delegate_impl_addr".to_string(),
                value: self.contracts.delegate_impl_addr.clone(),
            });
        }
        if !is_address(&self.contracts.bulk_executor_addr) {
            return Err(ConfigError::InvalidAddress {
                field: "contracts.bulk_executor_addr".to_string(),
                value: self.contracts.bulk_executor_addr.clone(),
            });
        }
        if !is_address(&self.sweep.settlement_addr) {
            return Err(ConfigError::InvalidAddress {
                field: "sweep.settlement_addr".to_string(),
                value: self.sweep.settlement_addr.clone(),
            });
        }
        if self.valid_token_addrs().is_empty() {
            return Err(ConfigError::NoTokenAddresses);
        }
        Ok(())
    }

    /// Returns the configured token addresses with malformed entries dropped.
    ///
    /// The returned order is the configured order; it defines the scan order and
    /// therefore the packed call order, which is part of each signed batch.
    pub fn valid_token_addrs(&self) -> Vec<String> {
        self.sweep
            .token_addrs
            .iter()
            .filter(|addr| {
                let ok = is_address(addr);
                if !ok {
                    tracing::warn!("Skipping malformed token address: {}", addr);
                }
                ok
            })
            .cloned()
            .collect()
    }

    /// Loads the comma-separated proxy wallet private keys from the environment.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - Raw key strings in configured order
    /// * `Err(ConfigError)` - Environment variable not set
    pub fn proxy_keys(&self) -> Result<Vec<String>, ConfigError> {
        let raw = std::env::var(&self.sweep.proxy_keys_env)
            .map_err(|_| ConfigError::MissingEnv(self.sweep.proxy_keys_env.clone()))?;
        Ok(raw
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect())
    }

    /// Loads the funded submitter private key from the environment.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Raw key string
    /// * `Err(ConfigError)` - Environment variable not set
    pub fn submitter_key(&self) -> Result<String, ConfigError> {
        std::env::var(&self.submitter.private_key_env)
            .map_err(|_| ConfigError::MissingEnv(self.submitter.private_key_env.clone()))
    }

    /// Creates a template configuration with placeholder values.
    ///
    /// Suitable for local development against a Hardhat node. For real use all
    /// placeholder addresses must be replaced.
    pub fn template() -> Self {
        Self {
            chain: ChainConfig {
                rpc_url: "http://127.0.0.1:8545".to_string(),
                chain_id: 31337,
            },
            contracts: ContractsConfig {
                delegate_impl_addr: "0x0000000000000000000000000000000000000000".to_string(),
                bulk_executor_addr: "0x0000000000000000000000000000000000000000".to_string(),
            },
            sweep: SweepConfig {
                settlement_addr: "0x0000000000000000000000000000000000000000".to_string(),
                token_addrs: vec![],
                proxy_keys_env: default_proxy_keys_env(),
            },
            submitter: SubmitterConfig::default(),
        }
    }
}

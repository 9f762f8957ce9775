//! Proxy Wallet Sweeper Library
//!
//! This crate sweeps ERC20 balances from a set of EIP-7702 proxy wallets into a single
//! settlement account. A funded submitter account broadcasts one aggregate transaction
//! on behalf of all proxy wallets, so the proxies themselves never need gas.

pub mod abi;
pub mod authorization;
pub mod batch;
pub mod config;
pub mod crypto;
pub mod delegation;
pub mod erc20;
pub mod evm_client;
pub mod rlp;
pub mod submitter;
pub mod sweep;

// Re-export commonly used types
pub use authorization::SignedAuthorization;
pub use batch::Call;
pub use config::{ChainConfig, Config, ContractsConfig, SubmitterConfig, SweepConfig};
pub use crypto::LocalWallet;
pub use delegation::DelegationState;
pub use evm_client::EvmClient;
pub use submitter::{BulkExecutionRequest, Submitter};

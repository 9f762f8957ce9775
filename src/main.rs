//! Proxy Wallet Sweeper
//!
//! Periodic job that sweeps ERC20 balances from a set of EIP-7702 proxy wallets into
//! a single settlement account. For every configured proxy wallet it:
//!
//! 1. Checks whether the wallet already delegates to the batch implementation
//! 2. Builds a signed EIP-7702 authorization if it does not
//! 3. Scans the configured tokens for positive balances
//! 4. Packs and signs a per-wallet transfer batch
//!
//! and finally broadcasts one aggregate `bulkExecute` transaction from a funded
//! submitter account, so the proxy wallets themselves never need gas.

use anyhow::Result;
use tracing::info;

mod abi;
mod authorization;
mod batch;
mod config;
mod crypto;
mod delegation;
mod erc20;
mod evm_client;
mod rlp;
mod submitter;
mod sweep;

use config::{Config, ConfigError};
use crypto::{wallets_from_keys, LocalWallet};
use evm_client::EvmClient;
use submitter::Submitter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting proxy wallet sweeper");

    let config = Config::load()?;
    info!("Configuration loaded successfully");

    let client = EvmClient::new(&config.chain.rpc_url)?;

    let wallets = wallets_from_keys(&config.proxy_keys()?);
    if wallets.is_empty() {
        return Err(ConfigError::NoProxyWallets.into());
    }
    info!("Loaded {} proxy wallet(s)", wallets.len());

    let submitter_wallet = LocalWallet::from_hex_key(&config.submitter_key()?)?;
    let submitter = Submitter::new(&config, submitter_wallet);
    info!("Submitting from {}", submitter.address());

    let request = sweep::run_sweep(&config, &client, &wallets).await?;

    if request.is_empty() {
        info!("Nothing to sweep and no authorizations needed, skipping submission");
        return Ok(());
    }

    let tx_hash = submitter.submit(&client, &request).await?;
    info!("Bulk execution submitted: {}", tx_hash);

    let receipt = submitter.wait_for_inclusion(&client, &tx_hash).await?;
    info!(
        "Sweep complete: {} account(s) swept, {} authorization(s) attached, status {}",
        request.batch_len(),
        request.authorizations.len(),
        receipt.status.as_deref().unwrap_or("unknown")
    );

    Ok(())
}

//! Print Wallet Addresses from Sweeper Config
//!
//! This binary reads the sweeper configuration and prints the Ethereum address of
//! every configured proxy wallet plus the submitter. Useful for funding the
//! submitter and seeding proxy wallets on a test network.

use anyhow::Result;
use proxy_sweeper::config::Config;
use proxy_sweeper::crypto::{wallets_from_keys, LocalWallet};

fn main() -> Result<()> {
    let config = Config::load()?;

    let wallets = wallets_from_keys(&config.proxy_keys()?);
    for (i, wallet) in wallets.iter().enumerate() {
        println!("proxy[{}]: {}", i, wallet.address());
    }

    let submitter = LocalWallet::from_hex_key(&config.submitter_key()?)?;
    println!("submitter: {}", submitter.address());

    Ok(())
}

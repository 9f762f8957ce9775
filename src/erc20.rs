//! ERC20 Balance Scanner Module
//!
//! Balance reads and transfer calldata for the configured token list. Balance reads
//! are fail-open: one unreadable token must not abort the sweep of an otherwise
//! healthy account, so a failed read degrades to "nothing to sweep for this token".

use anyhow::{Context, Result};
use ethereum_types::U256;
use tracing::warn;

use crate::abi;
use crate::crypto::selector;
use crate::evm_client::EvmClient;

/// Queries an account's balance of one ERC20 token via eth_call.
///
/// # Arguments
///
/// * `client` - JSON-RPC client
/// * `token` - Token contract address
/// * `owner` - Account whose balance is queried
///
/// # Returns
///
/// * `Ok(U256)` - Current balance
/// * `Err(anyhow::Error)` - Call failed or returned malformed data
pub async fn balance_of(client: &EvmClient, token: &str, owner: &str) -> Result<U256> {
    let mut calldata = Vec::with_capacity(4 + 32);
    calldata.extend_from_slice(&selector("balanceOf(address)"));
    calldata.extend_from_slice(&abi::encode_address(owner)?);

    let result = client
        .call(token, &format!("0x{}", hex::encode(&calldata)))
        .await
        .with_context(|| format!("balanceOf call to token {} failed", token))?;

    let result_hex = result.strip_prefix("0x").unwrap_or(&result);
    let word = result_hex.get(..64).ok_or_else(|| {
        anyhow::anyhow!(
            "Malformed balanceOf return from token {}: 0x{}",
            token,
            result_hex
        )
    })?;

    U256::from_str_radix(word, 16)
        .map_err(|e| anyhow::anyhow!("Invalid balanceOf value from token {}: {}", token, e))
}

/// Fail-open balance read: any failure is logged and treated as a zero balance.
///
/// # Arguments
///
/// * `client` - JSON-RPC client
/// * `token` - Token contract address
/// * `owner` - Account whose balance is queried
pub async fn scan_balance(client: &EvmClient, token: &str, owner: &str) -> U256 {
    match balance_of(client, token, owner).await {
        Ok(balance) => balance,
        Err(e) => {
            warn!("Error getting {} balance for {}: {:#}", token, owner, e);
            U256::zero()
        }
    }
}

/// Builds `transfer(address,uint256)` calldata.
///
/// # Arguments
///
/// * `recipient` - Transfer destination (the settlement address)
/// * `amount` - Token amount to transfer
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - 68-byte calldata (selector + two ABI words)
/// * `Err(anyhow::Error)` - Malformed recipient address
pub fn transfer_calldata(recipient: &str, amount: U256) -> Result<Vec<u8>> {
    let mut calldata = Vec::with_capacity(4 + 64);
    calldata.extend_from_slice(&selector("transfer(address,uint256)"));
    calldata.extend_from_slice(&abi::encode_address(recipient)?);
    calldata.extend_from_slice(&abi::encode_u256(amount));
    Ok(calldata)
}

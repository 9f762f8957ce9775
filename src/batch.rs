//! Call Batch Encoder and Signer Module
//!
//! Turns one account's transfer instructions into the packed byte blob the batch
//! implementation verifies on-chain, binds it to the account's batch nonce in a
//! keccak digest, signs the digest with the account key, and produces the final
//! `execute` calldata for that account.
//!
//! Packing order is strictly the instruction order: the blob's byte layout is part
//! of the signed commitment, so re-ordering instructions changes the signed intent.

use anyhow::{Context, Result};
use ethereum_types::U256;
use tracing::debug;

use crate::abi;
use crate::crypto::{keccak256, selector, LocalWallet};
use crate::evm_client::EvmClient;

/// One transfer instruction: a sub-call executed under the proxy wallet's authority.
#[derive(Debug, Clone)]
pub struct Call {
    /// Target contract (the token being swept)
    pub to: String,
    /// Native value forwarded with the call (always zero for token sweeps)
    pub value: U256,
    /// Encoded call data (an ERC20 transfer)
    pub data: Vec<u8>,
}

/// Packs transfer instructions into the blob the batch contract hashes:
/// per call `address(20) || value(32, big-endian) || data(raw)`, in input order.
///
/// # Arguments
///
/// * `calls` - Instructions in scan order
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - Packed call blob
/// * `Err(anyhow::Error)` - A call target is not a valid address
pub fn encode_calls_packed(calls: &[Call]) -> Result<Vec<u8>> {
    let mut packed = Vec::new();
    for call in calls {
        packed.extend_from_slice(&abi::address_bytes(&call.to)?);
        packed.extend_from_slice(&abi::encode_u256(call.value));
        packed.extend_from_slice(&call.data);
    }
    Ok(packed)
}

/// Computes the replay-protected batch digest:
/// keccak256(nonce(32, big-endian) || packed_calls)
pub fn batch_digest(nonce: U256, packed_calls: &[u8]) -> [u8; 32] {
    let mut preimage = Vec::with_capacity(32 + packed_calls.len());
    preimage.extend_from_slice(&abi::encode_u256(nonce));
    preimage.extend_from_slice(packed_calls);
    keccak256(&preimage)
}

/// Fetches an account's batch nonce by calling `nonce()` on the account itself.
///
/// Defaults to zero on any failure: an account with no batch-execution state yet
/// (freshly delegated, or delegation pending in this very transaction) has never
/// executed a batch, so its nonce is zero.
///
/// # Arguments
///
/// * `client` - JSON-RPC client
/// * `account` - Proxy wallet address
pub async fn fetch_batch_nonce(client: &EvmClient, account: &str) -> U256 {
    let calldata = format!("0x{}", hex::encode(selector("nonce()")));
    match client.call(account, &calldata).await {
        Ok(result) => {
            let result_hex = result.strip_prefix("0x").unwrap_or(&result);
            let Some(word) = result_hex.get(..64) else {
                debug!("Account {} has no batch nonce yet, defaulting to 0", account);
                return U256::zero();
            };
            U256::from_str_radix(word, 16).unwrap_or_else(|_| {
                debug!("Malformed nonce() return from {}, defaulting to 0", account);
                U256::zero()
            })
        }
        Err(e) => {
            debug!(
                "nonce() call to {} failed ({:#}), defaulting to 0",
                account, e
            );
            U256::zero()
        }
    }
}

/// Signs a packed call blob for one account.
///
/// The signature is an EIP-191 personal-message signature over the 32-byte batch
/// digest, matching what the batch implementation recovers on-chain.
///
/// # Arguments
///
/// * `wallet` - Proxy wallet whose key authorizes the batch
/// * `nonce` - Current batch nonce of the account
/// * `packed_calls` - Output of [`encode_calls_packed`]
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - 65-byte signature r || s || v
/// * `Err(anyhow::Error)` - Signing failed
pub fn sign_batch(wallet: &LocalWallet, nonce: U256, packed_calls: &[u8]) -> Result<Vec<u8>> {
    let digest = batch_digest(nonce, packed_calls);
    wallet
        .sign_message(&digest)
        .with_context(|| format!("Failed to sign batch for {}", wallet.address()))
}

/// Encodes the per-account `execute((address,uint256,bytes)[],bytes)` calldata.
///
/// # Arguments
///
/// * `calls` - The same instructions that were packed and signed, in the same order
/// * `signature` - 65-byte batch signature
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - Calldata ready for the bulk execution request
/// * `Err(anyhow::Error)` - A call target is not a valid address
pub fn encode_execute_calldata(calls: &[Call], signature: &[u8]) -> Result<Vec<u8>> {
    // Each tuple is dynamic (contains bytes): head word for addr, value, and the
    // data offset, then the data length + padded payload.
    let tuple_encodings: Vec<Vec<u8>> = calls
        .iter()
        .map(|call| -> Result<Vec<u8>> {
            let mut tuple = Vec::new();
            tuple.extend_from_slice(&abi::encode_address(&call.to)?);
            tuple.extend_from_slice(&abi::encode_u256(call.value));
            tuple.extend_from_slice(&abi::encode_u64(0x60));
            tuple.extend_from_slice(&abi::encode_bytes(&call.data));
            Ok(tuple)
        })
        .collect::<Result<_>>()?;

    // Array region: length word, one offset word per tuple, then the tuples.
    // Offsets are relative to the start of the offset area.
    let mut array_region = Vec::new();
    array_region.extend_from_slice(&abi::encode_u64(calls.len() as u64));
    let mut tuple_offset = 32 * calls.len();
    for tuple in &tuple_encodings {
        array_region.extend_from_slice(&abi::encode_u64(tuple_offset as u64));
        tuple_offset += tuple.len();
    }
    for tuple in &tuple_encodings {
        array_region.extend_from_slice(tuple);
    }

    // Top-level head: offset to the array, offset to the signature bytes.
    let mut calldata = Vec::new();
    calldata.extend_from_slice(&selector("execute((address,uint256,bytes)[],bytes)"));
    calldata.extend_from_slice(&abi::encode_u64(0x40));
    calldata.extend_from_slice(&abi::encode_u64(0x40 + array_region.len() as u64));
    calldata.extend_from_slice(&array_region);
    calldata.extend_from_slice(&abi::encode_bytes(signature));
    Ok(calldata)
}

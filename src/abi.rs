//! Minimal ABI Encoding Module
//!
//! Word-level helpers for the handful of Solidity call encodings the sweeper
//! produces (`transfer`, `execute`, `bulkExecute`). Each helper emits standard
//! 32-byte ABI words; the callers assemble head/tail layouts for dynamic types.

use anyhow::Result;
use ethereum_types::U256;

/// Decodes a 0x-prefixed hex address into its 20 raw bytes.
///
/// # Arguments
///
/// * `addr` - Address string (0x-prefixed, 40 hex chars)
pub fn address_bytes(addr: &str) -> Result<[u8; 20]> {
    let hex_part = addr.strip_prefix("0x").unwrap_or(addr);
    let bytes = hex::decode(hex_part)
        .map_err(|e| anyhow::anyhow!("Invalid address hex '{}': {}", addr, e))?;
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("Invalid address length: {}", addr))
}

/// Encodes an address as a left-padded 32-byte ABI word.
pub fn encode_address(addr: &str) -> Result<[u8; 32]> {
    let raw = address_bytes(addr)?;
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(&raw);
    Ok(word)
}

/// Encodes a 256-bit unsigned integer as a 32-byte ABI word.
pub fn encode_u256(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

/// Encodes a u64 as a 32-byte ABI word.
pub fn encode_u64(value: u64) -> [u8; 32] {
    encode_u256(U256::from(value))
}

/// Encodes dynamic `bytes` content: length word followed by the payload padded
/// to a 32-byte boundary.
pub fn encode_bytes(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(32 + padded_len(payload.len()));
    out.extend_from_slice(&encode_u64(payload.len() as u64));
    out.extend_from_slice(payload);
    out.resize(32 + padded_len(payload.len()), 0);
    out
}

/// Rounds a byte length up to the next 32-byte boundary.
pub fn padded_len(len: usize) -> usize {
    len.div_ceil(32) * 32
}

//! Minimal RLP Encoder Module
//!
//! Just enough recursive-length-prefix encoding for EIP-7702 authorization tuples and
//! typed transaction payloads: byte strings, minimal-width unsigned integers, and
//! lists. Decoding is not needed anywhere in the sweeper.

use ethereum_types::U256;

/// Encodes a byte string.
///
/// A single byte below 0x80 encodes as itself; otherwise the payload is prefixed
/// with its length (short form up to 55 bytes, long form beyond).
pub fn encode_bytes(payload: &[u8]) -> Vec<u8> {
    if payload.len() == 1 && payload[0] < 0x80 {
        return payload.to_vec();
    }
    let mut out = length_prefix(payload.len(), 0x80);
    out.extend_from_slice(payload);
    out
}

/// Encodes an unsigned integer as a minimal big-endian byte string.
///
/// Zero encodes as the empty string (0x80).
pub fn encode_u64(value: u64) -> Vec<u8> {
    encode_bytes(&trim_leading_zeros(&value.to_be_bytes()))
}

/// Encodes a 256-bit unsigned integer as a minimal big-endian byte string.
pub fn encode_u256(value: U256) -> Vec<u8> {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    encode_bytes(&trim_leading_zeros(&buf))
}

/// Encodes a big-endian unsigned integer given as raw bytes (e.g., a signature
/// component), trimming leading zeros to the minimal form.
pub fn encode_uint_bytes(bytes: &[u8]) -> Vec<u8> {
    encode_bytes(&trim_leading_zeros(bytes))
}

/// Encodes a list from already-encoded items.
///
/// # Arguments
///
/// * `items` - RLP encodings of the list elements, in order
pub fn encode_list(items: &[Vec<u8>]) -> Vec<u8> {
    let payload: Vec<u8> = items.iter().flatten().copied().collect();
    let mut out = length_prefix(payload.len(), 0xc0);
    out.extend_from_slice(&payload);
    out
}

/// Builds the short- or long-form length prefix for strings (base 0x80) or
/// lists (base 0xc0).
fn length_prefix(len: usize, base: u8) -> Vec<u8> {
    if len <= 55 {
        vec![base + len as u8]
    } else {
        let len_bytes = trim_leading_zeros(&(len as u64).to_be_bytes());
        let mut out = vec![base + 55 + len_bytes.len() as u8];
        out.extend_from_slice(&len_bytes);
        out
    }
}

fn trim_leading_zeros(bytes: &[u8]) -> Vec<u8> {
    let first_nonzero = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    bytes[first_nonzero..].to_vec()
}

//! Authorization Builder Module
//!
//! Builds signed EIP-7702 authorization tuples. An authorization binds one proxy
//! wallet to the batch implementation contract at a specific account nonce; it is
//! only built for wallets that do not already carry the expected delegation.

use anyhow::{Context, Result};
use tracing::info;

use crate::abi;
use crate::crypto::{keccak256, LocalWallet};
use crate::evm_client::EvmClient;
use crate::rlp;

/// EIP-7702 authorization signing magic (prepended to the RLP payload).
const AUTHORIZATION_MAGIC: u8 = 0x05;

/// A signed EIP-7702 authorization tuple.
///
/// Carried in the authorization list of the final type-0x04 transaction as
/// [chain_id, address, nonce, y_parity, r, s].
#[derive(Debug, Clone)]
pub struct SignedAuthorization {
    /// Chain the authorization is valid on
    pub chain_id: u64,
    /// Delegation target (the batch implementation contract)
    pub address: String,
    /// Protocol nonce of the authorizing account at signing time
    pub nonce: u64,
    /// Recovery parity of the signature (0 or 1)
    pub y_parity: u8,
    /// Signature r component
    pub r: [u8; 32],
    /// Signature s component
    pub s: [u8; 32],
}

impl SignedAuthorization {
    /// RLP-encodes the tuple for inclusion in a transaction authorization list.
    pub fn rlp_encode(&self) -> Result<Vec<u8>> {
        let address_raw = abi::address_bytes(&self.address)?;
        Ok(rlp::encode_list(&[
            rlp::encode_u64(self.chain_id),
            rlp::encode_bytes(&address_raw),
            rlp::encode_u64(self.nonce),
            rlp::encode_u64(self.y_parity as u64),
            rlp::encode_uint_bytes(&self.r),
            rlp::encode_uint_bytes(&self.s),
        ]))
    }
}

/// Computes the EIP-7702 authorization digest:
/// keccak256(0x05 || rlp([chain_id, address, nonce]))
pub fn authorization_digest(chain_id: u64, address: &str, nonce: u64) -> Result<[u8; 32]> {
    let address_raw = abi::address_bytes(address)?;
    let payload = rlp::encode_list(&[
        rlp::encode_u64(chain_id),
        rlp::encode_bytes(&address_raw),
        rlp::encode_u64(nonce),
    ]);

    let mut preimage = Vec::with_capacity(1 + payload.len());
    preimage.push(AUTHORIZATION_MAGIC);
    preimage.extend_from_slice(&payload);
    Ok(keccak256(&preimage))
}

/// Builds a signed authorization binding `wallet` to `delegate_addr`.
///
/// The authorization nonce is the wallet's current protocol nonce: the aggregate
/// transaction is sent by a separate funded submitter, so the authorizing account's
/// own nonce is not consumed before the authorization is processed.
///
/// # Arguments
///
/// * `client` - JSON-RPC client (used when no nonce override is given)
/// * `wallet` - Proxy wallet that signs the authorization
/// * `delegate_addr` - Implementation contract to delegate to
/// * `chain_id` - Chain the authorization is scoped to
/// * `nonce_override` - Explicit nonce, bypassing the on-chain lookup
///
/// # Returns
///
/// * `Ok(SignedAuthorization)` - Signed tuple ready for the authorization list
/// * `Err(anyhow::Error)` - Nonce lookup or signing failed
pub async fn build_authorization(
    client: &EvmClient,
    wallet: &LocalWallet,
    delegate_addr: &str,
    chain_id: u64,
    nonce_override: Option<u64>,
) -> Result<SignedAuthorization> {
    let nonce = match nonce_override {
        Some(nonce) => nonce,
        None => client
            .get_transaction_count(wallet.address())
            .await
            .with_context(|| {
                format!("Failed to fetch authorization nonce for {}", wallet.address())
            })?,
    };

    let digest = authorization_digest(chain_id, delegate_addr, nonce)?;
    let (signature, y_parity) = wallet.sign_prehash_raw(&digest)?;

    let sig_bytes = signature.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&sig_bytes[..32]);
    s.copy_from_slice(&sig_bytes[32..64]);

    info!(
        "Built authorization for {} -> {} (nonce {})",
        wallet.address(),
        delegate_addr,
        nonce
    );

    Ok(SignedAuthorization {
        chain_id,
        address: delegate_addr.to_lowercase(),
        nonce,
        y_parity,
        r,
        s,
    })
}

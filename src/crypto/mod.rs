//! Cryptographic Operations Module
//!
//! This module handles all cryptographic operations for the sweeper: keccak hashing,
//! ABI selector derivation, secp256k1 key management, and Ethereum-style recoverable
//! signatures.
//!
//! ## Security Requirements
//!
//! **CRITICAL**: Private keys must never be exposed or logged.

use anyhow::Result;
use k256::ecdsa::{
    Signature as EcdsaSignature, SigningKey as EcdsaSigningKey, VerifyingKey as EcdsaVerifyingKey,
};
use sha3::{Digest, Keccak256};

// ============================================================================
// HASH HELPERS
// ============================================================================

/// Computes the keccak256 hash of arbitrary bytes.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Derives the 4-byte ABI function selector from a canonical signature string.
///
/// # Arguments
///
/// * `signature` - Canonical signature, e.g. `"transfer(address,uint256)"`
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Computes the EIP-191 personal-message hash of a message:
/// keccak256("\x19Ethereum Signed Message:\n" || len(message) || message)
pub fn eth_signed_message_hash(message: &[u8]) -> [u8; 32] {
    let prefix = format!("\x19Ethereum Signed Message:\n{}", message.len());
    let mut prefixed = Vec::with_capacity(prefix.len() + message.len());
    prefixed.extend_from_slice(prefix.as_bytes());
    prefixed.extend_from_slice(message);
    keccak256(&prefixed)
}

// ============================================================================
// LOCAL WALLET
// ============================================================================

/// A locally held secp256k1 signing key with its derived Ethereum address.
///
/// Each proxy wallet and the submitter account is one `LocalWallet`. Signing is
/// capability-scoped: a wallet only ever signs with its own key.
pub struct LocalWallet {
    /// ECDSA signing key (secp256k1)
    signing_key: EcdsaSigningKey,
    /// Derived Ethereum address (0x-prefixed lowercase hex)
    address: String,
}

impl LocalWallet {
    /// Creates a wallet from a hex-encoded 32-byte private key.
    ///
    /// # Arguments
    ///
    /// * `hex_key` - Private key as hex, with or without 0x prefix
    ///
    /// # Returns
    ///
    /// * `Ok(LocalWallet)` - Successfully created wallet
    /// * `Err(anyhow::Error)` - Malformed key
    pub fn from_hex_key(hex_key: &str) -> Result<Self> {
        let key_hex = hex_key.strip_prefix("0x").unwrap_or(hex_key);
        let key_bytes = hex::decode(key_hex)
            .map_err(|e| anyhow::anyhow!("Invalid private key hex: {}", e))?;

        if key_bytes.len() != 32 {
            return Err(anyhow::anyhow!(
                "Invalid private key length: expected 32 bytes, got {}",
                key_bytes.len()
            ));
        }

        let key_array: [u8; 32] = key_bytes
            .try_into()
            .map_err(|_| anyhow::anyhow!("Failed to convert private key to array"))?;
        let signing_key = EcdsaSigningKey::from_bytes(&key_array.into())
            .map_err(|e| anyhow::anyhow!("Failed to create ECDSA signing key: {}", e))?;
        let address = derive_ethereum_address(signing_key.verifying_key())?;

        Ok(Self {
            signing_key,
            address,
        })
    }

    /// Returns the wallet's Ethereum address (0x-prefixed lowercase hex).
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Signs a precomputed 32-byte hash and returns the signature with its
    /// recovery parity.
    ///
    /// The recovery id is determined by trial recovery: recover with id 0 and
    /// compare against this wallet's public key.
    ///
    /// # Returns
    ///
    /// * `Ok((signature, parity))` - Low-s signature plus recovery parity (0 or 1)
    /// * `Err(anyhow::Error)` - Failed to sign
    pub fn sign_prehash_raw(&self, digest: &[u8; 32]) -> Result<(EcdsaSignature, u8)> {
        use k256::ecdsa::signature::hazmat::PrehashSigner;
        let signature: EcdsaSignature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|e| anyhow::anyhow!("Failed to sign precomputed hash: {}", e))?;
        // Ethereum requires the low-s form
        let signature = signature.normalize_s().unwrap_or(signature);

        let verifying_key = self.signing_key.verifying_key();
        let public_key_bytes = verifying_key.to_encoded_point(false);

        let recovery_id_0 = k256::ecdsa::RecoveryId::try_from(0u8)
            .map_err(|e| anyhow::anyhow!("Invalid recovery id: {}", e))?;
        let parity = if let Ok(recovered) =
            EcdsaVerifyingKey::recover_from_prehash(digest, &signature, recovery_id_0)
        {
            if recovered.to_encoded_point(false) == public_key_bytes {
                0u8
            } else {
                1u8
            }
        } else {
            1u8
        };

        Ok((signature, parity))
    }

    /// Signs a precomputed 32-byte hash and returns the 65-byte Ethereum
    /// signature r || s || v with v in {27, 28}.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<Vec<u8>> {
        let (signature, parity) = self.sign_prehash_raw(digest)?;
        let sig_bytes = signature.to_bytes();

        let mut final_sig = Vec::with_capacity(65);
        final_sig.extend_from_slice(&sig_bytes);
        final_sig.push(parity + 27);
        Ok(final_sig)
    }

    /// Signs an arbitrary message using the EIP-191 personal-message scheme.
    ///
    /// # Arguments
    ///
    /// * `message` - Raw message bytes (here: the 32-byte batch digest)
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - 65-byte signature r || s || v with v in {27, 28}
    /// * `Err(anyhow::Error)` - Failed to sign
    pub fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>> {
        let digest = eth_signed_message_hash(message);
        self.sign_digest(&digest)
    }
}

/// Derives the Ethereum address from an ECDSA public key.
///
/// The address is keccak256(uncompressed_public_key)[12..32].
fn derive_ethereum_address(verifying_key: &EcdsaVerifyingKey) -> Result<String> {
    let public_key_point = verifying_key.to_encoded_point(false);
    let public_key_bytes = public_key_point.as_bytes();

    // Uncompressed format: 0x04 || x (32 bytes) || y (32 bytes) = 65 bytes total
    if public_key_bytes.len() != 65 || public_key_bytes[0] != 0x04 {
        return Err(anyhow::anyhow!(
            "Invalid public key format: expected 65 bytes with 0x04 prefix"
        ));
    }

    let hash = keccak256(&public_key_bytes[1..]);
    Ok(format!("0x{}", hex::encode(&hash[12..32])))
}

/// Builds wallets from raw hex key strings, dropping malformed keys with a log.
///
/// One bad key must not block the remaining wallets; an empty result is a startup
/// failure handled by the caller.
pub fn wallets_from_keys(keys: &[String]) -> Vec<LocalWallet> {
    keys.iter()
        .filter_map(|key| match LocalWallet::from_hex_key(key) {
            Ok(wallet) => Some(wallet),
            Err(e) => {
                tracing::error!("Error loading proxy wallet: {}", e);
                None
            }
        })
        .collect()
}

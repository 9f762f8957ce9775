//! Bulk Submission Module
//!
//! Assembles and broadcasts the final aggregate transaction. The bulk executor
//! contract fans `bulkExecute(targets, values, data)` out to the individual proxy
//! wallets; collected EIP-7702 authorizations ride along in the transaction's
//! authorization list.
//!
//! Envelope selection: with no authorizations the transaction is a plain EIP-1559
//! type-0x02 payload. A type-0x04 payload with an empty authorization list is
//! invalid, so the authorization-carrying variant is only used when there is at
//! least one authorization to attach.

use anyhow::{Context, Result};
use ethereum_types::U256;
use std::time::Duration;
use tracing::info;

use crate::abi;
use crate::authorization::SignedAuthorization;
use crate::config::Config;
use crate::crypto::{keccak256, selector, LocalWallet};
use crate::evm_client::{EvmClient, TransactionReceipt};
use crate::rlp;

/// EIP-1559 transaction type byte.
const TX_TYPE_EIP1559: u8 = 0x02;
/// EIP-7702 transaction type byte.
const TX_TYPE_EIP7702: u8 = 0x04;

/// The final aggregate artifact: parallel per-account lists plus the collected
/// authorizations.
///
/// Invariant: `targets`, `values`, and `data` always have equal length, and index i
/// across all three refers to the same proxy wallet.
#[derive(Debug, Default)]
pub struct BulkExecutionRequest {
    /// Proxy wallet addresses with a non-empty batch
    pub targets: Vec<String>,
    /// Native value per target (always zero for token sweeps)
    pub values: Vec<U256>,
    /// Per-account `execute` calldata
    pub data: Vec<Vec<u8>>,
    /// Authorizations for wallets lacking the expected delegation
    pub authorizations: Vec<SignedAuthorization>,
}

impl BulkExecutionRequest {
    /// Appends one account's batch entry, preserving the parallel-list invariant.
    pub fn push_batch(&mut self, target: String, value: U256, calldata: Vec<u8>) {
        self.targets.push(target);
        self.values.push(value);
        self.data.push(calldata);
    }

    /// Number of accounts with a batch entry.
    pub fn batch_len(&self) -> usize {
        debug_assert_eq!(self.targets.len(), self.values.len());
        debug_assert_eq!(self.targets.len(), self.data.len());
        self.targets.len()
    }

    /// True when there is neither a batch entry nor an authorization to submit.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.authorizations.is_empty()
    }
}

/// Encodes `bulkExecute(address[],uint256[],bytes[])` calldata for the request's
/// parallel lists.
pub fn encode_bulk_execute_calldata(request: &BulkExecutionRequest) -> Result<Vec<u8>> {
    let count = request.batch_len();

    // address[] tail: length word + one word per address
    let mut targets_region = Vec::new();
    targets_region.extend_from_slice(&abi::encode_u64(count as u64));
    for target in &request.targets {
        targets_region.extend_from_slice(&abi::encode_address(target)?);
    }

    // uint256[] tail: length word + one word per value
    let mut values_region = Vec::new();
    values_region.extend_from_slice(&abi::encode_u64(count as u64));
    for value in &request.values {
        values_region.extend_from_slice(&abi::encode_u256(*value));
    }

    // bytes[] tail: length word, element offsets, then each element's bytes
    let mut data_region = Vec::new();
    data_region.extend_from_slice(&abi::encode_u64(count as u64));
    let element_encodings: Vec<Vec<u8>> = request
        .data
        .iter()
        .map(|d| abi::encode_bytes(d))
        .collect();
    let mut element_offset = 32 * count;
    for element in &element_encodings {
        data_region.extend_from_slice(&abi::encode_u64(element_offset as u64));
        element_offset += element.len();
    }
    for element in &element_encodings {
        data_region.extend_from_slice(element);
    }

    // Top-level head: three offsets to the dynamic tails
    let targets_offset = 0x60;
    let values_offset = targets_offset + targets_region.len();
    let data_offset = values_offset + values_region.len();

    let mut calldata = Vec::new();
    calldata.extend_from_slice(&selector("bulkExecute(address[],uint256[],bytes[])"));
    calldata.extend_from_slice(&abi::encode_u64(targets_offset as u64));
    calldata.extend_from_slice(&abi::encode_u64(values_offset as u64));
    calldata.extend_from_slice(&abi::encode_u64(data_offset as u64));
    calldata.extend_from_slice(&targets_region);
    calldata.extend_from_slice(&values_region);
    calldata.extend_from_slice(&data_region);
    Ok(calldata)
}

// ============================================================================
// SUBMITTER
// ============================================================================

/// Builds, signs, and broadcasts the aggregate transaction with the funded
/// submitter key.
pub struct Submitter {
    /// Funded account paying for the aggregate transaction
    wallet: LocalWallet,
    /// Chain the transaction targets
    chain_id: u64,
    /// Bulk executor contract address
    bulk_executor_addr: String,
    /// Configured gas limit
    gas_limit: u64,
    /// Configured max fee per gas (wei)
    max_fee_per_gas: u64,
    /// Configured max priority fee per gas (wei)
    max_priority_fee_per_gas: u64,
}

impl Submitter {
    /// Creates a submitter from the loaded configuration and the funded wallet.
    pub fn new(config: &Config, wallet: LocalWallet) -> Self {
        Self {
            wallet,
            chain_id: config.chain.chain_id,
            bulk_executor_addr: config.contracts.bulk_executor_addr.clone(),
            gas_limit: config.submitter.gas_limit,
            max_fee_per_gas: config.submitter.max_fee_per_gas,
            max_priority_fee_per_gas: config.submitter.max_priority_fee_per_gas,
        }
    }

    /// Returns the submitter's address.
    pub fn address(&self) -> &str {
        self.wallet.address()
    }

    /// Signs and broadcasts the bulk execution request as one transaction.
    ///
    /// # Arguments
    ///
    /// * `client` - JSON-RPC client
    /// * `request` - Assembled bulk execution request
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Transaction hash
    /// * `Err(anyhow::Error)` - Encoding, signing, or broadcast failed (fatal for
    ///   the run; the aggregate transaction is atomic and is not partially retried)
    pub async fn submit(&self, client: &EvmClient, request: &BulkExecutionRequest) -> Result<String> {
        let calldata = encode_bulk_execute_calldata(request)?;
        let nonce = client
            .get_transaction_count(self.wallet.address())
            .await
            .context("Failed to fetch submitter nonce")?;

        let raw_tx = self.build_signed_transaction(nonce, &calldata, &request.authorizations)?;

        info!(
            "Submitting bulk execution: {} batch entries, {} authorizations",
            request.batch_len(),
            request.authorizations.len()
        );
        client
            .send_raw_transaction(&raw_tx)
            .await
            .context("Bulk execution broadcast failed")
    }

    /// Waits for the submitted transaction to be mined.
    ///
    /// # Arguments
    ///
    /// * `client` - JSON-RPC client
    /// * `hash` - Transaction hash returned by [`Submitter::submit`]
    pub async fn wait_for_inclusion(
        &self,
        client: &EvmClient,
        hash: &str,
    ) -> Result<TransactionReceipt> {
        client
            .wait_for_receipt(hash, 60, Duration::from_secs(2))
            .await
    }

    /// Builds and signs the typed transaction envelope.
    ///
    /// Payload fields follow EIP-1559, with the EIP-7702 authorization list
    /// appended when authorizations are present.
    fn build_signed_transaction(
        &self,
        nonce: u64,
        calldata: &[u8],
        authorizations: &[SignedAuthorization],
    ) -> Result<String> {
        let to_raw = abi::address_bytes(&self.bulk_executor_addr)?;

        let mut fields = vec![
            rlp::encode_u64(self.chain_id),
            rlp::encode_u64(nonce),
            rlp::encode_u64(self.max_priority_fee_per_gas),
            rlp::encode_u64(self.max_fee_per_gas),
            rlp::encode_u64(self.gas_limit),
            rlp::encode_bytes(&to_raw),
            rlp::encode_u256(U256::zero()),
            rlp::encode_bytes(calldata),
            rlp::encode_list(&[]), // access list
        ];

        let tx_type = if authorizations.is_empty() {
            TX_TYPE_EIP1559
        } else {
            let auth_items: Vec<Vec<u8>> = authorizations
                .iter()
                .map(|auth| auth.rlp_encode())
                .collect::<Result<_>>()?;
            fields.push(rlp::encode_list(&auth_items));
            TX_TYPE_EIP7702
        };

        let mut signing_preimage = vec![tx_type];
        signing_preimage.extend_from_slice(&rlp::encode_list(&fields));
        let signing_hash = keccak256(&signing_preimage);

        let (signature, y_parity) = self.wallet.sign_prehash_raw(&signing_hash)?;
        let sig_bytes = signature.to_bytes();

        fields.push(rlp::encode_u64(y_parity as u64));
        fields.push(rlp::encode_uint_bytes(&sig_bytes[..32]));
        fields.push(rlp::encode_uint_bytes(&sig_bytes[32..64]));

        let mut raw = vec![tx_type];
        raw.extend_from_slice(&rlp::encode_list(&fields));
        Ok(format!("0x{}", hex::encode(raw)))
    }
}

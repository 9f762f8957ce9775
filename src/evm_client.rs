//! EVM Client Module
//!
//! This module provides a client for communicating with EVM-compatible blockchain
//! nodes via their JSON-RPC API. It covers the read surface the sweeper needs
//! (bytecode, contract calls, account nonces) plus raw transaction broadcast and
//! receipt polling for the final aggregate submission.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// API RESPONSE STRUCTURES
// ============================================================================

/// EVM JSON-RPC request wrapper
#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Vec<serde_json::Value>,
    id: u64,
}

/// EVM JSON-RPC response wrapper
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    #[allow(dead_code)]
    jsonrpc: String,
    result: Option<T>,
    error: Option<JsonRpcError>,
    #[allow(dead_code)]
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

/// Transaction receipt fields the sweeper cares about
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransactionReceipt {
    /// Transaction hash
    #[serde(rename = "transactionHash")]
    pub transaction_hash: String,
    /// Block number the transaction was included in (hex string)
    #[serde(rename = "blockNumber")]
    pub block_number: Option<String>,
    /// Execution status (0x1 = success, 0x0 = reverted)
    pub status: Option<String>,
}

// ============================================================================
// EVM CLIENT IMPLEMENTATION
// ============================================================================

/// Client for communicating with an EVM-compatible node via JSON-RPC
pub struct EvmClient {
    /// HTTP client for making requests
    client: Client,
    /// Base URL of the EVM node (e.g., "http://127.0.0.1:8545")
    base_url: String,
}

impl EvmClient {
    /// Creates a new EVM client for the given node URL
    ///
    /// # Arguments
    ///
    /// * `node_url` - Base URL of the EVM node (e.g., "http://127.0.0.1:8545")
    ///
    /// # Returns
    ///
    /// * `Ok(EvmClient)` - Successfully created client
    /// * `Err(anyhow::Error)` - Failed to create client
    pub fn new(node_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: node_url.to_string(),
        })
    }

    /// Sends one JSON-RPC request and unwraps the result.
    ///
    /// # Arguments
    ///
    /// * `method` - JSON-RPC method name
    /// * `params` - Positional parameters
    ///
    /// # Returns
    ///
    /// * `Ok(T)` - Deserialized result field
    /// * `Err(anyhow::Error)` - Transport failure, RPC error, or null result
    async fn rpc_call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<T> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: 1,
        };

        let response: JsonRpcResponse<T> = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to send {} request to {}", method, self.base_url))?
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response from {}", method, self.base_url))?;

        if let Some(error) = response.error {
            return Err(anyhow::anyhow!(
                "JSON-RPC error from {}: {} (code: {})",
                self.base_url,
                error.message,
                error.code
            ));
        }

        response
            .result
            .ok_or_else(|| anyhow::anyhow!("Empty {} result from {}", method, self.base_url))
    }

    /// Returns the bytecode deployed at an address via eth_getCode.
    ///
    /// # Arguments
    ///
    /// * `address` - Account address (0x-prefixed)
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Hex-encoded bytecode ("0x" for an empty account)
    /// * `Err(anyhow::Error)` - Failed to query bytecode
    pub async fn get_code(&self, address: &str) -> Result<String> {
        self.rpc_call(
            "eth_getCode",
            vec![serde_json::json!(address), serde_json::json!("latest")],
        )
        .await
    }

    /// Executes a read-only contract call via eth_call.
    ///
    /// # Arguments
    ///
    /// * `to` - Contract address
    /// * `data` - Hex-encoded calldata (0x-prefixed)
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Hex-encoded return data
    /// * `Err(anyhow::Error)` - Call reverted or transport failed
    pub async fn call(&self, to: &str, data: &str) -> Result<String> {
        let call_object = serde_json::json!({
            "to": to,
            "data": data,
        });
        self.rpc_call(
            "eth_call",
            vec![call_object, serde_json::json!("latest")],
        )
        .await
    }

    /// Returns an account's protocol nonce via eth_getTransactionCount.
    ///
    /// # Arguments
    ///
    /// * `address` - Account address (0x-prefixed)
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Current transaction count
    /// * `Err(anyhow::Error)` - Failed to query or parse the nonce
    pub async fn get_transaction_count(&self, address: &str) -> Result<u64> {
        let result: String = self
            .rpc_call(
                "eth_getTransactionCount",
                vec![serde_json::json!(address), serde_json::json!("latest")],
            )
            .await?;
        parse_hex_u64(&result).context("Failed to parse eth_getTransactionCount result")
    }

    /// Broadcasts a signed raw transaction via eth_sendRawTransaction.
    ///
    /// # Arguments
    ///
    /// * `raw_tx` - Hex-encoded signed transaction (0x-prefixed)
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Transaction hash
    /// * `Err(anyhow::Error)` - Node rejected the transaction
    pub async fn send_raw_transaction(&self, raw_tx: &str) -> Result<String> {
        self.rpc_call("eth_sendRawTransaction", vec![serde_json::json!(raw_tx)])
            .await
    }

    /// Fetches the receipt for a transaction hash, if already mined.
    ///
    /// # Arguments
    ///
    /// * `hash` - Transaction hash (0x-prefixed)
    ///
    /// # Returns
    ///
    /// * `Ok(Some(TransactionReceipt))` - Transaction mined
    /// * `Ok(None)` - Transaction still pending
    /// * `Err(anyhow::Error)` - Failed to query the receipt
    pub async fn get_transaction_receipt(
        &self,
        hash: &str,
    ) -> Result<Option<TransactionReceipt>> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: "eth_getTransactionReceipt".to_string(),
            params: vec![serde_json::json!(hash)],
            id: 1,
        };

        // Not routed through rpc_call: a null result here means "pending", not an error
        let response: JsonRpcResponse<TransactionReceipt> = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to send eth_getTransactionReceipt request to {}",
                    self.base_url
                )
            })?
            .json()
            .await
            .with_context(|| {
                format!(
                    "Failed to parse eth_getTransactionReceipt response from {}",
                    self.base_url
                )
            })?;

        if let Some(error) = response.error {
            return Err(anyhow::anyhow!(
                "JSON-RPC error from {}: {} (code: {})",
                self.base_url,
                error.message,
                error.code
            ));
        }

        Ok(response.result)
    }

    /// Polls for a transaction receipt until the transaction is mined.
    ///
    /// # Arguments
    ///
    /// * `hash` - Transaction hash (0x-prefixed)
    /// * `max_attempts` - Maximum number of polls before giving up
    /// * `interval` - Delay between polls
    ///
    /// # Returns
    ///
    /// * `Ok(TransactionReceipt)` - Transaction mined
    /// * `Err(anyhow::Error)` - Not mined within the polling window
    pub async fn wait_for_receipt(
        &self,
        hash: &str,
        max_attempts: u32,
        interval: Duration,
    ) -> Result<TransactionReceipt> {
        for _ in 0..max_attempts {
            if let Some(receipt) = self.get_transaction_receipt(hash).await? {
                return Ok(receipt);
            }
            tokio::time::sleep(interval).await;
        }
        Err(anyhow::anyhow!(
            "Transaction {} not mined after {} polls",
            hash,
            max_attempts
        ))
    }
}

/// Parses a 0x-prefixed hex quantity into a u64.
pub fn parse_hex_u64(value: &str) -> Result<u64> {
    let hex_part = value.strip_prefix("0x").unwrap_or(value);
    u64::from_str_radix(hex_part, 16)
        .map_err(|e| anyhow::anyhow!("Invalid hex quantity '{}': {}", value, e))
}

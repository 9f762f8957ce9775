//! Sweep Orchestrator Module
//!
//! Drives the full pipeline across all proxy wallets: delegation inspection and
//! conditional authorization first, then balance scanning, batch encoding, and batch
//! signing, accumulating everything into one [`BulkExecutionRequest`].
//!
//! Authorization and sweeping are orthogonal: a wallet can need re-authorization
//! while holding nothing, or hold balances while already correctly delegated. All
//! remote reads are awaited sequentially, wallet by wallet and token by token, so the
//! output lists always follow the configured wallet order.

use anyhow::Result;
use ethereum_types::U256;
use tracing::{info, warn};

use crate::authorization::build_authorization;
use crate::batch::{
    encode_calls_packed, encode_execute_calldata, fetch_batch_nonce, sign_batch, Call,
};
use crate::config::Config;
use crate::crypto::LocalWallet;
use crate::delegation::inspect_delegation;
use crate::erc20::{scan_balance, transfer_calldata};
use crate::evm_client::EvmClient;
use crate::submitter::BulkExecutionRequest;

/// Runs the sweep pipeline and assembles the bulk execution request.
///
/// Per-wallet failures degrade rather than abort: a wallet whose delegation lookup,
/// authorization, or batch signing fails is excluded from the run with a warning,
/// and the remaining wallets are still processed.
///
/// # Arguments
///
/// * `config` - Validated sweeper configuration
/// * `client` - JSON-RPC client
/// * `wallets` - Proxy wallets in configured order
///
/// # Returns
///
/// * `Ok(BulkExecutionRequest)` - Assembled request (possibly empty)
/// * `Err(anyhow::Error)` - Currently unused; reserved for future fatal paths
pub async fn run_sweep(
    config: &Config,
    client: &EvmClient,
    wallets: &[LocalWallet],
) -> Result<BulkExecutionRequest> {
    let tokens = config.valid_token_addrs();
    let mut request = BulkExecutionRequest::default();

    // Pass 1: delegation inspection and conditional authorization, in wallet order.
    // A failed lookup excludes the wallet from the whole run: sweeping without
    // knowing its delegation state could burn an authorization slot or submit a
    // batch that cannot execute.
    let mut excluded = vec![false; wallets.len()];
    for (i, wallet) in wallets.iter().enumerate() {
        let state = match inspect_delegation(
            client,
            wallet.address(),
            &config.contracts.delegate_impl_addr,
        )
        .await
        {
            Ok(state) => state,
            Err(e) => {
                warn!(
                    "Excluding {} from this run: delegation lookup failed: {:#}",
                    wallet.address(),
                    e
                );
                excluded[i] = true;
                continue;
            }
        };

        if !state.needs_authorization() {
            continue;
        }

        match build_authorization(
            client,
            wallet,
            &config.contracts.delegate_impl_addr,
            config.chain.chain_id,
            None,
        )
        .await
        {
            Ok(auth) => request.authorizations.push(auth),
            Err(e) => {
                warn!(
                    "Excluding {} from this run: authorization failed: {:#}",
                    wallet.address(),
                    e
                );
                excluded[i] = true;
            }
        }
    }

    // Pass 2: balance scan, batch encode, and batch sign, in wallet order.
    for (i, wallet) in wallets.iter().enumerate() {
        if excluded[i] {
            continue;
        }

        let mut calls = Vec::new();
        for token in &tokens {
            let balance = scan_balance(client, token, wallet.address()).await;
            if balance.is_zero() {
                continue;
            }

            let data = match transfer_calldata(&config.sweep.settlement_addr, balance) {
                Ok(data) => data,
                Err(e) => {
                    warn!("Skipping token {} for {}: {:#}", token, wallet.address(), e);
                    continue;
                }
            };
            calls.push(Call {
                to: token.clone(),
                value: U256::zero(),
                data,
            });
        }

        if calls.is_empty() {
            continue;
        }

        let entry = match build_batch_entry(client, wallet, &calls).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    "Excluding {} from this run: batch signing failed: {:#}",
                    wallet.address(),
                    e
                );
                continue;
            }
        };

        info!(
            "Sweeping {} token balance(s) from {}",
            calls.len(),
            wallet.address()
        );
        request.push_batch(wallet.address().to_string(), U256::zero(), entry);
    }

    Ok(request)
}

/// Packs, signs, and encodes one wallet's batch.
async fn build_batch_entry(
    client: &EvmClient,
    wallet: &LocalWallet,
    calls: &[Call],
) -> Result<Vec<u8>> {
    let packed = encode_calls_packed(calls)?;
    let nonce = fetch_batch_nonce(client, wallet.address()).await;
    let signature = sign_batch(wallet, nonce, &packed)?;
    encode_execute_calldata(calls, &signature)
}

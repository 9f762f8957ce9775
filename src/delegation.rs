//! Delegation Inspector Module
//!
//! Determines whether a proxy wallet already delegates its execution to the expected
//! batch implementation contract via an EIP-7702 delegation designator.

use anyhow::{Context, Result};
use tracing::debug;

use crate::evm_client::EvmClient;

/// EIP-7702 delegation designator prefix (0xef0100), hex-encoded without 0x.
const DELEGATION_PREFIX: &str = "ef0100";

/// Delegation state of one proxy wallet.
///
/// A lookup failure is deliberately not a state: the inspector returns `Err` so the
/// caller never confuses "could not tell" with "genuinely undelegated".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegationState {
    /// No code at the address, or code that is not an EIP-7702 delegation.
    /// Either way the account cannot batch-execute through the expected interface.
    Undelegated,
    /// Delegated, but to a different implementation than configured
    DelegatedToOther(String),
    /// Delegated to the configured implementation
    DelegatedToExpected,
}

impl DelegationState {
    /// Returns true if the account needs a fresh authorization.
    pub fn needs_authorization(&self) -> bool {
        !matches!(self, DelegationState::DelegatedToExpected)
    }
}

/// Inspects the on-chain bytecode of an account and classifies its delegation.
///
/// # Arguments
///
/// * `client` - JSON-RPC client
/// * `account` - Proxy wallet address
/// * `expected_impl` - Configured delegation implementation address
///
/// # Returns
///
/// * `Ok(DelegationState)` - Classification derived from the account's bytecode
/// * `Err(anyhow::Error)` - Bytecode lookup failed (distinct from any state)
pub async fn inspect_delegation(
    client: &EvmClient,
    account: &str,
    expected_impl: &str,
) -> Result<DelegationState> {
    let code = client
        .get_code(account)
        .await
        .with_context(|| format!("Failed to fetch bytecode for {}", account))?;

    let code_hex = code.strip_prefix("0x").unwrap_or(&code).to_lowercase();

    if code_hex.is_empty() {
        return Ok(DelegationState::Undelegated);
    }

    // Delegation designator: 0xef0100 || 20-byte implementation address
    if let Some(delegated_hex) = code_hex.strip_prefix(DELEGATION_PREFIX) {
        if delegated_hex.len() != 40 {
            debug!(
                "Account {} has a malformed delegation designator: 0x{}",
                account, code_hex
            );
            return Ok(DelegationState::Undelegated);
        }

        let delegated_to = format!("0x{}", delegated_hex);
        if delegated_to == expected_impl.to_lowercase() {
            debug!("Account {} already delegates to {}", account, delegated_to);
            return Ok(DelegationState::DelegatedToExpected);
        }
        return Ok(DelegationState::DelegatedToOther(delegated_to));
    }

    debug!(
        "Account {} has code but no EIP-7702 delegation designator",
        account
    );
    Ok(DelegationState::Undelegated)
}

//! Shared test helpers for unit tests
//!
//! Dummy constants, config builders, and wiremock mount helpers for simulating an
//! EVM JSON-RPC node. Key pairs are the standard Hardhat development accounts, so
//! address derivation doubles as a known-answer test.

use proxy_sweeper::config::{
    ChainConfig, Config, ContractsConfig, SubmitterConfig, SweepConfig,
};
use proxy_sweeper::crypto::selector;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// CONSTANTS
// ============================================================================

// ------------------------------- ACCOUNTS -------------------------------

/// Hardhat development account #0 private key
#[allow(dead_code)]
pub const HARDHAT_KEY_0: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Hardhat development account #0 address
#[allow(dead_code)]
pub const HARDHAT_ADDR_0: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

/// Hardhat development account #1 private key
#[allow(dead_code)]
pub const HARDHAT_KEY_1: &str =
    "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

/// Hardhat development account #1 address
#[allow(dead_code)]
pub const HARDHAT_ADDR_1: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

/// Hardhat development account #2 private key
#[allow(dead_code)]
pub const HARDHAT_KEY_2: &str =
    "5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";

/// Hardhat development account #2 address
#[allow(dead_code)]
pub const HARDHAT_ADDR_2: &str = "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc";

// ------------------------- TOKENS AND CONTRACTS -------------------------

/// Dummy batch implementation address (EIP-7702 delegation target)
#[allow(dead_code)]
pub const DUMMY_IMPL_ADDR: &str = "0x00000000000000000000000000000000000000aa";

/// Dummy bulk executor contract address
#[allow(dead_code)]
pub const DUMMY_EXECUTOR_ADDR: &str = "0x00000000000000000000000000000000000000bb";

/// Dummy settlement address (sweep destination)
#[allow(dead_code)]
pub const DUMMY_SETTLEMENT_ADDR: &str = "0x00000000000000000000000000000000000000cc";

/// Dummy ERC20 token X
#[allow(dead_code)]
pub const DUMMY_TOKEN_X: &str = "0x00000000000000000000000000000000000000dd";

/// Dummy ERC20 token Y
#[allow(dead_code)]
pub const DUMMY_TOKEN_Y: &str = "0x00000000000000000000000000000000000000ee";

// ============================================================================
// CONFIGURATION BUILDERS
// ============================================================================

/// Build a valid in-memory test configuration pointed at a mock JSON-RPC server.
#[allow(dead_code)]
pub fn build_test_config(mock_server_url: &str) -> Config {
    Config {
        chain: ChainConfig {
            rpc_url: mock_server_url.to_string(),
            chain_id: 31337,
        },
        contracts: ContractsConfig {
            delegate_impl_addr: DUMMY_IMPL_ADDR.to_string(),
            bulk_executor_addr: DUMMY_EXECUTOR_ADDR.to_string(),
        },
        sweep: SweepConfig {
            settlement_addr: DUMMY_SETTLEMENT_ADDR.to_string(),
            token_addrs: vec![DUMMY_TOKEN_X.to_string(), DUMMY_TOKEN_Y.to_string()],
            proxy_keys_env: "SWEEPER_TEST_PROXY_KEYS".to_string(),
        },
        submitter: SubmitterConfig {
            private_key_env: "SWEEPER_TEST_SUBMITTER_KEY".to_string(),
            gas_limit: 1_000_000,
            max_fee_per_gas: 2_000_000_000,
            max_priority_fee_per_gas: 1_000_000_000,
        },
    }
}

// ============================================================================
// MOCK SERVER MOUNT HELPERS
// ============================================================================

/// JSON-RPC success response wrapping `result`.
#[allow(dead_code)]
pub fn rpc_result(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": result,
    }))
}

/// Mount an eth_getCode mock for one account.
#[allow(dead_code)]
pub async fn mount_get_code(mock_server: &MockServer, account: &str, code: &str) {
    Mock::given(method("POST"))
        .and(body_string_contains("eth_getCode"))
        .and(body_string_contains(account))
        .respond_with(rpc_result(json!(code)))
        .mount(mock_server)
        .await;
}

/// Mount a failing eth_getCode mock for one account.
#[allow(dead_code)]
pub async fn mount_get_code_error(mock_server: &MockServer, account: &str) {
    Mock::given(method("POST"))
        .and(body_string_contains("eth_getCode"))
        .and(body_string_contains(account))
        .respond_with(ResponseTemplate::new(500))
        .mount(mock_server)
        .await;
}

/// Mount an eth_getTransactionCount mock for one account.
#[allow(dead_code)]
pub async fn mount_transaction_count(mock_server: &MockServer, account: &str, nonce_hex: &str) {
    Mock::given(method("POST"))
        .and(body_string_contains("eth_getTransactionCount"))
        .and(body_string_contains(account))
        .respond_with(rpc_result(json!(nonce_hex)))
        .mount(mock_server)
        .await;
}

/// Mount a balanceOf eth_call mock for one (token, owner) pair.
///
/// The owner is matched inside the calldata, so its hex is used without 0x prefix.
#[allow(dead_code)]
pub async fn mount_balance(mock_server: &MockServer, token: &str, owner: &str, balance: u64) {
    Mock::given(method("POST"))
        .and(body_string_contains(hex::encode(selector(
            "balanceOf(address)",
        ))))
        .and(body_string_contains(token))
        .and(body_string_contains(owner.trim_start_matches("0x")))
        .respond_with(rpc_result(json!(format!("0x{:064x}", balance))))
        .mount(mock_server)
        .await;
}

/// Mount a failing balanceOf eth_call mock for one (token, owner) pair.
#[allow(dead_code)]
pub async fn mount_balance_error(mock_server: &MockServer, token: &str, owner: &str) {
    Mock::given(method("POST"))
        .and(body_string_contains(hex::encode(selector(
            "balanceOf(address)",
        ))))
        .and(body_string_contains(token))
        .and(body_string_contains(owner.trim_start_matches("0x")))
        .respond_with(ResponseTemplate::new(500))
        .mount(mock_server)
        .await;
}

/// Mount a nonce() eth_call mock for one proxy wallet.
#[allow(dead_code)]
pub async fn mount_batch_nonce(mock_server: &MockServer, account: &str, nonce: u64) {
    Mock::given(method("POST"))
        .and(body_string_contains(hex::encode(selector("nonce()"))))
        .and(body_string_contains(account))
        .respond_with(rpc_result(json!(format!("0x{:064x}", nonce))))
        .mount(mock_server)
        .await;
}

/// Mount an eth_sendRawTransaction mock returning the given hash.
#[allow(dead_code)]
pub async fn mount_send_raw(mock_server: &MockServer, tx_hash: &str) {
    Mock::given(method("POST"))
        .and(body_string_contains("eth_sendRawTransaction"))
        .respond_with(rpc_result(json!(tx_hash)))
        .mount(mock_server)
        .await;
}

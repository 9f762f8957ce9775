//! Test module organization
//!
//! This module re-exports test helpers for use in test files.

mod helpers;

#[allow(unused_imports)]
pub use helpers::{
    build_test_config, mount_balance, mount_balance_error, mount_batch_nonce, mount_get_code,
    mount_get_code_error, mount_send_raw, mount_transaction_count, rpc_result, DUMMY_EXECUTOR_ADDR,
    DUMMY_IMPL_ADDR, DUMMY_SETTLEMENT_ADDR, DUMMY_TOKEN_X, DUMMY_TOKEN_Y, HARDHAT_ADDR_0,
    HARDHAT_ADDR_1, HARDHAT_ADDR_2, HARDHAT_KEY_0, HARDHAT_KEY_1, HARDHAT_KEY_2,
};

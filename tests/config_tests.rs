//! Unit tests for configuration management
//!
//! These tests verify configuration parsing, validation, and key loading without
//! requiring external services.

use proxy_sweeper::config::{Config, ConfigError};

fn valid_toml() -> String {
    r#"
        [chain]
        rpc_url = "http://127.0.0.1:8545"
        chain_id = 31337

        [contracts]
        delegate_impl_addr = "0x00000000000000000000000000000000000000aa"
        bulk_executor_addr = "0x00000000000000000000000000000000000000bb"

        [sweep]
        settlement_addr = "0x00000000000000000000000000000000000000cc"
        token_addrs = ["0x00000000000000000000000000000000000000dd"]
    "#
    .to_string()
}

/// Test that a complete TOML config parses and validates
/// Why: verify the happy path including serde defaults for optional fields
#[test]
fn test_valid_config_parses() {
    let config: Config = toml::from_str(&valid_toml()).expect("Should parse");
    config.validate().expect("Should validate");

    assert_eq!(config.chain.chain_id, 31337);
    assert_eq!(config.sweep.proxy_keys_env, "SWEEPER_PROXY_KEYS");
    assert_eq!(config.submitter.private_key_env, "SWEEPER_SUBMITTER_KEY");
    assert_eq!(config.submitter.gas_limit, 3_000_000);
}

/// Test that the [submitter] section can be omitted entirely
/// Why: every submitter field has a default; a minimal config must still load
#[test]
fn test_submitter_section_optional() {
    let config: Config = toml::from_str(&valid_toml()).expect("Should parse");

    assert_eq!(config.submitter.private_key_env, "SWEEPER_SUBMITTER_KEY");
    assert_eq!(config.submitter.gas_limit, 3_000_000);
    assert_eq!(config.submitter.max_fee_per_gas, 30_000_000_000);
    assert_eq!(config.submitter.max_priority_fee_per_gas, 1_000_000_000);
}

/// Test that a malformed settlement address fails validation
/// Why: an invalid destination must abort before any on-chain interaction
#[test]
fn test_invalid_settlement_address_rejected() {
    let mut config: Config = toml::from_str(&valid_toml()).unwrap();
    config.sweep.settlement_addr = "0x1234".to_string();

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidAddress { .. }));
}

/// Test that an empty token list fails validation
/// Why: a sweep with no tokens is a configuration error, not a no-op
#[test]
fn test_empty_token_list_rejected() {
    let mut config: Config = toml::from_str(&valid_toml()).unwrap();
    config.sweep.token_addrs.clear();

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NoTokenAddresses));
}

/// Test that malformed token addresses are dropped, preserving order of the rest
/// Why: one bad token entry must not block sweeping of the others, and scan order
/// is part of the signed commitment
#[test]
fn test_malformed_tokens_dropped_in_order() {
    let mut config: Config = toml::from_str(&valid_toml()).unwrap();
    config.sweep.token_addrs = vec![
        "0x00000000000000000000000000000000000000dd".to_string(),
        "not-an-address".to_string(),
        "0x00000000000000000000000000000000000000ee".to_string(),
    ];

    let tokens = config.valid_token_addrs();
    assert_eq!(
        tokens,
        vec![
            "0x00000000000000000000000000000000000000dd".to_string(),
            "0x00000000000000000000000000000000000000ee".to_string(),
        ]
    );
    config.validate().expect("Two valid tokens remain");
}

/// Test that a missing proxy key environment variable is surfaced as MissingEnv
/// Why: fail-fast startup requires a distinct error for unset key sources
#[test]
fn test_missing_proxy_keys_env() {
    let mut config: Config = toml::from_str(&valid_toml()).unwrap();
    config.sweep.proxy_keys_env = "SWEEPER_TEST_UNSET_ENV_VAR".to_string();

    let err = config.proxy_keys().unwrap_err();
    assert!(matches!(err, ConfigError::MissingEnv(_)));
}

/// Test that comma-separated proxy keys are split and trimmed
/// Why: the key list arrives as one environment variable
#[test]
fn test_proxy_keys_split() {
    let mut config: Config = toml::from_str(&valid_toml()).unwrap();
    config.sweep.proxy_keys_env = "SWEEPER_TEST_PROXY_KEYS_SPLIT".to_string();
    std::env::set_var("SWEEPER_TEST_PROXY_KEYS_SPLIT", "0xaa, 0xbb ,0xcc");

    let keys = config.proxy_keys().unwrap();
    assert_eq!(keys, vec!["0xaa", "0xbb", "0xcc"]);
}

/// Test that the template config round-trips through TOML
/// Why: the template file is the documented starting point for operators
#[test]
fn test_template_serialization() {
    let config = Config::template();
    let toml = toml::to_string(&config).expect("Should serialize to TOML");
    let deserialized: Config = toml::from_str(&toml).expect("Should deserialize from TOML");

    assert_eq!(config.chain.rpc_url, deserialized.chain.rpc_url);
    assert_eq!(config.chain.chain_id, deserialized.chain.chain_id);

    // The template has no tokens configured yet, so it must not validate as-is
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::NoTokenAddresses
    ));
}

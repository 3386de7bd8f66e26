//! EIP-1193 request payloads and response parsing.
//!
//! Injected wallets take `{ method, params }` pairs and answer with JSON
//! values. Quantities are `0x`-prefixed hex without leading zeros, data is
//! `0x`-prefixed hex bytes.

use alloy_primitives::{Address, U256};
use serde_json::{json, Value};

use crate::address::{checksum_address, parse_address};
use crate::error::EthError;

pub const ETH_ACCOUNTS: &str = "eth_accounts";
pub const ETH_REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
pub const ETH_GET_BALANCE: &str = "eth_getBalance";
pub const ETH_CALL: &str = "eth_call";
pub const ETH_SEND_TRANSACTION: &str = "eth_sendTransaction";
pub const WALLET_SWITCH_CHAIN: &str = "wallet_switchEthereumChain";

/// Params for `wallet_switchEthereumChain`.
pub fn switch_chain_params(chain_id: u64) -> Value {
    json!([{ "chainId": format!("{chain_id:#x}") }])
}

/// Params for `eth_getBalance` at the latest block.
pub fn get_balance_params(owner: &Address) -> Value {
    json!([checksum_address(owner), "latest"])
}

/// Params for a read-only `eth_call` at the latest block.
pub fn call_params(to: &Address, data: &[u8]) -> Value {
    json!([{ "to": checksum_address(to), "data": encode_data(data) }, "latest"])
}

/// A transaction handed to the wallet for signing and submission. Gas, fees
/// and nonce are left for the wallet to fill in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
}

impl TransactionRequest {
    /// A plain value transfer.
    pub fn transfer(from: Address, to: Address, value: U256) -> Self {
        Self {
            from,
            to,
            value,
            data: Vec::new(),
        }
    }

    /// A zero-value contract call.
    pub fn call(from: Address, contract: Address, data: Vec<u8>) -> Self {
        Self {
            from,
            to: contract,
            value: U256::ZERO,
            data,
        }
    }

    /// Params for `eth_sendTransaction`.
    pub fn to_params(&self) -> Value {
        let mut tx = json!({
            "from": checksum_address(&self.from),
            "to": checksum_address(&self.to),
            "value": encode_quantity(self.value),
        });
        if !self.data.is_empty() {
            tx["data"] = Value::String(encode_data(&self.data));
        }
        json!([tx])
    }
}

/// `0x`-prefixed hex quantity (`0x0`, `0xde0b6b3a7640000`).
pub fn encode_quantity(value: U256) -> String {
    format!("{value:#x}")
}

/// `0x`-prefixed hex bytes.
pub fn encode_data(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

fn expect_str<'a>(value: &'a Value, what: &str) -> Result<&'a str, EthError> {
    value
        .as_str()
        .ok_or_else(|| EthError::UnexpectedResponse(format!("expected {what} string, got {value}")))
}

fn strip_hex<'a>(s: &'a str, what: &str) -> Result<&'a str, EthError> {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| EthError::UnexpectedResponse(format!("{what} '{s}' is not 0x-prefixed")))
}

/// Parses a hex quantity response (`eth_getBalance`).
pub fn parse_quantity(value: &Value) -> Result<U256, EthError> {
    let digits = strip_hex(expect_str(value, "quantity")?, "quantity")?;
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| EthError::UnexpectedResponse(format!("invalid quantity: {e}")))
}

/// Parses a hex data response (`eth_call`).
pub fn parse_data(value: &Value) -> Result<Vec<u8>, EthError> {
    let digits = strip_hex(expect_str(value, "data")?, "data")?;
    hex::decode(digits).map_err(|e| EthError::UnexpectedResponse(format!("invalid data: {e}")))
}

/// Parses an account list (`eth_accounts`, `eth_requestAccounts`).
pub fn parse_accounts(value: &Value) -> Result<Vec<Address>, EthError> {
    let items = value.as_array().ok_or_else(|| {
        EthError::UnexpectedResponse(format!("expected account list, got {value}"))
    })?;

    items
        .iter()
        .map(|item| parse_address(expect_str(item, "account")?))
        .collect()
}

/// Parses a transaction hash (`eth_sendTransaction`).
pub fn parse_tx_hash(value: &Value) -> Result<String, EthError> {
    let hash = expect_str(value, "transaction hash")?;
    let digits = strip_hex(hash, "transaction hash")?;
    if digits.len() != 64 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EthError::UnexpectedResponse(format!(
            "'{hash}' is not a 32-byte transaction hash"
        )));
    }
    Ok(hash.to_string())
}

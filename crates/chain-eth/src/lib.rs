//! Ethereum/EVM helpers used by the browser-wallet connectors.
//!
//! This crate provides:
//! - EVM network definitions (Ethereum, Polygon and their testnets)
//! - Address parsing with EIP-55 checksum verification
//! - Minimal ABI encoding and ERC-20 calldata (`decimals`, `balanceOf`, `transfer`)
//! - Decimal <-> minor-unit scaling
//! - EIP-1193 request payloads and response parsing

pub mod abi;
pub mod address;
pub mod chains;
pub mod erc20;
pub mod error;
pub mod request;
pub mod units;

pub use alloy_primitives::{Address, U256};
pub use error::EthError;

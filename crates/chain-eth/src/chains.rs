use serde::Serialize;

use crate::error::EthError;

/// Definition of an EVM-compatible network a wallet can be switched to.
#[derive(Debug, Clone, Serialize)]
pub struct EvmChain {
    pub chain_id: u64,
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
    pub explorer_url: &'static str,
    pub is_testnet: bool,
}

impl EvmChain {
    /// The chain ID as the `0x`-prefixed quantity EIP-1193 wallets expect
    /// (`"0x1"` for Ethereum, `"0x89"` for Polygon).
    pub fn hex_chain_id(&self) -> String {
        format!("{:#x}", self.chain_id)
    }
}

/// Ethereum Mainnet (`0x1`).
pub const ETHEREUM: EvmChain = EvmChain {
    chain_id: 1,
    name: "Ethereum",
    symbol: "ETH",
    decimals: 18,
    explorer_url: "https://etherscan.io",
    is_testnet: false,
};

/// Polygon PoS (`0x89`).
pub const POLYGON: EvmChain = EvmChain {
    chain_id: 137,
    name: "Polygon",
    symbol: "MATIC",
    decimals: 18,
    explorer_url: "https://polygonscan.com",
    is_testnet: false,
};

/// Sepolia Testnet.
pub const SEPOLIA: EvmChain = EvmChain {
    chain_id: 11155111,
    name: "Sepolia",
    symbol: "ETH",
    decimals: 18,
    explorer_url: "https://sepolia.etherscan.io",
    is_testnet: true,
};

/// Polygon Amoy Testnet.
pub const POLYGON_AMOY: EvmChain = EvmChain {
    chain_id: 80002,
    name: "Polygon Amoy",
    symbol: "MATIC",
    decimals: 18,
    explorer_url: "https://amoy.polygonscan.com",
    is_testnet: true,
};

const ALL_CHAINS: &[&EvmChain] = &[&ETHEREUM, &POLYGON, &SEPOLIA, &POLYGON_AMOY];

/// Returns the chain definition for a numeric chain ID.
pub fn get_chain(chain_id: u64) -> Option<&'static EvmChain> {
    ALL_CHAINS.iter().find(|c| c.chain_id == chain_id).copied()
}

/// Parses a `0x`-prefixed hex chain ID (`"0x89"`) into its numeric value.
pub fn parse_hex_chain_id(value: &str) -> Result<u64, EthError> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| EthError::UnsupportedChain(value.to_string()))?;

    u64::from_str_radix(digits, 16).map_err(|_| EthError::UnsupportedChain(value.to_string()))
}

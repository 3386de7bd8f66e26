use thiserror::Error;

use crate::types::WalletName;

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("Wallet not installed: {0}")]
    WalletNotInstalled(WalletName),

    #[error("No {0} wallet installed")]
    NoWalletSelected(&'static str),

    #[error("Provider not initialized")]
    ProviderNotInitialized,

    #[error("Signer not initialized")]
    SignerNotInitialized,

    #[error("Could not find public key")]
    PublicKeyUnavailable,

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: String, available: String },

    #[error("Token transfer amount must be greater than zero")]
    ZeroTokenAmount,

    #[error("Token not found: {0}")]
    TokenNotFound(String),

    #[error("Token contract implementation not found: {0}")]
    ContractShape(String),

    #[error("No solana endpoint provided")]
    NoEndpoint,

    #[error("Wallet adapter error: {0}")]
    Adapter(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Selection of {0} superseded by a newer request")]
    SelectionSuperseded(WalletName),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ETH: {0}")]
    Eth(#[from] chain_eth::EthError),

    #[error("SOL: {0}")]
    Sol(#[from] chain_sol::SolError),
}

impl From<reqwest::Error> for ConnectError {
    fn from(e: reqwest::Error) -> Self {
        ConnectError::Rpc(e.to_string())
    }
}

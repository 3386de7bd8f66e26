//! EVM wallet connection over EIP-1193.

mod adapter;
mod contract;
mod facade;
mod manager;
mod provider;

pub use adapter::EvmAdapter;
pub use contract::Erc20;
pub use facade::{ChainFacade, Ethereum, Polygon};
pub use manager::{EvmBalanceParams, EvmChainConfig, EvmManager, EvmSendParams};
pub use provider::{BrowserProvider, JsonRpcSigner};

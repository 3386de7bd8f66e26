//! Solana wallet connection through the wallet's own adapter.

mod adapter;
mod http;
mod manager;
mod rpc;

pub use adapter::{Commitment, SendOptions, SolAdapter};
pub use http::HttpSolanaRpc;
pub use manager::{SolConfig, SolManager};
pub use rpc::{AccountInfo, SolanaRpc, TokenAccount};

//! Connect to browser-injected wallets (MetaMask, Phantom, NuFi, Exodus) on
//! Ethereum, Polygon and Solana.
//!
//! Each chain gets a connection manager that discovers installed wallets,
//! remembers the last selection, lazily sets up the wallet session and
//! exposes `get_address`, `get_balance` and `send`:
//!
//! - [`evm::EvmManager`] drives any EVM chain through an EIP-1193 adapter;
//!   [`evm::ChainFacade`] pins it to Ethereum or Polygon.
//! - [`sol::SolManager`] drives Solana through the wallet's adapter and a
//!   JSON-RPC endpoint.
//!
//! Managers share observable state through an explicitly owned
//! [`state::StateHub`], keyed by chain.

pub mod catalogue;
pub mod config;
pub mod error;
pub mod evm;
pub mod scope;
pub mod sol;
pub mod state;
pub mod storage;
pub mod types;

pub use config::ConnectorConfig;
pub use error::ConnectError;
pub use scope::{GlobalScope, InjectedScope};
pub use state::{ChainState, StateHub};
pub use storage::{FileStore, MemoryStore, SelectionStore};
pub use types::{Balance, BalanceParams, SendParams, WalletEntry, WalletName, WalletState};

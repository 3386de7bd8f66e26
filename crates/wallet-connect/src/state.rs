//! Observable per-chain connection state.
//!
//! One [`ChainState`] exists per chain. EVM managers key it by storage key
//! and chain id, so Ethereum and Polygon keep separate wallet lists and
//! sessions while sharing the persisted selection. Consumers read snapshots
//! or subscribe to a `watch` channel for changes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::watch;

use crate::types::{WalletEntry, WalletState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainState {
    pub wallets: Vec<WalletEntry>,
    pub wallet: Option<WalletState>,
    /// True until the first `initialize` settles.
    pub initializing: bool,
    /// Message of the last failure swallowed by `initialize`.
    pub last_error: Option<String>,
}

impl Default for ChainState {
    fn default() -> Self {
        Self {
            wallets: Vec::new(),
            wallet: None,
            initializing: true,
            last_error: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct StateHub {
    channels: Mutex<HashMap<String, Arc<watch::Sender<ChainState>>>>,
}

impl StateHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn sender(&self, key: &str) -> Arc<watch::Sender<ChainState>> {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        channels
            .entry(key.to_string())
            .or_insert_with(|| {
                let (tx, _rx) = watch::channel(ChainState::default());
                Arc::new(tx)
            })
            .clone()
    }

    pub fn snapshot(&self, key: &str) -> ChainState {
        self.sender(key).borrow().clone()
    }

    pub fn subscribe(&self, key: &str) -> watch::Receiver<ChainState> {
        self.sender(key).subscribe()
    }

    /// Applies `f` and notifies subscribers. Works with no subscribers.
    pub fn update(&self, key: &str, f: impl FnOnce(&mut ChainState)) {
        self.sender(key).send_modify(f);
    }
}

//! Ethereum and Polygon: the EVM manager with the chain id pinned.

use std::sync::Arc;

use alloy_primitives::U256;
use tokio::sync::watch;

use super::adapter::EvmAdapter;
use super::manager::{EvmBalanceParams, EvmChainConfig, EvmManager, EvmSendParams};
use crate::config::ConnectorConfig;
use crate::error::ConnectError;
use crate::scope::GlobalScope;
use crate::state::{ChainState, StateHub};
use crate::storage::SelectionStore;
use crate::types::{Balance, BalanceParams, SendParams, WalletEntry, WalletName, WalletState};

pub struct ChainFacade {
    manager: EvmManager,
}

pub type Ethereum = ChainFacade;
pub type Polygon = ChainFacade;

impl ChainFacade {
    pub fn ethereum(
        config: &ConnectorConfig,
        state: Arc<StateHub>,
        store: Arc<dyn SelectionStore>,
        scope: Arc<dyn GlobalScope>,
    ) -> Self {
        Self::from_config(EvmChainConfig::ethereum(config), state, store, scope)
    }

    pub fn polygon(
        config: &ConnectorConfig,
        state: Arc<StateHub>,
        store: Arc<dyn SelectionStore>,
        scope: Arc<dyn GlobalScope>,
    ) -> Self {
        Self::from_config(EvmChainConfig::polygon(config), state, store, scope)
    }

    pub fn from_config(
        config: EvmChainConfig,
        state: Arc<StateHub>,
        store: Arc<dyn SelectionStore>,
        scope: Arc<dyn GlobalScope>,
    ) -> Self {
        Self {
            manager: EvmManager::new(config, state, store, scope),
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.manager.chain().chain_id
    }

    pub fn manager(&self) -> &EvmManager {
        &self.manager
    }

    pub async fn mount(&self) {
        self.manager.mount().await
    }

    pub async fn initialize(&self) {
        self.manager.initialize().await
    }

    pub async fn select(&self, name: WalletName) -> Result<Arc<dyn EvmAdapter>, ConnectError> {
        self.manager.select(name).await
    }

    pub async fn get_address(&self) -> Result<String, ConnectError> {
        self.manager.get_address(self.chain_id()).await
    }

    pub async fn get_balance(&self, params: BalanceParams) -> Result<Balance<U256>, ConnectError> {
        self.manager
            .get_balance(EvmBalanceParams::new(params, self.chain_id()))
            .await
    }

    pub async fn send(&self, params: SendParams) -> Result<String, ConnectError> {
        self.manager
            .send(EvmSendParams::new(params, self.chain_id()))
            .await
    }

    pub fn disconnect(&self) {
        self.manager.disconnect()
    }

    pub fn wallet(&self) -> Option<WalletState> {
        self.manager.wallet()
    }

    pub fn wallets(&self) -> Vec<WalletEntry> {
        self.manager.wallets()
    }

    pub fn initializing(&self) -> bool {
        self.manager.initializing()
    }

    pub fn last_error(&self) -> Option<String> {
        self.manager.last_error()
    }

    pub fn subscribe(&self) -> watch::Receiver<ChainState> {
        self.manager.subscribe()
    }
}

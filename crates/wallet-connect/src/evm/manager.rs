//! One EVM connection engine, parameterised by chain.
//!
//! The manager probes the wallets supported on its chain, restores or
//! prompts for a selection, and keeps the provider and signer for the
//! selected wallet. Every operation that talks to the chain first asks the
//! wallet to switch to the manager's network.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use alloy_primitives::{Address, U256};
use chain_eth::address::{checksum_address, parse_address};
use chain_eth::chains::{EvmChain, ETHEREUM, POLYGON};
use chain_eth::request::TransactionRequest;
use chain_eth::units::{format_units, parse_units, ETHER_DECIMALS};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::adapter::EvmAdapter;
use super::contract::Erc20;
use super::provider::{BrowserProvider, JsonRpcSigner};
use crate::catalogue::{WalletSpec, ETHEREUM_WALLETS, EVM_WALLETS, POLYGON_WALLETS};
use crate::config::ConnectorConfig;
use crate::error::ConnectError;
use crate::scope::{probe_evm, GlobalScope, WalletDescriptor};
use crate::state::{ChainState, StateHub};
use crate::storage::SelectionStore;
use crate::types::{Balance, BalanceParams, SendParams, WalletEntry, WalletName, WalletState};

/// Which chain a manager drives and which wallets it offers.
#[derive(Debug, Clone)]
pub struct EvmChainConfig {
    pub chain: &'static EvmChain,
    pub storage_key: String,
    pub wallets: &'static [WalletSpec],
    pub auto_connect: bool,
}

impl EvmChainConfig {
    pub fn ethereum(config: &ConnectorConfig) -> Self {
        Self::with_wallets(&ETHEREUM, ETHEREUM_WALLETS, config)
    }

    pub fn polygon(config: &ConnectorConfig) -> Self {
        Self::with_wallets(&POLYGON, POLYGON_WALLETS, config)
    }

    /// Any other EVM network, offering every EVM wallet.
    pub fn custom(chain: &'static EvmChain, config: &ConnectorConfig) -> Self {
        Self::with_wallets(chain, EVM_WALLETS, config)
    }

    fn with_wallets(
        chain: &'static EvmChain,
        wallets: &'static [WalletSpec],
        config: &ConnectorConfig,
    ) -> Self {
        Self {
            chain,
            storage_key: config.evm_storage_key.clone(),
            wallets,
            auto_connect: config.auto_connect,
        }
    }

    /// Key of this chain's [`ChainState`]. Chains sharing a storage key
    /// still get separate state, since their wallet lists and sessions
    /// differ.
    pub fn state_key(&self) -> String {
        format!("{}:{}", self.storage_key, self.chain.chain_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmBalanceParams {
    pub token: Option<String>,
    pub chain_id: u64,
    pub formatted: bool,
}

impl EvmBalanceParams {
    pub fn new(params: BalanceParams, chain_id: u64) -> Self {
        Self {
            token: params.token,
            chain_id,
            formatted: params.formatted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvmSendParams {
    pub to: String,
    pub amount: String,
    pub token: Option<String>,
    pub chain_id: u64,
}

impl EvmSendParams {
    pub fn new(params: SendParams, chain_id: u64) -> Self {
        Self {
            to: params.to,
            amount: params.amount,
            token: params.token,
            chain_id,
        }
    }
}

#[derive(Default)]
struct Session {
    adapter: Option<Arc<dyn EvmAdapter>>,
    provider: Option<BrowserProvider>,
    signer: Option<JsonRpcSigner>,
}

pub struct EvmManager {
    config: EvmChainConfig,
    state_key: String,
    state: Arc<StateHub>,
    store: Arc<dyn SelectionStore>,
    scope: Arc<dyn GlobalScope>,
    wallets: RwLock<Vec<WalletDescriptor<dyn EvmAdapter>>>,
    session: Mutex<Session>,
    generation: AtomicU64,
}

impl EvmManager {
    /// Creates the manager and probes its wallets.
    pub fn new(
        config: EvmChainConfig,
        state: Arc<StateHub>,
        store: Arc<dyn SelectionStore>,
        scope: Arc<dyn GlobalScope>,
    ) -> Self {
        let manager = Self {
            state_key: config.state_key(),
            config,
            state,
            store,
            scope,
            wallets: RwLock::new(Vec::new()),
            session: Mutex::new(Session::default()),
            generation: AtomicU64::new(0),
        };
        manager.discover();
        manager
    }

    pub fn chain(&self) -> &'static EvmChain {
        self.config.chain
    }

    pub fn storage_key(&self) -> &str {
        &self.config.storage_key
    }

    pub fn state_key(&self) -> &str {
        &self.state_key
    }

    pub fn supports(&self, name: WalletName) -> bool {
        self.config.wallets.iter().any(|w| w.name == name)
    }

    /// Re-probes the scope and publishes the wallet list.
    pub fn discover(&self) {
        let found = probe_evm(self.scope.as_ref(), self.config.wallets);
        let entries: Vec<WalletEntry> = found.iter().map(WalletDescriptor::entry).collect();
        *self.wallets.write().unwrap_or_else(PoisonError::into_inner) = found;
        self.state
            .update(&self.state_key, |s| s.wallets = entries);
    }

    /// Probes wallets, then restores the persisted selection when
    /// auto-connect is on and nothing is connected or connecting.
    pub async fn mount(&self) {
        self.discover();
        if self.auto_connect_due() {
            self.initialize().await;
        } else {
            self.state
                .update(&self.state_key, |s| s.initializing = false);
        }
    }

    fn auto_connect_due(&self) -> bool {
        if !self.config.auto_connect {
            return false;
        }
        let state = self.state.snapshot(&self.state_key);
        !state.wallets.is_empty() && !state.wallet.is_some_and(|w| w.is_busy())
    }

    /// Restores the persisted wallet. Never fails: the reason for a failed
    /// restore is kept in `last_error`.
    pub async fn initialize(&self) {
        let key = self.state_key.as_str();
        self.state.update(key, |s| s.initializing = true);

        match self.get_adapter().await {
            Ok(_) => self.state.update(key, |s| {
                s.initializing = false;
                s.last_error = None;
            }),
            Err(e) => {
                warn!(chain = %key, error = %e, "evm auto-connect failed");
                let message = e.to_string();
                self.state.update(key, |s| {
                    s.initializing = false;
                    s.last_error = Some(message);
                });
            }
        }
    }

    fn descriptor(&self, name: WalletName) -> Option<WalletDescriptor<dyn EvmAdapter>> {
        self.wallets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|w| w.name == name)
            .cloned()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Connects `name`: requests accounts, builds provider and signer, and
    /// persists the choice. A newer `select` or `disconnect` supersedes this
    /// one, which then fails with [`ConnectError::SelectionSuperseded`]
    /// without touching state.
    pub async fn select(&self, name: WalletName) -> Result<Arc<dyn EvmAdapter>, ConnectError> {
        let key = self.state_key.as_str();
        let descriptor = self
            .descriptor(name)
            .ok_or_else(|| ConnectError::WalletNotFound(name.to_string()))?;
        let adapter = descriptor
            .adapter
            .ok_or(ConnectError::WalletNotInstalled(name))?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
            *session = Session {
                adapter: Some(adapter.clone()),
                provider: None,
                signer: None,
            };
        }
        self.state
            .update(key, |s| s.wallet = Some(WalletState::connecting(name)));
        debug!(wallet = %name, chain = %key, generation, "selecting evm wallet");

        let setup = Self::setup(adapter.clone()).await;

        if !self.is_current(generation) {
            warn!(wallet = %name, chain = %key, "discarding superseded evm selection");
            return Err(ConnectError::SelectionSuperseded(name));
        }

        let (provider, signer) = match setup {
            Ok(handles) => handles,
            Err(e) => {
                self.reset();
                return Err(e);
            }
        };

        if let Err(e) = self.store.set(&self.config.storage_key, name.as_str()) {
            self.reset();
            return Err(e);
        }

        let address = signer.address();
        {
            let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
            session.provider = Some(provider);
            session.signer = Some(signer);
        }
        self.state
            .update(key, |s| s.wallet = Some(WalletState::connected(name)));
        info!(wallet = %name, chain = %key, address = %address, "evm wallet connected");
        Ok(adapter)
    }

    async fn setup(
        adapter: Arc<dyn EvmAdapter>,
    ) -> Result<(BrowserProvider, JsonRpcSigner), ConnectError> {
        let provider = BrowserProvider::new(adapter);
        let signer = provider.get_signer().await?;
        if !provider.is_ready().await? {
            debug!(
                address = %signer.address(),
                connected = provider.is_connected(),
                "provider not ready yet"
            );
        }
        Ok((provider, signer))
    }

    fn reset(&self) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Session::default();
        self.state
            .update(&self.state_key, |s| s.wallet = None);
    }

    /// The active adapter, restoring the persisted selection if there is none.
    pub async fn get_adapter(&self) -> Result<Arc<dyn EvmAdapter>, ConnectError> {
        let current = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .adapter
            .clone();
        if let Some(adapter) = current {
            return Ok(adapter);
        }

        let stored = self
            .store
            .get(&self.config.storage_key)?
            .ok_or(ConnectError::NoWalletSelected("Evm"))?;
        let name: WalletName = stored.parse()?;
        self.select(name).await
    }

    fn handles(&self) -> Result<(JsonRpcSigner, BrowserProvider), ConnectError> {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let signer = session
            .signer
            .clone()
            .ok_or(ConnectError::SignerNotInitialized)?;
        let provider = session
            .provider
            .clone()
            .ok_or(ConnectError::ProviderNotInitialized)?;
        Ok((signer, provider))
    }

    pub async fn get_address(&self, chain_id: u64) -> Result<String, ConnectError> {
        let (signer, provider) = self.handles()?;
        provider.switch_chain(chain_id).await?;
        Ok(checksum_address(&signer.address()))
    }

    pub async fn get_balance(&self, params: EvmBalanceParams) -> Result<Balance<U256>, ConnectError> {
        let (signer, provider) = self.handles()?;
        provider.switch_chain(params.chain_id).await?;

        let (raw, decimals) = match &params.token {
            Some(token) => {
                let contract = Erc20::new(parse_address(token)?, signer.clone());
                let decimals = contract.decimals().await?;
                (contract.balance_of(&signer.address()).await?, decimals)
            }
            None => (provider.get_balance(&signer.address()).await?, ETHER_DECIMALS),
        };

        Ok(if params.formatted {
            Balance::Formatted(format_units(raw, decimals)?)
        } else {
            Balance::Raw(raw)
        })
    }

    /// Transfers native currency or an ERC-20 token; returns the tx hash.
    pub async fn send(&self, params: EvmSendParams) -> Result<String, ConnectError> {
        let (signer, provider) = self.handles()?;
        provider.switch_chain(params.chain_id).await?;
        let to = parse_address(&params.to)?;
        let from = signer.address();

        match &params.token {
            Some(token) => {
                let contract = Erc20::new(parse_address(token)?, signer.clone());
                let decimals = contract.decimals().await?;
                let balance = contract.balance_of(&from).await?;
                let amount = parse_units(&params.amount, decimals)?;
                ensure_covered(amount, balance, decimals, &params.amount)?;
                contract.transfer(&to, amount).await
            }
            None => {
                let balance = provider.get_balance(&from).await?;
                let value = parse_units(&params.amount, ETHER_DECIMALS)?;
                ensure_covered(value, balance, ETHER_DECIMALS, &params.amount)?;
                debug!(from = %from, to = %to, value = %value, "native transfer");
                signer
                    .send_transaction(&TransactionRequest::transfer(from, to, value))
                    .await
            }
        }
    }

    /// Drops the session and connection state. Cancels any in-flight
    /// selection; the persisted choice is kept.
    pub fn disconnect(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.reset();
        debug!(chain = %self.state_key, "evm wallet disconnected");
    }

    pub fn signer_address(&self) -> Option<Address> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .signer
            .as_ref()
            .map(JsonRpcSigner::address)
    }

    pub fn wallet(&self) -> Option<WalletState> {
        self.state.snapshot(&self.state_key).wallet
    }

    pub fn wallets(&self) -> Vec<WalletEntry> {
        self.state.snapshot(&self.state_key).wallets
    }

    pub fn initializing(&self) -> bool {
        self.state.snapshot(&self.state_key).initializing
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.snapshot(&self.state_key).last_error
    }

    pub fn subscribe(&self) -> watch::Receiver<ChainState> {
        self.state.subscribe(&self.state_key)
    }
}

fn ensure_covered(
    amount: U256,
    balance: U256,
    decimals: u8,
    requested: &str,
) -> Result<(), ConnectError> {
    if amount > balance {
        return Err(ConnectError::InsufficientBalance {
            requested: requested.to_string(),
            available: format_units(balance, decimals)?,
        });
    }
    Ok(())
}

//! Solana connection engine.
//!
//! Unlike the EVM side there is no provider/signer pair: the wallet adapter
//! connects, signs and submits by itself, and chain reads go through a
//! [`SolanaRpc`] endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chain_sol::units::{format_amount, parse_amount};
use chain_sol::{
    build_create_associated_token_account, build_spl_transfer, build_system_transfer,
    derive_associated_token_address, format_lamports, parse_sol, Pubkey, Transaction,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::adapter::{SendOptions, SolAdapter};
use super::http::HttpSolanaRpc;
use super::rpc::{SolanaRpc, TokenAccount};
use crate::catalogue::{WalletSpec, SOLANA_WALLETS};
use crate::config::ConnectorConfig;
use crate::error::ConnectError;
use crate::scope::{probe_sol, GlobalScope, WalletDescriptor};
use crate::state::{ChainState, StateHub};
use crate::storage::SelectionStore;
use crate::types::{Balance, BalanceParams, SendParams, WalletEntry, WalletName, WalletState};

#[derive(Debug, Clone)]
pub struct SolConfig {
    pub storage_key: String,
    pub wallets: &'static [WalletSpec],
    pub auto_connect: bool,
}

impl From<&ConnectorConfig> for SolConfig {
    fn from(config: &ConnectorConfig) -> Self {
        Self {
            storage_key: config.sol_storage_key.clone(),
            wallets: SOLANA_WALLETS,
            auto_connect: config.auto_connect,
        }
    }
}

pub struct SolManager {
    config: SolConfig,
    state: Arc<StateHub>,
    store: Arc<dyn SelectionStore>,
    scope: Arc<dyn GlobalScope>,
    rpc: Arc<dyn SolanaRpc>,
    wallets: RwLock<Vec<WalletDescriptor<dyn SolAdapter>>>,
    adapter: Mutex<Option<Arc<dyn SolAdapter>>>,
    generation: AtomicU64,
}

impl SolManager {
    /// Creates a manager talking to `config.solana_endpoint`; fails with
    /// [`ConnectError::NoEndpoint`] when none is configured.
    pub fn new(
        config: &ConnectorConfig,
        state: Arc<StateHub>,
        store: Arc<dyn SelectionStore>,
        scope: Arc<dyn GlobalScope>,
    ) -> Result<Self, ConnectError> {
        let rpc = HttpSolanaRpc::from_config(config)?;
        Ok(Self::with_rpc(
            SolConfig::from(config),
            state,
            store,
            scope,
            Arc::new(rpc),
        ))
    }

    pub fn with_rpc(
        config: SolConfig,
        state: Arc<StateHub>,
        store: Arc<dyn SelectionStore>,
        scope: Arc<dyn GlobalScope>,
        rpc: Arc<dyn SolanaRpc>,
    ) -> Self {
        let manager = Self {
            config,
            state,
            store,
            scope,
            rpc,
            wallets: RwLock::new(Vec::new()),
            adapter: Mutex::new(None),
            generation: AtomicU64::new(0),
        };
        manager.discover();
        manager
    }

    pub fn storage_key(&self) -> &str {
        &self.config.storage_key
    }

    pub fn discover(&self) {
        let found = probe_sol(self.scope.as_ref(), self.config.wallets);
        let entries: Vec<WalletEntry> = found.iter().map(WalletDescriptor::entry).collect();
        *self.wallets.write().unwrap_or_else(PoisonError::into_inner) = found;
        self.state
            .update(&self.config.storage_key, |s| s.wallets = entries);
    }

    pub async fn mount(&self) {
        self.discover();
        if self.auto_connect_due() {
            self.initialize().await;
        } else {
            self.state
                .update(&self.config.storage_key, |s| s.initializing = false);
        }
    }

    fn auto_connect_due(&self) -> bool {
        if !self.config.auto_connect {
            return false;
        }
        let state = self.state.snapshot(&self.config.storage_key);
        !state.wallets.is_empty() && !state.wallet.is_some_and(|w| w.is_busy())
    }

    pub async fn initialize(&self) {
        let key = self.config.storage_key.as_str();
        self.state.update(key, |s| s.initializing = true);

        match self.get_adapter().await {
            Ok(_) => self.state.update(key, |s| {
                s.initializing = false;
                s.last_error = None;
            }),
            Err(e) => {
                warn!(chain = %key, error = %e, "solana auto-connect failed");
                let message = e.to_string();
                self.state.update(key, |s| {
                    s.initializing = false;
                    s.last_error = Some(message);
                });
            }
        }
    }

    fn descriptor(&self, name: WalletName) -> Option<WalletDescriptor<dyn SolAdapter>> {
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

    fn set_adapter(&self, adapter: Option<Arc<dyn SolAdapter>>) {
        *self.adapter.lock().unwrap_or_else(PoisonError::into_inner) = adapter;
    }

    fn current_adapter(&self) -> Option<Arc<dyn SolAdapter>> {
        self.adapter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Connects `name` unless its adapter reports it is already connected,
    /// then persists the choice. Superseded selections fail with
    /// [`ConnectError::SelectionSuperseded`] and write nothing.
    pub async fn select(&self, name: WalletName) -> Result<Arc<dyn SolAdapter>, ConnectError> {
        let key = self.config.storage_key.as_str();
        let descriptor = self
            .descriptor(name)
            .ok_or_else(|| ConnectError::WalletNotFound(name.to_string()))?;
        let adapter = descriptor
            .adapter
            .ok_or(ConnectError::WalletNotInstalled(name))?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_adapter(Some(adapter.clone()));
        self.state
            .update(key, |s| s.wallet = Some(WalletState::connecting(name)));
        debug!(wallet = %name, chain = %key, generation, "selecting solana wallet");

        let connected = if adapter.is_connected() {
            Ok(())
        } else {
            adapter.connect().await
        };

        if !self.is_current(generation) {
            warn!(wallet = %name, chain = %key, "discarding superseded solana selection");
            return Err(ConnectError::SelectionSuperseded(name));
        }

        if let Err(e) = connected.and_then(|()| self.store.set(key, name.as_str())) {
            self.set_adapter(None);
            self.state.update(key, |s| s.wallet = None);
            return Err(e);
        }

        self.state
            .update(key, |s| s.wallet = Some(WalletState::connected(name)));
        info!(
            wallet = %name,
            chain = %key,
            public_key = ?adapter.public_key(),
            "solana wallet connected"
        );
        Ok(adapter)
    }

    pub async fn get_adapter(&self) -> Result<Arc<dyn SolAdapter>, ConnectError> {
        if let Some(adapter) = self.current_adapter() {
            return Ok(adapter);
        }

        let stored = self
            .store
            .get(&self.config.storage_key)?
            .ok_or(ConnectError::NoWalletSelected("Solana"))?;
        let name: WalletName = stored.parse()?;
        self.select(name).await
    }

    pub async fn get_public_key(&self) -> Result<Pubkey, ConnectError> {
        let adapter = self.get_adapter().await?;
        if !adapter.is_connected() {
            return Err(ConnectError::PublicKeyUnavailable);
        }
        adapter.public_key().ok_or(ConnectError::PublicKeyUnavailable)
    }

    /// Fills in the fee payer (the wallet) and a recent blockhash where
    /// missing.
    pub async fn prepare_transaction(
        &self,
        mut tx: Transaction,
        options: &SendOptions,
    ) -> Result<Transaction, ConnectError> {
        if tx.fee_payer.is_none() {
            tx.fee_payer = Some(self.get_public_key().await?);
        }
        if tx.recent_blockhash.is_none() {
            let blockhash = self
                .rpc
                .get_latest_blockhash(options.preflight_commitment, options.min_context_slot)
                .await?;
            tx.recent_blockhash = Some(blockhash);
        }
        Ok(tx)
    }

    pub async fn get_address(&self) -> Result<String, ConnectError> {
        Ok(self.get_public_key().await?.to_string())
    }

    /// The wallet's token account for `mint`, if it has one.
    pub async fn get_token_account(&self, mint: &Pubkey) -> Result<Option<TokenAccount>, ConnectError> {
        let owner = self.get_public_key().await?;
        let accounts = self
            .rpc
            .get_parsed_token_accounts_by_owner(&owner, mint)
            .await?;
        Ok(accounts.into_iter().next())
    }

    pub async fn get_balance(&self, params: BalanceParams) -> Result<Balance<u64>, ConnectError> {
        let (raw, formatted) = match &params.token {
            Some(mint) => {
                let mint: Pubkey = mint.parse()?;
                match self.get_token_account(&mint).await? {
                    Some(account) => (
                        account.amount,
                        format_amount(account.amount, account.decimals),
                    ),
                    None => (0, "0".to_string()),
                }
            }
            None => {
                let owner = self.get_public_key().await?;
                let lamports = self.rpc.get_balance(&owner).await?;
                (lamports, format_lamports(lamports))
            }
        };

        Ok(if params.formatted {
            Balance::Formatted(formatted)
        } else {
            Balance::Raw(raw)
        })
    }

    /// Transfers SOL or an SPL token; returns the transaction signature.
    pub async fn send(&self, params: SendParams) -> Result<String, ConnectError> {
        let adapter = self.get_adapter().await?;
        let owner = self.get_public_key().await?;
        let recipient: Pubkey = params.to.parse()?;

        let tx = match &params.token {
            Some(mint_str) => {
                let mint: Pubkey = mint_str.parse()?;
                let source = self
                    .get_token_account(&mint)
                    .await?
                    .ok_or_else(|| ConnectError::TokenNotFound(mint_str.clone()))?;
                let amount = parse_amount(&params.amount, source.decimals)?;
                if amount == 0 {
                    return Err(ConnectError::ZeroTokenAmount);
                }
                if amount > source.amount {
                    return Err(ConnectError::InsufficientBalance {
                        requested: params.amount.clone(),
                        available: format_amount(source.amount, source.decimals),
                    });
                }

                let destination = derive_associated_token_address(&recipient, &source.mint)?;
                let mut instructions = Vec::with_capacity(2);
                if self.rpc.get_account_info(&destination).await?.is_none() {
                    debug!(%destination, owner = %recipient, "creating recipient token account");
                    instructions.push(build_create_associated_token_account(
                        &owner,
                        &destination,
                        &recipient,
                        &source.mint,
                    ));
                }
                instructions.push(build_spl_transfer(
                    &source.pubkey,
                    &destination,
                    &owner,
                    amount,
                )?);
                Transaction::new().add_all(instructions)
            }
            None => {
                let balance = self.rpc.get_balance(&owner).await?;
                let lamports = parse_sol(&params.amount)?;
                if lamports > balance {
                    return Err(ConnectError::InsufficientBalance {
                        requested: params.amount.clone(),
                        available: format_lamports(balance),
                    });
                }
                Transaction::new().add(build_system_transfer(&owner, &recipient, lamports))
            }
        };

        let options = SendOptions::default();
        let tx = self.prepare_transaction(tx, &options).await?;
        let signature = adapter.sign_and_send_transaction(&tx, &options).await?;
        info!(%signature, to = %recipient, "solana transfer submitted");
        Ok(signature)
    }

    /// Disconnects the wallet and clears connection state. The persisted
    /// choice is kept.
    pub async fn disconnect(&self) -> Result<(), ConnectError> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let adapter = self
            .adapter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.state
            .update(&self.config.storage_key, |s| s.wallet = None);
        if let Some(adapter) = adapter {
            adapter.disconnect().await?;
        }
        Ok(())
    }

    pub fn wallet(&self) -> Option<WalletState> {
        self.state.snapshot(&self.config.storage_key).wallet
    }

    pub fn wallets(&self) -> Vec<WalletEntry> {
        self.state.snapshot(&self.config.storage_key).wallets
    }

    pub fn initializing(&self) -> bool {
        self.state.snapshot(&self.config.storage_key).initializing
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.snapshot(&self.config.storage_key).last_error
    }

    pub fn subscribe(&self) -> watch::Receiver<ChainState> {
        self.state.subscribe(&self.config.storage_key)
    }
}

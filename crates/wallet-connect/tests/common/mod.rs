#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use chain_eth::address::checksum_address;
use chain_sol::{Blockhash, Pubkey, Transaction};
use serde_json::{json, Value};
use tokio::sync::Notify;
use wallet_connect::evm::EvmAdapter;
use wallet_connect::sol::{AccountInfo, Commitment, SendOptions, SolAdapter, SolanaRpc, TokenAccount};
use wallet_connect::{ConnectError, InjectedScope, MemoryStore, StateHub};

pub const TX_HASH: &str = "0xabababababababababababababababababababababababababababababababab";
pub const SIGNATURE: &str =
    "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW";

pub fn ether(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
}

pub fn word(value: U256) -> String {
    let hex: String = value
        .to_be_bytes::<32>()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();
    format!("0x{hex}")
}

/// Shared collaborators for one simulated page.
pub struct Page {
    pub state: Arc<StateHub>,
    pub store: Arc<MemoryStore>,
    pub scope: Arc<InjectedScope>,
}

impl Page {
    pub fn new() -> Self {
        Self {
            state: Arc::new(StateHub::new()),
            store: Arc::new(MemoryStore::new()),
            scope: Arc::new(InjectedScope::new()),
        }
    }

    /// A reload: same storage and extensions, fresh in-memory state.
    pub fn reload(&self) -> Self {
        Self {
            state: Arc::new(StateHub::new()),
            store: self.store.clone(),
            scope: self.scope.clone(),
        }
    }
}

pub struct MockToken {
    pub address: Address,
    pub decimals: u8,
    pub balance: U256,
}

/// An EIP-1193 wallet holding one account.
pub struct MockEvm {
    account: Address,
    balance: U256,
    token: Option<MockToken>,
    gate: Option<Arc<Notify>>,
    reject: bool,
    offline: bool,
    methods: Mutex<Vec<String>>,
    sent: Mutex<Vec<Value>>,
    chain_ids: Mutex<Vec<String>>,
}

impl MockEvm {
    pub fn new(account: Address) -> Self {
        Self {
            account,
            balance: U256::ZERO,
            token: None,
            gate: None,
            reject: false,
            offline: false,
            methods: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            chain_ids: Mutex::new(Vec::new()),
        }
    }

    pub fn with_balance(mut self, wei: U256) -> Self {
        self.balance = wei;
        self
    }

    pub fn with_token(mut self, address: Address, decimals: u8, balance: U256) -> Self {
        self.token = Some(MockToken {
            address,
            decimals,
            balance,
        });
        self
    }

    /// Holds `eth_requestAccounts` until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    /// Reports itself as not connected to its network.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn methods(&self) -> Vec<String> {
        self.methods.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.methods().iter().filter(|m| *m == method).count()
    }

    pub fn sent(&self) -> Vec<Value> {
        self.sent.lock().unwrap().clone()
    }

    pub fn chain_ids(&self) -> Vec<String> {
        self.chain_ids.lock().unwrap().clone()
    }

    fn eth_call(&self, params: &Value) -> Value {
        let to = params[0]["to"].as_str().unwrap_or_default();
        let data = params[0]["data"].as_str().unwrap_or_default();
        let Some(token) = &self.token else {
            return json!("0x");
        };
        if !to.eq_ignore_ascii_case(&checksum_address(&token.address)) {
            return json!("0x");
        }
        if data.starts_with("0x313ce567") {
            json!(word(U256::from(token.decimals)))
        } else if data.starts_with("0x70a08231") {
            json!(word(token.balance))
        } else {
            json!("0x")
        }
    }
}

#[async_trait]
impl EvmAdapter for MockEvm {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ConnectError> {
        self.methods.lock().unwrap().push(method.to_string());
        match method {
            "eth_requestAccounts" => {
                if let Some(gate) = &self.gate {
                    gate.notified().await;
                }
                if self.reject {
                    return Err(ConnectError::Adapter("User rejected the request.".into()));
                }
                Ok(json!([checksum_address(&self.account)]))
            }
            "eth_accounts" => Ok(json!([checksum_address(&self.account)])),
            "wallet_switchEthereumChain" => {
                let id = params[0]["chainId"].as_str().unwrap_or_default().to_string();
                self.chain_ids.lock().unwrap().push(id);
                Ok(Value::Null)
            }
            "eth_getBalance" => Ok(json!(format!("{:#x}", self.balance))),
            "eth_call" => Ok(self.eth_call(&params)),
            "eth_sendTransaction" => {
                self.sent.lock().unwrap().push(params[0].clone());
                Ok(json!(TX_HASH))
            }
            other => Err(ConnectError::Adapter(format!("unsupported method {other}"))),
        }
    }

    fn is_connected(&self) -> bool {
        !self.offline
    }
}

/// A Solana wallet adapter with a fixed key.
pub struct MockSol {
    key: Option<Pubkey>,
    connected: AtomicBool,
    connects: AtomicUsize,
    gate: Option<Arc<Notify>>,
    reject: bool,
    sent: Mutex<Vec<Transaction>>,
}

impl MockSol {
    pub fn new(key: Pubkey) -> Self {
        Self {
            key: Some(key),
            connected: AtomicBool::new(false),
            connects: AtomicUsize::new(0),
            gate: None,
            reject: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Connects but never exposes a public key.
    pub fn keyless() -> Self {
        Self {
            key: None,
            ..Self::new(Pubkey::default())
        }
    }

    pub fn already_connected(self) -> Self {
        self.connected.store(true, Ordering::SeqCst);
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    pub fn connected_now(&self) -> bool {
        self.is_connected()
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SolAdapter for MockSol {
    async fn connect(&self) -> Result<(), ConnectError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.reject {
            return Err(ConnectError::Adapter("User rejected the request.".into()));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), ConnectError> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn public_key(&self) -> Option<Pubkey> {
        if self.is_connected() {
            self.key
        } else {
            None
        }
    }

    async fn sign_transaction(&self, tx: &Transaction) -> Result<Vec<u8>, ConnectError> {
        Ok(tx.serialize_unsigned()?)
    }

    async fn sign_all_transactions(
        &self,
        txs: &[Transaction],
    ) -> Result<Vec<Vec<u8>>, ConnectError> {
        let mut out = Vec::with_capacity(txs.len());
        for tx in txs {
            out.push(self.sign_transaction(tx).await?);
        }
        Ok(out)
    }

    async fn sign_and_send_transaction(
        &self,
        tx: &Transaction,
        _options: &SendOptions,
    ) -> Result<String, ConnectError> {
        // Must at least compile, like a real wallet would require.
        tx.compile_message()?;
        self.sent.lock().unwrap().push(tx.clone());
        Ok(SIGNATURE.to_string())
    }

    async fn sign_message(&self, _message: &[u8]) -> Result<Vec<u8>, ConnectError> {
        Ok(vec![0u8; 64])
    }
}

pub const BLOCKHASH: Blockhash = Blockhash::new_from_array([42u8; 32]);

/// An in-memory ledger view.
pub struct MockRpc {
    pub lamports: u64,
    pub token_accounts: Vec<TokenAccount>,
    pub existing: Vec<Pubkey>,
    pub blockhash_requests: Mutex<Vec<(Option<Commitment>, Option<u64>)>>,
}

impl MockRpc {
    pub fn new(lamports: u64) -> Self {
        Self {
            lamports,
            token_accounts: Vec::new(),
            existing: Vec::new(),
            blockhash_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_token_account(mut self, account: TokenAccount) -> Self {
        self.token_accounts.push(account);
        self
    }

    pub fn with_existing(mut self, address: Pubkey) -> Self {
        self.existing.push(address);
        self
    }
}

#[async_trait]
impl SolanaRpc for MockRpc {
    async fn get_balance(&self, _owner: &Pubkey) -> Result<u64, ConnectError> {
        Ok(self.lamports)
    }

    async fn get_latest_blockhash(
        &self,
        commitment: Option<Commitment>,
        min_context_slot: Option<u64>,
    ) -> Result<Blockhash, ConnectError> {
        self.blockhash_requests
            .lock()
            .unwrap()
            .push((commitment, min_context_slot));
        Ok(BLOCKHASH)
    }

    async fn get_account_info(&self, address: &Pubkey) -> Result<Option<AccountInfo>, ConnectError> {
        Ok(self.existing.contains(address).then(|| AccountInfo {
            lamports: 2_039_280,
            owner: chain_sol::TOKEN_PROGRAM_ID,
            executable: false,
        }))
    }

    async fn get_parsed_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Vec<TokenAccount>, ConnectError> {
        Ok(self
            .token_accounts
            .iter()
            .filter(|a| a.owner == *owner && a.mint == *mint)
            .cloned()
            .collect())
    }
}

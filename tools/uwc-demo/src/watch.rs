use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chain_sol::{Pubkey, Transaction};
use wallet_connect::sol::{SendOptions, SolAdapter};
use wallet_connect::ConnectError;

/// A Solana "wallet" that only knows a public key. Good for reading
/// balances from a terminal; refuses to sign.
pub struct WatchOnly {
    key: Pubkey,
    connected: AtomicBool,
}

impl WatchOnly {
    pub fn new(key: Pubkey) -> Self {
        Self {
            key,
            connected: AtomicBool::new(false),
        }
    }
}

fn cannot_sign() -> ConnectError {
    ConnectError::Adapter("watch-only wallet cannot sign".into())
}

#[async_trait]
impl SolAdapter for WatchOnly {
    async fn connect(&self) -> Result<(), ConnectError> {
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
        self.is_connected().then_some(self.key)
    }

    async fn sign_transaction(&self, _tx: &Transaction) -> Result<Vec<u8>, ConnectError> {
        Err(cannot_sign())
    }

    async fn sign_all_transactions(
        &self,
        _txs: &[Transaction],
    ) -> Result<Vec<Vec<u8>>, ConnectError> {
        Err(cannot_sign())
    }

    async fn sign_and_send_transaction(
        &self,
        _tx: &Transaction,
        _options: &SendOptions,
    ) -> Result<String, ConnectError> {
        Err(cannot_sign())
    }

    async fn sign_message(&self, _message: &[u8]) -> Result<Vec<u8>, ConnectError> {
        Err(cannot_sign())
    }
}

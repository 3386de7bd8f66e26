use async_trait::async_trait;
use chain_sol::{Pubkey, Transaction};
use serde::{Deserialize, Serialize};

use crate::error::ConnectError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

/// Options passed along with a transaction to the wallet and RPC node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub skip_preflight: bool,
    pub preflight_commitment: Option<Commitment>,
    pub max_retries: Option<u32>,
    /// Evaluate the blockhash query at a slot no older than this.
    pub min_context_slot: Option<u64>,
}

/// An injected Solana wallet (`window.phantom.solana`, `window.nufiSolana`).
///
/// Signing methods return wire-format signed transactions; `sign_message`
/// returns the 64-byte Ed25519 signature.
#[async_trait]
pub trait SolAdapter: Send + Sync {
    async fn connect(&self) -> Result<(), ConnectError>;
    async fn disconnect(&self) -> Result<(), ConnectError>;
    fn is_connected(&self) -> bool;
    fn public_key(&self) -> Option<Pubkey>;

    async fn sign_transaction(&self, tx: &Transaction) -> Result<Vec<u8>, ConnectError>;
    async fn sign_all_transactions(
        &self,
        txs: &[Transaction],
    ) -> Result<Vec<Vec<u8>>, ConnectError>;

    /// Signs and submits; returns the base58 transaction signature.
    async fn sign_and_send_transaction(
        &self,
        tx: &Transaction,
        options: &SendOptions,
    ) -> Result<String, ConnectError>;

    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, ConnectError>;
}

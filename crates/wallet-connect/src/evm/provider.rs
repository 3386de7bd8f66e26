//! Typed EIP-1193 calls on top of an [`EvmAdapter`].

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use chain_eth::request::{
    self, TransactionRequest, ETH_ACCOUNTS, ETH_CALL, ETH_GET_BALANCE, ETH_REQUEST_ACCOUNTS,
    ETH_SEND_TRANSACTION, WALLET_SWITCH_CHAIN,
};
use serde_json::{json, Value};
use tracing::debug;

use super::adapter::EvmAdapter;
use crate::error::ConnectError;

#[derive(Clone)]
pub struct BrowserProvider {
    adapter: Arc<dyn EvmAdapter>,
}

impl BrowserProvider {
    pub fn new(adapter: Arc<dyn EvmAdapter>) -> Self {
        Self { adapter }
    }

    pub async fn send(&self, method: &str, params: Value) -> Result<Value, ConnectError> {
        debug!(method, "eip-1193 request");
        self.adapter.request(method, params).await
    }

    /// Accounts already exposed to the page, without prompting.
    pub async fn accounts(&self) -> Result<Vec<Address>, ConnectError> {
        let value = self.send(ETH_ACCOUNTS, json!([])).await?;
        Ok(request::parse_accounts(&value)?)
    }

    pub fn is_connected(&self) -> bool {
        self.adapter.is_connected()
    }

    /// Whether the wallet is connected and exposes at least one account.
    pub async fn is_ready(&self) -> Result<bool, ConnectError> {
        if !self.is_connected() {
            return Ok(false);
        }
        Ok(!self.accounts().await?.is_empty())
    }

    /// Prompts for account access and returns a signer for the first account.
    pub async fn get_signer(&self) -> Result<JsonRpcSigner, ConnectError> {
        let value = self.send(ETH_REQUEST_ACCOUNTS, json!([])).await?;
        let address = request::parse_accounts(&value)?
            .into_iter()
            .next()
            .ok_or_else(|| ConnectError::Adapter("wallet returned no accounts".into()))?;
        Ok(JsonRpcSigner {
            provider: self.clone(),
            address,
        })
    }

    pub async fn switch_chain(&self, chain_id: u64) -> Result<(), ConnectError> {
        self.send(WALLET_SWITCH_CHAIN, request::switch_chain_params(chain_id))
            .await?;
        Ok(())
    }

    pub async fn get_balance(&self, owner: &Address) -> Result<U256, ConnectError> {
        let value = self
            .send(ETH_GET_BALANCE, request::get_balance_params(owner))
            .await?;
        Ok(request::parse_quantity(&value)?)
    }

    /// Read-only contract call.
    pub async fn call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>, ConnectError> {
        let value = self.send(ETH_CALL, request::call_params(to, data)).await?;
        Ok(request::parse_data(&value)?)
    }
}

/// The account the wallet granted, able to submit transactions through it.
#[derive(Clone)]
pub struct JsonRpcSigner {
    provider: BrowserProvider,
    address: Address,
}

impl JsonRpcSigner {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn provider(&self) -> &BrowserProvider {
        &self.provider
    }

    /// Hands `tx` to the wallet to sign and broadcast; returns the hash.
    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String, ConnectError> {
        let value = self.provider.send(ETH_SEND_TRANSACTION, tx.to_params()).await?;
        Ok(request::parse_tx_hash(&value)?)
    }
}

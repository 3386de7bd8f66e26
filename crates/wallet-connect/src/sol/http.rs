//! [`SolanaRpc`] over JSON-RPC 2.0 with `reqwest`.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chain_sol::{Blockhash, Pubkey};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::adapter::Commitment;
use super::rpc::{
    parse_blockhash, AccountInfo, LatestBlockhash, RawAccountInfo, RawKeyedAccount, SolanaRpc,
    TokenAccount, WithContext,
};
use crate::config::ConnectorConfig;
use crate::error::ConnectError;

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

pub struct HttpSolanaRpc {
    client: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl HttpSolanaRpc {
    pub fn new(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Builds a client for `config.solana_endpoint` with the configured
    /// timeout.
    pub fn from_config(config: &ConnectorConfig) -> Result<Self, ConnectError> {
        let endpoint = config
            .solana_endpoint
            .clone()
            .filter(|e| !e.is_empty())
            .ok_or(ConnectError::NoEndpoint)?;
        let client = reqwest::Client::builder()
            .timeout(config.rpc_timeout())
            .build()?;
        Ok(Self::new(endpoint, client))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, ConnectError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, endpoint = %self.endpoint, "solana rpc request");

        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        let response: RpcResponse<T> = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match (response.result, response.error) {
            (_, Some(err)) => Err(ConnectError::Rpc(format!(
                "{method}: {} (code {})",
                err.message, err.code
            ))),
            (Some(result), None) => Ok(result),
            (None, None) => Err(ConnectError::Rpc(format!("{method}: empty response"))),
        }
    }
}

#[async_trait]
impl SolanaRpc for HttpSolanaRpc {
    async fn get_balance(&self, owner: &Pubkey) -> Result<u64, ConnectError> {
        let res: WithContext<u64> = self
            .call("getBalance", json!([owner.to_string()]))
            .await?;
        Ok(res.value)
    }

    async fn get_latest_blockhash(
        &self,
        commitment: Option<Commitment>,
        min_context_slot: Option<u64>,
    ) -> Result<Blockhash, ConnectError> {
        let mut config = serde_json::Map::new();
        if let Some(c) = commitment {
            config.insert("commitment".into(), json!(c.as_str()));
        }
        if let Some(slot) = min_context_slot {
            config.insert("minContextSlot".into(), json!(slot));
        }
        let res: WithContext<LatestBlockhash> = self
            .call("getLatestBlockhash", json!([config]))
            .await?;
        parse_blockhash(res.value)
    }

    async fn get_account_info(&self, address: &Pubkey) -> Result<Option<AccountInfo>, ConnectError> {
        let res: WithContext<Option<RawAccountInfo>> = self
            .call(
                "getAccountInfo",
                json!([address.to_string(), { "encoding": "base64" }]),
            )
            .await?;
        res.value.map(AccountInfo::try_from).transpose()
    }

    async fn get_parsed_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Vec<TokenAccount>, ConnectError> {
        let res: WithContext<Vec<RawKeyedAccount>> = self
            .call(
                "getTokenAccountsByOwner",
                json!([
                    owner.to_string(),
                    { "mint": mint.to_string() },
                    { "encoding": "jsonParsed" }
                ]),
            )
            .await?;
        res.value.into_iter().map(TokenAccount::try_from).collect()
    }
}

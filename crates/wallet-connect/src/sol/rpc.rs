//! The Solana JSON-RPC calls the manager needs, and their response shapes.

use async_trait::async_trait;
use chain_sol::{Blockhash, Pubkey};
use serde::Deserialize;

use super::adapter::Commitment;
use crate::error::ConnectError;

#[async_trait]
pub trait SolanaRpc: Send + Sync {
    /// Lamports held by `owner`.
    async fn get_balance(&self, owner: &Pubkey) -> Result<u64, ConnectError>;

    async fn get_latest_blockhash(
        &self,
        commitment: Option<Commitment>,
        min_context_slot: Option<u64>,
    ) -> Result<Blockhash, ConnectError>;

    /// `None` when no account exists at `address`.
    async fn get_account_info(&self, address: &Pubkey) -> Result<Option<AccountInfo>, ConnectError>;

    /// Token accounts of `owner` holding `mint`.
    async fn get_parsed_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Vec<TokenAccount>, ConnectError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub lamports: u64,
    pub owner: Pubkey,
    pub executable: bool,
}

/// An SPL token account as reported by `jsonParsed` encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccount {
    pub pubkey: Pubkey,
    pub mint: Pubkey,
    pub owner: Pubkey,
    /// Base units.
    pub amount: u64,
    pub decimals: u8,
}

// Wire shapes.

#[derive(Debug, Deserialize)]
pub(crate) struct WithContext<T> {
    pub value: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LatestBlockhash {
    pub blockhash: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAccountInfo {
    pub lamports: u64,
    pub owner: String,
    pub executable: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawKeyedAccount {
    pub pubkey: String,
    pub account: RawParsedAccount,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawParsedAccount {
    pub data: RawParsedData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawParsedData {
    pub parsed: RawParsed,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawParsed {
    pub info: RawTokenInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawTokenInfo {
    pub mint: String,
    pub owner: String,
    pub token_amount: RawTokenAmount,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTokenAmount {
    pub amount: String,
    pub decimals: u8,
}

fn pubkey(value: &str) -> Result<Pubkey, ConnectError> {
    value
        .parse()
        .map_err(|e| ConnectError::Rpc(format!("bad pubkey '{value}' in response: {e}")))
}

impl TryFrom<RawAccountInfo> for AccountInfo {
    type Error = ConnectError;

    fn try_from(raw: RawAccountInfo) -> Result<Self, Self::Error> {
        Ok(AccountInfo {
            lamports: raw.lamports,
            owner: pubkey(&raw.owner)?,
            executable: raw.executable,
        })
    }
}

impl TryFrom<RawKeyedAccount> for TokenAccount {
    type Error = ConnectError;

    fn try_from(raw: RawKeyedAccount) -> Result<Self, Self::Error> {
        let info = raw.account.data.parsed.info;
        let amount = info.token_amount.amount.parse::<u64>().map_err(|e| {
            ConnectError::Rpc(format!(
                "bad token amount '{}': {e}",
                info.token_amount.amount
            ))
        })?;
        Ok(TokenAccount {
            pubkey: pubkey(&raw.pubkey)?,
            mint: pubkey(&info.mint)?,
            owner: pubkey(&info.owner)?,
            amount,
            decimals: info.token_amount.decimals,
        })
    }
}

pub(crate) fn parse_blockhash(raw: LatestBlockhash) -> Result<Blockhash, ConnectError> {
    raw.blockhash
        .parse()
        .map_err(|e| ConnectError::Rpc(format!("bad blockhash '{}': {e}", raw.blockhash)))
}

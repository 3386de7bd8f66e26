//! ERC-20 calls routed through the wallet.

use alloy_primitives::{Address, U256};
use chain_eth::erc20;
use chain_eth::request::TransactionRequest;
use tracing::debug;

use super::provider::JsonRpcSigner;
use crate::error::ConnectError;

pub struct Erc20 {
    address: Address,
    signer: JsonRpcSigner,
}

impl Erc20 {
    pub fn new(address: Address, signer: JsonRpcSigner) -> Self {
        Self { address, signer }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    async fn read(&self, data: &[u8]) -> Result<Vec<u8>, ConnectError> {
        let out = self.signer.provider().call(&self.address, data).await?;
        // A non-contract address answers `0x`.
        if out.is_empty() {
            return Err(ConnectError::ContractShape(format!(
                "{} returned no data",
                self.address
            )));
        }
        Ok(out)
    }

    pub async fn decimals(&self) -> Result<u8, ConnectError> {
        let out = self.read(&erc20::encode_decimals()).await?;
        erc20::decode_decimals(&out)
            .map_err(|e| ConnectError::ContractShape(format!("decimals(): {e}")))
    }

    pub async fn balance_of(&self, owner: &Address) -> Result<U256, ConnectError> {
        let out = self.read(&erc20::encode_balance_of(owner)).await?;
        erc20::decode_balance(&out)
            .map_err(|e| ConnectError::ContractShape(format!("balanceOf(): {e}")))
    }

    pub async fn transfer(&self, to: &Address, amount: U256) -> Result<String, ConnectError> {
        debug!(token = %self.address, to = %to, %amount, "erc20 transfer");
        let tx = TransactionRequest::call(
            self.signer.address(),
            self.address,
            erc20::encode_transfer(to, amount),
        );
        self.signer.send_transaction(&tx).await
    }
}

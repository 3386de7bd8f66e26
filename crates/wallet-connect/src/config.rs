//! Connector configuration, loadable from TOML.
//!
//! ```toml
//! auto_connect = true
//! solana_endpoint = "https://api.mainnet-beta.solana.com"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConnectError;

pub const DEFAULT_EVM_STORAGE_KEY: &str = "uv-eth-wallet";
pub const DEFAULT_SOL_STORAGE_KEY: &str = "uv-sol-wallet";
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Restore the persisted wallet when a manager mounts.
    pub auto_connect: bool,
    /// Selection key shared by every EVM chain.
    pub evm_storage_key: String,
    pub sol_storage_key: String,
    /// Solana JSON-RPC URL. Required for the Solana manager.
    pub solana_endpoint: Option<String>,
    pub rpc_timeout_secs: u64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            auto_connect: false,
            evm_storage_key: DEFAULT_EVM_STORAGE_KEY.to_string(),
            sol_storage_key: DEFAULT_SOL_STORAGE_KEY.to_string(),
            solana_endpoint: None,
            rpc_timeout_secs: DEFAULT_RPC_TIMEOUT_SECS,
        }
    }
}

impl ConnectorConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConnectError> {
        let config: Self =
            toml::from_str(input).map_err(|e| ConnectError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConnectError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading connector config");
        let input = std::fs::read_to_string(path)
            .map_err(|e| ConnectError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&input)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    fn validate(&self) -> Result<(), ConnectError> {
        if self.evm_storage_key.is_empty() || self.sol_storage_key.is_empty() {
            return Err(ConnectError::Config("storage keys must not be empty".into()));
        }
        if self.rpc_timeout_secs == 0 {
            return Err(ConnectError::Config("rpc_timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

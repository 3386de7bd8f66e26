use async_trait::async_trait;
use serde_json::Value;

use crate::error::ConnectError;

/// An injected EIP-1193 provider (`window.ethereum` and friends).
#[async_trait]
pub trait EvmAdapter: Send + Sync {
    /// Sends `{ method, params }` and returns the JSON result. Wallet-side
    /// failures (user rejection, unknown chain) surface as
    /// [`ConnectError::Adapter`].
    async fn request(&self, method: &str, params: Value) -> Result<Value, ConnectError>;

    fn is_connected(&self) -> bool;
}

//! Value types shared by the EVM and Solana managers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConnectError;

/// A supported browser wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletName {
    Metamask,
    Phantom,
    Exodus,
    NuFi,
}

impl WalletName {
    pub const ALL: [WalletName; 4] = [
        WalletName::Metamask,
        WalletName::Phantom,
        WalletName::Exodus,
        WalletName::NuFi,
    ];

    /// The name as shown to users and written to selection storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletName::Metamask => "Metamask",
            WalletName::Phantom => "Phantom",
            WalletName::Exodus => "Exodus",
            WalletName::NuFi => "NuFi",
        }
    }
}

impl fmt::Display for WalletName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletName {
    type Err = ConnectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WalletName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ConnectError::WalletNotFound(s.to_string()))
    }
}

/// A discovered wallet as published in chain state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletEntry {
    pub name: WalletName,
    /// `data:image/svg+xml` URI.
    pub icon: String,
    pub installed: bool,
}

/// Connection status of the selected wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalletState {
    pub name: WalletName,
    pub connected: bool,
    pub connecting: bool,
}

impl WalletState {
    pub fn connecting(name: WalletName) -> Self {
        Self {
            name,
            connected: false,
            connecting: true,
        }
    }

    pub fn connected(name: WalletName) -> Self {
        Self {
            name,
            connected: true,
            connecting: false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.connected || self.connecting
    }
}

/// A balance, either as a trimmed decimal string in major units or as the
/// raw integer in minor units (wei, lamports, token base units).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Balance<T> {
    Formatted(String),
    Raw(T),
}

impl<T> Balance<T> {
    pub fn formatted(&self) -> Option<&str> {
        match self {
            Balance::Formatted(s) => Some(s),
            Balance::Raw(_) => None,
        }
    }

    pub fn raw(&self) -> Option<&T> {
        match self {
            Balance::Raw(v) => Some(v),
            Balance::Formatted(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Balance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Balance::Formatted(s) => f.write_str(s),
            Balance::Raw(v) => write!(f, "{v}"),
        }
    }
}

/// Arguments for `get_balance`. Native currency unless `token` names a
/// contract (EVM) or mint (Solana) address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceParams {
    pub token: Option<String>,
    pub formatted: bool,
}

impl Default for BalanceParams {
    fn default() -> Self {
        Self {
            token: None,
            formatted: true,
        }
    }
}

impl BalanceParams {
    pub fn native() -> Self {
        Self::default()
    }

    pub fn token(address: impl Into<String>) -> Self {
        Self {
            token: Some(address.into()),
            formatted: true,
        }
    }

    pub fn raw(mut self) -> Self {
        self.formatted = false;
        self
    }
}

/// Arguments for `send`. `amount` is a decimal string in major units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendParams {
    pub to: String,
    pub amount: String,
    pub token: Option<String>,
}

impl SendParams {
    pub fn native(to: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            amount: amount.into(),
            token: None,
        }
    }

    pub fn token(
        to: impl Into<String>,
        amount: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            amount: amount.into(),
            token: Some(token.into()),
        }
    }
}

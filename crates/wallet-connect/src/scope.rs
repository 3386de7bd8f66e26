//! The page scope wallets inject themselves into.
//!
//! Browser wallets announce themselves by attaching objects to the global
//! scope (`ethereum`, `phantom.solana`, ...). [`GlobalScope`] abstracts that
//! lookup so managers can run outside a browser. Probing never fails: a
//! missing or unreadable path just means "not installed".

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::catalogue::WalletSpec;
use crate::evm::EvmAdapter;
use crate::sol::SolAdapter;
use crate::types::{WalletEntry, WalletName};

pub trait GlobalScope: Send + Sync {
    fn evm_adapter(&self, path: &str) -> Option<Arc<dyn EvmAdapter>>;
    fn sol_adapter(&self, path: &str) -> Option<Arc<dyn SolAdapter>>;
}

/// A scope populated explicitly, by an embedding host or by tests.
#[derive(Default)]
pub struct InjectedScope {
    evm: RwLock<HashMap<String, Arc<dyn EvmAdapter>>>,
    sol: RwLock<HashMap<String, Arc<dyn SolAdapter>>>,
}

impl InjectedScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inject_evm(&self, path: impl Into<String>, adapter: Arc<dyn EvmAdapter>) {
        self.evm
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), adapter);
    }

    pub fn inject_sol(&self, path: impl Into<String>, adapter: Arc<dyn SolAdapter>) {
        self.sol
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), adapter);
    }

    /// Removes whatever is injected at `path`.
    pub fn remove(&self, path: &str) {
        self.evm
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path);
        self.sol
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path);
    }
}

impl GlobalScope for InjectedScope {
    fn evm_adapter(&self, path: &str) -> Option<Arc<dyn EvmAdapter>> {
        self.evm.read().ok()?.get(path).cloned()
    }

    fn sol_adapter(&self, path: &str) -> Option<Arc<dyn SolAdapter>> {
        self.sol.read().ok()?.get(path).cloned()
    }
}

/// A wallet after probing: its catalogue entry plus the adapter, if found.
pub struct WalletDescriptor<A: ?Sized> {
    pub name: WalletName,
    pub icon: String,
    pub adapter: Option<Arc<A>>,
}

impl<A: ?Sized> WalletDescriptor<A> {
    pub fn installed(&self) -> bool {
        self.adapter.is_some()
    }

    pub fn entry(&self) -> WalletEntry {
        WalletEntry {
            name: self.name,
            icon: self.icon.clone(),
            installed: self.installed(),
        }
    }
}

impl<A: ?Sized> Clone for WalletDescriptor<A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            icon: self.icon.clone(),
            adapter: self.adapter.clone(),
        }
    }
}

pub fn probe_evm(scope: &dyn GlobalScope, specs: &[WalletSpec]) -> Vec<WalletDescriptor<dyn EvmAdapter>> {
    specs
        .iter()
        .map(|spec| {
            let adapter = scope.evm_adapter(spec.probe_path);
            debug!(wallet = %spec.name, path = spec.probe_path, installed = adapter.is_some(), "probed evm wallet");
            WalletDescriptor {
                name: spec.name,
                icon: spec.icon(),
                adapter,
            }
        })
        .collect()
}

pub fn probe_sol(scope: &dyn GlobalScope, specs: &[WalletSpec]) -> Vec<WalletDescriptor<dyn SolAdapter>> {
    specs
        .iter()
        .map(|spec| {
            let adapter = scope.sol_adapter(spec.probe_path);
            debug!(wallet = %spec.name, path = spec.probe_path, installed = adapter.is_some(), "probed solana wallet");
            WalletDescriptor {
                name: spec.name,
                icon: spec.icon(),
                adapter,
            }
        })
        .collect()
}

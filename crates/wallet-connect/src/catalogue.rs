//! Supported wallets per chain family: display icon and where each wallet
//! injects its provider into the page scope.

use crate::types::WalletName;

const METAMASK_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32"><path fill="#E2761B" d="M29 3 17.8 11.3l2.1-4.9z"/><path fill="#E4761B" d="m3 3 11.1 8.4-2-5zm21.9 19.3-3 4.6 6.4 1.8 1.8-6.3zM1.9 22.4l1.8 6.3 6.4-1.8-3-4.6z"/><path fill="#F6851B" d="m9.7 14.5-1.8 2.7 6.3.3-.2-6.8zm12.6 0-4.4-3.9-.1 6.9 6.3-.3z"/></svg>"##;

const PHANTOM_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32"><rect width="32" height="32" rx="8" fill="#AB9FF2"/><path fill="#FFF" d="M7 20.6c2.2 0 3.9-1.9 4.9-3.5a5 5 0 0 0-.4 1.9c0 1 .6 1.7 1.7 1.7 1.5 0 3.1-1.3 3.9-2.7l-.1.8c0 .7.4 1.1 1 1.1 1.9 0 3.8-3.4 3.8-6.3C21.8 11.3 19.5 9 15 9c-5.3 0-11 6.5-11 10.1 0 1 .7 1.5 1.9 1.5z"/></svg>"##;

const EXODUS_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32"><defs><linearGradient id="g" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="#0B46F9"/><stop offset="1" stop-color="#BBFBE0"/></linearGradient></defs><path fill="url(#g)" d="M28 9.3 16.6 2v4.1l7.3 4.7-.9 2.7h-6.4v5h6.4l.9 2.7-7.3 4.7V30L28 22.7l-2.1-6.7zM7.5 18.5h6.4v-5H7.5l.9-2.7 7.3-4.7V2L4 9.3l2.1 6.7L4 22.7 15.4 30v-4.1L8.4 21.2z"/></svg>"##;

const NUFI_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32"><rect width="32" height="32" rx="8" fill="#21272F"/><path fill="#F8D05D" d="M9 23V9h3.2l7 9V9H23v14h-3.2l-7-9v9z"/></svg>"##;

/// A wallet this crate knows how to reach on a given chain family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletSpec {
    pub name: WalletName,
    svg: &'static str,
    /// Dotted path under the page scope, e.g. `phantom.ethereum`.
    pub probe_path: &'static str,
}

impl WalletSpec {
    /// The wallet logo as a `data:image/svg+xml` URI.
    pub fn icon(&self) -> String {
        icon_data_uri(self.svg)
    }
}

pub fn icon_data_uri(svg: &str) -> String {
    format!("data:image/svg+xml;charset=utf-8,{}", urlencoding::encode(svg))
}

pub const METAMASK_EVM: WalletSpec = WalletSpec {
    name: WalletName::Metamask,
    svg: METAMASK_SVG,
    probe_path: "ethereum",
};

pub const PHANTOM_EVM: WalletSpec = WalletSpec {
    name: WalletName::Phantom,
    svg: PHANTOM_SVG,
    probe_path: "phantom.ethereum",
};

// Exodus exposes one injected object per page; its EVM provider is found
// under the Solana namespace.
pub const EXODUS_EVM: WalletSpec = WalletSpec {
    name: WalletName::Exodus,
    svg: EXODUS_SVG,
    probe_path: "exodus.solana",
};

pub const PHANTOM_SOL: WalletSpec = WalletSpec {
    name: WalletName::Phantom,
    svg: PHANTOM_SVG,
    probe_path: "phantom.solana",
};

pub const NUFI_SOL: WalletSpec = WalletSpec {
    name: WalletName::NuFi,
    svg: NUFI_SVG,
    probe_path: "nufiSolana",
};

pub const ETHEREUM_WALLETS: &[WalletSpec] = &[METAMASK_EVM, PHANTOM_EVM, EXODUS_EVM];

pub const POLYGON_WALLETS: &[WalletSpec] = &[METAMASK_EVM, PHANTOM_EVM];

pub const SOLANA_WALLETS: &[WalletSpec] = &[PHANTOM_SOL, NUFI_SOL];

/// Every EVM wallet, for managers driving a chain without a façade.
pub const EVM_WALLETS: &[WalletSpec] = ETHEREUM_WALLETS;

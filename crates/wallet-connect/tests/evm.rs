mod common;

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use chain_eth::address::checksum_address;
use common::{ether, MockEvm, Page, TX_HASH};
use tokio::sync::Notify;
use wallet_connect::evm::{BrowserProvider, ChainFacade, EvmAdapter};
use wallet_connect::storage::SelectionStore;
use wallet_connect::{
    Balance, BalanceParams, ConnectError, ConnectorConfig, SendParams, WalletName, WalletState,
};

const RECIPIENT: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

fn alice() -> Address {
    Address::repeat_byte(0xa1)
}

fn usdc() -> Address {
    Address::repeat_byte(0x55)
}

fn ethereum(page: &Page) -> ChainFacade {
    ChainFacade::ethereum(
        &ConnectorConfig::default(),
        page.state.clone(),
        page.store.clone(),
        page.scope.clone(),
    )
}

fn polygon(page: &Page) -> ChainFacade {
    ChainFacade::polygon(
        &ConnectorConfig::default(),
        page.state.clone(),
        page.store.clone(),
        page.scope.clone(),
    )
}

fn install(page: &Page, path: &str, wallet: MockEvm) -> Arc<MockEvm> {
    let wallet = Arc::new(wallet);
    page.scope.inject_evm(path, wallet.clone());
    wallet
}

fn installed(facade: &ChainFacade) -> Vec<(WalletName, bool)> {
    facade
        .wallets()
        .into_iter()
        .map(|w| (w.name, w.installed))
        .collect()
}

#[test]
fn installed_flags_follow_scope() {
    let page = Page::new();
    install(&page, "ethereum", MockEvm::new(alice()));

    let eth = ethereum(&page);
    assert_eq!(
        installed(&eth),
        vec![
            (WalletName::Metamask, true),
            (WalletName::Phantom, false),
            (WalletName::Exodus, false),
        ]
    );

    page.scope.remove("ethereum");
    eth.manager().discover();
    assert!(eth.wallets().iter().all(|w| !w.installed));
}

#[test]
fn exodus_is_found_under_solana_namespace() {
    let page = Page::new();
    install(&page, "exodus.solana", MockEvm::new(alice()));
    install(&page, "phantom.ethereum", MockEvm::new(alice()));

    let eth = ethereum(&page);
    assert_eq!(
        installed(&eth),
        vec![
            (WalletName::Metamask, false),
            (WalletName::Phantom, true),
            (WalletName::Exodus, true),
        ]
    );
}

#[test]
fn polygon_offers_fewer_wallets() {
    let page = Page::new();
    let matic = polygon(&page);
    let names: Vec<_> = matic.wallets().into_iter().map(|w| w.name).collect();
    assert_eq!(names, vec![WalletName::Metamask, WalletName::Phantom]);
    assert_eq!(matic.chain_id(), 137);
}

#[tokio::test]
async fn ethereum_and_polygon_keep_their_own_state() {
    let page = Page::new();
    install(&page, "ethereum", MockEvm::new(alice()).with_balance(ether(1)));
    install(&page, "exodus.solana", MockEvm::new(alice()));

    let eth = ethereum(&page);
    let matic = polygon(&page);
    assert_eq!(
        installed(&eth),
        vec![
            (WalletName::Metamask, true),
            (WalletName::Phantom, false),
            (WalletName::Exodus, true),
        ]
    );
    assert_eq!(
        installed(&matic),
        vec![(WalletName::Metamask, true), (WalletName::Phantom, false)]
    );

    eth.select(WalletName::Metamask).await.unwrap();
    assert_eq!(eth.wallet(), Some(WalletState::connected(WalletName::Metamask)));
    assert_eq!(matic.wallet(), None);
    assert!(matches!(
        matic.get_balance(BalanceParams::native()).await,
        Err(ConnectError::SignerNotInitialized)
    ));

    // The selection itself is shared through storage.
    matic.initialize().await;
    assert_eq!(matic.wallet(), Some(WalletState::connected(WalletName::Metamask)));
    assert_eq!(
        matic.get_balance(BalanceParams::native()).await.unwrap(),
        Balance::Formatted("1".into())
    );
    assert_eq!(eth.wallets().len(), 3);
}

#[tokio::test]
async fn offline_wallet_is_not_ready() {
    let metamask = Arc::new(MockEvm::new(alice()).offline());
    let provider = BrowserProvider::new(metamask.clone());

    assert!(!provider.is_connected());
    assert!(!provider.is_ready().await.unwrap());
    assert_eq!(metamask.count("eth_accounts"), 0);

    let online = Arc::new(MockEvm::new(alice()));
    assert!(BrowserProvider::new(online.clone()).is_ready().await.unwrap());
    assert_eq!(online.count("eth_accounts"), 1);
}

#[tokio::test]
async fn unknown_wallet_does_not_touch_state() {
    let page = Page::new();
    install(&page, "exodus.solana", MockEvm::new(alice()));
    let matic = polygon(&page);

    let err = matic.select(WalletName::Exodus).await.err().unwrap();
    assert!(matches!(err, ConnectError::WalletNotFound(ref n) if n == "Exodus"));

    let err = matic.select(WalletName::NuFi).await.err().unwrap();
    assert!(matches!(err, ConnectError::WalletNotFound(_)));

    assert_eq!(matic.wallet(), None);
    assert_eq!(page.store.get("uv-eth-wallet").unwrap(), None);
}

#[tokio::test]
async fn missing_extension_is_not_installed() {
    let page = Page::new();
    let eth = ethereum(&page);

    let err = eth.select(WalletName::Phantom).await.err().unwrap();
    assert!(matches!(err, ConnectError::WalletNotInstalled(WalletName::Phantom)));
    assert_eq!(eth.wallet(), None);
}

#[tokio::test]
async fn select_connects_and_persists() {
    let page = Page::new();
    let metamask = install(&page, "ethereum", MockEvm::new(alice()));
    let eth = ethereum(&page);

    eth.select(WalletName::Metamask).await.unwrap();

    assert_eq!(eth.wallet(), Some(WalletState::connected(WalletName::Metamask)));
    assert_eq!(
        page.store.get("uv-eth-wallet").unwrap().as_deref(),
        Some("Metamask")
    );
    assert_eq!(metamask.count("eth_requestAccounts"), 1);
    assert_eq!(metamask.count("eth_accounts"), 1);
    assert_eq!(eth.manager().signer_address(), Some(alice()));
}

#[tokio::test]
async fn get_adapter_reuses_the_session() {
    let page = Page::new();
    let metamask = install(&page, "ethereum", MockEvm::new(alice()));
    let eth = ethereum(&page);

    let selected = eth.select(WalletName::Metamask).await.unwrap();
    let again = eth.manager().get_adapter().await.unwrap();

    assert!(Arc::ptr_eq(&selected, &again));
    assert_eq!(metamask.count("eth_requestAccounts"), 1);
}

#[tokio::test]
async fn fresh_instance_restores_from_storage() {
    let page = Page::new();
    let metamask = install(&page, "ethereum", MockEvm::new(alice()));
    ethereum(&page).select(WalletName::Metamask).await.unwrap();

    let reloaded = page.reload();
    let eth = ethereum(&reloaded);
    assert_eq!(eth.wallet(), None);

    let adapter = eth.manager().get_adapter().await.unwrap();
    let expected: Arc<dyn EvmAdapter> = metamask;
    assert!(Arc::ptr_eq(&adapter, &expected));
    assert_eq!(eth.wallet(), Some(WalletState::connected(WalletName::Metamask)));
}

#[tokio::test]
async fn restore_without_selection_fails() {
    let page = Page::new();
    let eth = ethereum(&page);
    let err = eth.manager().get_adapter().await.err().unwrap();
    assert_eq!(err.to_string(), "No Evm wallet installed");
}

#[tokio::test]
async fn last_selection_wins_after_reload() {
    let page = Page::new();
    install(&page, "ethereum", MockEvm::new(alice()));
    install(&page, "phantom.ethereum", MockEvm::new(Address::repeat_byte(0xb2)));

    let eth = ethereum(&page);
    eth.select(WalletName::Metamask).await.unwrap();
    eth.select(WalletName::Phantom).await.unwrap();

    let reloaded = page.reload();
    let eth = ChainFacade::ethereum(
        &ConnectorConfig {
            auto_connect: true,
            ..ConnectorConfig::default()
        },
        reloaded.state.clone(),
        reloaded.store.clone(),
        reloaded.scope.clone(),
    );
    eth.mount().await;

    assert_eq!(eth.wallet(), Some(WalletState::connected(WalletName::Phantom)));
    assert_eq!(
        eth.manager().signer_address(),
        Some(Address::repeat_byte(0xb2))
    );
}

#[tokio::test]
async fn rejected_request_clears_connecting_state() {
    let page = Page::new();
    install(&page, "ethereum", MockEvm::new(alice()).rejecting());
    let eth = ethereum(&page);

    let err = eth.select(WalletName::Metamask).await.err().unwrap();
    assert!(matches!(err, ConnectError::Adapter(_)));
    assert_eq!(eth.wallet(), None);
    assert_eq!(page.store.get("uv-eth-wallet").unwrap(), None);
    assert!(matches!(
        eth.get_address().await,
        Err(ConnectError::SignerNotInitialized)
    ));
}

#[tokio::test]
async fn overlapping_select_keeps_the_newest() {
    let page = Page::new();
    let gate = Arc::new(Notify::new());
    let metamask = install(&page, "ethereum", MockEvm::new(alice()).gated(gate.clone()));
    install(&page, "phantom.ethereum", MockEvm::new(Address::repeat_byte(0xb2)));
    let eth = ethereum(&page);

    let (first, second) = tokio::join!(eth.select(WalletName::Metamask), async {
        let result = eth.select(WalletName::Phantom).await;
        gate.notify_one();
        result
    });

    assert!(matches!(
        first.err().unwrap(),
        ConnectError::SelectionSuperseded(WalletName::Metamask)
    ));
    assert!(second.is_ok());
    assert_eq!(metamask.count("eth_requestAccounts"), 1);
    assert_eq!(eth.wallet(), Some(WalletState::connected(WalletName::Phantom)));
    assert_eq!(
        page.store.get("uv-eth-wallet").unwrap().as_deref(),
        Some("Phantom")
    );
    assert_eq!(
        eth.manager().signer_address(),
        Some(Address::repeat_byte(0xb2))
    );
}

#[tokio::test]
async fn operations_need_a_signer() {
    let page = Page::new();
    install(&page, "ethereum", MockEvm::new(alice()));
    let eth = ethereum(&page);

    assert!(matches!(
        eth.get_address().await,
        Err(ConnectError::SignerNotInitialized)
    ));
    assert!(matches!(
        eth.get_balance(BalanceParams::native()).await,
        Err(ConnectError::SignerNotInitialized)
    ));
    assert!(matches!(
        eth.send(SendParams::native(RECIPIENT, "1")).await,
        Err(ConnectError::SignerNotInitialized)
    ));
}

#[tokio::test]
async fn address_switches_to_the_facade_chain() {
    let page = Page::new();
    let metamask = install(&page, "ethereum", MockEvm::new(alice()));

    let matic = polygon(&page);
    matic.select(WalletName::Metamask).await.unwrap();
    let address = matic.get_address().await.unwrap();

    assert_eq!(address, checksum_address(&alice()));
    assert_eq!(metamask.chain_ids(), vec!["0x89".to_string()]);

    let eth = ethereum(&page);
    eth.select(WalletName::Metamask).await.unwrap();
    eth.get_address().await.unwrap();
    assert_eq!(metamask.chain_ids().last().map(String::as_str), Some("0x1"));
}

#[tokio::test]
async fn native_balance_formatted_and_raw() {
    let page = Page::new();
    let wei = ether(3) / U256::from(2u64);
    install(&page, "ethereum", MockEvm::new(alice()).with_balance(wei));
    let eth = ethereum(&page);
    eth.select(WalletName::Metamask).await.unwrap();

    let formatted = eth.get_balance(BalanceParams::native()).await.unwrap();
    assert_eq!(formatted, Balance::Formatted("1.5".into()));

    let raw = eth.get_balance(BalanceParams::native().raw()).await.unwrap();
    assert_eq!(raw, Balance::Raw(wei));
}

#[tokio::test]
async fn token_balance_uses_contract_decimals() {
    let page = Page::new();
    install(
        &page,
        "ethereum",
        MockEvm::new(alice()).with_token(usdc(), 6, U256::from(2_500_000u64)),
    );
    let eth = ethereum(&page);
    eth.select(WalletName::Metamask).await.unwrap();

    let token = checksum_address(&usdc());
    let balance = eth.get_balance(BalanceParams::token(&token)).await.unwrap();
    assert_eq!(balance.formatted(), Some("2.5"));

    let raw = eth.get_balance(BalanceParams::token(&token).raw()).await.unwrap();
    assert_eq!(raw.raw(), Some(&U256::from(2_500_000u64)));
}

#[tokio::test]
async fn token_without_contract_code_is_rejected() {
    let page = Page::new();
    install(&page, "ethereum", MockEvm::new(alice()));
    let eth = ethereum(&page);
    eth.select(WalletName::Metamask).await.unwrap();

    let token = checksum_address(&usdc());
    let err = eth
        .get_balance(BalanceParams::token(&token))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ConnectError::ContractShape(_)));
}

#[tokio::test]
async fn native_send_hands_value_transfer_to_wallet() {
    let page = Page::new();
    let metamask = install(&page, "ethereum", MockEvm::new(alice()).with_balance(ether(2)));
    let eth = ethereum(&page);
    eth.select(WalletName::Metamask).await.unwrap();

    let hash = eth.send(SendParams::native(RECIPIENT, "1")).await.unwrap();
    assert_eq!(hash, TX_HASH);

    let sent = metamask.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["from"], checksum_address(&alice()));
    assert_eq!(sent[0]["to"], RECIPIENT);
    assert_eq!(sent[0]["value"], "0xde0b6b3a7640000");
    assert_eq!(metamask.chain_ids(), vec!["0x1".to_string()]);
}

#[tokio::test]
async fn native_send_over_balance_sends_nothing() {
    let page = Page::new();
    let metamask = install(&page, "ethereum", MockEvm::new(alice()).with_balance(ether(1)));
    let eth = ethereum(&page);
    eth.select(WalletName::Metamask).await.unwrap();

    let err = eth
        .send(SendParams::native(RECIPIENT, "1.000000000000000001"))
        .await
        .err()
        .unwrap();
    assert!(matches!(
        err,
        ConnectError::InsufficientBalance { ref available, .. } if available == "1"
    ));
    assert!(metamask.sent().is_empty());
    assert_eq!(metamask.count("eth_sendTransaction"), 0);
}

#[tokio::test]
async fn token_send_calls_transfer() {
    let page = Page::new();
    let metamask = install(
        &page,
        "ethereum",
        MockEvm::new(alice()).with_token(usdc(), 6, U256::from(5_000_000u64)),
    );
    let eth = ethereum(&page);
    eth.select(WalletName::Metamask).await.unwrap();

    let token = checksum_address(&usdc());
    eth.send(SendParams::token(RECIPIENT, "1.5", &token))
        .await
        .unwrap();

    let sent = metamask.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["to"], token);
    assert_eq!(sent[0]["value"], "0x0");
    let data = sent[0]["data"].as_str().unwrap();
    assert!(data.starts_with("0xa9059cbb"));
    assert!(data.ends_with("16e360"));
    assert!(data
        .to_lowercase()
        .contains(&RECIPIENT[2..].to_lowercase()));
}

#[tokio::test]
async fn token_send_over_balance_sends_nothing() {
    let page = Page::new();
    let metamask = install(
        &page,
        "ethereum",
        MockEvm::new(alice()).with_token(usdc(), 6, U256::from(1_000_000u64)),
    );
    let eth = ethereum(&page);
    eth.select(WalletName::Metamask).await.unwrap();

    let token = checksum_address(&usdc());
    let err = eth
        .send(SendParams::token(RECIPIENT, "2", &token))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ConnectError::InsufficientBalance { .. }));
    assert!(metamask.sent().is_empty());
}

#[tokio::test]
async fn bad_recipient_is_rejected_before_sending() {
    let page = Page::new();
    let metamask = install(&page, "ethereum", MockEvm::new(alice()).with_balance(ether(2)));
    let eth = ethereum(&page);
    eth.select(WalletName::Metamask).await.unwrap();

    let err = eth
        .send(SendParams::native("0x1234", "1"))
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ConnectError::Eth(_)));
    assert!(metamask.sent().is_empty());
}

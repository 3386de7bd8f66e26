//! uwc-demo: drive a chain connector from the terminal.
//!
//! Outside a browser nothing is injected, so EVM chains list every wallet as
//! not installed. `--watch <PUBKEY>` injects a read-only Solana wallet in
//! Phantom's slot, which is enough for `address` and `balance`.

mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use chain_eth::chains::{get_chain, parse_hex_chain_id};
use chain_eth::EthError;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wallet_connect::evm::{ChainFacade, EvmChainConfig};
use wallet_connect::sol::SolManager;
use wallet_connect::{
    BalanceParams, ConnectError, ConnectorConfig, FileStore, InjectedScope, SelectionStore,
    StateHub, WalletEntry, WalletName, WalletState,
};

use crate::watch::WatchOnly;

#[derive(Parser)]
#[command(name = "uwc-demo")]
#[command(about = "Cross-chain browser wallet connector demo", long_about = None)]
struct Cli {
    /// Connector config (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where the selected wallet is remembered
    #[arg(long, value_name = "FILE", default_value = "uwc-selection.json")]
    store: PathBuf,

    #[arg(long, value_enum, default_value = "ethereum")]
    chain: Chain,

    /// EVM network by hex chain id (e.g. 0xaa36a7), overrides --chain
    #[arg(long, value_name = "HEX")]
    chain_id: Option<String>,

    /// Solana public key to watch (read-only wallet)
    #[arg(long, value_name = "PUBKEY")]
    watch: Option<String>,

    /// Override the Solana RPC endpoint
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Chain {
    Ethereum,
    Polygon,
    Solana,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported wallets and whether they are installed
    Wallets,
    /// Mount the connector and print the connection status
    Status,
    /// Connect a wallet and remember it
    Select {
        #[arg(value_name = "WALLET")]
        wallet: String,
    },
    /// Print the connected address
    Address,
    /// Print the native or token balance
    Balance {
        /// Token contract (EVM) or mint (Solana) address
        #[arg(short, long)]
        token: Option<String>,

        /// Print minor units instead of a decimal amount
        #[arg(long)]
        raw: bool,
    },
}

/// The operations the demo needs, whichever chain is picked.
enum Connector {
    Evm(ChainFacade),
    Sol(SolManager),
}

impl Connector {
    async fn mount(&self) {
        match self {
            Connector::Evm(c) => c.mount().await,
            Connector::Sol(c) => c.mount().await,
        }
    }

    fn wallets(&self) -> Vec<WalletEntry> {
        match self {
            Connector::Evm(c) => c.wallets(),
            Connector::Sol(c) => c.wallets(),
        }
    }

    fn network(&self) -> String {
        match self {
            Connector::Evm(c) => {
                let chain = c.manager().chain();
                format!("{} ({})", chain.name, chain.hex_chain_id())
            }
            Connector::Sol(_) => "Solana".to_string(),
        }
    }

    fn status(&self) -> (bool, Option<WalletState>, Option<String>) {
        match self {
            Connector::Evm(c) => (c.initializing(), c.wallet(), c.last_error()),
            Connector::Sol(c) => (c.initializing(), c.wallet(), c.last_error()),
        }
    }

    async fn select(&self, name: WalletName) -> Result<(), ConnectError> {
        match self {
            Connector::Evm(c) => c.select(name).await.map(|_| ()),
            Connector::Sol(c) => c.select(name).await.map(|_| ()),
        }
    }

    async fn address(&self) -> Result<String, ConnectError> {
        match self {
            Connector::Evm(c) => c.get_address().await,
            Connector::Sol(c) => c.get_address().await,
        }
    }

    async fn balance(&self, params: BalanceParams) -> Result<String, ConnectError> {
        match self {
            Connector::Evm(c) => c.get_balance(params).await.map(|b| b.to_string()),
            Connector::Sol(c) => c.get_balance(params).await.map(|b| b.to_string()),
        }
    }
}

/// The EVM network to drive, or `None` for Solana.
fn evm_config(
    chain: Chain,
    chain_id: Option<&str>,
    config: &ConnectorConfig,
) -> Result<Option<EvmChainConfig>, EthError> {
    if let Some(value) = chain_id {
        let id = parse_hex_chain_id(value)?;
        let chain = get_chain(id).ok_or_else(|| EthError::UnsupportedChain(value.to_string()))?;
        return Ok(Some(EvmChainConfig::custom(chain, config)));
    }
    Ok(match chain {
        Chain::Ethereum => Some(EvmChainConfig::ethereum(config)),
        Chain::Polygon => Some(EvmChainConfig::polygon(config)),
        Chain::Solana => None,
    })
}

fn build(cli: &Cli) -> Result<Connector, ConnectError> {
    let mut config = match &cli.config {
        Some(path) => ConnectorConfig::load(path)?,
        None => ConnectorConfig::default(),
    };
    if cli.endpoint.is_some() {
        config.solana_endpoint = cli.endpoint.clone();
    }
    // Commands that read chain state restore the last selection.
    config.auto_connect = config.auto_connect || !matches!(cli.command, Commands::Wallets);

    let state = Arc::new(StateHub::new());
    let store: Arc<dyn SelectionStore> = Arc::new(FileStore::new(&cli.store));
    let scope = Arc::new(InjectedScope::new());

    if let Some(key) = &cli.watch {
        let key = key.parse()?;
        scope.inject_sol("phantom.solana", Arc::new(WatchOnly::new(key)));
    }

    let connector = match evm_config(cli.chain, cli.chain_id.as_deref(), &config)? {
        Some(evm) => Connector::Evm(ChainFacade::from_config(evm, state, store, scope)),
        None => Connector::Sol(SolManager::new(&config, state, store, scope)?),
    };
    Ok(connector)
}

async fn run(cli: Cli) -> Result<(), ConnectError> {
    let connector = build(&cli)?;

    if let Commands::Select { wallet } = &cli.command {
        let name: WalletName = wallet.parse()?;
        connector.select(name).await?;
        println!("Connected {name}");
        return Ok(());
    }

    connector.mount().await;

    match cli.command {
        Commands::Wallets => {
            for wallet in connector.wallets() {
                let mark = if wallet.installed { "installed" } else { "not installed" };
                println!("{:<10} {mark}", wallet.name);
            }
        }
        Commands::Status => {
            println!("Network: {}", connector.network());
            let (initializing, wallet, last_error) = connector.status();
            match wallet {
                _ if initializing => println!("Initializing"),
                Some(w) if w.connected => println!("Connected: {}", w.name),
                _ => println!("Not connected"),
            }
            if let Some(e) = last_error {
                println!("Last error: {e}");
            }
        }
        Commands::Address => println!("{}", connector.address().await?),
        Commands::Balance { token, raw } => {
            let params = BalanceParams {
                token,
                formatted: !raw,
            };
            println!("{}", connector.balance(params).await?);
        }
        Commands::Select { .. } => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallet_connect=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    info!(store = %cli.store.display(), "uwc-demo starting");

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

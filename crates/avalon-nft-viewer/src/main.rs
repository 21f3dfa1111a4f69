/*
[INPUT]:  CLI arguments, YAML configuration file, private key, OS shutdown signals
[OUTPUT]: JSON result of one NFT query with graceful shutdown
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use avalon_nft_adapter::{NftReader, ProviderFactory, auth::validate_private_key};
use avalon_nft_viewer::{Command, ViewerConfig, execute};

#[derive(Parser, Debug)]
#[command(name = "avalon-nft-viewer", version, about = "Avalon NFT wallet viewer")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: PathBuf,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    /// Hex-encoded secp256k1 key of the account to view
    #[arg(long = "private-key", env = "AVALON_PRIVATE_KEY", hide_env_values = true)]
    private_key: String,
    #[arg(long = "dry-run")]
    dry_run: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    info!(
        config_path = %args.config_path.display(),
        dry_run = args.dry_run,
        "starting avalon-nft-viewer"
    );

    let config = load_config(&args.config_path)?;
    validate_private_key(&args.private_key).context("private key")?;
    info!(
        chain_id = config.chain.chain_id,
        contract = %config.contract,
        "configuration loaded"
    );

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let command = args
        .command
        .context("a command is required unless --dry-run is given")?;

    let factory = ProviderFactory::private_key(config.chain.clone(), args.private_key)
        .with_client_config(config.client_config());
    let provider = Arc::new(factory.connect().await.context("connect provider")?);

    let mut reader = NftReader::with_config(provider.clone(), config.contract, config.reader_config()?)
        .context("create nft reader")?;
    if let Some(account) = config.account {
        reader = reader.with_account(account);
    }

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    let outcome = tokio::select! {
        result = execute(&command, &provider, &reader) => Some(result),
        _ = shutdown.cancelled() => None,
    };

    factory.logout().await.context("logout")?;
    info!("session closed");

    match outcome {
        Some(result) => {
            let output = result?;
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        None => bail!("interrupted before {command:?} completed"),
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: &PathBuf) -> Result<ViewerConfig> {
    let path_str = path
        .to_str()
        .context("config path must be valid utf-8")?;
    let config = ViewerConfig::from_file(path_str).context("load config")?;
    config.validate().context("validate config")?;
    Ok(config)
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}

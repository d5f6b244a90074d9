//! FlashCoin CLI — check a balance, send tokens and (for the contract owner)
//! mint the daily allowance through an external wallet bridge.
//!
//! # Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init-config` | Write a template `~/.flashcoin/config.toml` |
//! | `status` | Show connected account, balance and role |
//! | `balance` | Print the active account's balance |
//! | `send <recipient> <amount>` | Submit `transfer` |
//! | `mint <amount>` | Submit `mintDaily` to the active (owner) account |
//! | `watch` | Follow account switches in the wallet and reload the balance |
//! | `shell` | Interactive session with all of the above |
//!
//! # Security model
//!
//! This tool never sees a private key. The wallet bridge signs every
//! transaction and is where the user approves or rejects it.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use tracing::{info, warn};

use flashcoin_wallet::app::Settled;
use flashcoin_wallet::bridge::BridgeProvider;
use flashcoin_wallet::config::{self, Config, FileConfig, Overrides};
use flashcoin_wallet::session::AccountChange;
use flashcoin_wallet::WalletApp;

// ── CLI definition ────────────────────────────────────────────────────────────

/// FlashCoin TRC20 wallet client.
#[derive(Parser)]
#[command(name = "flashcoin")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.flashcoin/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// FlashCoin contract address.
    #[arg(long, global = true, env = "FLASHCOIN_CONTRACT")]
    contract: Option<String>,

    /// Owner address; only this account sees the mint command.
    #[arg(long, global = true, env = "FLASHCOIN_OWNER")]
    owner: Option<String>,

    /// Wallet bridge JSON-RPC endpoint.
    #[arg(long, global = true, env = "FLASHCOIN_PROVIDER_URL")]
    provider_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a template config file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Show connected account, balance and role.
    Status,

    /// Print the active account's balance.
    Balance,

    /// Send FlashCoin to another address.
    Send {
        /// Recipient address.
        recipient: String,

        /// Amount in FlashCoin (up to 6 decimals; extra digits are dropped).
        amount: String,
    },

    /// Mint the daily allowance to the active account (owner only).
    Mint {
        /// Amount in FlashCoin.
        amount: String,
    },

    /// Poll the wallet and reload the balance whenever the account changes.
    Watch {
        /// Seconds between polls.
        #[arg(long, default_value_t = 3)]
        interval: u64,
    },

    /// Interactive session.
    Shell,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flashcoin=info,flashcoin_wallet=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Commands::InitConfig { force } = cli.command {
        return cmd_init_config(cli.config, force);
    }

    let overrides = Overrides {
        contract_address: cli.contract,
        owner_address: cli.owner,
        provider_url: cli.provider_url,
    };
    let config = Config::load(cli.config.as_deref(), overrides)
        .context("Failed to load configuration")?;

    let provider = BridgeProvider::new(&config.provider_url)
        .context("Failed to set up wallet bridge client")?;
    info!(url = %provider.url(), contract = %config.contract_address, "using wallet bridge");

    let mut app = WalletApp::new(&provider, &config);
    // A missing wallet or failed first read leaves the status line set;
    // each command decides whether that is fatal.
    let started = app.start();

    match cli.command {
        Commands::InitConfig { .. } => unreachable!("handled above"),
        Commands::Status => {
            print_status(&app);
            Ok(())
        }
        Commands::Balance => cmd_balance(&app, started),
        Commands::Send { recipient, amount } => {
            app.recipient = recipient;
            app.amount = amount;
            run_action(&mut app, WalletApp::send)
        }
        Commands::Mint { amount } => {
            app.mint_amount = amount;
            run_action(&mut app, WalletApp::mint)
        }
        Commands::Watch { interval } => cmd_watch(&mut app, interval),
        Commands::Shell => cmd_shell(&mut app),
    }
}

// ── Command implementations ───────────────────────────────────────────────────

/// `init-config` — write ~/.flashcoin/config.toml with placeholder values.
fn cmd_init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => config::config_path()?,
    };
    if path.exists() && !force {
        bail!(
            "Config file already exists at '{}'.\n\
             Pass --force to overwrite it.",
            path.display()
        );
    }

    let template = FileConfig {
        contract_address: Some("YOUR_DEPLOYED_CONTRACT_ADDRESS".into()),
        owner_address: Some("YOUR_OWNER_WALLET_ADDRESS".into()),
        provider_url: Some(flashcoin_wallet::bridge::DEFAULT_PROVIDER_URL.into()),
    };
    template.save(&path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Cannot set permissions on '{}'", path.display()))?;
    }

    println!("Config written to: {}", path.display());
    println!("Edit contract_address and owner_address before use.");
    Ok(())
}

/// `balance` — `start` already read it; print that result.
fn cmd_balance(app: &WalletApp<'_>, started: flashcoin_wallet::Result<()>) -> Result<()> {
    if let Err(e) = started {
        bail!("{e}");
    }
    println!("{}", app.balance());
    Ok(())
}

/// Run one send/mint. An accepted transaction exits 0 even when the
/// follow-up balance read fails.
fn run_action<'p, F>(app: &mut WalletApp<'p>, action: F) -> Result<()>
where
    F: FnOnce(&mut WalletApp<'p>) -> flashcoin_wallet::Result<Settled>,
{
    match action(app) {
        Ok(settled) => {
            for line in settled_lines(&settled) {
                println!("{line}");
            }
            Ok(())
        }
        Err(e) => bail!("{e}"),
    }
}

/// `watch` — re-check the wallet every `interval` seconds.
fn cmd_watch(app: &mut WalletApp<'_>, interval: u64) -> Result<()> {
    print_status(app);
    loop {
        std::thread::sleep(Duration::from_secs(interval.max(1)));
        match app.poll() {
            AccountChange::Unchanged => {}
            AccountChange::Switched { to, .. } => {
                info!(account = %to, "account switched");
                print_status(app);
            }
            AccountChange::Lost { previous } => {
                warn!(account = %previous, "wallet disconnected");
                print_status(app);
            }
        }
    }
}

const SHELL_HELP: &str = "\
commands:
  status                     show account, balance and role
  balance                    reload the balance
  send <recipient> <amount>  transfer FlashCoin
  mint <amount>              mint daily tokens (owner only)
  poll                       re-check the wallet for an account switch
  help                       this text
  quit                       leave";

/// `shell` — line-oriented session over stdin.
fn cmd_shell(app: &mut WalletApp<'_>) -> Result<()> {
    print_status(app);
    println!("{SHELL_HELP}");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("flashcoin> ");
        stdout.flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("Failed to read stdin")? == 0 {
            return Ok(());
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => return Ok(()),
            ["help"] => println!("{SHELL_HELP}"),
            ["status"] => print_status(app),
            ["balance"] => match app.refresh_balance() {
                Ok(balance) => println!("Balance: {balance}"),
                Err(e) => println!("{e}"),
            },
            ["poll"] => {
                if app.poll() != AccountChange::Unchanged {
                    print_status(app);
                }
            }
            ["send", recipient, amount] => {
                app.recipient = (*recipient).to_owned();
                app.amount = (*amount).to_owned();
                print_outcome(app.send());
            }
            ["mint", amount] => {
                app.mint_amount = (*amount).to_owned();
                print_outcome(app.mint());
            }
            _ => println!("unrecognised command; type `help`"),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Tx id first, then the balance or the reason it could not be reloaded.
fn settled_lines(settled: &Settled) -> Vec<String> {
    let balance = match &settled.balance {
        Ok(balance) => format!("Balance: {balance}"),
        Err(e) => format!("Balance not reloaded ({e})"),
    };
    vec![settled.receipt.message.clone(), balance]
}

fn print_outcome(outcome: flashcoin_wallet::Result<Settled>) {
    match outcome {
        Ok(settled) => {
            for line in settled_lines(&settled) {
                println!("{line}");
            }
        }
        Err(e) => println!("{e}"),
    }
}

fn print_status(app: &WalletApp<'_>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Field", "Value"]);

    table.add_row(vec![
        "Connected account",
        app.account().unwrap_or("Not connected"),
    ]);
    table.add_row(vec!["FlashCoin balance", app.balance()]);
    table.add_row(vec!["Contract", app.contract_address()]);
    table.add_row(vec![
        "Role",
        if app.is_owner() { "owner" } else { "holder" },
    ]);

    println!("{table}");
    if !app.status().is_empty() {
        println!("{}", app.status());
    }
}

//! pass-daemon: runs one administrative operation against the point store.

mod app;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pass_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment, Migrator};
use pass_types::{Identity, Member, PointCategory, ProfileField, SystemClock};
use pass_utils::{init_logging, LogFormat};
use pass_verification::AuthorityVerifier;

use crate::app::{App, CommandError, Output};
use crate::config::DaemonConfig;

/// Exit status for a request the engines refused.
const EXIT_REJECTED: u8 = 2;

#[derive(Parser)]
#[command(name = "pass-daemon", about = "Point economy administration")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "PASS_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the LMDB store.
    #[arg(long, env = "PASS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log filter: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "PASS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output: "human" or "json".
    #[arg(long, env = "PASS_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Identity recorded as the assigner or remover.
    #[arg(long, env = "PASS_ACTOR", default_value = "admin")]
    actor: Identity,

    #[arg(long, env = "PASS_ACTOR_NAME")]
    actor_name: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// A member addressed by identity, with an optional display name.
#[derive(clap::Args)]
struct Target {
    identity: Identity,

    /// Display name to record; defaults to the identity.
    #[arg(long)]
    name: Option<String>,
}

impl Target {
    fn member(&self) -> Member {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| self.identity.to_string());
        Member::new(self.identity.clone(), name)
    }
}

#[derive(clap::Subcommand)]
enum Command {
    /// Apply a signed point delta; negative amounts debit.
    Credit {
        #[command(flatten)]
        target: Target,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
        #[arg(long)]
        message: Option<String>,
    },
    /// Grant points by explicit amount or by category.
    Grant {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        amount: Option<i64>,
        /// e.g. "BetaTesting" or "Beta Testing".
        #[arg(long)]
        category: Option<PointCategory>,
        #[arg(long)]
        message: Option<String>,
    },
    Balance {
        identity: Identity,
    },
    History {
        identity: Identity,
        #[arg(long)]
        include_removed: bool,
    },
    /// Daily check-in.
    CheckIn {
        #[command(flatten)]
        target: Target,
    },
    CheckInStatus {
        identity: Identity,
    },
    /// Clear the check-in cooldown; progress is kept.
    ResetCheckIn {
        identity: Identity,
    },
    SetEmail {
        #[command(flatten)]
        target: Target,
        value: String,
    },
    SetWallet {
        #[command(flatten)]
        target: Target,
        value: String,
    },
    SetHandle {
        #[command(flatten)]
        target: Target,
        value: String,
    },
    Profile {
        identity: Identity,
    },
    LockProfiles,
    UnlockProfiles,
    /// Point holders missing an email or wallet.
    IncompleteProfiles,
    /// Remove the balances and ledger rows of the given identities.
    Remove {
        #[arg(long, value_delimiter = ',', required = true)]
        targets: Vec<Identity>,
    },
    /// Wipe every balance. Ledger rows are kept, marked removed.
    ResetAll {
        #[arg(long)]
        yes: bool,
    },
    /// Check the store and report problems.
    Integrity,
}

fn load_config(cli: &Cli) -> anyhow::Result<DaemonConfig> {
    let mut config = match &cli.config {
        Some(path) => DaemonConfig::from_toml_file(path)?,
        None => DaemonConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format, &config.log_level)?;
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded config");
    }

    check_data_dir(&config.data_dir).map_err(anyhow::Error::msg)?;
    let env = LmdbEnvironment::open_default(&config.data_dir)
        .with_context(|| format!("failed to open store at {}", config.data_dir.display()))?;
    let version = Migrator::run(&env)?;
    tracing::debug!(version, "store schema ready");

    let report = check_integrity(&env)?;
    if !report.is_healthy() {
        for error in &report.errors {
            tracing::warn!(%error, "integrity problem");
        }
    }

    if let Command::Integrity = cli.command {
        println!(
            "checked {} databases, {} entries",
            report.databases_checked, report.total_entries
        );
        for error in &report.errors {
            println!("  {error}");
        }
        return Ok(if report.is_healthy() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(EXIT_REJECTED)
        });
    }

    let verifier = AuthorityVerifier::from_config(&config.verifier)?;

    let actor_name = cli
        .actor_name
        .clone()
        .unwrap_or_else(|| cli.actor.to_string());
    let app = App::new(
        Arc::new(env),
        verifier,
        SystemClock,
        Member::new(cli.actor.clone(), actor_name),
        config.max_grant,
        config.points,
        config.check_in,
        config.profile,
    );

    match dispatch(&app, cli.command).await {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(CommandError::Rejected { code, message }) => {
            tracing::info!(code, "request rejected");
            eprintln!("rejected ({code}): {message}");
            Ok(ExitCode::from(EXIT_REJECTED))
        }
        Err(CommandError::Failed(e)) => Err(e.into()),
    }
}

async fn dispatch(
    app: &App<LmdbEnvironment, AuthorityVerifier, SystemClock>,
    command: Command,
) -> Result<Output, CommandError> {
    match command {
        Command::Credit {
            target,
            amount,
            message,
        } => app.credit(&target.member(), amount, message),
        Command::Grant {
            target,
            amount,
            category,
            message,
        } => app.grant(&target.member(), amount, category, message),
        Command::Balance { identity } => app.balance(&identity),
        Command::History {
            identity,
            include_removed,
        } => app.history(&identity, include_removed),
        Command::CheckIn { target } => app.check_in(&target.member()),
        Command::CheckInStatus { identity } => app.check_in_status(&identity),
        Command::ResetCheckIn { identity } => app.reset_check_in(&identity),
        Command::SetEmail { target, value } => {
            app.set_field(&target.member(), ProfileField::Email, &value)
                .await
        }
        Command::SetWallet { target, value } => {
            app.set_field(&target.member(), ProfileField::WalletAddress, &value)
                .await
        }
        Command::SetHandle { target, value } => {
            app.set_field(&target.member(), ProfileField::Handle, &value)
                .await
        }
        Command::Profile { identity } => app.profile(&identity),
        Command::LockProfiles => app.lock_profiles(true),
        Command::UnlockProfiles => app.lock_profiles(false),
        Command::IncompleteProfiles => app.incomplete_profiles(),
        Command::Remove { targets } => app.remove(&targets),
        Command::ResetAll { yes } => {
            if !yes {
                return Err(CommandError::Rejected {
                    code: "confirmation_required",
                    message: "reset-all wipes every balance; pass --yes to confirm".to_string(),
                });
            }
            app.reset_all()
        }
        Command::Integrity => Ok(Vec::new()),
    }
}

//! Operator command-line interface for the Commons cooperative ledger.
//!
//! Thin glue over the core crates: every command either appends an event,
//! mutates the agent registry, or reads projected state. No accounting
//! logic lives here.
//!
//! # Commands
//!
//! - `init` -- initialize a fresh store with a bootstrap agent
//! - `register` / `disenroll` -- agent lifecycle
//! - `contribute` -- append a contribution event
//! - `accounts` -- print projected capital accounts
//! - `agents` -- print the agent registry
//! - `log` -- print the raw event log, one JSON record per line

mod config;
mod error;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use commons_accounts::project;
use commons_ledger::{Ledger, StoreConfig};
use commons_types::{
    Agent, AgentAddress, CapitalAccount, ContributionCategory, ContributionCycle, EventBody,
    EventDraft, Role, Tier,
};

use crate::config::LedgerConfig;
use crate::error::CliError;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "commons", about = "Event-sourced cooperative ledger", version)]
struct Cli {
    /// Path of the YAML configuration file (default: `commons.yaml` if it
    /// exists, else built-in defaults).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the data directory from config.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// The operation to perform.
    #[command(subcommand)]
    command: Command,
}

/// Operator commands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Initialize a fresh store with a bootstrap agent.
    Init {
        /// Address of the bootstrap agent.
        address: AgentAddress,
        /// Display name of the bootstrap agent.
        name: String,
        /// Role of the bootstrap agent.
        #[arg(long, default_value_t = Role::Steward)]
        role: Role,
        /// Tier of the bootstrap agent.
        #[arg(long, default_value_t = Tier::Cooperative)]
        tier: Tier,
    },

    /// Enroll an agent (registry record + enrollment event).
    Register {
        /// Address of the agent.
        address: AgentAddress,
        /// Display name of the agent.
        name: String,
        /// Role of the agent.
        #[arg(long, default_value_t = Role::Member)]
        role: Role,
        /// Tier of the agent.
        #[arg(long, default_value_t = Tier::Community)]
        tier: Tier,
    },

    /// Disenroll an agent (sets inactive + disenrollment event).
    Disenroll {
        /// Address of the agent.
        address: AgentAddress,
    },

    /// Append a contribution event.
    Contribute {
        /// Address of the contributing agent.
        agent: AgentAddress,
        /// Contribution category (labor, revenue, community, infrastructure).
        category: ContributionCategory,
        /// Contribution value.
        value: Decimal,
        /// Free-text description of the work.
        description: String,
        /// Accounting cycle the contribution falls in.
        #[arg(long, default_value_t = ContributionCycle::Day)]
        cycle: ContributionCycle,
        /// Unit of account.
        #[arg(long, default_value = "SUP")]
        unit: String,
    },

    /// Print projected capital accounts.
    Accounts,

    /// Print the agent registry.
    Agents,

    /// Print the raw event log, one JSON record per line.
    Log,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration loading, store access, or the
/// requested operation fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    let mut store_config = config.store.to_store_config();
    if let Some(data_dir) = cli.data_dir {
        store_config.data_dir = data_dir;
    }
    let ledger = Ledger::open(&store_config);

    run(&cli.command, &ledger, &store_config)?;
    Ok(())
}

/// Load configuration from the explicit path, `commons.yaml` if present,
/// or built-in defaults.
fn load_config(path: Option<&std::path::Path>) -> Result<LedgerConfig, CliError> {
    if let Some(path) = path {
        return Ok(LedgerConfig::from_file(path)?);
    }
    let default_path = std::path::Path::new("commons.yaml");
    if default_path.exists() {
        return Ok(LedgerConfig::from_file(default_path)?);
    }
    Ok(LedgerConfig::default())
}

/// Dispatch a command against the opened ledger.
fn run(command: &Command, ledger: &Ledger, store_config: &StoreConfig) -> Result<(), CliError> {
    match command {
        Command::Init {
            address,
            name,
            role,
            tier,
        } => {
            let events_path = store_config.events_path();
            if events_path.exists() {
                return Err(CliError::AlreadyInitialized { path: events_path });
            }
            let agent = register(ledger, address, name, *role, *tier)?;
            info!(address = %agent.address, "store initialized");
            println!("initialized store in {}", store_config.data_dir.display());
            println!("bootstrap agent: {} ({})", agent.address, agent.name);
            Ok(())
        }

        Command::Register {
            address,
            name,
            role,
            tier,
        } => {
            let agent = register(ledger, address, name, *role, *tier)?;
            println!("registered {} ({})", agent.address, agent.name);
            Ok(())
        }

        Command::Disenroll { address } => {
            let (agent, _event) = ledger.disenroll(address)?;
            println!("disenrolled {} ({})", agent.address, agent.name);
            Ok(())
        }

        Command::Contribute {
            agent,
            category,
            value,
            description,
            cycle,
            unit,
        } => {
            let stored = ledger.events().append(EventDraft::new(EventBody::Contribution {
                agent_id: agent.clone(),
                cycle: *cycle,
                category: *category,
                value: *value,
                unit: unit.clone(),
                description: description.clone(),
                evidence: None,
            }))?;
            println!("recorded contribution {}", stored.id);
            Ok(())
        }

        Command::Accounts => {
            let events = ledger.events().read_all()?;
            let agents = ledger.agents().load_all()?;
            let projection = project(&events, &agents);
            if projection.unknown_agent_skips > 0 {
                warn!(
                    skips = projection.unknown_agent_skips,
                    "events referenced agents missing from the registry"
                );
            }
            for account in projection.accounts.values() {
                print_account(account);
            }
            Ok(())
        }

        Command::Agents => {
            for agent in ledger.agents().load_all()?.values() {
                print_agent(agent);
            }
            Ok(())
        }

        Command::Log => {
            for event in ledger.events().read_all()? {
                println!("{}", serde_json::to_string(&event)?);
            }
            Ok(())
        }
    }
}

/// Build and register an agent enrolled now.
fn register(
    ledger: &Ledger,
    address: &AgentAddress,
    name: &str,
    role: Role,
    tier: Tier,
) -> Result<Agent, CliError> {
    let agent = Agent {
        address: address.clone(),
        name: name.to_owned(),
        role,
        tier,
        enrolled_at: Utc::now().timestamp(),
        active: true,
        payment_stream: None,
    };
    Ok(ledger.register(agent)?)
}

/// Print one projected capital account.
fn print_account(account: &CapitalAccount) {
    println!("{} ({})", account.address, account.name);
    println!(
        "  contributions: labor {}, revenue {}, community {}, infrastructure {}, total {}",
        account.contributions.labor,
        account.contributions.revenue,
        account.contributions.community,
        account.contributions.infrastructure,
        account.contributions.total,
    );
    println!(
        "  allocations:   individual {}, pool {}, total {}",
        account.allocations.individual, account.allocations.pool, account.allocations.total,
    );
    println!("  distributions: {}", account.distributions.total);
    if account.balances.is_empty() {
        println!("  balances:      (none)");
    } else {
        for (unit, balance) in &account.balances {
            println!("  balance {unit}: {balance}");
        }
    }
    let last = account
        .last_updated
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map_or_else(|| "never".to_owned(), |dt: DateTime<Utc>| dt.to_rfc3339());
    println!("  last updated:  {last}");
}

/// Print one registry record.
fn print_agent(agent: &Agent) {
    let status = if agent.active { "active" } else { "inactive" };
    println!(
        "{} ({}) role={} tier={} {status}",
        agent.address, agent.name, agent.role, agent.tier,
    );
    if let Some(stream) = &agent.payment_stream {
        println!(
            "  stream: {} at {}/s since {}",
            stream.token, stream.flow_rate, stream.started_at,
        );
    }
}

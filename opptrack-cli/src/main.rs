//! Opptrack CLI - sales opportunities in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod screen;

use commands::{add, auth, clear, config, delete, list, logout, show, update, whoami};

/// Environment variable holding the log filter
const LOG_ENV: &str = "OPPTRACK_LOG";

/// Opptrack - track sales opportunities from the terminal
#[derive(Parser)]
#[command(name = "opp", version, about, long_about = None)]
struct Cli {
    /// Log requests and decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted for when omitted)
        #[arg(long, env = "OPPTRACK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign in to an existing account
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted for when omitted)
        #[arg(long, env = "OPPTRACK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// List your opportunities
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add an opportunity
    Add {
        /// Opportunity name
        name: String,
        /// Monetary value, e.g. 1500 or 1250.50
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Show one opportunity
    Show {
        /// Opportunity ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change the name, value or status of an opportunity
    Update {
        /// Opportunity ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        value: Option<String>,
        /// New status (open, won, lost, ...)
        #[arg(long)]
        status: Option<String>,
    },

    /// Delete an opportunity
    Delete {
        /// Opportunity ID
        id: String,
    },

    /// Delete all of your opportunities
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Sign out on this machine
    Logout,

    /// Show the signed-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage client settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr subscriber; `OPPTRACK_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Signup { username, email, password } => auth::run_signup(username, email, password),
        Commands::Login { email, password } => auth::run_login(email, password),
        Commands::List { json } => list::run(json),
        Commands::Add { name, value } => add::run(name, value),
        Commands::Show { id, json } => show::run(&id, json),
        Commands::Update { id, name, value, status } => update::run(&id, name, value, status),
        Commands::Delete { id } => delete::run(&id),
        Commands::Clear { force } => clear::run(force),
        Commands::Logout => logout::run(),
        Commands::Whoami { json } => whoami::run(json),
        Commands::Config { command } => config::run(command),
    }
}

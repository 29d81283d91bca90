//! CLI command implementations

pub mod add;
pub mod auth;
pub mod clear;
pub mod config;
pub mod delete;
pub mod list;
pub mod logout;
pub mod show;
pub mod update;
pub mod whoami;

use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;

use opptrack_core::services::{ActionOutcome, OpportunityService};
use opptrack_core::{Error, OpptrackContext};

use crate::screen::TerminalScreen;

/// Get the opptrack directory from environment or default
pub fn get_opptrack_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("OPPTRACK_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".opptrack"))
        .context("Could not find home directory")
}

/// Get or create opptrack context
pub fn get_context() -> Result<OpptrackContext> {
    let opptrack_dir = get_opptrack_dir()?;
    OpptrackContext::new(&opptrack_dir).context("Failed to initialize opptrack context")
}

/// Page service for the signed-in user
pub fn get_page(ctx: &OpptrackContext) -> Result<OpportunityService> {
    match ctx.opportunity_service() {
        Ok(service) => Ok(service),
        Err(Error::Session(_)) => anyhow::bail!("Not logged in. Use 'opp login' first."),
        Err(e) => Err(e.into()),
    }
}

/// Runtime shared by every request of one invocation
///
/// The HTTP client's pooled connections belong to the runtime they were
/// opened on, so one command never uses two.
pub fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

/// Run an action to completion with a spinner on screen
pub fn perform<F>(rt: &Runtime, screen: &TerminalScreen, msg: &str, action: F) -> ActionOutcome
where
    F: Future<Output = ActionOutcome>,
{
    screen.start_spinner(msg);
    let outcome = rt.block_on(action);
    screen.stop_spinner();
    tracing::debug!(?outcome, "Action finished");
    outcome
}

/// Exit status for an action whose feedback is already on screen
pub fn exit_code(outcome: ActionOutcome) -> ExitCode {
    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

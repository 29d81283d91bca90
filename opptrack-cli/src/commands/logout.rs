//! Logout command - forget the session on this machine

use std::process::ExitCode;

use anyhow::Result;

use opptrack_core::services::ActionOutcome;

use super::{exit_code, get_context};
use crate::output;
use crate::screen::TerminalScreen;

pub fn run() -> Result<ExitCode> {
    let ctx = get_context()?;
    let screen = TerminalScreen::new(false);
    let outcome = ctx.auth_service.logout(&screen);
    if outcome == ActionOutcome::Completed {
        output::success("Logged out");
    }
    Ok(exit_code(outcome))
}

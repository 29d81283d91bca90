//! List command - show the signed-in user's opportunities

use std::process::ExitCode;

use anyhow::Result;

use super::{exit_code, get_context, get_page, perform, runtime};
use crate::screen::TerminalScreen;

pub fn run(json: bool) -> Result<ExitCode> {
    let ctx = get_context()?;
    let service = get_page(&ctx)?;

    let rt = runtime()?;
    let screen = TerminalScreen::new(json);
    let outcome = perform(&rt, &screen, "Loading opportunities...", service.open_page(&screen));

    Ok(exit_code(outcome))
}

//! Clear command - delete every opportunity of the user

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;

use opptrack_core::services::ActionOutcome;

use super::{exit_code, get_context, get_page, perform, runtime};
use crate::output;
use crate::screen::TerminalScreen;

pub fn run(force: bool) -> Result<ExitCode> {
    let ctx = get_context()?;
    let service = get_page(&ctx)?;

    let mut screen = TerminalScreen::new(false);
    if force {
        screen = screen.assume_yes();
    }

    let rt = runtime()?;
    let outcome = perform(&rt, &screen, "Clearing opportunities...", service.clear_all(&screen));

    match outcome {
        ActionOutcome::Completed => output::success("All opportunities deleted"),
        ActionOutcome::Cancelled => println!("{}", "Cancelled".dimmed()),
        _ => {}
    }
    Ok(exit_code(outcome))
}

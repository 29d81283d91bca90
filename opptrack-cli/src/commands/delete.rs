//! Delete command - remove one opportunity

use std::process::ExitCode;

use anyhow::Result;

use opptrack_core::services::ActionOutcome;

use super::{exit_code, get_context, get_page, perform, runtime};
use crate::output;
use crate::screen::TerminalScreen;

pub fn run(id: &str) -> Result<ExitCode> {
    let ctx = get_context()?;
    let service = get_page(&ctx)?;

    let rt = runtime()?;
    let screen = TerminalScreen::new(false);
    let outcome = perform(&rt, &screen, "Deleting opportunity...", service.delete_opportunity(&screen, id));

    if outcome == ActionOutcome::Completed {
        output::success(&format!("Deleted {}", id));
    }
    Ok(exit_code(outcome))
}

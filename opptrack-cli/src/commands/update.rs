//! Update command - change fields of an opportunity

use std::process::ExitCode;

use anyhow::Result;

use opptrack_core::domain::OpportunityChanges;
use opptrack_core::services::ActionOutcome;

use super::{exit_code, get_context, get_page, perform, runtime};
use crate::output;
use crate::screen::TerminalScreen;

pub fn run(
    id: &str,
    name: Option<String>,
    value: Option<String>,
    status: Option<String>,
) -> Result<ExitCode> {
    let ctx = get_context()?;
    let service = get_page(&ctx)?;

    let changes = OpportunityChanges { name, value, status };
    let rt = runtime()?;
    let screen = TerminalScreen::new(false);
    let outcome = perform(
        &rt,
        &screen,
        "Updating opportunity...",
        service.update_opportunity(&screen, id, &changes),
    );

    if outcome == ActionOutcome::Completed {
        output::success(&format!("Updated {}", id));
    }
    Ok(exit_code(outcome))
}

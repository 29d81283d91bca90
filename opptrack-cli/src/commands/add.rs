//! Add command - create an opportunity

use std::process::ExitCode;

use anyhow::Result;

use opptrack_core::domain::OpportunityForm;
use opptrack_core::services::ActionOutcome;

use super::{exit_code, get_context, get_page, perform, runtime};
use crate::output;
use crate::screen::TerminalScreen;

pub fn run(name: String, value: String) -> Result<ExitCode> {
    let ctx = get_context()?;
    let service = get_page(&ctx)?;

    let rt = runtime()?;
    let screen = TerminalScreen::new(false);
    let form = OpportunityForm::new(name, value);
    let outcome = perform(&rt, &screen, "Adding opportunity...", service.add_opportunity(&screen, &form));

    if outcome == ActionOutcome::Completed {
        output::success(&format!("Added '{}'", form.name));
    }
    Ok(exit_code(outcome))
}

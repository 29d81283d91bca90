//! Whoami command - show the signed-in user

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<ExitCode> {
    let ctx = get_context()?;
    let session = ctx.session();

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(if session.is_some() { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    match session {
        Some(session) => {
            println!("{}", session.display_name().bold());
            println!("  {} {}", "User ID:".dimmed(), session.user_id);
            println!("  {} {}", "Server:".dimmed(), ctx.api.base_url());
            Ok(ExitCode::SUCCESS)
        }
        None => {
            output::warning("Not logged in. Use 'opp login' first.");
            Ok(ExitCode::FAILURE)
        }
    }
}

//! Signup and login commands
//!
//! A successful sign-in moves on to the opportunities list, as the browser
//! did after the redirect.

use std::process::ExitCode;

use anyhow::{Context, Result};
use dialoguer::{Input, Password};
use tokio::runtime::Runtime;

use opptrack_core::domain::{LoginForm, Route, SignupForm};
use opptrack_core::services::ActionOutcome;
use opptrack_core::OpptrackContext;

use super::{exit_code, get_context, get_page, perform, runtime};
use crate::output;
use crate::screen::TerminalScreen;

pub fn run_signup(
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<ExitCode> {
    let ctx = get_context()?;
    let form = SignupForm {
        username: prompt_text("Username", username)?,
        email: prompt_text("Email", email)?,
        password: prompt_password(password)?,
    };

    let rt = runtime()?;
    let screen = TerminalScreen::new(false);
    let outcome = perform(&rt, &screen, "Creating account...", ctx.auth_service.signup(&screen, &form));
    if outcome != ActionOutcome::Completed {
        return Ok(exit_code(outcome));
    }

    output::success("Account created");
    follow_navigation(&rt, &ctx, &screen)
}

pub fn run_login(email: Option<String>, password: Option<String>) -> Result<ExitCode> {
    let ctx = get_context()?;
    let form = LoginForm {
        email: prompt_text("Email", email)?,
        password: prompt_password(password)?,
    };

    let rt = runtime()?;
    let screen = TerminalScreen::new(false);
    let outcome = perform(&rt, &screen, "Logging in...", ctx.auth_service.login(&screen, &form));
    if outcome != ActionOutcome::Completed {
        return Ok(exit_code(outcome));
    }

    output::success("Logged in");
    follow_navigation(&rt, &ctx, &screen)
}

/// Open the page the action navigated to
fn follow_navigation(rt: &Runtime, ctx: &OpptrackContext, screen: &TerminalScreen) -> Result<ExitCode> {
    if screen.navigated() != Some(Route::Opportunities) {
        return Ok(ExitCode::SUCCESS);
    }
    let service = get_page(ctx).context("The server did not start a session")?;
    let outcome = perform(rt, screen, "Loading opportunities...", service.open_page(screen));
    Ok(exit_code(outcome))
}

/// Use the flag value, or ask for it on a terminal
///
/// Without a terminal a missing value stays empty and the form refuses it.
fn prompt_text(label: &str, given: Option<String>) -> Result<String> {
    if let Some(value) = given {
        return Ok(value);
    }
    if atty::isnt(atty::Stream::Stdin) {
        return Ok(String::new());
    }
    let value = Input::<String>::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

fn prompt_password(given: Option<String>) -> Result<String> {
    if let Some(password) = given {
        return Ok(password);
    }
    if atty::isnt(atty::Stream::Stdin) {
        return Ok(String::new());
    }
    let password = Password::new()
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()?;
    Ok(password)
}

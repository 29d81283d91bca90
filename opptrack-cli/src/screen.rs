//! Terminal implementation of the `Screen` port

use std::sync::Mutex;

use colored::Colorize;
use comfy_table::{Cell, CellAlignment};
use dialoguer::Confirm;
use indicatif::ProgressBar;
use serde::Serialize;

use opptrack_core::domain::Route;
use opptrack_core::ports::Screen;
use opptrack_core::view::{ListView, OpportunityRow};

use crate::output;

/// Prints to the terminal, asks on the terminal
///
/// In JSON mode only data goes to stdout; messages still go to stderr.
pub struct TerminalScreen {
    json: bool,
    assume_yes: bool,
    spinner: Mutex<Option<ProgressBar>>,
    navigated: Mutex<Option<Route>>,
}

impl TerminalScreen {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            assume_yes: false,
            spinner: Mutex::new(None),
            navigated: Mutex::new(None),
        }
    }

    /// Answer every confirmation with yes
    pub fn assume_yes(mut self) -> Self {
        self.assume_yes = true;
        self
    }

    /// Where the last action navigated to, if anywhere
    pub fn navigated(&self) -> Option<Route> {
        *self.navigated.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Show a spinner until [`TerminalScreen::stop_spinner`]
    pub fn start_spinner(&self, msg: &str) {
        if self.json {
            return;
        }
        *self.spinner.lock().unwrap_or_else(|p| p.into_inner()) = output::spinner(msg);
    }

    pub fn stop_spinner(&self) {
        if let Some(bar) = self.spinner.lock().unwrap_or_else(|p| p.into_inner()).take() {
            bar.finish_and_clear();
        }
    }

    /// Run `f` with the spinner hidden so its output is not overdrawn
    fn print<R>(&self, f: impl FnOnce() -> R) -> R {
        let spinner = self.spinner.lock().unwrap_or_else(|p| p.into_inner()).clone();
        match spinner {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }

    fn print_json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => self.print(|| println!("{}", text)),
            Err(e) => tracing::error!(error = %e, "Failed to serialize output"),
        }
    }
}

impl Screen for TerminalScreen {
    fn alert(&self, message: &str) {
        self.print(|| output::error(message));
    }

    fn show_error(&self, message: &str) {
        self.print(|| eprintln!("{} {}", "Error:".red(), message));
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        // Nobody to ask, so nothing gets deleted
        if atty::isnt(atty::Stream::Stdin) {
            tracing::warn!("Not a terminal, declining: {}", prompt);
            return false;
        }
        self.print(|| {
            Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
                .unwrap_or(false)
        })
    }

    fn navigate(&self, route: Route) {
        tracing::debug!(route = %route, "Navigate");
        *self.navigated.lock().unwrap_or_else(|p| p.into_inner()) = Some(route);
    }

    fn set_username(&self, username: &str) {
        if !self.json {
            self.print(|| println!("{}", format!("Signed in as {}", username).dimmed()));
        }
    }

    fn render_list(&self, view: &ListView) {
        if self.json {
            self.print_json(view);
            return;
        }

        match view {
            ListView::Empty { message } => self.print(|| output::info(message)),
            ListView::Items { rows } => {
                let mut table = output::create_table();
                table.set_header(vec!["ID", "Name", "Value", "Status"]);
                for row in rows {
                    table.add_row(vec![
                        Cell::new(&row.id),
                        Cell::new(&row.name),
                        Cell::new(&row.value).set_alignment(CellAlignment::Right),
                        Cell::new(&row.status).fg(output::status_color(&row.status)),
                    ]);
                }
                self.print(|| println!("{table}"));
            }
        }
    }

    fn render_detail(&self, row: &OpportunityRow) {
        if self.json {
            self.print_json(row);
            return;
        }

        let mut table = output::create_table();
        table.add_row(vec![Cell::new("ID"), Cell::new(&row.id)]);
        table.add_row(vec![Cell::new("Name"), Cell::new(&row.name)]);
        table.add_row(vec![Cell::new("Value"), Cell::new(&row.value)]);
        table.add_row(vec![
            Cell::new("Status"),
            Cell::new(&row.status).fg(output::status_color(&row.status)),
        ]);
        self.print(|| println!("{table}"));
    }

    fn clear_opportunity_form(&self) {
        // Arguments do not outlive the run
        tracing::trace!("Form cleared");
    }
}

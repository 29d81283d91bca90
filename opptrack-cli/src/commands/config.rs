//! Config command - view and change client settings

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use serde_json::json;

use opptrack_core::config::{Config, BASE_URL_ENV};
use opptrack_core::COOKIE_JAR_FILE;

use super::get_opptrack_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Point the client at a different backend
    SetUrl {
        /// Backend origin, e.g. http://localhost:8080
        url: String,
    },
}

pub fn run(command: ConfigCommands) -> Result<ExitCode> {
    let opptrack_dir = get_opptrack_dir()?;

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&opptrack_dir)?;
            let source = if config.base_url_from_env { BASE_URL_ENV } else { "settings.json" };

            if json {
                let value = json!({
                    "baseUrl": config.base_url,
                    "baseUrlSource": source,
                    "timeoutSecs": config.timeout_secs,
                    "directory": opptrack_dir.display().to_string(),
                    "cookieJar": opptrack_dir.join(COOKIE_JAR_FILE).display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(ExitCode::SUCCESS);
            }

            let mut table = output::create_table();
            table.set_header(vec!["Setting", "Value"]);
            table.add_row(vec!["Base URL".to_string(), format!("{} ({})", config.base_url, source)]);
            table.add_row(vec!["Timeout".to_string(), format!("{}s", config.timeout_secs)]);
            table.add_row(vec!["Directory".to_string(), opptrack_dir.display().to_string()]);
            table.add_row(vec![
                "Cookie jar".to_string(),
                opptrack_dir.join(COOKIE_JAR_FILE).display().to_string(),
            ]);
            println!("{table}");
            Ok(ExitCode::SUCCESS)
        }
        ConfigCommands::SetUrl { url } => {
            std::fs::create_dir_all(&opptrack_dir)
                .with_context(|| format!("Failed to create {}", opptrack_dir.display()))?;

            let mut config = Config::load(&opptrack_dir)?;
            config.set_base_url(&url)?;
            config.save(&opptrack_dir)?;
            output::success(&format!("Backend set to {}", config.base_url));

            if config_overridden() {
                output::warning(&format!("{} is set and takes precedence", BASE_URL_ENV));
            }
            println!("{}", "Log in again if the new backend issued no session.".dimmed());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn config_overridden() -> bool {
    std::env::var(BASE_URL_ENV).is_ok_and(|v| !v.is_empty())
}

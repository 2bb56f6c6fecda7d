//! Administrative command handlers.
//!
//! CLI commands for inspecting the effective CORS policy without starting
//! the server.

use crate::config::Config;
use crate::cors::CorsPolicy;
use crate::error::AppResult;
use clap::Subcommand;
use tracing::info;

/// Administrative commands available via CLI.
#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Print the effective CORS policy as JSON
    Policy,

    /// Report whether a browser origin would be granted access to /api/**
    CheckOrigin {
        /// Origin exactly as a browser would send it (e.g. http://localhost:5173)
        origin: String,
    },
}

/// Run an administrative command with the given configuration.
pub fn run(config: Config, admin_command: AdminCommands) -> AppResult<()> {
    let policy = CorsPolicy::from_config(&config.cors)?;

    match admin_command {
        AdminCommands::Policy => print_policy(&policy),
        AdminCommands::CheckOrigin { origin } => {
            check_origin(&policy, &origin);
            Ok(())
        }
    }
}

fn print_policy(policy: &CorsPolicy) -> AppResult<()> {
    let summary = serde_json::to_string_pretty(&policy.describe())?;
    println!("{}", summary);
    Ok(())
}

fn check_origin(policy: &CorsPolicy, origin: &str) {
    if policy.allows_origin(origin) {
        info!(origin = %origin, "Origin is allowed");
        println!("allowed: {}", origin);
    } else {
        info!(origin = %origin, "Origin is not allowed");
        println!("denied: {}", origin);
    }
}

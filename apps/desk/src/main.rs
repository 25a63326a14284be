//! # ServicePro Desk Entry Point
//!
//! Boots the desk state and, given a user, prints what that user would see
//! after login. Used to smoke-test a seed file and a configuration.
//!
//! ## Usage
//! ```bash
//! # Demo data, print config only
//! cargo run -p servicepro-desk
//!
//! # Log in as the demo technician and dump menu + stock report
//! cargo run -p servicepro-desk -- --user tech --password 123
//!
//! # Start from a seed file
//! SERVICEPRO_SEED_PATH=./data/seed.json cargo run -p servicepro-desk -- -u admin -p 123
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Read configuration from `SERVICEPRO_*`
//! 3. Load the seed (file or demo data)
//! 4. Build session + mock backend
//! 5. Optionally log in and print the landing view, menu and stock report

use std::env;

use tracing::{error, info};

use servicepro_desk::commands::{auth, config, inventory};
use servicepro_desk::error::ApiError;
use servicepro_desk::state::ConfigState;
use servicepro_desk::{init_tracing, load_seed, App};

#[tokio::main]
async fn main() {
    init_tracing();
    info!("Starting ServicePro desk");

    if let Err(e) = run().await {
        error!(error = %e, "Desk failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ApiError> {
    let args: Vec<String> = env::args().collect();

    let mut user: Option<String> = None;
    let mut password = String::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--user" | "-u" => {
                i += 1;
                user = args.get(i).cloned();
            }
            "--password" | "-p" => {
                i += 1;
                password = args.get(i).cloned().unwrap_or_default();
            }
            "--help" | "-h" => {
                println!("ServicePro Desk");
                println!();
                println!("Usage: servicepro-desk [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -u, --user <NAME>        Log in as this employee");
                println!("  -p, --password <PASS>    Password for --user");
                println!("  -h, --help               Show this help message");
                return Ok(());
            }
            other => {
                return Err(ApiError::validation(format!("Unknown argument: {}", other)));
            }
        }
        i += 1;
    }

    let settings = ConfigState::from_env();
    let seed = load_seed(&settings)?;
    let app = App::bootstrap(settings, seed);

    print_json(&config::get_config(&app.config))?;

    let Some(username) = user else {
        return Ok(());
    };

    let response = auth::login(&app.session, username, password)?;
    info!(
        employee = %response.employee.name,
        landing = ?response.landing_view,
        "Logged in"
    );
    print_json(&response)?;
    print_json(&inventory::get_stock_report(&app.session))?;

    let employees = app.backend.get_employees().await;
    info!(count = employees.len(), "Mock backend reachable");
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), ApiError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| ApiError::internal(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

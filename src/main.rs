//! atm-core - teller session runner
//!
//! ```text
//! ┌──────────┐    ┌───────────┐    ┌────────────┐    ┌──────────┐
//! │  Config  │───▶│ Directory │───▶│  Session   │───▶│  Report  │
//! │  (YAML)  │    │  (seeds)  │    │ (script)   │    │ (stdout) │
//! └──────────┘    └───────────┘    └────────────┘    └──────────┘
//! ```
//!
//! Usage:
//!   atm-core [--env dev] [--config path.yaml] --script session.txt [--json]

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};

use atm_core::config::AppConfig;
use atm_core::script::{parse_script, run};
use atm_core::session::SessionController;

fn get_arg(names: &[&str]) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if names.contains(&args[i].as_str()) && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

fn has_flag(name: &str) -> bool {
    std::env::args().any(|a| a == name)
}

fn load_config() -> Result<AppConfig> {
    match get_arg(&["--config", "-c"]) {
        Some(path) => AppConfig::from_path(path),
        None => {
            let env = get_arg(&["--env", "-e"]).unwrap_or_else(|| "dev".to_string());
            AppConfig::load(&env)
        }
    }
}

fn run_app() -> Result<bool> {
    let config = load_config()?;
    let _log_guard = atm_core::logging::init_logging(&config);

    let script_path = get_arg(&["--script", "-s"]).context("missing --script <file>")?;
    let text = fs::read_to_string(&script_path)
        .with_context(|| format!("Failed to read script: {}", script_path))?;
    let script = parse_script(&text)?;

    let mut directory = config.build_directory()?;
    tracing::info!(
        bank = %config.bank_name,
        accounts = directory.len(),
        verifier = directory.verifier_name(),
        steps = script.len(),
        "Terminal starting"
    );

    let reports = {
        let mut atm = SessionController::with_limits(&mut directory, config.terminal);
        let reports = run(&mut atm, &script);
        // A script that ends mid-session still returns the card
        if atm.state().has_card() {
            tracing::warn!(state = %atm.state(), "Script ended with a card in the slot");
            atm.eject_card();
        }
        reports
    };

    if has_flag("--json") {
        let out = serde_json::json!({
            "bank": config.bank_name,
            "steps": reports,
            "accounts": directory.snapshot(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("=== Welcome to {}! ===", config.bank_name);
        for report in &reports {
            println!("{}", report);
        }
        println!("--- balances ---");
        for row in directory.snapshot() {
            println!("{}  {:>12}", mask_id(&row.account_id), row.balance);
        }
    }

    let failures = reports.iter().filter(|r| !r.is_ok()).count();
    tracing::info!(steps = reports.len(), failures, "Terminal finished");
    Ok(failures == 0)
}

fn mask_id(id: &str) -> String {
    match atm_core::card::Card::new(id) {
        Ok(card) => card.masked_number(),
        Err(_) => id.to_string(),
    }
}

fn main() -> ExitCode {
    match run_app() {
        Ok(true) => ExitCode::SUCCESS,
        // Step failures are part of a normal run; report them via exit code only
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::bank::{AccountDirectory, PinHashing};
use crate::core_types::Amount;
use crate::logging::LogRotation;
use crate::session::TerminalLimits;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    #[serde(default)]
    pub rotation: LogRotation,
    /// Also echo log lines to stdout (text mode only)
    #[serde(default)]
    pub log_to_stdout: bool,
    /// Emit transaction events on the audit target
    #[serde(default = "default_true")]
    pub audit_events: bool,
    #[serde(default = "default_bank_name")]
    pub bank_name: String,
    #[serde(default)]
    pub terminal: TerminalLimits,
    #[serde(default)]
    pub pin_hashing: PinHashing,
    /// Accounts registered at startup
    #[serde(default)]
    pub accounts: Vec<SeedAccount>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SeedAccount {
    pub id: String,
    pub pin: String,
    #[serde(default)]
    pub balance: Amount,
}

fn default_true() -> bool {
    true
}

fn default_bank_name() -> String {
    "Global Bank".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "atm.log".to_string(),
            use_json: false,
            rotation: LogRotation::Never,
            log_to_stdout: false,
            audit_events: true,
            bank_name: default_bank_name(),
            terminal: TerminalLimits::default(),
            pin_hashing: PinHashing::default(),
            accounts: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml`
    pub fn load(env: &str) -> Result<Self> {
        Self::from_path(format!("config/{}.yaml", env))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).context("Failed to parse config yaml")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values serde accepts but the terminal cannot run with
    pub fn validate(&self) -> Result<()> {
        if let Some(limit) = self.terminal.max_withdrawal {
            ensure!(
                limit > 0,
                "terminal.max_withdrawal must be greater than zero, got {}",
                limit
            );
        }
        Ok(())
    }

    /// Build a directory with the configured verifier and seed accounts
    pub fn build_directory(&self) -> Result<AccountDirectory> {
        let mut directory = AccountDirectory::with_verifier(self.pin_hashing.verifier());
        for (i, seed) in self.accounts.iter().enumerate() {
            directory
                .register(&seed.id, &seed.pin, seed.balance)
                .with_context(|| format!("Failed to register seed account #{}", i))?;
        }
        Ok(directory)
    }
}

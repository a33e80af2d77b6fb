//! Session scripts
//!
//! A plain-text command list driven through a [`SessionController`], one
//! command per line:
//!
//! ```text
//! # comment
//! insert 4111111111111111
//! pin 1234
//! select
//! balance
//! deposit 50
//! withdraw 70
//! eject
//! ```
//!
//! Parse errors abort before anything runs. Session errors do not: each
//! failing step is reported and the script continues, like a customer
//! pressing the next button.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::card::Card;
use crate::core_types::Amount;
use crate::error::AtmError;
use crate::session::{SessionController, SessionState};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: '{command}' needs an argument")]
    MissingArgument { line: usize, command: &'static str },

    #[error("line {line}: '{command}' takes no argument")]
    UnexpectedArgument { line: usize, command: &'static str },

    #[error("line {line}: amount '{value}' is not an integer")]
    BadAmount { line: usize, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert(String),
    Pin(String),
    Select,
    Balance,
    Deposit(Amount),
    Withdraw(Amount),
    Eject,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Card numbers and PINs never appear in reports
            Command::Insert(number) => match Card::new(number) {
                Ok(card) => write!(f, "insert {}", card),
                Err(_) => write!(f, "insert <invalid card>"),
            },
            Command::Pin(_) => write!(f, "pin ****"),
            Command::Select => write!(f, "select"),
            Command::Balance => write!(f, "balance"),
            Command::Deposit(amount) => write!(f, "deposit {}", amount),
            Command::Withdraw(amount) => write!(f, "withdraw {}", amount),
            Command::Eject => write!(f, "eject"),
        }
    }
}

/// One parsed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

/// Parse a whole script. Blank lines and `#` comments are skipped; line
/// numbers are 1-based.
pub fn parse_script(text: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut out = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        if let Some(command) = parse_line(line, raw)? {
            out.push(ScriptLine { line, command });
        }
    }
    Ok(out)
}

/// Drop a trailing comment. `#` only opens a comment at the start of a
/// token, so `pin 12#4` keeps its argument intact.
fn strip_comment(raw: &str) -> &str {
    let mut token_start = true;
    for (i, c) in raw.char_indices() {
        if c == '#' && token_start {
            return &raw[..i];
        }
        token_start = c.is_whitespace();
    }
    raw
}

fn parse_line(line: usize, raw: &str) -> Result<Option<Command>, ScriptError> {
    let content = strip_comment(raw).trim();
    if content.is_empty() {
        return Ok(None);
    }

    let mut parts = content.split_whitespace();
    let Some(keyword) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next();
    let extra = parts.next();

    let command = match keyword.to_ascii_lowercase().as_str() {
        "insert" => Command::Insert(required(line, "insert", arg, extra)?.to_string()),
        "pin" => Command::Pin(required(line, "pin", arg, extra)?.to_string()),
        "select" => none(line, "select", arg, Command::Select)?,
        "balance" => none(line, "balance", arg, Command::Balance)?,
        "eject" => none(line, "eject", arg, Command::Eject)?,
        "deposit" => Command::Deposit(amount(line, required(line, "deposit", arg, extra)?)?),
        "withdraw" => Command::Withdraw(amount(line, required(line, "withdraw", arg, extra)?)?),
        _ => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: keyword.to_string(),
            });
        }
    };
    Ok(Some(command))
}

fn required<'a>(
    line: usize,
    command: &'static str,
    arg: Option<&'a str>,
    extra: Option<&str>,
) -> Result<&'a str, ScriptError> {
    if extra.is_some() {
        return Err(ScriptError::UnexpectedArgument { line, command });
    }
    arg.ok_or(ScriptError::MissingArgument { line, command })
}

fn none(
    line: usize,
    command: &'static str,
    arg: Option<&str>,
    parsed: Command,
) -> Result<Command, ScriptError> {
    match arg {
        Some(_) => Err(ScriptError::UnexpectedArgument { line, command }),
        None => Ok(parsed),
    }
}

fn amount(line: usize, value: &str) -> Result<Amount, ScriptError> {
    value.parse().map_err(|_| ScriptError::BadAmount {
        line,
        value: value.to_string(),
    })
}

// ============================================================================
// Execution
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Done,
    Balance { balance: Amount },
    Failed {
        code: &'static str,
        message: String,
        /// The session was in the wrong state for this command
        out_of_sequence: bool,
    },
}

impl From<AtmError> for StepOutcome {
    fn from(e: AtmError) -> Self {
        StepOutcome::Failed {
            code: e.code(),
            message: e.to_string(),
            out_of_sequence: e.is_session_precondition(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub line: usize,
    pub command: String,
    pub outcome: StepOutcome,
    /// Session state after the step
    pub state: SessionState,
}

impl StepReport {
    pub fn is_ok(&self) -> bool {
        !matches!(self.outcome, StepOutcome::Failed { .. })
    }
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:>3}] {:<32} ", self.line, self.command)?;
        match &self.outcome {
            StepOutcome::Done => write!(f, "OK")?,
            StepOutcome::Balance { balance } => write!(f, "OK balance={}", balance)?,
            StepOutcome::Failed {
                code,
                message,
                out_of_sequence,
            } => {
                write!(f, "ERR {} ({})", code, message)?;
                if *out_of_sequence {
                    write!(f, " out of sequence")?;
                }
            }
        }
        write!(f, " [{}]", self.state)
    }
}

/// Run one command against the controller
pub fn execute(atm: &mut SessionController<'_>, command: &Command) -> StepOutcome {
    let result = match command {
        Command::Insert(number) => Card::new(number)
            .and_then(|card| atm.insert_card(&card))
            .map(|_| None),
        Command::Pin(pin) => atm.enter_pin(pin).map(|_| None),
        Command::Select => atm.select_account().map(|_| None),
        Command::Balance => atm.view_balance().map(Some),
        Command::Deposit(amount) => atm.deposit(*amount).map(Some),
        Command::Withdraw(amount) => atm.withdraw(*amount).map(Some),
        Command::Eject => {
            atm.eject_card();
            Ok(None)
        }
    };

    match result {
        Ok(None) => StepOutcome::Done,
        Ok(Some(balance)) => StepOutcome::Balance { balance },
        Err(e) => e.into(),
    }
}

/// Run every line in order, collecting one report per line
pub fn run(atm: &mut SessionController<'_>, script: &[ScriptLine]) -> Vec<StepReport> {
    script
        .iter()
        .map(|step| {
            let outcome = execute(atm, &step.command);
            StepReport {
                line: step.line,
                command: step.command.to_string(),
                outcome,
                state: atm.state(),
            }
        })
        .collect()
}

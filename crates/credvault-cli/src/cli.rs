//! Argument parsing and command dispatch for the `credvault` binary
//!
//! Exit codes: `0` success, `1` a verified secret did not match, `2` any error.

use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use zeroize::Zeroizing;

use credvault_core::{KeyManager, KeyOrigin, StoreBackend};

use crate::commands;
use crate::error::Result;

pub const EXIT_OK: i32 = 0;
pub const EXIT_NO_MATCH: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// credvault - protect stored credentials with a keychain-held master key
#[derive(Parser, Debug)]
#[command(name = "credvault")]
#[command(version)]
#[command(about = "Protect stored credentials with a keychain-held master key")]
pub struct Args {
    /// Directory holding settings.json
    #[arg(long, env = "CREDVAULT_SETTINGS_DIR")]
    pub settings_dir: Option<PathBuf>,

    /// Override the configured secret store (auto, keychain, none)
    #[arg(long)]
    pub backend: Option<StoreBackend>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Create the master key if it does not exist yet
    Init,
    /// Show the secret store in use and whether a master key is present
    Status,
    /// Encrypt a secret read from the terminal and print the record as JSON
    Encrypt,
    /// Check a secret read from the terminal against a JSON record
    Verify {
        /// Record printed by `credvault encrypt`
        #[arg(long)]
        record: String,
    },
    /// Delete the master key. Every record encrypted under it becomes unrecoverable.
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

/// Process exit code for the outcome of [`run`]
pub fn exit_code(outcome: &Result<i32>) -> i32 {
    match outcome {
        Ok(code) => *code,
        Err(_) => EXIT_ERROR,
    }
}

/// Execute `command`, reading secrets through `prompt` and writing results to `out`.
///
/// Blocking: keychain calls and the terminal prompt both block.
pub fn run<P, W>(manager: &KeyManager, command: Command, mut prompt: P, out: &mut W) -> Result<i32>
where
    P: FnMut(&str) -> std::io::Result<String>,
    W: Write,
{
    match command {
        Command::Init => {
            let report = commands::init(manager)?;
            match (report.origin, report.persistent) {
                (KeyOrigin::Generated, true) => {
                    writeln!(out, "Created master key in {}", manager.backend_name())?
                }
                (KeyOrigin::Generated, false) => writeln!(
                    out,
                    "Created a master key for this run only; no secure storage on this host"
                )?,
                (KeyOrigin::Loaded, _) => {
                    writeln!(out, "Master key already present in {}", manager.backend_name())?
                }
            }
            Ok(EXIT_OK)
        }
        Command::Status => {
            let report = commands::status(manager)?;
            writeln!(out, "Backend:     {}", report.backend)?;
            writeln!(out, "Persistent:  {}", report.persistent)?;
            writeln!(
                out,
                "Master key:  {}",
                if report.key_present { "present" } else { "absent" }
            )?;
            Ok(EXIT_OK)
        }
        Command::Encrypt => {
            let secret = Zeroizing::new(prompt("Secret: ")?);
            let record = commands::encrypt(manager, &secret)?;
            writeln!(out, "{}", serde_json::to_string(&record)?)?;
            Ok(EXIT_OK)
        }
        Command::Verify { record } => {
            let candidate = Zeroizing::new(prompt("Secret: ")?);
            if commands::verify(manager, &record, &candidate)? {
                writeln!(out, "match")?;
                Ok(EXIT_OK)
            } else {
                writeln!(out, "no match")?;
                Ok(EXIT_NO_MATCH)
            }
        }
        Command::Reset { yes } => {
            commands::reset(manager, yes)?;
            if manager.is_persistent() {
                writeln!(out, "Master key deleted from {}", manager.backend_name())?;
            } else {
                writeln!(out, "No secure storage on this host; nothing to delete")?;
            }
            Ok(EXIT_OK)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use credvault_core::{KeyIdentity, MemoryStore, UnavailableStore};
    use std::sync::Arc;

    fn memory_manager() -> KeyManager {
        KeyManager::new(Arc::new(MemoryStore::new()), KeyIdentity::default())
    }

    fn answer(secret: &'static str) -> impl FnMut(&str) -> std::io::Result<String> {
        move |_| Ok(secret.to_string())
    }

    fn no_prompt(_: &str) -> std::io::Result<String> {
        panic!("command should not prompt")
    }

    fn run_captured<P>(manager: &KeyManager, command: Command, prompt: P) -> (Result<i32>, String)
    where
        P: FnMut(&str) -> std::io::Result<String>,
    {
        let mut out = Vec::new();
        let outcome = run(manager, command, prompt, &mut out);
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_verify_exit_codes() {
        let manager = memory_manager();
        run_captured(&manager, Command::Init, no_prompt).0.unwrap();

        let (outcome, record) = run_captured(&manager, Command::Encrypt, answer("hunter2"));
        assert_eq!(exit_code(&outcome), EXIT_OK);
        let record = record.trim().to_string();

        let (outcome, printed) = run_captured(
            &manager,
            Command::Verify { record: record.clone() },
            answer("hunter2"),
        );
        assert_eq!(exit_code(&outcome), EXIT_OK);
        assert_eq!(printed, "match\n");

        let (outcome, printed) =
            run_captured(&manager, Command::Verify { record }, answer("hunter3"));
        assert_eq!(exit_code(&outcome), EXIT_NO_MATCH);
        assert_eq!(printed, "no match\n");
    }

    #[test]
    fn test_errors_exit_with_two() {
        let manager = memory_manager();

        let (outcome, _) = run_captured(&manager, Command::Encrypt, answer("hunter2"));
        assert!(matches!(outcome, Err(CliError::KeyMissing)));
        assert_eq!(exit_code(&outcome), EXIT_ERROR);

        let (outcome, _) = run_captured(
            &manager,
            Command::Verify { record: "not json".to_string() },
            answer("hunter2"),
        );
        assert_eq!(exit_code(&outcome), EXIT_ERROR);

        let (outcome, printed) = run_captured(&manager, Command::Reset { yes: false }, no_prompt);
        assert!(matches!(outcome, Err(CliError::NotConfirmed)));
        assert_eq!(exit_code(&outcome), EXIT_ERROR);
        assert!(printed.is_empty());
    }

    #[test]
    fn test_prompt_failure_is_an_error() {
        let manager = memory_manager();
        run_captured(&manager, Command::Init, no_prompt).0.unwrap();

        let (outcome, _) = run_captured(&manager, Command::Encrypt, |_: &str| {
            Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "no tty"))
        });

        assert!(matches!(outcome, Err(CliError::Io(_))));
        assert_eq!(exit_code(&outcome), EXIT_ERROR);
    }

    #[test]
    fn test_reset_output_depends_on_persistence() {
        let manager = memory_manager();
        run_captured(&manager, Command::Init, no_prompt).0.unwrap();
        let (outcome, printed) = run_captured(&manager, Command::Reset { yes: true }, no_prompt);
        assert_eq!(exit_code(&outcome), EXIT_OK);
        assert_eq!(printed, "Master key deleted from In-Memory Store\n");

        let manager = KeyManager::new(Arc::new(UnavailableStore), KeyIdentity::default());
        let (outcome, printed) = run_captured(&manager, Command::Reset { yes: true }, no_prompt);
        assert_eq!(exit_code(&outcome), EXIT_OK);
        assert_eq!(printed, "No secure storage on this host; nothing to delete\n");
    }

    #[test]
    fn test_init_without_storage_prints_one_notice() {
        let manager = KeyManager::new(Arc::new(UnavailableStore), KeyIdentity::default());

        let (outcome, printed) = run_captured(&manager, Command::Init, no_prompt);

        assert_eq!(exit_code(&outcome), EXIT_OK);
        assert_eq!(printed.lines().count(), 1);
        assert!(printed.contains("this run only"));
    }

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "credvault",
            "--backend",
            "none",
            "verify",
            "--record",
            "{}",
        ])
        .unwrap();
        assert_eq!(args.backend, Some(StoreBackend::None));
        assert_eq!(args.command, Command::Verify { record: "{}".to_string() });

        let args = Args::try_parse_from(["credvault", "reset"]).unwrap();
        assert_eq!(args.command, Command::Reset { yes: false });

        assert!(Args::try_parse_from(["credvault", "--backend", "vault", "status"]).is_err());
        // Secrets are never taken from the command line
        assert!(Args::try_parse_from(["credvault", "encrypt", "hunter2"]).is_err());
    }
}

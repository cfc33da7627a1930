//! Expiry notification sinks

use std::{
    io::Write,
    process::Stdio,
};
use tokio::{process::Command, runtime::Handle};
use tracing::{debug, info};

/// Receives a single call each time the countdown expires
pub trait NotificationSink: Send + Sync {
    /// Alert the user that the countdown reached zero
    fn notify_expired(&self) -> Result<(), String>;
}

/// Rings the terminal bell on stderr
#[derive(Debug, Default)]
pub struct TerminalBell;

impl NotificationSink for TerminalBell {
    fn notify_expired(&self) -> Result<(), String> {
        let mut stderr = std::io::stderr().lock();
        stderr
            .write_all(b"\x07")
            .and_then(|_| stderr.flush())
            .map_err(|e| format!("Failed to ring terminal bell: {}", e))
    }
}

/// Drops every notification
#[derive(Debug, Default)]
pub struct Silent;

impl NotificationSink for Silent {
    fn notify_expired(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Spawns an external command (e.g. an audio player) without waiting for it
#[derive(Debug, Clone)]
pub struct CommandSink {
    program: String,
    args: Vec<String>,
}

impl CommandSink {
    /// Build a sink from a shell-style command line
    pub fn parse(command_line: &str) -> Result<Self, String> {
        let mut parts = shlex::split(command_line)
            .ok_or_else(|| format!("Invalid bell command: {}", command_line))?
            .into_iter();
        let program = parts
            .next()
            .ok_or_else(|| "Bell command is empty".to_string())?;

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl NotificationSink for CommandSink {
    fn notify_expired(&self) -> Result<(), String> {
        // tokio::process needs a reactor to reap the child.
        Handle::try_current()
            .map_err(|e| format!("No runtime available to run {}: {}", self.program, e))?;

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| format!("Failed to spawn {}: {}", self.program, e))?;

        debug!("Spawned bell command {} (pid {:?})", self.program, child.id());
        Ok(())
    }
}

/// Pick the sink matching the configured notification options
pub fn build_sink(silent: bool, bell_command: Option<&str>) -> Result<Box<dyn NotificationSink>, String> {
    if silent {
        info!("Expiry notifications disabled");
        return Ok(Box::new(Silent));
    }

    match bell_command {
        Some(command_line) => {
            let sink = CommandSink::parse(command_line)?;
            info!("Expiry notifications via command: {}", sink.program());
            Ok(Box::new(sink))
        }
        None => Ok(Box::new(TerminalBell)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_quoted_arguments() {
        let sink = CommandSink::parse("paplay '/usr/share/sounds/bell one.oga'").unwrap();
        assert_eq!(sink.program(), "paplay");
        assert_eq!(sink.args(), ["/usr/share/sounds/bell one.oga"]);
    }

    #[test]
    fn parse_rejects_empty_and_unbalanced_commands() {
        assert!(CommandSink::parse("   ").is_err());
        assert!(CommandSink::parse("paplay 'unterminated").is_err());
    }

    #[test]
    fn command_sink_errors_outside_runtime() {
        let sink = CommandSink::parse("true").unwrap();
        assert!(sink.notify_expired().is_err());
    }

    #[tokio::test]
    async fn command_sink_reports_missing_program() {
        let sink = CommandSink::parse("definitely-not-a-real-bell-program").unwrap();
        assert!(sink.notify_expired().is_err());
    }

    #[test]
    fn silent_flag_wins_over_command() {
        assert!(build_sink(true, Some("'broken")).is_ok());
        assert!(build_sink(false, Some("'broken")).is_err());
    }
}

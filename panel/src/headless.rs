use std::io::Write;

use anyhow::{Context, Result};
use panel_core::{Ack, StatusLine, StreamApi};

use crate::cli::HeadlessCommand;

/// One line describing a control acknowledgement
pub fn format_ack(command: HeadlessCommand, ack: &Ack) -> String {
    match &ack.message {
        Some(message) => format!("{}: HTTP {} - {}", command.name(), ack.http_status, message),
        None => format!("{}: HTTP {}", command.name(), ack.http_status),
    }
}

/// Send one control request and print the outcome
///
/// A failed status request prints the error indicator and fails the run.
pub async fn run(api: &dyn StreamApi, command: HeadlessCommand, out: &mut impl Write) -> Result<()> {
    let ack = match command {
        HeadlessCommand::Status => {
            let mut line = StatusLine::new();
            let result = api.status().await;
            match &result {
                Ok(status) => line.report(status),
                Err(_) => line.error(),
            }
            writeln!(out, "{}", line.text())?;
            result.context("Status request failed")?;
            return Ok(());
        }
        HeadlessCommand::Start => api.start().await,
        HeadlessCommand::Stop => api.stop().await,
        HeadlessCommand::Focus => api.focus().await,
    }
    .with_context(|| format!("{} request failed", command.name()))?;

    writeln!(out, "{}", format_ack(command, &ack))?;
    Ok(())
}

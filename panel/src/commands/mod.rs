use anyhow::{Result, anyhow};
use panel_core::StreamSource;

use crate::app::PanelAction;

/// Command handler for the `:` prompt
pub struct CommandHandler;

impl CommandHandler {
    /// Parse a command into the action it triggers
    ///
    /// An empty command does nothing.
    pub fn parse(command_str: &str) -> Result<Option<PanelAction>> {
        let parts: Vec<&str> = command_str.trim().splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let args = parts.get(1).map(|s| s.trim());

        let action = match cmd.as_str() {
            "start" => PanelAction::Start,
            "stop" => PanelAction::Stop,
            "status" | "refresh" => PanelAction::CheckStatus,
            "focus" => PanelAction::Focus,
            "source" | "src" => match args {
                Some(value) => PanelAction::SelectSource(value.parse::<StreamSource>()?),
                None => PanelAction::CycleSource,
            },
            "flv" => PanelAction::SelectSource(StreamSource::Flv),
            "hls" => PanelAction::SelectSource(StreamSource::Hls),
            "help" | "h" | "?" => PanelAction::ToggleHelp,
            "quit" | "exit" | "q" => PanelAction::Quit,
            "" => return Ok(None),
            _ => return Err(anyhow!("Unknown command: {}", cmd)),
        };

        Ok(Some(action))
    }
}

/// Handle a command string entered by the user
pub fn handle_command(command: &str) -> Result<Option<PanelAction>> {
    let result = CommandHandler::parse(command);
    if let Ok(Some(action)) = &result {
        log::debug!("Command {:?} -> {:?}", command, action);
    }
    result
}

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use panel_core::{
    PanelController, PauseOutcome, PlayerChange, PlayerFactory, StartReport, StatusOutcome, StopReport, StreamApi,
    StreamSource,
};
use ratatui::style::Color;

use crate::commands;
use crate::events::event_utils;

/// Something the user asked the panel to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Start,
    Stop,
    CheckStatus,
    Focus,
    SelectSource(StreamSource),
    /// Check the next source option
    CycleSource,
    ToggleHelp,
    Quit,
}

impl PanelAction {
    /// Whether the action waits on the server
    pub fn is_remote(self) -> bool {
        matches!(
            self,
            PanelAction::Start | PanelAction::Stop | PanelAction::CheckStatus | PanelAction::Focus
        )
    }

    /// Message shown while a remote action is in flight
    pub fn pending_message(self) -> &'static str {
        match self {
            PanelAction::Start => "Starting stream...",
            PanelAction::Stop => "Stopping stream...",
            PanelAction::CheckStatus => "Checking status...",
            PanelAction::Focus => "Requesting focus...",
            _ => "",
        }
    }
}

/// Control buttons in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Start,
    Stop,
    Status,
    Focus,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Start, Button::Stop, Button::Status, Button::Focus];

    pub fn label(self) -> &'static str {
        match self {
            Button::Start => "Start",
            Button::Stop => "Stop",
            Button::Status => "Status",
            Button::Focus => "Focus",
        }
    }

    /// Shortcut key
    pub fn key(self) -> char {
        match self {
            Button::Start => 's',
            Button::Stop => 'x',
            Button::Status => 'r',
            Button::Focus => 'f',
        }
    }

    pub fn action(self) -> PanelAction {
        match self {
            Button::Start => PanelAction::Start,
            Button::Stop => PanelAction::Stop,
            Button::Status => PanelAction::CheckStatus,
            Button::Focus => PanelAction::Focus,
        }
    }
}

// App state
pub struct App<A, F> {
    /// Controller owning the stream API, player and status line
    pub controller: PanelController<A, F>,
    /// Server the panel controls, shown in the title
    pub server_url: String,
    /// Index into `Button::ALL` of the focused button
    pub focused_button: usize,
    /// Status message to display
    pub status_message: Option<(String, Instant, Color)>,
    /// Whether the app should exit
    pub should_quit: bool,
    /// Help dialog visibility
    pub show_help: bool,
    /// Whether command mode is active
    pub command_mode: bool,
    /// Command buffer for command mode
    pub command_buffer: String,
}

impl<A, F> App<A, F>
where
    A: StreamApi,
    F: PlayerFactory,
{
    pub fn new(controller: PanelController<A, F>, server_url: impl Into<String>) -> Self {
        Self {
            controller,
            server_url: server_url.into(),
            focused_button: 0,
            status_message: None,
            should_quit: false,
            show_help: false,
            command_mode: false,
            command_buffer: String::new(),
        }
    }

    /// Set a status message with a color
    pub fn set_status(&mut self, message: impl Into<String>, color: Color) {
        let message_string = message.into();
        log::debug!("Status message: {} ({})", message_string, color);
        self.status_message = Some((message_string, Instant::now(), color));
    }

    pub fn is_command_mode(&self) -> bool {
        self.command_mode
    }

    pub fn enter_command_mode(&mut self) {
        self.command_mode = true;
        self.command_buffer.clear();
    }

    pub fn exit_command_mode(&mut self) {
        self.command_mode = false;
    }

    pub fn get_command_buffer(&self) -> &str {
        &self.command_buffer
    }

    pub fn focused(&self) -> Button {
        Button::ALL[self.focused_button % Button::ALL.len()]
    }

    /// Map a key press to an action, updating local UI state on the way
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<PanelAction> {
        if self.command_mode {
            return self.handle_command_key(key);
        }

        if let Some(step) = event_utils::button_step(&key) {
            let len = Button::ALL.len() as isize;
            self.focused_button = (self.focused_button as isize + step).rem_euclid(len) as usize;
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }

        match key.code {
            KeyCode::Enter => Some(self.focused().action()),
            KeyCode::Char(':') => {
                self.enter_command_mode();
                None
            }
            KeyCode::Char('1') => Some(PanelAction::SelectSource(StreamSource::Flv)),
            KeyCode::Char('2') => Some(PanelAction::SelectSource(StreamSource::Hls)),
            KeyCode::Char(' ') => Some(PanelAction::CycleSource),
            KeyCode::Char('h') | KeyCode::Char('?') => Some(PanelAction::ToggleHelp),
            KeyCode::Char('q') => Some(PanelAction::Quit),
            KeyCode::Esc => {
                self.show_help = false;
                None
            }
            KeyCode::Char(c) => Button::ALL
                .iter()
                .position(|b| b.key() == c)
                .map(|index| {
                    self.focused_button = index;
                    Button::ALL[index].action()
                }),
            _ => None,
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) -> Option<PanelAction> {
        match key.code {
            KeyCode::Esc => {
                self.exit_command_mode();
                None
            }
            KeyCode::Backspace => {
                if self.command_buffer.pop().is_none() {
                    self.exit_command_mode();
                }
                None
            }
            KeyCode::Enter => {
                let cmd = self.command_buffer.clone();
                self.exit_command_mode();
                match commands::handle_command(&cmd) {
                    Ok(action) => action,
                    Err(e) => {
                        self.set_status(format!("Error: {}", e), Color::Red);
                        None
                    }
                }
            }
            KeyCode::Char(c) => {
                self.command_buffer.push(c);
                None
            }
            _ => None,
        }
    }

    /// Run an action against the controller and report the outcome
    pub async fn perform(&mut self, action: PanelAction) {
        match action {
            PanelAction::Start => {
                let report = self.controller.start_stream().await;
                let (message, color) = describe_start(&report);
                self.set_status(message, color);
            }
            PanelAction::Stop => {
                let report = self.controller.stop_stream().await;
                let (message, color) = describe_stop(&report);
                self.set_status(message, color);
            }
            PanelAction::CheckStatus => match self.controller.check_status().await {
                StatusOutcome::Reported(_) => self.set_status("Status refreshed", Color::Blue),
                StatusOutcome::Failed(e) => self.set_status(format!("Status request failed: {}", e), Color::Red),
            },
            PanelAction::Focus => match self.controller.trigger_focus().await {
                Ok(ack) => self.set_status(format!("Focus requested (HTTP {})", ack.http_status), Color::Green),
                Err(e) => self.set_status(format!("Focus request failed: {}", e), Color::Red),
            },
            PanelAction::SelectSource(source) => self.select_source(source),
            PanelAction::CycleSource => {
                let next = match self.controller.selected_source() {
                    Some(StreamSource::Flv) => StreamSource::Hls,
                    Some(StreamSource::Hls) | None => StreamSource::Flv,
                };
                self.select_source(next);
            }
            PanelAction::ToggleHelp => {
                self.show_help = !self.show_help;
            }
            PanelAction::Quit => {
                self.should_quit = true;
            }
        }
    }

    fn select_source(&mut self, source: StreamSource) {
        match self.controller.select_source(source) {
            Ok(change) => self.set_status(
                format!("{} {} source", change_verb(change), source.label()),
                Color::Green,
            ),
            Err(e) => self.set_status(format!("Player error: {}", e), Color::Red),
        }
    }
}

fn change_verb(change: PlayerChange) -> &'static str {
    match change {
        PlayerChange::Created => "Playing",
        PlayerChange::Switched => "Switched to",
        PlayerChange::Unchanged => "Already playing",
    }
}

/// Status message summarising a start
pub fn describe_start(report: &StartReport) -> (String, Color) {
    if let Err(e) = &report.control {
        return (format!("Start request failed: {}", e), Color::Red);
    }
    match &report.player {
        Ok(change) => {
            let player = match change {
                PlayerChange::Created => "player created",
                PlayerChange::Switched => "player switched",
                PlayerChange::Unchanged => "player unchanged",
            };
            let message = match &report.status {
                StatusOutcome::Reported(_) => format!("Stream started, {}", player),
                StatusOutcome::Failed(_) => format!("Stream started, {}, status unavailable", player),
            };
            (message, Color::Green)
        }
        Err(e) => (format!("Player error: {}", e), Color::Red),
    }
}

/// Status message summarising a stop
pub fn describe_stop(report: &StopReport) -> (String, Color) {
    if let Err(e) = &report.control {
        return (format!("Stop request failed: {}", e), Color::Red);
    }
    match &report.pause {
        PauseOutcome::Paused => ("Stream stopped, player paused".to_string(), Color::Yellow),
        PauseOutcome::Unsupported | PauseOutcome::NoPlayer => ("Stream stopped".to_string(), Color::Yellow),
        PauseOutcome::Failed(e) => (format!("Stream stopped, pause failed: {}", e), Color::Red),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeApi, NullPlayerFactory, test_app};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_shortcut_keys_map_to_buttons() {
        let mut app = test_app(FakeApi::reporting("active"), Some(StreamSource::Flv));
        assert_eq!(app.handle_key_event(key(KeyCode::Char('s'))), Some(PanelAction::Start));
        assert_eq!(app.handle_key_event(key(KeyCode::Char('x'))), Some(PanelAction::Stop));
        assert_eq!(app.focused(), Button::Stop);
        assert_eq!(app.handle_key_event(key(KeyCode::Char('r'))), Some(PanelAction::CheckStatus));
        assert_eq!(app.handle_key_event(key(KeyCode::Char('f'))), Some(PanelAction::Focus));
        assert_eq!(
            app.handle_key_event(key(KeyCode::Char('2'))),
            Some(PanelAction::SelectSource(StreamSource::Hls))
        );
    }

    #[test]
    fn test_tab_moves_focus_and_enter_activates() {
        let mut app = test_app(FakeApi::reporting("active"), None);
        assert_eq!(app.handle_key_event(key(KeyCode::BackTab)), None);
        assert_eq!(app.focused(), Button::Focus);
        app.handle_key_event(key(KeyCode::Tab));
        app.handle_key_event(key(KeyCode::Tab));
        assert_eq!(app.focused(), Button::Stop);
        assert_eq!(app.handle_key_event(key(KeyCode::Enter)), Some(PanelAction::Stop));
    }

    #[test]
    fn test_command_mode_produces_actions() {
        let mut app = test_app(FakeApi::reporting("active"), None);
        assert_eq!(app.handle_key_event(key(KeyCode::Char(':'))), None);
        assert!(app.is_command_mode());

        for c in "source hls".chars() {
            assert_eq!(app.handle_key_event(key(KeyCode::Char(c))), None);
        }
        assert_eq!(app.get_command_buffer(), "source hls");
        assert_eq!(
            app.handle_key_event(key(KeyCode::Enter)),
            Some(PanelAction::SelectSource(StreamSource::Hls))
        );
        assert!(!app.is_command_mode());
    }

    #[test]
    fn test_bad_command_sets_error_status() {
        let mut app = test_app(FakeApi::reporting("active"), None);
        app.handle_key_event(key(KeyCode::Char(':')));
        app.handle_key_event(key(KeyCode::Char('z')));
        assert_eq!(app.handle_key_event(key(KeyCode::Enter)), None);

        let (message, _, color) = app.status_message.clone().unwrap();
        assert!(message.contains("Unknown command"));
        assert_eq!(color, Color::Red);
    }

    #[tokio::test]
    async fn test_start_then_source_change_reuses_player() {
        let factory = NullPlayerFactory::default();
        let controller = PanelController::new(
            FakeApi::reporting("active"),
            factory.clone(),
            Default::default(),
            Some(StreamSource::Flv),
        );
        let mut app = App::new(controller, "http://127.0.0.1:8000/");

        app.perform(PanelAction::Start).await;
        assert_eq!(app.controller.status_text(), "Status: active");
        app.perform(PanelAction::CycleSource).await;
        assert_eq!(app.controller.selected_source(), Some(StreamSource::Hls));
        assert_eq!(factory.created(), 1);

        let (message, _, _) = app.status_message.clone().unwrap();
        assert_eq!(message, "Switched to HLS source");
    }

    #[tokio::test]
    async fn test_failed_status_is_reported() {
        let mut app = test_app(FakeApi::failing(), None);
        app.perform(PanelAction::CheckStatus).await;

        assert_eq!(app.controller.status_text(), "Status: error");
        let (_, _, color) = app.status_message.clone().unwrap();
        assert_eq!(color, Color::Red);
    }

    #[tokio::test]
    async fn test_help_and_quit() {
        let mut app = test_app(FakeApi::reporting("active"), None);
        app.perform(PanelAction::ToggleHelp).await;
        assert!(app.show_help);
        app.handle_key_event(key(KeyCode::Esc));
        assert!(!app.show_help);
        app.perform(PanelAction::Quit).await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_failed_controls_are_shown_in_red() {
        let mut app = test_app(
            FakeApi::reporting("inactive").with_failing_controls(),
            Some(StreamSource::Flv),
        );

        app.perform(PanelAction::Start).await;
        let (message, _, color) = app.status_message.clone().unwrap();
        assert!(message.starts_with("Start request failed"));
        assert_eq!(color, Color::Red);
        assert!(app.controller.player_created());
        assert_eq!(app.controller.status_text(), "Status: inactive");

        app.perform(PanelAction::Stop).await;
        let (message, _, color) = app.status_message.clone().unwrap();
        assert!(message.starts_with("Stop request failed"));
        assert_eq!(color, Color::Red);

        app.perform(PanelAction::Focus).await;
        let (message, _, color) = app.status_message.clone().unwrap();
        assert!(message.starts_with("Focus request failed"));
        assert_eq!(color, Color::Red);
    }

    #[tokio::test]
    async fn test_reselecting_source_reports_already_playing() {
        let factory = NullPlayerFactory::default();
        let controller = PanelController::new(
            FakeApi::reporting("active"),
            factory.clone(),
            Default::default(),
            Some(StreamSource::Flv),
        );
        let mut app = App::new(controller, "http://127.0.0.1:8000/");

        app.perform(PanelAction::Start).await;
        app.perform(PanelAction::SelectSource(StreamSource::Flv)).await;
        assert_eq!(factory.created(), 1);
        let (message, _, _) = app.status_message.clone().unwrap();
        assert_eq!(message, "Already playing FLV source");
    }
}

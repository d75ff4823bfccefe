pub mod app;
pub mod components;

use crate::app::App;
use panel_core::{PlayerFactory, StreamApi};
use ratatui::Frame;

/// Draw the main UI
pub fn draw_ui<A: StreamApi, F: PlayerFactory>(f: &mut Frame, app: &App<A, F>) {
    let size = f.area();

    app::draw_panel_view(f, app, size);

    if let Some((msg, time, color)) = &app.status_message {
        app::draw_status_message(f, msg, *color, time.elapsed());
    }

    if app.is_command_mode() {
        app::draw_command_prompt(f, app.get_command_buffer());
    }

    if app.show_help {
        app::draw_help_dialog(f);
    }
}

use crate::app::App;
use crate::ui::components::*;
use panel_core::{PlayerFactory, StreamApi};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};
use std::time::Duration;

/// Draw the control panel
pub fn draw_panel_view<A: StreamApi, F: PlayerFactory>(f: &mut Frame, app: &App<A, F>, area: Rect) {
    f.render_widget(Block::default().style(Style::default().bg(Color::Black)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(5),    // Player
            Constraint::Length(3), // Source radio
            Constraint::Length(3), // Buttons
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    let title_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Stream Control ")
        .title_alignment(Alignment::Center);

    let title = Paragraph::new(Text::from(app.server_url.as_str()))
        .block(title_block)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    draw_player_pane(f, app, chunks[1]);

    f.render_widget(SourceRadio::new(app.controller.selected_source()), chunks[2]);

    let buttons = ControlButtons::new()
        .selected(Some(app.focused_button))
        .show_keyboard_hints(true);
    f.render_widget(buttons, chunks[3]);

    let status_style = if app.controller.status_line().is_error() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    let status = Paragraph::new(app.controller.status_text())
        .style(status_style)
        .alignment(Alignment::Center);
    f.render_widget(status, chunks[4]);

    let hints = Paragraph::new("h: help | :: command | q: quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hints, chunks[5]);
}

/// Draw what the player is bound to
pub fn draw_player_pane<A: StreamApi, F: PlayerFactory>(f: &mut Frame, app: &App<A, F>, area: Rect) {
    let label = Style::default().fg(Color::Green);

    let selected = match app.controller.resolved_source() {
        Some(resolved) => Line::from(vec![
            Span::styled("Selected: ", label),
            Span::raw(format!("{} ({}) ", resolved.source.label(), resolved.type_tag())),
            Span::styled(resolved.url, Style::default().fg(Color::Gray)),
        ]),
        None => Line::from(vec![
            Span::styled("Selected: ", label),
            Span::styled("none", Style::default().fg(Color::Yellow)),
        ]),
    };

    let player = match app.controller.player_url() {
        Some(url) => Line::from(vec![
            Span::styled("Player:   ", label),
            Span::styled(url.to_string(), Style::default().fg(Color::White)),
        ]),
        None => Line::from(vec![
            Span::styled("Player:   ", label),
            Span::styled("not started (press s)", Style::default().fg(Color::DarkGray)),
        ]),
    };

    let pane = Paragraph::new(Text::from(vec![selected, Line::from(""), player])).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Player ")
            .border_style(Style::default().fg(if app.controller.player_created() {
                Color::Green
            } else {
                Color::DarkGray
            })),
    );

    f.render_widget(pane, area);
}

/// Draw status message with fade effect
pub fn draw_status_message(f: &mut Frame, message: &str, color: Color, age: Duration) {
    let area = f.area();
    // Float above the buttons
    let message_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(11),
        width: area.width,
        height: 3.min(area.height),
    };

    let status_message = StatusMessage::new(message, color, age).max_age(Duration::from_secs(3));
    f.render_widget(status_message, message_area);
}

/// Draw command prompt
pub fn draw_command_prompt(f: &mut Frame, command: &str) {
    let area = f.area();
    let prompt_area = Rect::new(0, area.height.saturating_sub(1), area.width, 1);

    f.render_widget(Clear, prompt_area);

    let command_text = format!(":{}", command);
    let command_para = Paragraph::new(Text::from(command_text))
        .style(Style::default().fg(Color::Yellow).bg(Color::Black).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Left);

    f.render_widget(command_para, prompt_area);

    f.set_cursor_position((prompt_area.x + 1 + command.len() as u16, prompt_area.y));
}

/// Draw help dialog
pub fn draw_help_dialog(f: &mut Frame) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(HelpOverlay, area);
}

/// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

use crate::app::Button;
use panel_core::StreamSource;

/// Row of control buttons
pub struct ControlButtons {
    selected: Option<usize>,
    show_keyboard_hints: bool,
}

impl ControlButtons {
    pub fn new() -> Self {
        Self {
            selected: None,
            show_keyboard_hints: true,
        }
    }

    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    pub fn show_keyboard_hints(mut self, show: bool) -> Self {
        self.show_keyboard_hints = show;
        self
    }
}

impl Widget for ControlButtons {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let constraints = vec![Constraint::Ratio(1, Button::ALL.len() as u32); Button::ALL.len()];

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (i, (button, chunk)) in Button::ALL.iter().zip(chunks.iter()).enumerate() {
            let selected = self.selected == Some(i);

            let style = if selected {
                Style::default().fg(Color::White).bg(Color::Blue).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(if selected { style } else { Style::default() });

            let key_hint = if self.show_keyboard_hints {
                format!(" ({})", button.key())
            } else {
                String::new()
            };

            let content = Paragraph::new(Line::from(vec![
                Span::styled(button.label(), style.add_modifier(Modifier::BOLD)),
                Span::styled(key_hint, style),
            ]))
            .alignment(Alignment::Center)
            .block(block);

            content.render(*chunk, buf);
        }
    }
}

/// Mutually exclusive source options
pub struct SourceRadio {
    checked: Option<StreamSource>,
}

impl SourceRadio {
    pub fn new(checked: Option<StreamSource>) -> Self {
        Self { checked }
    }
}

impl Widget for SourceRadio {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (i, source) in StreamSource::ALL.iter().enumerate() {
            let checked = self.checked == Some(*source);
            let (marker, style) = if checked {
                ("(•)", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            } else {
                ("( )", Style::default().fg(Color::Gray))
            };
            if i > 0 {
                spans.push(Span::raw("    "));
            }
            spans.push(Span::styled(format!("{} {} [{}]", marker, source.label(), i + 1), style));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Source "))
            .render(area, buf);
    }
}

/// Display a status message with fade effect
pub struct StatusMessage<'a> {
    message: &'a str,
    color: Color,
    age: Duration,
    max_age: Duration,
}

impl<'a> StatusMessage<'a> {
    pub fn new(message: &'a str, color: Color, age: Duration) -> Self {
        Self {
            message,
            color,
            age,
            max_age: Duration::from_secs(3),
        }
    }

    pub fn max_age(mut self, duration: Duration) -> Self {
        self.max_age = duration;
        self
    }

    /// Whether the message has faded out completely
    pub fn is_expired(&self) -> bool {
        self.age > self.max_age && self.color != Color::Red
    }
}

impl<'a> Widget for StatusMessage<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.is_expired() {
            return;
        }

        // Errors stay red until replaced; others dim halfway through
        let color = if self.color == Color::Red || self.age < self.max_age / 2 {
            self.color
        } else {
            Color::DarkGray
        };

        let text = Paragraph::new(Text::from(self.message))
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .style(Style::default().bg(Color::Black)),
            );

        let message_width = (self.message.width() as u16 + 4).min(area.width);
        let message_area = Rect {
            x: area.x + (area.width.saturating_sub(message_width)) / 2,
            y: area.y,
            width: message_width,
            height: area.height.min(3),
        };

        Clear.render(message_area, buf);
        text.render(message_area, buf);
    }
}

/// Key binding overlay
pub struct HelpOverlay;

impl Widget for HelpOverlay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let entry = |key: &'static str, description: &'static str| {
            Line::from(vec![Span::styled(key, bold), Span::raw(description)])
        };

        let help_text = vec![
            Line::from(vec![Span::styled(
                "Stream Controls",
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )]),
            Line::from(""),
            entry("s", " - Start stream and play selected source"),
            entry("x", " - Stop stream and pause player"),
            entry("r", " - Refresh status"),
            entry("f", " - Trigger camera focus"),
            entry("1/2", " - Select FLV / HLS source"),
            entry("Space", " - Cycle source"),
            entry("Tab/←/→", " - Move button focus"),
            entry("Enter", " - Press focused button"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Commands",
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )]),
            entry(":start :stop :status :focus", ""),
            entry(":source flv|hls", " - Select source"),
            entry(":quit", " - Exit (also q, Ctrl+C)"),
            Line::from(""),
            entry("h/?", " - Toggle help, Esc to close"),
        ];

        let help = Paragraph::new(Text::from(help_text))
            .block(Block::default().title("Help").borders(Borders::ALL))
            .style(Style::default().fg(Color::White).bg(Color::Black))
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });

        Clear.render(area, buf);
        help.render(area, buf);
    }
}

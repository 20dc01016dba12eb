use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::{AppMode, AppState};

use super::theme::Theme;

/// Footer widget showing keyboard hints and the last run's tally
pub struct Footer<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> Footer<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 1 {
            return;
        }

        let hints: Vec<(&str, &str)> = match self.state.mode {
            AppMode::Help => vec![("Esc", "Close help"), ("q", "Quit")],
            AppMode::Browsing => {
                if self.state.controller.selection_mode() {
                    vec![
                        ("↑↓", "Navigate"),
                        ("Space", "Mark/unmark"),
                        ("d", "Delete batch"),
                        ("v", "Leave select mode"),
                        ("r", "Re-render host"),
                        ("?", "Help"),
                        ("q", "Quit"),
                    ]
                } else {
                    vec![
                        ("↑↓", "Navigate"),
                        ("v", "Select mode"),
                        ("r", "Re-render host"),
                        ("a", "Toggle anchors"),
                        ("?", "Help"),
                        ("q", "Quit"),
                    ]
                }
            }
        };

        let key_style = Style::default()
            .fg(self.theme.fg)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(self.theme.fg_dim);
        let sep_style = Style::default().fg(self.theme.border);

        let mut x = area.x + 1;
        for (i, (key, desc)) in hints.iter().enumerate() {
            buf.set_string(x, area.y, *key, key_style);
            x += key.len() as u16 + 1;

            buf.set_string(x, area.y, *desc, desc_style);
            x += desc.len() as u16;

            if i < hints.len() - 1 {
                buf.set_string(x, area.y, "  │  ", sep_style);
                x += 5;
            }

            if x >= area.x + area.width - 5 {
                break;
            }
        }

        // Last run tally on the right
        if let Some(tally) = self.state.controller.last_tally() {
            let text = format!("Last run: {}/{} deleted", tally.succeeded, tally.total);
            let style = if tally.failed > 0 {
                Style::default().fg(self.theme.yellow)
            } else {
                Style::default()
                    .fg(self.theme.green)
                    .add_modifier(Modifier::BOLD)
            };
            let stats_x = area.x + area.width.saturating_sub(text.len() as u16 + 1);
            if stats_x > x + 2 {
                buf.set_string(stats_x, area.y, &text, style);
            }
        }
    }
}

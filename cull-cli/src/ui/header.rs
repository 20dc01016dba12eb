use cull_core::ConfirmPhase;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::AppState;

use super::theme::Theme;

/// Header widget showing title, item count, and controller phase
pub struct Header<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 10 || area.height < 1 {
            return;
        }

        // Title
        let title = "CULL";
        let title_style = Style::default()
            .fg(self.theme.blue)
            .add_modifier(Modifier::BOLD);
        buf.set_string(area.x + 1, area.y, title, title_style);

        // Separator
        buf.set_string(
            area.x + 6,
            area.y,
            "─",
            Style::default().fg(self.theme.border),
        );

        let info = format!("simulated host · {} items", self.state.item_count());
        buf.set_string(
            area.x + 8,
            area.y,
            &info,
            Style::default().fg(self.theme.fg_dim),
        );

        // Controller phase on the right
        let (phase, style) = match self.state.controller.phase() {
            ConfirmPhase::Idle => {
                if self.state.controller.selection_mode() {
                    ("SELECTING", Style::default().fg(self.theme.yellow))
                } else {
                    ("IDLE", Style::default().fg(self.theme.fg_muted))
                }
            }
            ConfirmPhase::Armed { .. } => (
                "ARMED",
                Style::default()
                    .fg(self.theme.red)
                    .add_modifier(Modifier::BOLD),
            ),
            ConfirmPhase::Executing => (
                "EXECUTING",
                Style::default()
                    .fg(self.theme.purple)
                    .add_modifier(Modifier::BOLD),
            ),
        };
        let x = area.x + area.width.saturating_sub(phase.len() as u16 + 1);
        buf.set_string(x, area.y, phase, style);
    }
}

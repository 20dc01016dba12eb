use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::AppState;

use super::theme::Theme;

/// Width the action control keeps while its width is pinned, so the label
/// flipping between "Sure?" and "Deleting… (i/n)" does not resize it.
const PINNED_WIDTH: usize = 18;

/// The simulated host chrome: the mounted mode toggle and batch-action
/// control, rendered exactly as the controller instructed the host to show
/// them. When the anchors are torn down this row is simply empty.
pub struct ChromeBar<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> ChromeBar<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for ChromeBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 1 {
            return;
        }

        let host = self.state.controller.host();
        let mut x = area.x + 1;

        if host.toggle_mounted() {
            let (label, style) = if host.toggle_active() {
                (
                    "[ Selecting… ]",
                    Style::default()
                        .fg(self.theme.selection_fg)
                        .bg(self.theme.selection_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("[ Select ]", Style::default().fg(self.theme.fg))
            };
            buf.set_string(x, area.y, label, style);
            x += label.len() as u16 + 2;
        } else {
            let note = "(toggle anchor missing)";
            buf.set_string(x, area.y, note, Style::default().fg(self.theme.fg_muted));
            x += note.len() as u16 + 2;
        }

        let action = host.action_control();
        if action.visible {
            let text = if action.width_pinned {
                format!("[ {:^width$} ]", action.label, width = PINNED_WIDTH)
            } else {
                format!("[ {} ]", action.label)
            };
            let style = if action.enabled {
                Style::default()
                    .fg(self.theme.red)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.fg_dim)
            };
            buf.set_string(x, area.y, &text, style);
        }
    }
}

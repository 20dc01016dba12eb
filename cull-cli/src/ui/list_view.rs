use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::AppState;

use super::theme::Theme;

/// The simulated host's content region: one row per item, with the selection
/// highlight exactly as the controller applied it to the host node.
pub struct ListView<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> ListView<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for ListView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 10 || area.height < 1 {
            return;
        }

        let rows = self.state.controller.host().item_rows();
        if rows.is_empty() {
            buf.set_string(
                area.x + 2,
                area.y + 1,
                "(no items left on the host page)",
                Style::default().fg(self.theme.fg_muted),
            );
            return;
        }

        let start = self.state.scroll_offset;
        let end = (start + area.height as usize).min(rows.len());

        for (row_idx, (id, node, highlighted, instrumented)) in
            rows[start..end].iter().enumerate()
        {
            let y = area.y + row_idx as u16;
            let item_idx = start + row_idx;
            let is_cursor = item_idx == self.state.cursor;

            let cursor_marker = if is_cursor { "▶ " } else { "  " };
            buf.set_string(
                area.x + 1,
                y,
                cursor_marker,
                Style::default().fg(self.theme.blue),
            );

            // Selection mark as the host page would draw it
            let mark = if *highlighted { "✓ " } else { "  " };
            buf.set_string(
                area.x + 3,
                y,
                mark,
                Style::default()
                    .fg(self.theme.green)
                    .add_modifier(Modifier::BOLD),
            );

            let mut style = Style::default().fg(self.theme.fg);
            if *highlighted {
                style = Style::default()
                    .fg(self.theme.selection_fg)
                    .bg(self.theme.selection_bg);
            } else if is_cursor {
                style = style.bg(self.theme.bg_highlight);
            }
            let label = format!(" {} ", id);
            buf.set_string(area.x + 5, y, &label, style);

            // Node token and instrumentation state, for watching re-renders
            // replace the page out from under the controller
            let meta = format!(
                "node #{}{}",
                node.value(),
                if *instrumented { " ·wired" } else { "" }
            );
            let meta_x = area.x + area.width.saturating_sub(meta.len() as u16 + 1);
            buf.set_string(meta_x, y, &meta, Style::default().fg(self.theme.fg_muted));
        }
    }
}

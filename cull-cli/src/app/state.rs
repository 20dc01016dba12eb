use std::time::{Duration, Instant};

use cull_core::{Controller, HostEvent, SimHost};

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Interacting with the simulated host page
    Browsing,
    /// Showing help overlay
    Help,
}

/// Application state
pub struct AppState {
    /// The controller under test, embedded against the simulated host
    pub controller: Controller<SimHost>,
    /// Current mode
    pub mode: AppMode,
    /// Cursor position in the item list
    pub cursor: usize,
    /// Scroll offset for the item list
    pub scroll_offset: usize,
    /// Visible area height (set by UI)
    pub visible_height: usize,
    /// Whether app should quit
    pub should_quit: bool,
    /// Whether the chrome anchors are currently simulated as present
    pub anchors_present: bool,
    /// Auto re-render interval (None = manual only)
    churn_every: Option<Duration>,
    next_churn: Option<Instant>,
}

impl AppState {
    pub fn new(controller: Controller<SimHost>, churn_every: Option<Duration>, now: Instant) -> Self {
        Self {
            controller,
            mode: AppMode::Browsing,
            cursor: 0,
            scroll_offset: 0,
            visible_height: 20,
            should_quit: false,
            anchors_present: true,
            churn_every,
            next_churn: churn_every.map(|every| now + every),
        }
    }

    pub fn item_count(&self) -> usize {
        self.controller.host().item_count()
    }

    /// Advance timers: scheduled churn, then the controller's own deadlines.
    pub fn tick(&mut self, now: Instant) {
        if let Some(every) = self.churn_every
            && let Some(due) = self.next_churn
            && now >= due
        {
            self.rerender_host(now);
            self.next_churn = Some(now + every);
        }
        self.controller.tick(now);
        self.clamp_cursor();
    }

    /// Ensure the cursor is visible within the scroll viewport
    fn ensure_visible(&mut self) {
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + self.visible_height {
            self.scroll_offset = self.cursor - self.visible_height + 1;
        }
    }

    /// Keep the cursor on a live item after deletions
    fn clamp_cursor(&mut self) {
        let count = self.item_count();
        if self.cursor >= count {
            self.cursor = count.saturating_sub(1);
        }
        if self.scroll_offset > 0 && self.scroll_offset >= count {
            self.scroll_offset = count.saturating_sub(1);
        }
    }

    /// Move cursor up
    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.ensure_visible();
    }

    /// Move cursor down
    pub fn move_down(&mut self) {
        if self.cursor < self.item_count().saturating_sub(1) {
            self.cursor += 1;
        }
        self.ensure_visible();
    }

    /// Go to first item
    pub fn go_to_first(&mut self) {
        self.cursor = 0;
        self.ensure_visible();
    }

    /// Go to last item
    pub fn go_to_last(&mut self) {
        self.cursor = self.item_count().saturating_sub(1);
        self.ensure_visible();
    }

    /// Click the mode toggle
    pub fn toggle_mode(&mut self, now: Instant) {
        self.controller.handle(HostEvent::ToggleClicked, now);
    }

    /// Click the item under the cursor
    pub fn click_item(&mut self, now: Instant) {
        let rows = self.controller.host().item_rows();
        if let Some(&(_, node, _, _)) = rows.get(self.cursor) {
            self.controller.handle(HostEvent::ItemClicked(node), now);
        }
    }

    /// Click the batch-action control
    pub fn press_action(&mut self, now: Instant) {
        self.controller.handle(HostEvent::ActionClicked, now);
    }

    /// The host replaces its content region
    pub fn rerender_host(&mut self, now: Instant) {
        self.controller.host_mut().rerender();
        self.controller.handle(HostEvent::StructureChanged, now);
    }

    /// Tear the chrome anchors down, or restore them
    pub fn toggle_anchors(&mut self, now: Instant) {
        self.anchors_present = !self.anchors_present;
        let present = self.anchors_present;
        let host = self.controller.host_mut();
        host.set_toggle_anchor(present);
        host.set_action_anchor(present);
        self.controller.handle(HostEvent::StructureChanged, now);
    }

    /// Show help overlay
    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
    }

    /// Hide help overlay
    pub fn hide_help(&mut self) {
        self.mode = AppMode::Browsing;
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

use std::time::{Duration, Instant};

use crate::confirm::{ConfirmMachine, ConfirmPhase, RequestOutcome};
use crate::executor::{BatchRun, RunTally, StepOutcome};
use crate::host::Host;
use crate::item::NodeRef;
use crate::selection::SelectionStore;
use crate::sync::Synchronizer;

/// Timer durations. Defaults are the production values; tests and the
/// simulator shrink them.
#[derive(Debug, Clone)]
pub struct Timing {
    /// How long an armed confirmation waits for the second request.
    pub armed_window: Duration,
    /// Pause between consecutive item deletions within a run.
    pub inter_item_pause: Duration,
    /// How long the final tally stays visible before returning to Idle.
    pub settle_hold: Duration,
    /// Quiet period coalescing structural-change bursts into one resync.
    pub resync_debounce: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            armed_window: Duration::from_millis(2000),
            inter_item_pause: Duration::from_millis(1500),
            settle_hold: Duration::from_millis(1500),
            resync_debounce: Duration::from_millis(300),
        }
    }
}

/// Input events fed by the embedding. The change-notification mechanism
/// itself lives outside the core; whatever it is, it delivers
/// `StructureChanged` here and the controller owns the debounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The mode toggle was clicked.
    ToggleClicked,
    /// An instrumented item node was clicked.
    ItemClicked(NodeRef),
    /// The batch-action control was clicked.
    ActionClicked,
    /// Something changed in the host's content region.
    StructureChanged,
}

/// The selection / confirmation / batch-deletion session.
///
/// One instance per page session, owning all mutable state (no ambient
/// globals). Single-threaded and cooperative: the embedding feeds events via
/// [`handle`](Controller::handle) and polls [`tick`](Controller::tick); every
/// timer is a stored deadline checked on tick, and starting a new timer of a
/// kind cancels the pending one of that kind.
#[derive(Debug)]
pub struct Controller<H: Host> {
    host: H,
    timing: Timing,
    selection: SelectionStore,
    confirm: ConfirmMachine,
    run: Option<BatchRun>,
    sync: Synchronizer,
    mode_active: bool,
    // Anchor remount seen while a run was live; the reset applies on settle.
    pending_mode_reset: bool,
    last_tally: Option<RunTally>,
}

impl<H: Host> Controller<H> {
    pub fn new(host: H) -> Self {
        Self::with_timing(host, Timing::default())
    }

    pub fn with_timing(host: H, timing: Timing) -> Self {
        Self {
            host,
            timing,
            selection: SelectionStore::new(),
            confirm: ConfirmMachine::new(),
            run: None,
            sync: Synchronizer::new(),
            mode_active: false,
            pending_mode_reset: false,
            last_tally: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn selection_mode(&self) -> bool {
        self.mode_active
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    pub fn phase(&self) -> ConfirmPhase {
        self.confirm.phase()
    }

    /// Tally of the most recently settled run, if any.
    pub fn last_tally(&self) -> Option<RunTally> {
        self.last_tally
    }

    /// Feed one input event.
    pub fn handle(&mut self, event: HostEvent, now: Instant) {
        match event {
            HostEvent::ToggleClicked => self.on_toggle_clicked(),
            HostEvent::ItemClicked(node) => self.on_item_clicked(node),
            HostEvent::ActionClicked => self.on_action_clicked(now),
            HostEvent::StructureChanged => {
                self.sync.notify_change(now, self.timing.resync_debounce);
            }
        }
    }

    /// Poll all pending deadlines. Call regularly (any cadence well under
    /// the shortest configured duration).
    pub fn tick(&mut self, now: Instant) {
        if self.confirm.tick(now) {
            // Armed window expired without a second request
            tracing::debug!("confirmation window expired");
            self.host.pin_action_width(false);
            self.refresh_action();
        }

        if let Some(mut run) = self.run.take() {
            match run.step(
                &mut self.host,
                &mut self.selection,
                now,
                self.timing.inter_item_pause,
                self.timing.settle_hold,
            ) {
                StepOutcome::Settled => {
                    let tally = run.tally();
                    tracing::debug!(
                        succeeded = tally.succeeded,
                        failed = tally.failed,
                        total = tally.total,
                        "batch run settled"
                    );
                    self.last_tally = Some(tally);
                    self.confirm.settle();
                    self.host.pin_action_width(false);
                    if self.pending_mode_reset {
                        self.pending_mode_reset = false;
                        tracing::debug!("applying anchor-remount reset deferred by the run");
                        self.disable_mode();
                    } else {
                        self.refresh_action();
                    }
                }
                StepOutcome::Progressed => {
                    self.host.set_action(&run.progress_label(), false, true);
                    self.run = Some(run);
                }
                StepOutcome::Waiting => {
                    self.run = Some(run);
                }
            }
        }

        if self.sync.resync_due(now) {
            self.run_resync();
        }
    }

    fn on_toggle_clicked(&mut self) {
        if self.confirm.is_executing() {
            return;
        }
        if self.mode_active {
            self.disable_mode();
        } else {
            self.mode_active = true;
            self.selection.clear();
            tracing::debug!("selection mode enabled");
            self.run_resync();
        }
    }

    /// Leave selection mode: clear the batch, drop any pending confirmation,
    /// strip highlights, hide the action control.
    fn disable_mode(&mut self) {
        self.mode_active = false;
        self.selection.clear();
        if self.confirm.selection_changed() {
            self.host.pin_action_width(false);
        }
        tracing::debug!("selection mode disabled");
        self.run_resync();
    }

    fn on_item_clicked(&mut self, node: NodeRef) {
        if !self.mode_active || self.confirm.is_executing() {
            return;
        }
        // Nodes without resolvable identity are skipped silently
        let Some(id) = self.host.resolve(node) else {
            return;
        };
        let selected = self.selection.toggle(id);
        if self.confirm.selection_changed() {
            tracing::debug!("armed confirmation cancelled by selection change");
            self.host.pin_action_width(false);
        }
        self.host.set_highlight(node, selected);
        self.refresh_action();
    }

    fn on_action_clicked(&mut self, now: Instant) {
        match self
            .confirm
            .request(self.selection.len(), now, self.timing.armed_window)
        {
            RequestOutcome::Ignored => {}
            RequestOutcome::Armed => {
                self.host.pin_action_width(true);
                self.host.set_action("Sure?", true, true);
            }
            RequestOutcome::BeginExecute => {
                let run = BatchRun::new(
                    &mut self.host,
                    &mut self.selection,
                    now,
                    self.timing.settle_hold,
                );
                tracing::debug!(total = run.tally().total, "batch run started");
                self.host.set_action(&run.progress_label(), false, true);
                self.run = Some(run);
            }
        }
    }

    fn run_resync(&mut self) {
        let report = self
            .sync
            .resync(&mut self.host, &self.selection, self.mode_active);
        if report.anchor_reappeared && self.mode_active {
            if self.confirm.is_executing() {
                // The run owns selection state until it settles; remember
                // the remount and reset then.
                tracing::debug!("anchor remount during run, deferring mode reset");
                self.pending_mode_reset = true;
            } else {
                // The host remounted the chrome region; prior state cannot
                // be trusted, so fall back to disabled.
                tracing::debug!("anchor remount detected, resetting selection mode");
                self.disable_mode();
                return;
            }
        }
        if report.action_anchor_reappeared
            && let Some(run) = &self.run
        {
            // The control the run was labelling was destroyed with its
            // anchor; re-establish the progress display.
            self.host.pin_action_width(true);
            self.host.set_action(&run.progress_label(), false, true);
        }
        self.refresh_action();
    }

    /// Selection-driven affordance update. Suppressed while Executing - the
    /// run pushes its own progress labels until it settles.
    fn refresh_action(&mut self) {
        if self.confirm.is_executing() {
            return;
        }
        let count = self.selection.len();
        let visible = self.mode_active && (count > 0 || !self.confirm.is_idle());
        let label = if self.confirm.is_armed() {
            "Sure?".to_string()
        } else {
            format!("Delete ({count})")
        };
        self.host.set_action(&label, count > 0, visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ContentIndex;
    use crate::item::ItemId;
    use crate::sim::SimHost;

    fn node_of(c: &Controller<SimHost>, id: &str) -> NodeRef {
        c.host().node_for(&ItemId::from(id)).unwrap()
    }

    fn click(c: &mut Controller<SimHost>, id: &str, now: Instant) {
        let node = node_of(c, id);
        c.handle(HostEvent::ItemClicked(node), now);
    }

    #[test]
    fn test_full_batch_scenario() {
        // m1 < m2 < m3 in document order; m2's delete flow times out
        let mut host = SimHost::from_ids(["m1", "m2", "m3"]);
        host.fail_delete("m2");
        let mut c = Controller::new(host);
        let t0 = Instant::now();

        c.handle(HostEvent::ToggleClicked, t0);
        assert!(c.selection_mode());

        click(&mut c, "m1", t0);
        click(&mut c, "m2", t0);
        click(&mut c, "m3", t0);
        assert_eq!(c.selection_len(), 3);
        let action = c.host().action_control();
        assert_eq!(action.label, "Delete (3)");
        assert!(action.visible && action.enabled);

        // First request arms, second within the window executes
        c.handle(HostEvent::ActionClicked, t0);
        assert_eq!(c.host().action_control().label, "Sure?");
        assert!(c.host().action_control().width_pinned);
        let t1 = t0 + Duration::from_millis(500);
        c.handle(HostEvent::ActionClicked, t1);
        assert!(matches!(c.phase(), ConfirmPhase::Executing));

        // Reverse document order: m3, m2 (fails), m1
        c.tick(t1);
        assert_eq!(c.host().action_control().label, "Deleting… (1/3)");
        let t2 = t1 + Duration::from_millis(1500);
        c.tick(t2);
        assert_eq!(c.host().action_control().label, "Deleting… (2/3)");
        let t3 = t2 + Duration::from_millis(1500);
        c.tick(t3);
        assert_eq!(c.host().action_control().label, "Done (2/3)");

        let deleted: Vec<&str> = c.host().deleted().iter().map(|id| id.as_str()).collect();
        assert_eq!(deleted, ["m3", "m1"]);
        assert_eq!(c.selection_len(), 0);
        // m2 survived and its visual mark was restored
        assert!(c.host().is_highlighted(node_of(&c, "m2")));

        // After the display hold: Idle, control hidden, width released
        let t4 = t3 + Duration::from_millis(1500);
        c.tick(t4);
        assert!(matches!(c.phase(), ConfirmPhase::Idle));
        assert!(!c.host().action_control().visible);
        assert!(!c.host().action_control().width_pinned);
        // Staying in selection mode after a run is the defined behavior
        assert!(c.selection_mode());
        assert_eq!(
            c.last_tally(),
            Some(crate::RunTally { succeeded: 2, failed: 1, total: 3 })
        );
    }

    #[test]
    fn test_action_with_empty_selection_is_noop() {
        let mut c = Controller::new(SimHost::from_ids(["a"]));
        let t0 = Instant::now();
        c.handle(HostEvent::ToggleClicked, t0);
        c.handle(HostEvent::ActionClicked, t0);
        assert!(matches!(c.phase(), ConfirmPhase::Idle));
        assert!(!c.host().action_control().visible);
    }

    #[test]
    fn test_armed_times_out_and_label_reverts() {
        let mut c = Controller::new(SimHost::from_ids(["a", "b"]));
        let t0 = Instant::now();
        c.handle(HostEvent::ToggleClicked, t0);
        click(&mut c, "a", t0);
        c.handle(HostEvent::ActionClicked, t0);
        assert_eq!(c.host().action_control().label, "Sure?");

        c.tick(t0 + Duration::from_millis(1999));
        assert!(matches!(c.phase(), ConfirmPhase::Armed { .. }));
        c.tick(t0 + Duration::from_millis(2000));
        assert!(matches!(c.phase(), ConfirmPhase::Idle));
        assert_eq!(c.host().action_control().label, "Delete (1)");
        assert!(!c.host().action_control().width_pinned);
    }

    #[test]
    fn test_selection_change_while_armed_cancels() {
        let mut c = Controller::new(SimHost::from_ids(["a", "b"]));
        let t0 = Instant::now();
        c.handle(HostEvent::ToggleClicked, t0);
        click(&mut c, "a", t0);
        c.handle(HostEvent::ActionClicked, t0);
        assert!(matches!(c.phase(), ConfirmPhase::Armed { .. }));

        click(&mut c, "b", t0);
        assert!(matches!(c.phase(), ConfirmPhase::Idle));
        assert_eq!(c.host().action_control().label, "Delete (2)");
    }

    #[test]
    fn test_input_suppressed_while_executing() {
        let mut c = Controller::new(SimHost::from_ids(["a", "b"]));
        let t0 = Instant::now();
        c.handle(HostEvent::ToggleClicked, t0);
        click(&mut c, "a", t0);
        c.handle(HostEvent::ActionClicked, t0);
        c.handle(HostEvent::ActionClicked, t0);
        assert!(matches!(c.phase(), ConfirmPhase::Executing));

        // Further clicks change nothing: no second run, no selection edits,
        // no mode toggling
        c.handle(HostEvent::ActionClicked, t0);
        click(&mut c, "b", t0);
        c.handle(HostEvent::ToggleClicked, t0);
        assert!(matches!(c.phase(), ConfirmPhase::Executing));
        assert!(c.selection_mode());
        // Only the snapshot item remains pending; the click on b was ignored
        assert_eq!(c.selection_len(), 1);
    }

    #[test]
    fn test_rerender_then_debounced_resync_restores_marks() {
        let mut c = Controller::new(SimHost::from_ids(["a", "b"]));
        let t0 = Instant::now();
        c.handle(HostEvent::ToggleClicked, t0);
        click(&mut c, "a", t0);
        assert!(c.host().is_highlighted(node_of(&c, "a")));

        // Host re-render wipes everything attached
        c.host_mut().rerender();
        assert!(!c.host().is_highlighted(node_of(&c, "a")));

        c.handle(HostEvent::StructureChanged, t0);
        c.tick(t0 + Duration::from_millis(299));
        assert!(!c.host().is_highlighted(node_of(&c, "a")));
        c.tick(t0 + Duration::from_millis(300));
        assert!(c.host().is_highlighted(node_of(&c, "a")));
        assert!(c.host().is_instrumented(node_of(&c, "b")));
        assert!(!c.host().is_highlighted(node_of(&c, "b")));
    }

    #[test]
    fn test_change_bursts_coalesce() {
        let mut c = Controller::new(SimHost::from_ids(["a"]));
        let t0 = Instant::now();
        c.handle(HostEvent::ToggleClicked, t0);
        click(&mut c, "a", t0);
        c.host_mut().rerender();

        c.handle(HostEvent::StructureChanged, t0);
        c.handle(HostEvent::StructureChanged, t0 + Duration::from_millis(200));
        // First notification's deadline was superseded
        c.tick(t0 + Duration::from_millis(350));
        assert!(!c.host().is_highlighted(node_of(&c, "a")));
        c.tick(t0 + Duration::from_millis(500));
        assert!(c.host().is_highlighted(node_of(&c, "a")));
    }

    #[test]
    fn test_anchor_remount_resets_mode() {
        let mut c = Controller::new(SimHost::from_ids(["a", "b"]));
        let t0 = Instant::now();
        c.handle(HostEvent::ToggleClicked, t0);
        click(&mut c, "a", t0);

        // Host tears the chrome region down and rebuilds it
        c.host_mut().set_toggle_anchor(false);
        c.handle(HostEvent::StructureChanged, t0);
        c.tick(t0 + Duration::from_millis(300));
        assert!(!c.host().toggle_mounted());

        let t1 = t0 + Duration::from_secs(1);
        c.host_mut().set_toggle_anchor(true);
        c.handle(HostEvent::StructureChanged, t1);
        c.tick(t1 + Duration::from_millis(300));

        assert!(!c.selection_mode());
        assert_eq!(c.selection_len(), 0);
        assert!(c.host().toggle_mounted());
        assert!(!c.host().toggle_active());
    }

    #[test]
    fn test_anchor_remount_during_run_resets_mode_on_settle() {
        let mut c = Controller::new(SimHost::from_ids(["a", "b"]));
        let t0 = Instant::now();
        c.handle(HostEvent::ToggleClicked, t0);
        click(&mut c, "a", t0);
        click(&mut c, "b", t0);
        c.handle(HostEvent::ActionClicked, t0);
        c.handle(HostEvent::ActionClicked, t0);
        c.tick(t0);
        assert!(matches!(c.phase(), ConfirmPhase::Executing));

        // Chrome region torn down and rebuilt between pacing steps
        c.host_mut().set_toggle_anchor(false);
        c.handle(HostEvent::StructureChanged, t0 + Duration::from_millis(100));
        c.tick(t0 + Duration::from_millis(400));
        c.host_mut().set_toggle_anchor(true);
        c.handle(HostEvent::StructureChanged, t0 + Duration::from_millis(500));
        c.tick(t0 + Duration::from_millis(800));

        // The run keeps going; the reset waits for it
        assert!(matches!(c.phase(), ConfirmPhase::Executing));
        assert!(c.selection_mode());
        c.tick(t0 + Duration::from_millis(1500));
        assert_eq!(c.host().deleted().len(), 2);

        // Settle applies the deferred reset
        c.tick(t0 + Duration::from_millis(3000));
        assert!(matches!(c.phase(), ConfirmPhase::Idle));
        assert!(!c.selection_mode());
        assert_eq!(c.selection_len(), 0);
        assert!(!c.host().action_control().visible);
        assert!(!c.host().toggle_active());
    }

    #[test]
    fn test_action_anchor_restored_mid_run_repushes_progress() {
        let mut c = Controller::new(SimHost::from_ids(["a", "b"]));
        let t0 = Instant::now();
        c.handle(HostEvent::ToggleClicked, t0);
        click(&mut c, "a", t0);
        click(&mut c, "b", t0);
        c.handle(HostEvent::ActionClicked, t0);
        c.handle(HostEvent::ActionClicked, t0);
        c.tick(t0);
        assert_eq!(c.host().action_control().label, "Deleting… (1/2)");

        // Action bar torn down mid-run wipes the control
        c.host_mut().set_action_anchor(false);
        c.handle(HostEvent::StructureChanged, t0 + Duration::from_millis(100));
        c.tick(t0 + Duration::from_millis(400));
        assert!(!c.host().action_control().visible);

        c.host_mut().set_action_anchor(true);
        c.handle(HostEvent::StructureChanged, t0 + Duration::from_millis(500));
        c.tick(t0 + Duration::from_millis(800));
        let action = c.host().action_control();
        assert_eq!(action.label, "Deleting… (1/2)");
        assert!(action.visible && !action.enabled && action.width_pinned);
    }

    #[test]
    fn test_broken_resolver_degrades_silently() {
        let mut host = SimHost::from_ids(["a"]);
        host.break_resolver(true);
        let mut c = Controller::new(host);
        let t0 = Instant::now();
        c.handle(HostEvent::ToggleClicked, t0);

        let node = c.host().content_nodes()[0];
        c.handle(HostEvent::ItemClicked(node), t0);
        // Nothing selects, nothing crashes
        assert_eq!(c.selection_len(), 0);
        assert!(!c.host().action_control().visible);
    }

    #[test]
    fn test_mode_disable_clears_selection_and_highlights() {
        let mut c = Controller::new(SimHost::from_ids(["a", "b"]));
        let t0 = Instant::now();
        c.handle(HostEvent::ToggleClicked, t0);
        click(&mut c, "a", t0);
        click(&mut c, "b", t0);

        c.handle(HostEvent::ToggleClicked, t0);
        assert!(!c.selection_mode());
        assert_eq!(c.selection_len(), 0);
        assert!(!c.host().is_highlighted(node_of(&c, "a")));
        assert!(!c.host().is_highlighted(node_of(&c, "b")));
        assert!(!c.host().action_control().visible);

        // Re-enable starts from an empty batch
        c.handle(HostEvent::ToggleClicked, t0);
        assert_eq!(c.selection_len(), 0);
    }
}

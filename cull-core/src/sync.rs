use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::host::Host;
use crate::item::NodeRef;
use crate::selection::SelectionStore;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncReport {
    /// The mode-toggle anchor was gone and has come back. The host remounted
    /// that whole region, so no prior attachment state can be trusted.
    pub anchor_reappeared: bool,
    /// The action-bar anchor was gone and has come back; whatever the
    /// batch-action control showed was destroyed with it.
    pub action_anchor_reappeared: bool,
}

/// Re-applies selection affordances after the host regenerates its content.
///
/// The host re-renders asynchronously and outside this system's control;
/// anything attached to a presentation node (click handling, highlight) can
/// be silently destroyed at any time. Structural-change notifications are
/// debounced into a single pending resync, which re-scans the content region
/// and reconciles visual state with the selection store.
#[derive(Debug, Default)]
pub struct Synchronizer {
    instrumented: HashSet<NodeRef>,
    toggle_anchor_seen: bool,
    action_anchor_seen: bool,
    resync_at: Option<Instant>,
}

impl Synchronizer {
    pub fn new() -> Self {
        Self {
            instrumented: HashSet::new(),
            // Assume present until observed otherwise, so the very first
            // resync is not mistaken for a remount.
            toggle_anchor_seen: true,
            action_anchor_seen: true,
            resync_at: None,
        }
    }

    /// A structural-change notification arrived. Restarts the quiet-period
    /// timer; bursts coalesce into one pending resync.
    pub fn notify_change(&mut self, now: Instant, debounce: Duration) {
        self.resync_at = Some(now + debounce);
    }

    pub fn resync_due(&self, now: Instant) -> bool {
        self.resync_at.is_some_and(|at| now >= at)
    }

    /// Re-scan the content region: instrument nodes not yet seen (idempotent
    /// per node instance), reconcile every node's highlight with the
    /// selection store, and remount the mode toggle at its anchor.
    pub fn resync<H: Host>(
        &mut self,
        host: &mut H,
        selection: &SelectionStore,
        mode_active: bool,
    ) -> SyncReport {
        self.resync_at = None;

        let anchor_present = host.toggle_anchor_present();
        let anchor_reappeared = anchor_present && !self.toggle_anchor_seen;
        self.toggle_anchor_seen = anchor_present;
        if anchor_present {
            host.mount_toggle(mode_active);
        }

        let action_present = host.action_anchor_present();
        let action_anchor_reappeared = action_present && !self.action_anchor_seen;
        self.action_anchor_seen = action_present;

        let nodes = host.content_nodes();
        let live: HashSet<NodeRef> = nodes.iter().copied().collect();
        // Stale tokens from before the re-render never come back
        self.instrumented.retain(|node| live.contains(node));

        for node in nodes {
            if self.instrumented.insert(node) {
                host.instrument(node);
            }
            let selected = mode_active
                && host
                    .resolve(node)
                    .is_some_and(|id| selection.contains(&id));
            host.set_highlight(node, selected);
        }

        if anchor_reappeared {
            tracing::debug!("mode-toggle anchor reappeared after remount");
        }
        SyncReport {
            anchor_reappeared,
            action_anchor_reappeared,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ContentIndex;
    use crate::item::ItemId;
    use crate::sim::SimHost;

    fn node_of(host: &SimHost, id: &str) -> crate::item::NodeRef {
        host.node_for(&ItemId::from(id)).unwrap()
    }

    const DEBOUNCE: Duration = Duration::from_millis(300);

    #[test]
    fn test_debounce_is_single_slot() {
        let mut sync = Synchronizer::new();
        let start = Instant::now();
        sync.notify_change(start, DEBOUNCE);
        // A burst restarts the quiet period instead of queueing
        sync.notify_change(start + Duration::from_millis(200), DEBOUNCE);
        assert!(!sync.resync_due(start + Duration::from_millis(300)));
        assert!(sync.resync_due(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_resync_instruments_and_reconciles() {
        let mut host = SimHost::from_ids(["a", "b"]);
        let mut selection = SelectionStore::new();
        selection.toggle(ItemId::from("a"));

        let mut sync = Synchronizer::new();
        sync.resync(&mut host, &selection, true);

        let rows = host.item_rows();
        assert!(rows.iter().all(|&(_, _, _, instrumented)| instrumented));
        assert!(host.is_highlighted(rows[0].1));
        assert!(!host.is_highlighted(rows[1].1));
    }

    #[test]
    fn test_resync_survives_rerender() {
        let mut host = SimHost::from_ids(["a", "b"]);
        let mut selection = SelectionStore::new();
        selection.toggle(ItemId::from("b"));

        let mut sync = Synchronizer::new();
        sync.resync(&mut host, &selection, true);

        // Host replaces everything; marks are gone
        host.rerender();
        let node_b = node_of(&host, "b");
        assert!(!host.is_highlighted(node_b));

        sync.resync(&mut host, &selection, true);
        assert!(host.is_highlighted(node_of(&host, "b")));
        assert!(host.is_instrumented(node_of(&host, "a")));
    }

    #[test]
    fn test_highlight_cleared_when_mode_inactive() {
        let mut host = SimHost::from_ids(["a"]);
        let mut selection = SelectionStore::new();
        selection.toggle(ItemId::from("a"));

        let mut sync = Synchronizer::new();
        sync.resync(&mut host, &selection, true);
        assert!(host.is_highlighted(node_of(&host, "a")));

        sync.resync(&mut host, &selection, false);
        assert!(!host.is_highlighted(node_of(&host, "a")));
    }

    #[test]
    fn test_added_item_instrumented_on_resync() {
        let mut host = SimHost::from_ids(["a"]);
        let mut selection = SelectionStore::new();
        selection.toggle(ItemId::from("a"));

        let mut sync = Synchronizer::new();
        sync.resync(&mut host, &selection, true);

        // Host appends an item without replacing the existing nodes
        host.push_item("b");
        assert!(!host.is_instrumented(node_of(&host, "b")));

        sync.resync(&mut host, &selection, true);
        assert!(host.is_instrumented(node_of(&host, "b")));
        assert!(!host.is_highlighted(node_of(&host, "b")));
        assert!(host.is_highlighted(node_of(&host, "a")));
    }

    #[test]
    fn test_action_anchor_reappearance_reported() {
        let mut host = SimHost::new(1);
        let selection = SelectionStore::new();
        let mut sync = Synchronizer::new();
        assert!(!sync.resync(&mut host, &selection, false).action_anchor_reappeared);

        host.set_action_anchor(false);
        assert!(!sync.resync(&mut host, &selection, false).action_anchor_reappeared);
        host.set_action_anchor(true);
        assert!(sync.resync(&mut host, &selection, false).action_anchor_reappeared);
    }

    #[test]
    fn test_anchor_reappearance_reported_once() {
        let mut host = SimHost::new(1);
        let selection = SelectionStore::new();
        let mut sync = Synchronizer::new();

        assert!(!sync.resync(&mut host, &selection, true).anchor_reappeared);

        host.set_toggle_anchor(false);
        assert!(!sync.resync(&mut host, &selection, true).anchor_reappeared);
        assert!(!host.toggle_mounted());

        host.set_toggle_anchor(true);
        assert!(sync.resync(&mut host, &selection, true).anchor_reappeared);
        assert!(host.toggle_mounted());
        // Steady state again
        assert!(!sync.resync(&mut host, &selection, true).anchor_reappeared);
    }
}

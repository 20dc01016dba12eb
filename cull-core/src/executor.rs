use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::host::Host;
use crate::item::{ItemId, NodeRef};
use crate::selection::SelectionStore;

/// Final and running counts for one batch run. `total` is fixed at snapshot
/// time and always equals succeeded + failed once the run settles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTally {
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
}

/// What one polling step of a run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A deadline is still pending; nothing happened.
    Waiting,
    /// One item was processed (or the run just entered its display hold).
    Progressed,
    /// The display hold elapsed; the run is finished and can be dropped.
    Settled,
}

/// One execution of the batch deletion procedure over a selection snapshot.
///
/// Created on the Armed->Executing transition and dropped when settled.
/// Identifiers that no longer resolve are counted as failed up front; the
/// rest are processed strictly sequentially in reverse document order, so
/// that removing an item never shifts the position of one still queued.
#[derive(Debug)]
pub struct BatchRun {
    queue: VecDeque<(ItemId, NodeRef)>,
    tally: RunTally,
    processed: usize,
    next_step_at: Instant,
    hold_until: Option<Instant>,
}

impl BatchRun {
    /// Snapshot `selection` and build the run. Later selection mutations do
    /// not affect it; unresolvable ids are failed immediately and leave the
    /// store here, before any deletion is attempted.
    pub fn new<H: Host>(
        host: &mut H,
        selection: &mut SelectionStore,
        now: Instant,
        settle_hold: Duration,
    ) -> Self {
        let snapshot = selection.snapshot();
        let total = snapshot.len();

        let order = host.content_nodes();
        let mut failed = 0;
        let mut resolved: Vec<(ItemId, NodeRef, usize)> = Vec::new();
        for id in snapshot {
            match host.node_for(&id) {
                Some(node) => {
                    let pos = order
                        .iter()
                        .position(|&n| n == node)
                        .unwrap_or(usize::MAX);
                    resolved.push((id, node, pos));
                }
                None => {
                    tracing::warn!(item = %id, "no live node for selected item, counting as failed");
                    selection.remove(&id);
                    failed += 1;
                }
            }
        }

        // Back-to-front: later items first, so earlier removals cannot move
        // what is still queued.
        resolved.sort_by_key(|&(_, _, pos)| pos);
        let queue: VecDeque<(ItemId, NodeRef)> = resolved
            .into_iter()
            .rev()
            .map(|(id, node, _)| (id, node))
            .collect();

        let hold_until = if queue.is_empty() {
            Some(now + settle_hold)
        } else {
            None
        };

        Self {
            queue,
            tally: RunTally {
                succeeded: 0,
                failed,
                total,
            },
            processed: failed,
            next_step_at: now,
            hold_until,
        }
    }

    /// Poll the run. Processes at most one item per elapsed pacing deadline;
    /// after the last item, waits out the display hold before settling.
    pub fn step<H: Host>(
        &mut self,
        host: &mut H,
        selection: &mut SelectionStore,
        now: Instant,
        inter_item_pause: Duration,
        settle_hold: Duration,
    ) -> StepOutcome {
        if let Some(hold_until) = self.hold_until {
            return if now >= hold_until {
                StepOutcome::Settled
            } else {
                StepOutcome::Waiting
            };
        }

        if now < self.next_step_at {
            return StepOutcome::Waiting;
        }

        let Some((id, node)) = self.queue.pop_front() else {
            // Queue exhausted without a hold deadline; settle defensively.
            self.hold_until = Some(now);
            return StepOutcome::Progressed;
        };

        match host.delete_item(node) {
            Ok(()) => {
                tracing::debug!(item = %id, "item deleted");
                self.tally.succeeded += 1;
            }
            Err(err) => {
                tracing::warn!(item = %id, error = %err, "single-item delete drive failed");
                self.tally.failed += 1;
                // The item survives; put its selection mark back if it is
                // still on the page.
                if let Some(live) = host.node_for(&id) {
                    host.set_highlight(live, true);
                }
            }
        }
        selection.remove(&id);
        self.processed += 1;

        if self.queue.is_empty() {
            self.hold_until = Some(now + settle_hold);
        } else {
            self.next_step_at = now + inter_item_pause;
        }
        StepOutcome::Progressed
    }

    pub fn tally(&self) -> RunTally {
        self.tally
    }

    /// True once every item has a terminal outcome (display hold may still
    /// be running).
    pub fn is_complete(&self) -> bool {
        self.hold_until.is_some()
    }

    /// Affordance text for the current run state.
    pub fn progress_label(&self) -> String {
        if self.is_complete() {
            format!("Done ({}/{})", self.tally.succeeded, self.tally.total)
        } else {
            format!("Deleting… ({}/{})", self.processed, self.tally.total)
        }
    }
}

use std::time::{Duration, Instant};

/// Confirmation state guarding the one destructive action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmPhase {
    /// No pending destructive action.
    Idle,
    /// First request received; waiting for a second request until `deadline`.
    Armed { deadline: Instant },
    /// A batch run is in progress; external mutation is suppressed.
    Executing,
}

/// What a confirmation request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Request ignored (empty selection in Idle, or already Executing).
    Ignored,
    /// Entered Armed; the visible affordance should now ask for confirmation.
    Armed,
    /// Second request within the window: begin the batch run.
    BeginExecute,
}

/// Arm / confirm / timeout machine. Single global instance per controller;
/// the Armed->Executing transition is the sole entry into execution.
#[derive(Debug)]
pub struct ConfirmMachine {
    phase: ConfirmPhase,
}

impl Default for ConfirmMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmMachine {
    pub fn new() -> Self {
        Self {
            phase: ConfirmPhase::Idle,
        }
    }

    pub fn phase(&self) -> ConfirmPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, ConfirmPhase::Idle)
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.phase, ConfirmPhase::Armed { .. })
    }

    pub fn is_executing(&self) -> bool {
        matches!(self.phase, ConfirmPhase::Executing)
    }

    /// The user pressed the batch-action control.
    pub fn request(&mut self, selection_len: usize, now: Instant, window: Duration) -> RequestOutcome {
        match self.phase {
            ConfirmPhase::Idle => {
                if selection_len == 0 {
                    return RequestOutcome::Ignored;
                }
                self.phase = ConfirmPhase::Armed {
                    deadline: now + window,
                };
                RequestOutcome::Armed
            }
            ConfirmPhase::Armed { deadline } => {
                // A request landing past the deadline before any tick noticed
                // must not confirm the stale prompt; it arms afresh instead.
                if now >= deadline {
                    self.phase = ConfirmPhase::Idle;
                    return self.request(selection_len, now, window);
                }
                self.phase = ConfirmPhase::Executing;
                RequestOutcome::BeginExecute
            }
            // Entry into Executing is idempotent: a run is already live.
            ConfirmPhase::Executing => RequestOutcome::Ignored,
        }
    }

    /// The selection mutated. A pending confirmation is for a batch the user
    /// no longer intends; cancel it. Returns true if Armed was cancelled.
    pub fn selection_changed(&mut self) -> bool {
        if self.is_armed() {
            self.phase = ConfirmPhase::Idle;
            true
        } else {
            false
        }
    }

    /// Poll the armed window. Returns true if it just expired.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let ConfirmPhase::Armed { deadline } = self.phase
            && now >= deadline
        {
            self.phase = ConfirmPhase::Idle;
            return true;
        }
        false
    }

    /// The batch run settled and its display hold elapsed.
    pub fn settle(&mut self) {
        debug_assert!(self.is_executing());
        self.phase = ConfirmPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(2000);

    #[test]
    fn test_request_with_empty_selection_is_noop() {
        let mut machine = ConfirmMachine::new();
        let now = Instant::now();
        assert_eq!(machine.request(0, now, WINDOW), RequestOutcome::Ignored);
        assert!(machine.is_idle());
    }

    #[test]
    fn test_request_arms_then_executes() {
        let mut machine = ConfirmMachine::new();
        let now = Instant::now();
        assert_eq!(machine.request(3, now, WINDOW), RequestOutcome::Armed);
        assert!(machine.is_armed());
        assert_eq!(
            machine.request(3, now + Duration::from_millis(500), WINDOW),
            RequestOutcome::BeginExecute
        );
        assert!(machine.is_executing());
    }

    #[test]
    fn test_executing_entry_is_exactly_once() {
        let mut machine = ConfirmMachine::new();
        let now = Instant::now();
        machine.request(2, now, WINDOW);
        assert_eq!(machine.request(2, now, WINDOW), RequestOutcome::BeginExecute);
        // Rapid third request cannot start a second run
        assert_eq!(machine.request(2, now, WINDOW), RequestOutcome::Ignored);
        assert!(machine.is_executing());
    }

    #[test]
    fn test_stale_second_request_rearms() {
        let mut machine = ConfirmMachine::new();
        let now = Instant::now();
        machine.request(1, now, WINDOW);
        // The second press lands after the window expired with no tick in
        // between; it must restart confirmation, not begin execution
        let late = now + WINDOW;
        assert_eq!(machine.request(1, late, WINDOW), RequestOutcome::Armed);
        assert!(machine.is_armed());
        assert!(!machine.tick(late + Duration::from_millis(1999)));
        assert!(machine.tick(late + WINDOW));

        // Same lapse with an emptied selection falls back to Idle
        let mut machine = ConfirmMachine::new();
        machine.request(1, now, WINDOW);
        assert_eq!(machine.request(0, late, WINDOW), RequestOutcome::Ignored);
        assert!(machine.is_idle());
    }

    #[test]
    fn test_armed_times_out() {
        let mut machine = ConfirmMachine::new();
        let now = Instant::now();
        machine.request(1, now, WINDOW);
        assert!(!machine.tick(now + Duration::from_millis(1999)));
        assert!(machine.is_armed());
        assert!(machine.tick(now + Duration::from_millis(2000)));
        assert!(machine.is_idle());
    }

    #[test]
    fn test_selection_mutation_cancels_armed() {
        let mut machine = ConfirmMachine::new();
        let now = Instant::now();
        machine.request(1, now, WINDOW);
        assert!(machine.selection_changed());
        assert!(machine.is_idle());
        // No effect outside Armed
        assert!(!machine.selection_changed());
    }

    #[test]
    fn test_settle_returns_to_idle() {
        let mut machine = ConfirmMachine::new();
        let now = Instant::now();
        machine.request(1, now, WINDOW);
        machine.request(1, now, WINDOW);
        machine.settle();
        assert!(machine.is_idle());
    }
}

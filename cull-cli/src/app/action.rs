/// User actions that can be performed in the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move cursor up
    MoveUp,
    /// Move cursor down
    MoveDown,
    /// Go to first item
    GoToFirst,
    /// Go to last item
    GoToLast,
    /// Click the selection-mode toggle
    ToggleMode,
    /// Click the item under the cursor
    ClickItem,
    /// Click the batch-action control
    PressAction,
    /// Force a host re-render (the page replacing its content)
    ForceRerender,
    /// Tear down / restore the chrome anchors
    ToggleAnchors,
    /// Show help overlay
    ShowHelp,
    /// Hide help overlay
    HideHelp,
    /// Quit the simulator
    Quit,
    /// No action (for tick events)
    Tick,
}

//! Capability traits the host embedding must provide.
//!
//! The core never touches a real page: it sees presentation nodes as opaque
//! [`NodeRef`] tokens and reaches the host only through these seams. A
//! production embedding implements them over the live page; tests and the
//! terminal simulator implement them over [`crate::sim::SimHost`].

use crate::error::DeleteError;
use crate::item::{ItemId, NodeRef};

/// Maps a presentation node back to the host's stable item identifier.
///
/// Must be idempotent and side-effect free. `None` means the node carries no
/// resolvable identity; callers skip such nodes silently. A resolver that
/// always returns `None` degrades selection mode to selecting nothing, which
/// is acceptable, not fatal.
pub trait IdentityResolver {
    fn resolve(&self, node: NodeRef) -> Option<ItemId>;
}

/// Read access to the host's content region.
pub trait ContentIndex {
    /// All item presentation nodes currently in the content region, in
    /// document order.
    fn content_nodes(&self) -> Vec<NodeRef>;

    /// The live node currently presenting `id`, if any.
    fn node_for(&self, id: &ItemId) -> Option<NodeRef>;
}

/// Drives the host's native delete flow for exactly one item.
///
/// Covers the whole open-menu / delete / confirm sequence with internally
/// bounded waits per step. Once started, a drive runs to completion or local
/// timeout; there is no external cancellation.
pub trait SingleItemDeleter {
    fn delete_item(&mut self, node: NodeRef) -> Result<(), DeleteError>;
}

/// Output surface: the controls and styling this system owns inside the
/// host's chrome.
///
/// All mutating methods must be idempotent - the synchronizer re-issues them
/// freely after host re-renders.
pub trait ChromeSurface {
    /// Whether the anchor the mode toggle mounts on currently exists.
    fn toggle_anchor_present(&self) -> bool;

    /// Whether the action-bar anchor for the batch-action control exists.
    fn action_anchor_present(&self) -> bool;

    /// Ensure the mode toggle exists at its anchor and reflects `active`.
    fn mount_toggle(&mut self, active: bool);

    /// Update the batch-action control's text and interactivity.
    fn set_action(&mut self, label: &str, enabled: bool, visible: bool);

    /// Pin (or release) the batch-action control's width so label changes do
    /// not resize it mid-confirmation.
    fn pin_action_width(&mut self, pinned: bool);

    /// Attach selection click handling and cursor styling to a node.
    fn instrument(&mut self, node: NodeRef);

    /// Apply or clear the selected highlight on a node.
    fn set_highlight(&mut self, node: NodeRef, selected: bool);
}

/// Everything the controller needs from one embedding.
pub trait Host: IdentityResolver + ContentIndex + SingleItemDeleter + ChromeSurface {}

impl<T> Host for T where T: IdentityResolver + ContentIndex + SingleItemDeleter + ChromeSurface {}

//! In-memory host page.
//!
//! Implements every capability trait over a plain item list so the controller
//! can be exercised without a live page: `rerender` replaces every node token
//! and wipes attached marks the way a real host re-render silently destroys
//! them, anchors can be removed and restored, specific items can be made to
//! fail their delete flow, and the resolver can be broken outright. All
//! chrome output is recorded so tests and the terminal UI can read back
//! exactly what the controller instructed the host to show.

use std::collections::HashSet;

use crate::error::DeleteError;
use crate::host::{ChromeSurface, ContentIndex, IdentityResolver, SingleItemDeleter};
use crate::item::{ItemId, NodeRef};

#[derive(Debug, Clone)]
struct SimItem {
    id: ItemId,
    node: NodeRef,
    highlighted: bool,
    instrumented: bool,
}

/// Recorded state of the batch-action control.
#[derive(Debug, Clone, Default)]
pub struct ActionControl {
    pub label: String,
    pub enabled: bool,
    pub visible: bool,
    pub width_pinned: bool,
}

/// Simulated host page with recorded chrome output.
#[derive(Debug)]
pub struct SimHost {
    items: Vec<SimItem>,
    next_node: u64,
    fail_ids: HashSet<ItemId>,
    resolver_broken: bool,
    toggle_anchor: bool,
    action_anchor: bool,
    toggle_mounted: bool,
    toggle_active: bool,
    action: ActionControl,
    deleted: Vec<ItemId>,
}

impl SimHost {
    /// Host with `count` items, ids `item-1` .. `item-count`.
    pub fn new(count: usize) -> Self {
        Self::from_ids_owned((1..=count).map(|i| format!("item-{i}")))
    }

    pub fn from_ids<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::from_ids_owned(ids.into_iter().map(str::to_string))
    }

    fn from_ids_owned<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut host = Self {
            items: Vec::new(),
            next_node: 0,
            fail_ids: HashSet::new(),
            resolver_broken: false,
            toggle_anchor: true,
            action_anchor: true,
            toggle_mounted: false,
            toggle_active: false,
            action: ActionControl::default(),
            deleted: Vec::new(),
        };
        for id in ids {
            let node = host.mint_node();
            host.items.push(SimItem {
                id: ItemId::new(id),
                node,
                highlighted: false,
                instrumented: false,
            });
        }
        host
    }

    fn mint_node(&mut self) -> NodeRef {
        self.next_node += 1;
        NodeRef(self.next_node)
    }

    fn item_by_node(&self, node: NodeRef) -> Option<&SimItem> {
        self.items.iter().find(|item| item.node == node)
    }

    /// Replace every presentation node, dropping all attached marks. This is
    /// the host regenerating its content region: old `NodeRef`s go stale and
    /// highlight/instrumentation state is silently lost.
    pub fn rerender(&mut self) {
        for idx in 0..self.items.len() {
            let node = self.mint_node();
            let item = &mut self.items[idx];
            item.node = node;
            item.highlighted = false;
            item.instrumented = false;
        }
    }

    /// Append a new item at the end of the content region.
    pub fn push_item(&mut self, id: &str) {
        let node = self.mint_node();
        self.items.push(SimItem {
            id: ItemId::from(id),
            node,
            highlighted: false,
            instrumented: false,
        });
    }

    /// Make this item's delete flow fail at its confirm step.
    pub fn fail_delete(&mut self, id: &str) {
        self.fail_ids.insert(ItemId::from(id));
    }

    /// Total resolver failure: every lookup returns `None`.
    pub fn break_resolver(&mut self, broken: bool) {
        self.resolver_broken = broken;
    }

    /// Remove or restore the mode-toggle anchor. Removing it destroys the
    /// mounted toggle with it, as a host remount of that region would.
    pub fn set_toggle_anchor(&mut self, present: bool) {
        self.toggle_anchor = present;
        if !present {
            self.toggle_mounted = false;
        }
    }

    pub fn set_action_anchor(&mut self, present: bool) {
        self.action_anchor = present;
        if !present {
            self.action = ActionControl::default();
        }
    }

    // --- Readback for tests and the terminal UI ---

    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// (id, node, highlighted, instrumented) in document order.
    pub fn item_rows(&self) -> Vec<(ItemId, NodeRef, bool, bool)> {
        self.items
            .iter()
            .map(|item| (item.id.clone(), item.node, item.highlighted, item.instrumented))
            .collect()
    }

    pub fn is_highlighted(&self, node: NodeRef) -> bool {
        self.item_by_node(node).is_some_and(|item| item.highlighted)
    }

    pub fn is_instrumented(&self, node: NodeRef) -> bool {
        self.item_by_node(node).is_some_and(|item| item.instrumented)
    }

    /// Ids passed through a successful delete drive, in deletion order.
    pub fn deleted(&self) -> &[ItemId] {
        &self.deleted
    }

    pub fn toggle_mounted(&self) -> bool {
        self.toggle_mounted
    }

    pub fn toggle_active(&self) -> bool {
        self.toggle_active
    }

    pub fn action_control(&self) -> &ActionControl {
        &self.action
    }
}

impl IdentityResolver for SimHost {
    fn resolve(&self, node: NodeRef) -> Option<ItemId> {
        if self.resolver_broken {
            return None;
        }
        self.item_by_node(node).map(|item| item.id.clone())
    }
}

impl ContentIndex for SimHost {
    fn content_nodes(&self) -> Vec<NodeRef> {
        self.items.iter().map(|item| item.node).collect()
    }

    fn node_for(&self, id: &ItemId) -> Option<NodeRef> {
        self.items
            .iter()
            .find(|item| &item.id == id)
            .map(|item| item.node)
    }
}

impl SingleItemDeleter for SimHost {
    fn delete_item(&mut self, node: NodeRef) -> Result<(), DeleteError> {
        let Some(idx) = self.items.iter().position(|item| item.node == node) else {
            return Err(DeleteError::NodeDetached);
        };
        if self.fail_ids.contains(&self.items[idx].id) {
            return Err(DeleteError::ConfirmTimeout);
        }
        let item = self.items.remove(idx);
        self.deleted.push(item.id);
        Ok(())
    }
}

impl ChromeSurface for SimHost {
    fn toggle_anchor_present(&self) -> bool {
        self.toggle_anchor
    }

    fn action_anchor_present(&self) -> bool {
        self.action_anchor
    }

    fn mount_toggle(&mut self, active: bool) {
        if self.toggle_anchor {
            self.toggle_mounted = true;
            self.toggle_active = active;
        }
    }

    fn set_action(&mut self, label: &str, enabled: bool, visible: bool) {
        if self.action_anchor {
            self.action.label = label.to_string();
            self.action.enabled = enabled;
            self.action.visible = visible;
        }
    }

    fn pin_action_width(&mut self, pinned: bool) {
        if self.action_anchor {
            self.action.width_pinned = pinned;
        }
    }

    fn instrument(&mut self, node: NodeRef) {
        if let Some(item) = self.items.iter_mut().find(|item| item.node == node) {
            item.instrumented = true;
        }
    }

    fn set_highlight(&mut self, node: NodeRef, selected: bool) {
        if let Some(item) = self.items.iter_mut().find(|item| item.node == node) {
            item.highlighted = selected;
        }
    }
}

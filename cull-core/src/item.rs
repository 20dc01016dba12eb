use std::fmt;

/// Stable identifier the host assigns to one deletable item.
///
/// Opaque to this crate; unique within the host's current dataset. An id can
/// silently stop resolving when the host's data changes out-of-band - that is
/// handled as "no longer resolvable", never as an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Token for one live presentation-node instance in the host's content region.
///
/// Minted by the host; a host re-render replaces its nodes and invalidates
/// every previously minted token. Tokens never resurrect: a stale `NodeRef`
/// simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(pub u64);

impl NodeRef {
    pub fn value(&self) -> u64 {
        self.0
    }
}

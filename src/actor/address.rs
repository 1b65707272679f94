//! # Actor addresses.
//!
//! An [`ActorAddress`] names one mailbox *slot* in an [`ActorSystem`](crate::ActorSystem).
//! Identity is the numeric id alone: ids come from a per-system monotonic counter, so an
//! address is never handed out twice, and a restarted actor keeps its address.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Opaque, comparable handle identifying an actor's mailbox.
///
/// Cheap to clone. Equality, ordering and hashing use the id only; the name is for display.
/// Ordering by id is creation order.
#[derive(Clone)]
pub struct ActorAddress {
    id: u64,
    name: Arc<str>,
}

impl ActorAddress {
    pub(crate) fn new(id: u64, name: Arc<str>) -> Self {
        Self { id, name }
    }

    /// Numeric id, unique within the owning system.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Human-readable name given at creation (`"actor"` when none was set).
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for ActorAddress {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ActorAddress {}

impl Hash for ActorAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for ActorAddress {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ActorAddress {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for ActorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

impl fmt::Debug for ActorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorAddress({self})")
    }
}

//! # Address table.
//!
//! The registry is the only shared mutable structure of an actor system. It maps every
//! live [`ActorAddress`] to a [`Slot`]:
//! - `Actor`: mailbox handle, control sender, cancellation token, parent and ordered children;
//! - `Reply`: a hidden one-shot address created by `ask`, consumed by the first delivery.
//!
//! ```text
//! DashMap<ActorAddress, Slot>
//!   root#0     Actor { parent: None,       children: [feed#1, risk#2] }
//!   feed#1     Actor { parent: Some(root), children: [] }
//!   risk#2     Actor { parent: Some(root), children: [orders#3] }
//!   orders#3   Actor { parent: Some(risk), children: [] }
//!   ask#4      Reply(oneshot::Sender)
//! ```
//!
//! ## Rules
//! - A map guard is never held across another map access (no self-deadlock).
//! - Children lists keep creation order (used by Rest-For-One).
//! - Removing a subtree removes children before their parents.
//! - An actor keeps its address across restarts; its incarnation tells the runs apart.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::actor::ActorAddress;
use crate::core::mailbox::{Deliver, DeliveryError, SystemMessage};

/// Registered actor.
pub(crate) struct ActorRecord {
    pub(crate) parent: Option<ActorAddress>,
    pub(crate) children: Vec<ActorAddress>,
    pub(crate) mailbox: Arc<dyn Deliver>,
    pub(crate) control: mpsc::UnboundedSender<SystemMessage>,
    pub(crate) token: CancellationToken,
    /// Bumped each time the supervisor orders a restart.
    pub(crate) incarnation: u64,
}

enum Slot {
    Actor(ActorRecord),
    Reply(oneshot::Sender<Box<dyn Any + Send>>),
}

/// Concurrent address table.
pub(crate) struct Registry {
    slots: DashMap<ActorAddress, Slot>,
    next_id: AtomicU64,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            slots: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Allocates a fresh, never reused address.
    pub(crate) fn allocate(&self, name: Arc<str>) -> ActorAddress {
        ActorAddress::new(self.next_id.fetch_add(1, Ordering::Relaxed), name)
    }

    /// Registers an actor record under `address`.
    pub(crate) fn insert_actor(&self, address: ActorAddress, record: ActorRecord) {
        self.slots.insert(address, Slot::Actor(record));
    }

    /// Appends `child` to the children of `parent`. Returns false if `parent` is not a live actor.
    pub(crate) fn attach_child(&self, parent: &ActorAddress, child: ActorAddress) -> bool {
        match self.slots.get_mut(parent) {
            Some(mut slot) => match slot.value_mut() {
                Slot::Actor(record) => {
                    record.children.push(child);
                    true
                }
                Slot::Reply(_) => false,
            },
            None => false,
        }
    }

    fn detach_child(&self, parent: &ActorAddress, child: &ActorAddress) {
        if let Some(mut slot) = self.slots.get_mut(parent) {
            if let Slot::Actor(record) = slot.value_mut() {
                record.children.retain(|c| c != child);
            }
        }
    }

    /// True if `address` is a live actor.
    pub(crate) fn contains_actor(&self, address: &ActorAddress) -> bool {
        self.slots
            .get(address)
            .is_some_and(|slot| matches!(slot.value(), Slot::Actor(_)))
    }

    /// Children of `address` in creation order (empty if unknown).
    pub(crate) fn children(&self, address: &ActorAddress) -> Vec<ActorAddress> {
        match self.slots.get(address).as_deref() {
            Some(Slot::Actor(record)) => record.children.clone(),
            _ => Vec::new(),
        }
    }

    /// Supervisor of `address`, if it is a live non-root actor.
    pub(crate) fn parent_of(&self, address: &ActorAddress) -> Option<ActorAddress> {
        match self.slots.get(address).as_deref() {
            Some(Slot::Actor(record)) => record.parent.clone(),
            _ => None,
        }
    }

    /// Cancellation token of a live actor.
    pub(crate) fn token_of(&self, address: &ActorAddress) -> Option<CancellationToken> {
        match self.slots.get(address).as_deref() {
            Some(Slot::Actor(record)) => Some(record.token.clone()),
            _ => None,
        }
    }

    /// Current incarnation of a live actor.
    pub(crate) fn incarnation_of(&self, address: &ActorAddress) -> Option<u64> {
        match self.slots.get(address).as_deref() {
            Some(Slot::Actor(record)) => Some(record.incarnation),
            _ => None,
        }
    }

    /// Starts a new incarnation of `address` and returns it.
    pub(crate) fn next_incarnation(&self, address: &ActorAddress) -> Option<u64> {
        match self.slots.get_mut(address).as_deref_mut() {
            Some(Slot::Actor(record)) => {
                record.incarnation += 1;
                Some(record.incarnation)
            }
            _ => None,
        }
    }

    /// Sends a control message. Returns false if the actor is gone.
    pub(crate) fn control(&self, address: &ActorAddress, message: SystemMessage) -> bool {
        let control = match self.slots.get(address).as_deref() {
            Some(Slot::Actor(record)) => record.control.clone(),
            _ => return false,
        };
        control.send(message).is_ok()
    }

    /// Delivers a payload to an actor mailbox or a reply slot.
    ///
    /// A reply slot is removed by the first delivery; later ones see `NotFound`.
    pub(crate) fn deliver(
        &self,
        to: &ActorAddress,
        payload: Box<dyn Any + Send>,
        sender: Option<ActorAddress>,
        reply_to: Option<ActorAddress>,
    ) -> Result<(), DeliveryError> {
        let mailbox = match self.slots.get(to).as_deref() {
            Some(Slot::Actor(record)) => Some(Arc::clone(&record.mailbox)),
            Some(Slot::Reply(_)) => None,
            None => return Err(DeliveryError::NotFound),
        };
        if let Some(mailbox) = mailbox {
            return mailbox.deliver(payload, sender, reply_to);
        }
        match self.slots.remove_if(to, |_, slot| matches!(slot, Slot::Reply(_))) {
            Some((_, Slot::Reply(tx))) => tx.send(payload).map_err(|_| DeliveryError::Closed),
            _ => Err(DeliveryError::NotFound),
        }
    }

    /// Registers a hidden reply address.
    pub(crate) fn register_reply(&self) -> (ActorAddress, oneshot::Receiver<Box<dyn Any + Send>>) {
        let (tx, rx) = oneshot::channel();
        let address = self.allocate(Arc::from("ask"));
        self.slots.insert(address.clone(), Slot::Reply(tx));
        (address, rx)
    }

    /// Removes a reply slot (no-op if already consumed).
    pub(crate) fn remove_reply(&self, address: &ActorAddress) {
        self.slots
            .remove_if(address, |_, slot| matches!(slot, Slot::Reply(_)));
    }

    /// Removes `address` and all its descendants, children before parents, and detaches
    /// `address` from its supervisor. Returns the removed records.
    pub(crate) fn remove_subtree(&self, address: &ActorAddress) -> Vec<(ActorAddress, ActorRecord)> {
        let parent = self.parent_of(address);

        let mut order = Vec::new();
        let mut stack = vec![address.clone()];
        while let Some(next) = stack.pop() {
            stack.extend(self.children(&next));
            order.push(next);
        }

        let mut removed = Vec::with_capacity(order.len());
        for addr in order.into_iter().rev() {
            if let Some((addr, Slot::Actor(record))) = self.slots.remove(&addr) {
                removed.push((addr, record));
            }
        }

        if let Some(parent) = parent {
            self.detach_child(&parent, address);
        }
        removed
    }

    /// Removes a single actor after its dispatch loop exited.
    pub(crate) fn forget(&self, address: &ActorAddress) {
        let removed = self
            .slots
            .remove_if(address, |_, slot| matches!(slot, Slot::Actor(_)));
        if let Some((_, Slot::Actor(record))) = removed {
            if let Some(parent) = record.parent {
                self.detach_child(&parent, address);
            }
        }
    }

    /// Display names of all live actors, sorted by address.
    pub(crate) fn actor_names(&self) -> Vec<String> {
        let mut live: Vec<ActorAddress> = self
            .slots
            .iter()
            .filter(|entry| matches!(entry.value(), Slot::Actor(_)))
            .map(|entry| entry.key().clone())
            .collect();
        live.sort_unstable();
        live.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mailbox::MailboxSender;

    fn record(registry: &Registry, name: &str, parent: Option<&ActorAddress>) -> ActorAddress {
        let address = registry.allocate(Arc::from(name));
        let (mailbox, _rx) = MailboxSender::<u32>::channel();
        let (control, _control_rx) = mpsc::unbounded_channel();
        registry.insert_actor(
            address.clone(),
            ActorRecord {
                parent: parent.cloned(),
                children: Vec::new(),
                mailbox: Arc::new(mailbox),
                control,
                token: CancellationToken::new(),
                incarnation: 0,
            },
        );
        if let Some(parent) = parent {
            assert!(registry.attach_child(parent, address.clone()));
        }
        address
    }

    #[test]
    fn children_keep_creation_order() {
        let registry = Registry::new();
        let root = record(&registry, "root", None);
        let a = record(&registry, "a", Some(&root));
        let b = record(&registry, "b", Some(&root));
        let c = record(&registry, "c", Some(&root));
        assert_eq!(registry.children(&root), vec![a, b.clone(), c]);
        assert_eq!(registry.parent_of(&b), Some(root));
    }

    #[test]
    fn incarnations_advance_per_actor() {
        let registry = Registry::new();
        let root = record(&registry, "root", None);
        let a = record(&registry, "a", Some(&root));

        assert_eq!(registry.incarnation_of(&a), Some(0));
        assert_eq!(registry.next_incarnation(&a), Some(1));
        assert_eq!(registry.next_incarnation(&a), Some(2));
        assert_eq!(registry.incarnation_of(&root), Some(0));

        registry.remove_subtree(&a);
        assert_eq!(registry.next_incarnation(&a), None);
    }

    #[test]
    fn subtree_removal_goes_bottom_up_and_detaches() {
        let registry = Registry::new();
        let root = record(&registry, "root", None);
        let risk = record(&registry, "risk", Some(&root));
        let orders = record(&registry, "orders", Some(&risk));
        let feed = record(&registry, "feed", Some(&root));

        let removed: Vec<ActorAddress> = registry
            .remove_subtree(&risk)
            .into_iter()
            .map(|(addr, _)| addr)
            .collect();

        assert_eq!(removed, vec![orders.clone(), risk.clone()]);
        assert!(!registry.contains_actor(&orders));
        assert!(!registry.contains_actor(&risk));
        assert_eq!(registry.children(&root), vec![feed]);
        assert!(registry.remove_subtree(&risk).is_empty());
    }

    #[test]
    fn reply_slot_is_consumed_once() {
        let registry = Registry::new();
        let (reply, mut rx) = registry.register_reply();

        registry.deliver(&reply, Box::new(42u64), None, None).unwrap();
        assert_eq!(
            registry.deliver(&reply, Box::new(43u64), None, None),
            Err(DeliveryError::NotFound)
        );
        let got = rx.try_recv().unwrap().downcast::<u64>().unwrap();
        assert_eq!(*got, 42);
    }

    #[test]
    fn unknown_addresses_are_not_found() {
        let registry = Registry::new();
        let ghost = registry.allocate(Arc::from("ghost"));
        assert_eq!(
            registry.deliver(&ghost, Box::new(1u32), None, None),
            Err(DeliveryError::NotFound)
        );
        assert!(!registry.control(&ghost, SystemMessage::Resume));
        assert!(!registry.attach_child(&ghost, ghost.clone()));
    }
}

//! The set of live connections, indexed by slot.

use super::{Connection, ConnectionId};
use crate::error::TableFull;

/// Fixed-capacity slot map from [`ConnectionId`] to [`Connection`].
///
/// Only the event loop mutates it. A free slot is always handed out lowest
/// first, so ids are reused once their connection is removed.
pub struct ConnectionTable<T> {
    slots: Vec<Option<Connection<T>>>,
    capacity: usize,
    live: usize,
}

impl<T> ConnectionTable<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
            live: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn is_full(&self) -> bool {
        self.live >= self.capacity
    }

    /// Claim the lowest free slot and fill it with `make(id)`.
    pub fn insert_with<F>(&mut self, make: F) -> Result<ConnectionId, TableFull>
    where
        F: FnOnce(ConnectionId) -> Connection<T>,
    {
        if self.is_full() {
            return Err(TableFull {
                capacity: self.capacity,
            });
        }

        let slot = match self.slots.iter().position(Option::is_none) {
            Some(slot) => slot,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        };

        let id = ConnectionId::new(slot);
        self.slots[slot] = Some(make(id));
        self.live += 1;
        Ok(id)
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Connection<T>> {
        self.slots.get(id.slot()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ConnectionId) -> Option<&mut Connection<T>> {
        self.slots.get_mut(id.slot()).and_then(Option::as_mut)
    }

    /// Whether `id` is still occupied by the connection announced as `visitor`.
    pub fn is_current(&self, id: ConnectionId, visitor: u64) -> bool {
        self.get(id).is_some_and(|c| c.visitor() == visitor)
    }

    /// Vacate a slot, making its id reusable.
    pub fn remove(&mut self, id: ConnectionId) -> Option<Connection<T>> {
        let conn = self.slots.get_mut(id.slot())?.take()?;
        self.live -= 1;
        Some(conn)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Connection<T>> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::testing::ScriptedTransport;
    use std::sync::Arc;

    fn admit(table: &mut ConnectionTable<ScriptedTransport>, visitor: u64) -> ConnectionId {
        table
            .insert_with(|id| Connection::new(id, visitor, Arc::new(ScriptedTransport::new())))
            .unwrap()
    }

    #[test]
    fn ids_are_lowest_free_slot() {
        let mut table = ConnectionTable::with_capacity(4);
        let a = admit(&mut table, 0);
        let b = admit(&mut table, 1);
        let c = admit(&mut table, 2);
        assert_eq!([a.slot(), b.slot(), c.slot()], [0, 1, 2]);

        assert!(table.remove(b).is_some());
        assert!(table.get(b).is_none());
        assert_eq!(table.len(), 2);

        let d = admit(&mut table, 3);
        assert_eq!(d, b);
        assert_eq!(table.get(d).unwrap().visitor(), 3);
    }

    #[test]
    fn reused_slot_is_not_current_for_old_visitor() {
        let mut table = ConnectionTable::with_capacity(2);
        let id = admit(&mut table, 5);
        assert!(table.is_current(id, 5));
        table.remove(id);
        assert!(!table.is_current(id, 5));

        let again = admit(&mut table, 6);
        assert_eq!(again, id);
        assert!(!table.is_current(id, 5));
        assert!(table.is_current(id, 6));
    }

    #[test]
    fn capacity_is_enforced() {
        let mut table = ConnectionTable::with_capacity(2);
        admit(&mut table, 0);
        admit(&mut table, 1);
        assert!(table.is_full());

        let err = table
            .insert_with(|id| Connection::new(id, 2, Arc::new(ScriptedTransport::new())))
            .unwrap_err();
        assert_eq!(err.capacity, 2);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn removing_twice_is_harmless() {
        let mut table = ConnectionTable::with_capacity(1);
        let id = admit(&mut table, 0);
        assert!(table.remove(id).is_some());
        assert!(table.remove(id).is_none());
        assert!(table.remove(ConnectionId::new(99)).is_none());
        assert!(table.is_empty());
    }
}

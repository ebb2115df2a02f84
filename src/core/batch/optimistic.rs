//! Optimistic mutation primitives
//!
//! A mutation is applied to the local list before the server confirms it. The
//! whole list is snapshotted first. A failed request puts back the mutated
//! batch's own entry at its old position, which reproduces the snapshot exactly
//! when nothing else touched the list meanwhile. At most one mutation per batch
//! id may be outstanding; different ids are independent.

use crate::core::types::{Batch, BatchStatus};
use crate::utils::error::{DeskError, Result};
use std::collections::HashMap;

/// Local change applied ahead of the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalMutation {
    SetStatus(BatchStatus),
    Remove,
}

impl LocalMutation {
    /// Apply to the batch with `id`. Returns false when no such batch exists.
    pub fn apply(&self, batches: &mut Vec<Batch>, id: &str) -> bool {
        let Some(index) = batches.iter().position(|b| b.id == id) else {
            return false;
        };
        match self {
            LocalMutation::SetStatus(status) => batches[index].status = *status,
            LocalMutation::Remove => {
                batches.remove(index);
            }
        }
        true
    }
}

/// Pre-mutation copy of the list
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot(Vec<Batch>);

impl Snapshot {
    pub fn capture(batches: &[Batch]) -> Self {
        Self(batches.to_vec())
    }

    /// Put the captured entry for `id` back into `batches`.
    ///
    /// A present entry is replaced in place. A missing one is re-inserted after
    /// the nearest earlier snapshot neighbour still in the list, but only when
    /// `reinsert` is set. Other batches are left as they are.
    pub fn restore_entry(&self, batches: &mut Vec<Batch>, id: &str, reinsert: bool) -> bool {
        let Some(index) = self.0.iter().position(|b| b.id == id) else {
            return false;
        };
        let entry = self.0[index].clone();

        if let Some(current) = batches.iter().position(|b| b.id == id) {
            batches[current] = entry;
            return true;
        }
        if !reinsert {
            return false;
        }
        let at = self.0[..index]
            .iter()
            .rev()
            .find_map(|prev| batches.iter().position(|b| b.id == prev.id))
            .map_or(0, |p| p + 1);
        batches.insert(at, entry);
        true
    }
}

/// Proof that a mutation slot for one id was acquired
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTicket {
    pub id: String,
    pub seq: u64,
}

/// Tracks outstanding mutations per batch id
#[derive(Debug, Default)]
pub struct InFlightRegistry {
    active: HashMap<String, u64>,
    next_seq: u64,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the slot for `id`; fails if a mutation for it is outstanding
    pub fn begin(&mut self, id: &str) -> Result<MutationTicket> {
        if self.active.contains_key(id) {
            return Err(DeskError::MutationInFlight(id.to_string()));
        }
        self.next_seq += 1;
        self.active.insert(id.to_string(), self.next_seq);
        Ok(MutationTicket {
            id: id.to_string(),
            seq: self.next_seq,
        })
    }

    /// Release the slot. Returns false for a ticket that no longer owns it.
    pub fn finish(&mut self, ticket: &MutationTicket) -> bool {
        match self.active.get(&ticket.id) {
            Some(seq) if *seq == ticket.seq => {
                self.active.remove(&ticket.id);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.active.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.active.keys().map(String::as_str)
    }

    /// Drop every reservation, used on unmount
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

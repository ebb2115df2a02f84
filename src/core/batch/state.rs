//! Board state machine
//!
//! All state the batch board owns lives in [`BoardState`] and only changes through
//! its named transitions. The externally visible [`BoardPhase`] is derived from
//! that state instead of being tracked as a set of independent flags.

use super::optimistic::{InFlightRegistry, LocalMutation, MutationTicket, Snapshot};
use crate::core::types::{Batch, BatchFilter};
use crate::utils::error::{DeskError, Result};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// What the board is doing right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardPhase {
    Idle,
    /// First load, nothing to show yet
    Loading,
    Refreshing,
    MutationInFlight(String),
    Error(String),
}

/// Why a refresh was started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshTrigger {
    Initial,
    Interval,
    Focus,
    Visibility,
    Manual,
    PostMutation,
}

impl RefreshTrigger {
    /// Background refresh failures are logged, never surfaced
    pub fn is_background(&self) -> bool {
        matches!(
            self,
            RefreshTrigger::Interval | RefreshTrigger::Focus | RefreshTrigger::Visibility
        )
    }
}

impl fmt::Display for RefreshTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RefreshTrigger::Initial => "initial",
            RefreshTrigger::Interval => "interval",
            RefreshTrigger::Focus => "focus",
            RefreshTrigger::Visibility => "visibility",
            RefreshTrigger::Manual => "manual",
            RefreshTrigger::PostMutation => "post-mutation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Toast-style message for the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything the board owns
#[derive(Debug, Default)]
pub struct BoardState {
    batches: Vec<Batch>,
    filter: BatchFilter,
    loaded: bool,
    closed: bool,
    pending_refreshes: usize,
    issued_seq: u64,
    applied_seq: u64,
    in_flight: InFlightRegistry,
    pending: HashMap<String, LocalMutation>,
    banner: Option<String>,
    notices: Vec<Notice>,
}

impl BoardState {
    pub fn new(filter: BatchFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> BoardPhase {
        if self.pending_refreshes > 0 && !self.loaded {
            return BoardPhase::Loading;
        }
        if let Some(id) = self.in_flight.ids().min() {
            return BoardPhase::MutationInFlight(id.to_string());
        }
        if self.pending_refreshes > 0 {
            return BoardPhase::Refreshing;
        }
        if let Some(message) = &self.banner {
            return BoardPhase::Error(message.clone());
        }
        BoardPhase::Idle
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn filter(&self) -> &BatchFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: BatchFilter) {
        self.filter = filter;
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn is_mutating(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(DeskError::Closed)
        } else {
            Ok(())
        }
    }

    /// Start a refresh; the returned sequence number tags its response
    pub fn begin_refresh(&mut self) -> Result<u64> {
        self.ensure_open()?;
        self.pending_refreshes += 1;
        self.issued_seq += 1;
        Ok(self.issued_seq)
    }

    /// Replace the list with a refresh result.
    ///
    /// Responses older than the last applied one are dropped. Optimistic changes
    /// still awaiting the server are re-applied on top of the fresh list.
    pub fn apply_list(&mut self, seq: u64, mut batches: Vec<Batch>) -> bool {
        if self.closed {
            return false;
        }
        self.pending_refreshes = self.pending_refreshes.saturating_sub(1);
        if seq <= self.applied_seq {
            debug!(
                "Dropping stale refresh #{} (already applied #{})",
                seq, self.applied_seq
            );
            return false;
        }
        for (id, mutation) in &self.pending {
            mutation.apply(&mut batches, id);
        }
        self.applied_seq = seq;
        self.batches = batches;
        self.loaded = true;
        self.banner = None;
        true
    }

    /// Load fallback data after the first load failed
    pub fn apply_fallback(&mut self, seq: u64, batches: Vec<Batch>, message: String) -> bool {
        let applied = self.apply_list(seq, batches);
        if applied {
            self.banner = Some(message);
        }
        applied
    }

    /// Record a failed refresh. Only foreground failures raise the banner.
    pub fn fail_refresh(&mut self, seq: u64, surface: bool, message: String) {
        if self.closed {
            return;
        }
        self.pending_refreshes = self.pending_refreshes.saturating_sub(1);
        if surface && seq > self.applied_seq {
            self.banner = Some(message);
        }
    }

    /// Reserve the id, snapshot the list and apply the change locally
    pub fn begin_mutation(
        &mut self,
        id: &str,
        mutation: LocalMutation,
    ) -> Result<(MutationTicket, Snapshot)> {
        self.ensure_open()?;
        if !self.batches.iter().any(|b| b.id == id) {
            return Err(DeskError::not_found(format!("batch {}", id)));
        }
        let ticket = self.in_flight.begin(id)?;
        let snapshot = Snapshot::capture(&self.batches);
        mutation.apply(&mut self.batches, id);
        self.pending.insert(id.to_string(), mutation);
        Ok((ticket, snapshot))
    }

    /// The server accepted the change
    pub fn complete_mutation(&mut self, ticket: &MutationTicket, message: String) {
        if self.closed {
            return;
        }
        if self.in_flight.finish(ticket) {
            self.pending.remove(&ticket.id);
        }
        self.notices.push(Notice::success(message));
    }

    /// The server rejected the change; put the batch back as it was.
    ///
    /// Only the rejected batch is restored so changes still in flight for other
    /// ids, or already rolled back, are not disturbed.
    pub fn rollback_mutation(&mut self, ticket: &MutationTicket, snapshot: Snapshot, message: String) {
        if self.closed {
            return;
        }
        let mutation = if self.in_flight.finish(ticket) {
            self.pending.remove(&ticket.id)
        } else {
            None
        };
        let reinsert = matches!(mutation, Some(LocalMutation::Remove));
        snapshot.restore_entry(&mut self.batches, &ticket.id, reinsert);
        self.notices.push(Notice::error(message));
    }

    /// Stop accepting work and drop everything pending
    pub fn close(&mut self) {
        self.closed = true;
        self.pending_refreshes = 0;
        self.in_flight.clear();
        self.pending.clear();
    }
}

//! Batch board
//!
//! Owns the in-memory batch list for as long as it is mounted. Reads go through
//! the reconciler and replace the whole list; writes are optimistic and roll back
//! on failure. Nothing outlives [`BatchBoard::unmount`].

use super::fallback::{sample_batches, sample_courses, sample_instructors};
use super::optimistic::LocalMutation;
use super::reconcile::{reconcile_batch, reconcile_batches, reconcile_records};
use super::state::{BoardPhase, BoardState, Notice, RefreshTrigger};
use super::status::transition;
use super::validate::{validate_individual, validate_new_batch};
use crate::core::types::{
    Batch, BatchFilter, BatchStatus, Course, Instructor, NewBatch, NewIndividualBatch, Student,
};
use crate::sdk::BatchApi;
use crate::utils::error::{DeskError, Result};
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Where the current list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Server,
    Fallback,
}

/// Page-level owner of the batch list
pub struct BatchBoard {
    api: Arc<dyn BatchApi>,
    state: Mutex<BoardState>,
    /// Bumped whenever a fetched list replaces the local one
    revision: watch::Sender<u64>,
}

impl std::fmt::Debug for BatchBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchBoard")
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

impl BatchBoard {
    pub fn new(api: Arc<dyn BatchApi>) -> Self {
        Self::with_filter(api, BatchFilter::default())
    }

    pub fn with_filter(api: Arc<dyn BatchApi>, filter: BatchFilter) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            api,
            state: Mutex::new(BoardState::new(filter)),
            revision,
        }
    }

    /// Observe list replacements; the value counts applied refreshes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn batches(&self) -> Vec<Batch> {
        self.state.lock().batches().to_vec()
    }

    pub fn batch(&self, id: &str) -> Option<Batch> {
        self.state.lock().batches().iter().find(|b| b.id == id).cloned()
    }

    pub fn phase(&self) -> BoardPhase {
        self.state.lock().phase()
    }

    pub fn filter(&self) -> BatchFilter {
        self.state.lock().filter().clone()
    }

    /// Whether the controls for this batch should be disabled
    pub fn is_mutating(&self, id: &str) -> bool {
        self.state.lock().is_mutating(id)
    }

    pub fn banner(&self) -> Option<String> {
        self.state.lock().banner().map(str::to_string)
    }

    pub fn dismiss_banner(&self) {
        self.state.lock().dismiss_banner();
    }

    pub fn take_notices(&self) -> Vec<Notice> {
        self.state.lock().take_notices()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().is_closed()
    }

    /// Tear down: late responses are discarded, new work is refused
    pub fn unmount(&self) {
        debug!("Unmounting batch board");
        self.state.lock().close();
    }

    /// First load. A failed read falls back to sample data behind a banner.
    pub async fn load(&self) -> Result<LoadSource> {
        let (seq, filter) = {
            let mut state = self.state.lock();
            (state.begin_refresh()?, state.filter().clone())
        };

        match self.api.list_batches(&filter).await {
            Ok(body) => {
                let batches = self.reconcile_list(&body);
                info!("Loaded {} batches", batches.len());
                let applied = self.state.lock().apply_list(seq, batches);
                self.bump(applied);
                Ok(LoadSource::Server)
            }
            Err(e) => {
                warn!("Failed to load batches, using sample data: {}", e);
                let sample: Vec<Batch> = sample_batches()
                    .into_iter()
                    .filter(|b| filter.matches(b))
                    .collect();
                let applied = self.state.lock().apply_fallback(
                    seq,
                    sample,
                    format!("Could not load batches ({}); showing sample data", e),
                );
                self.bump(applied);
                Ok(LoadSource::Fallback)
            }
        }
    }

    /// Re-read the list and replace local state with the result
    pub async fn refresh(&self, trigger: RefreshTrigger) -> Result<usize> {
        let (seq, filter) = {
            let mut state = self.state.lock();
            (state.begin_refresh()?, state.filter().clone())
        };
        debug!("Refreshing batches (#{}, {})", seq, trigger);

        match self.api.list_batches(&filter).await {
            Ok(body) => {
                let batches = self.reconcile_list(&body);
                let count = batches.len();
                let applied = {
                    let mut state = self.state.lock();
                    if state.is_closed() {
                        return Err(DeskError::Closed);
                    }
                    state.apply_list(seq, batches)
                };
                self.bump(applied);
                Ok(count)
            }
            Err(e) => {
                self.state.lock().fail_refresh(
                    seq,
                    !trigger.is_background(),
                    format!("Failed to refresh batches: {}", e),
                );
                Err(e)
            }
        }
    }

    /// Replace the filter and reload
    pub async fn apply_filter(&self, filter: BatchFilter) -> Result<usize> {
        self.state.lock().set_filter(filter);
        self.refresh(RefreshTrigger::Manual).await
    }

    /// Fetch one batch straight from the server
    pub async fn fetch_batch(&self, id: &str) -> Result<Batch> {
        let body = self.api.get_batch(id).await?;
        reconcile_batch(&body, Utc::now())
    }

    /// Move a batch along the transition table, optimistically
    pub async fn change_status(&self, id: &str, next: BatchStatus) -> Result<()> {
        let current = self
            .batch(id)
            .ok_or_else(|| DeskError::not_found(format!("batch {}", id)))?;
        transition(current.status, next)?;

        let api = Arc::clone(&self.api);
        self.mutate(
            id,
            LocalMutation::SetStatus(next),
            format!("Batch '{}' is now {}", current.name, next),
            format!("Failed to update status of '{}'", current.name),
            || async move { api.update_batch_status(id, next).await },
        )
        .await
    }

    /// Delete a batch, optimistically
    pub async fn delete(&self, id: &str) -> Result<()> {
        let current = self
            .batch(id)
            .ok_or_else(|| DeskError::not_found(format!("batch {}", id)))?;

        let api = Arc::clone(&self.api);
        self.mutate(
            id,
            LocalMutation::Remove,
            format!("Batch '{}' deleted", current.name),
            format!("Failed to delete '{}'", current.name),
            || async move { api.delete_batch(id).await },
        )
        .await
    }

    /// Create a group batch, then resync
    pub async fn create_group(&self, batch: &NewBatch) -> Result<Value> {
        validate_new_batch(batch)?;
        self.ensure_open()?;
        let result = self.api.create_group_batch(batch).await;
        self.after_create(&batch.name, result).await
    }

    /// Create a 1:1 batch, then resync
    pub async fn create_individual(&self, request: &NewIndividualBatch) -> Result<Value> {
        validate_individual(request)?;
        self.ensure_open()?;
        let result = self.api.create_individual_batch(request).await;
        self.after_create(&request.batch.name, result).await
    }

    /// Course catalog, sample data when unreachable
    pub async fn courses(&self) -> Vec<Course> {
        match self.api.list_courses().await {
            Ok(body) => reconcile_records(&body).records,
            Err(e) => {
                warn!("Failed to load courses, using sample data: {}", e);
                sample_courses()
            }
        }
    }

    /// Instructor list, sample data when unreachable
    pub async fn instructors(&self) -> Vec<Instructor> {
        match self.api.list_instructors().await {
            Ok(body) => reconcile_records(&body).records,
            Err(e) => {
                warn!("Failed to load instructors, using sample data: {}", e);
                sample_instructors()
            }
        }
    }

    /// Courses and instructors for the creation form, fetched concurrently
    pub async fn catalog(&self) -> (Vec<Course>, Vec<Instructor>) {
        futures::join!(self.courses(), self.instructors())
    }

    /// Student list; there is no sample fallback for students
    pub async fn students(&self, page: Option<u32>) -> Result<Vec<Student>> {
        let body = self.api.list_students(page).await?;
        reconcile_records(&body).into_result()
    }

    fn bump(&self, applied: bool) {
        if applied {
            self.revision.send_modify(|revision| *revision += 1);
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(DeskError::Closed)
        } else {
            Ok(())
        }
    }

    fn reconcile_list(&self, body: &Value) -> Vec<Batch> {
        let reconciled = reconcile_batches(body, Utc::now());
        if reconciled.skipped > 0 {
            warn!("Dropped {} unreadable batch records", reconciled.skipped);
        }
        if let Some(error) = &reconciled.error {
            warn!("Treating batch response as empty: {}", error);
        }
        reconciled.records
    }

    async fn mutate<F, Fut>(
        &self,
        id: &str,
        mutation: LocalMutation,
        success: String,
        failure: String,
        remote: F,
    ) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        let (ticket, snapshot) = self.state.lock().begin_mutation(id, mutation)?;
        debug!("Mutation #{} on {}: {:?}", ticket.seq, id, mutation);

        match remote().await {
            Ok(_) => {
                self.state.lock().complete_mutation(&ticket, success);
                if let Err(e) = self.refresh(RefreshTrigger::PostMutation).await {
                    warn!("Resync after change to {} failed: {}", id, e);
                }
                Ok(())
            }
            Err(e) => {
                warn!("Mutation #{} on {} failed, rolling back: {}", ticket.seq, id, e);
                self.state
                    .lock()
                    .rollback_mutation(&ticket, snapshot, format!("{}: {}", failure, e));
                Err(e)
            }
        }
    }

    async fn after_create(&self, name: &str, result: Result<Value>) -> Result<Value> {
        match result {
            Ok(body) => {
                self.state
                    .lock()
                    .push_notice(Notice::success(format!("Batch '{}' created", name)));
                if let Err(e) = self.refresh(RefreshTrigger::PostMutation).await {
                    warn!("Resync after creating '{}' failed: {}", name, e);
                }
                Ok(body)
            }
            Err(e) => {
                self.state
                    .lock()
                    .push_notice(Notice::error(format!("Failed to create '{}': {}", name, e)));
                Err(e)
            }
        }
    }
}

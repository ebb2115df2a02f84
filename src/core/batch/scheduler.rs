//! Refresh scheduler
//!
//! Keeps a [`BatchBoard`] eventually consistent with the server. A single task
//! owns the polling timer and the focus/visibility debounce window; every trigger
//! ends up in [`BatchBoard::refresh`]. Background failures are logged and
//! otherwise ignored. Manual refreshes return their error to the caller.

use super::board::BatchBoard;
use super::state::RefreshTrigger;
use crate::config::RefreshConfig;
use crate::utils::error::{DeskError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

#[derive(Debug)]
enum Command {
    Focus,
    Visibility,
    SetAutoRefresh(bool),
    Shutdown,
}

/// Spawns the refresh loop for a board
pub struct RefreshScheduler;

impl RefreshScheduler {
    /// Start the loop on the current tokio runtime
    pub fn spawn(board: Arc<BatchBoard>, config: &RefreshConfig) -> RefreshHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Worker {
            board: Arc::clone(&board),
            commands: rx,
            auto_refresh: config.auto_refresh,
            interval: config.interval(),
            debounce: config.focus_debounce(),
        };
        debug!(
            "Starting refresh scheduler (auto: {}, every {:?}, debounce {:?})",
            config.auto_refresh,
            config.interval(),
            config.focus_debounce()
        );
        let task = tokio::spawn(worker.run());

        RefreshHandle {
            board,
            commands: tx,
            task: Some(task),
        }
    }
}

/// Control surface of a running scheduler. Dropping it stops the loop.
pub struct RefreshHandle {
    board: Arc<BatchBoard>,
    commands: mpsc::UnboundedSender<Command>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// The window regained focus
    pub fn notify_focus(&self) {
        let _ = self.commands.send(Command::Focus);
    }

    /// The view became visible
    pub fn notify_visibility(&self) {
        let _ = self.commands.send(Command::Visibility);
    }

    /// Turn the polling timer on or off
    pub fn set_auto_refresh(&self, enabled: bool) {
        let _ = self.commands.send(Command::SetAutoRefresh(enabled));
    }

    /// Operator-initiated refresh; errors are returned, not swallowed
    pub async fn refresh_now(&self) -> Result<usize> {
        if !self.is_running() {
            return Err(DeskError::Closed);
        }
        self.board.refresh(RefreshTrigger::Manual).await
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the loop and wait for it to exit
    pub async fn shutdown(mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Stop the loop and unmount the board
    pub async fn unmount(self) {
        let board = Arc::clone(&self.board);
        self.shutdown().await;
        board.unmount();
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct Worker {
    board: Arc<BatchBoard>,
    commands: mpsc::UnboundedReceiver<Command>,
    auto_refresh: bool,
    interval: Duration,
    debounce: Duration,
}

impl Worker {
    async fn run(mut self) {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Focus and visibility events that land inside one window share a refresh.
        let mut pending: Option<(Instant, RefreshTrigger)> = None;

        loop {
            let deadline = pending.map(|(at, _)| at);
            tokio::select! {
                command = self.commands.recv() => match command {
                    None | Some(Command::Shutdown) => break,
                    Some(Command::Focus) => {
                        self.schedule_debounced(&mut pending, RefreshTrigger::Focus)
                    }
                    Some(Command::Visibility) => {
                        self.schedule_debounced(&mut pending, RefreshTrigger::Visibility)
                    }
                    Some(Command::SetAutoRefresh(enabled)) => {
                        if enabled && !self.auto_refresh {
                            ticker.reset();
                        }
                        debug!("Auto refresh {}", if enabled { "enabled" } else { "disabled" });
                        self.auto_refresh = enabled;
                    }
                },
                _ = ticker.tick(), if self.auto_refresh => {
                    self.background(RefreshTrigger::Interval).await;
                }
                _ = sleep_until(deadline), if deadline.is_some() => {
                    let trigger = pending
                        .take()
                        .map(|(_, trigger)| trigger)
                        .unwrap_or(RefreshTrigger::Focus);
                    self.background(trigger).await;
                }
            }

            if self.board.is_closed() {
                break;
            }
        }
        debug!("Refresh scheduler stopped");
    }

    fn schedule_debounced(
        &self,
        pending: &mut Option<(Instant, RefreshTrigger)>,
        trigger: RefreshTrigger,
    ) {
        if pending.is_none() {
            *pending = Some((Instant::now() + self.debounce, trigger));
        } else {
            debug!("Coalescing {} refresh into pending one", trigger);
        }
    }

    async fn background(&self, trigger: RefreshTrigger) {
        match self.board.refresh(trigger).await {
            Ok(count) => debug!("Background refresh ({}) returned {} batches", trigger, count),
            Err(DeskError::Closed) => {}
            Err(e) => warn!("Background refresh ({}) failed: {}", trigger, e),
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

//! Batch lifecycle management
//!
//! - **status**: transition table
//! - **validate**: creation checks run before any request
//! - **reconcile**: response envelopes to canonical batches
//! - **optimistic**: snapshot, local apply, rollback
//! - **state**: board state machine
//! - **board**: the owner of the list
//! - **scheduler**: polling and focus/visibility refresh

pub mod board;
pub mod fallback;
pub mod optimistic;
pub mod reconcile;
pub mod scheduler;
pub mod state;
pub mod status;
pub mod validate;

pub use board::{BatchBoard, LoadSource};
pub use reconcile::{Envelope, Reconciled, reconcile_batch, reconcile_batches, reconcile_records};
pub use scheduler::{RefreshHandle, RefreshScheduler};
pub use state::{BoardPhase, Notice, NoticeLevel, RefreshTrigger};
pub use status::transition;

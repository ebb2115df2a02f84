//! # coursedesk
//!
//! Admin client for the course platform's batch management screens.
//!
//! ## Features
//!
//! - **Lifecycle rules**: batch status changes follow a fixed transition table,
//!   checked before anything is sent
//! - **Optimistic updates**: status changes and deletes apply locally at once and
//!   roll back exactly when the server refuses them
//! - **Lenient reads**: list responses are accepted in every envelope the platform
//!   produces and normalized into one record shape
//! - **Background refresh**: interval polling plus debounced focus/visibility
//!   refreshes keep the board close to the server
//! - **Lesson viewer helpers**: curriculum navigation and locally persisted notes,
//!   bookmarks and progress
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coursedesk::{BatchBoard, BatchStatus, DeskConfig, HttpBatchApi};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DeskConfig::from_env()?;
//!     let api = Arc::new(HttpBatchApi::new(&config.api)?);
//!     let board = BatchBoard::new(api);
//!
//!     board.load().await?;
//!     for batch in board.batches() {
//!         println!("{} [{}]", batch.name, batch.status);
//!     }
//!
//!     board.change_status("64f1c0", BatchStatus::Completed).await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod sdk;
pub mod utils;

// Re-export main types
pub use config::{ConfigBuilder, DeskConfig};
pub use utils::error::{DeskError, Result};

pub use core::batch::{
    BatchBoard, BoardPhase, LoadSource, Notice, NoticeLevel, RefreshHandle, RefreshScheduler,
    RefreshTrigger, transition,
};
pub use core::lesson::{Curriculum, FileStore, KeyValueStore, LessonNotes, MemoryStore};
pub use core::types::{
    Batch, BatchFilter, BatchStatus, BatchType, Course, Instructor, InstructorRef, NewBatch,
    NewIndividualBatch, ScheduleEntry, Student,
};
pub use sdk::{BatchApi, HttpBatchApi, MemoryBatchApi};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build metadata stamped by the build script
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Seconds since the Unix epoch
    pub build_time: &'static str,
    pub git_hash: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("COURSEDESK_BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("COURSEDESK_GIT_HASH").unwrap_or("unknown"),
        }
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.version, self.git_hash)
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}

//! Error handling utilities
//!
//! One error enum for the whole crate plus constructors and classification helpers.

mod helpers;
mod types;

pub use types::{DeskError, Result};

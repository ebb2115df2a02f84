//! REST client for the course platform
//!
//! [`BatchApi`] is the seam the batch board talks through. [`HttpBatchApi`] is the
//! reqwest-backed implementation, [`MemoryBatchApi`] an in-process stand-in.

mod api;
mod client;
pub mod memory;

pub use api::BatchApi;
pub use client::HttpBatchApi;
pub use memory::{EnvelopeStyle, MemoryBatchApi};

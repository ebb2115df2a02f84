//! Core domain logic

pub mod batch;
pub mod lesson;
pub mod types;

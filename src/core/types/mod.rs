//! Domain types

mod batch;
mod catalog;
mod filter;

pub use batch::{
    Batch, BatchStatus, BatchType, InstructorRef, InstructorSummary, NewBatch, NewIndividualBatch,
    ScheduleEntry,
};
pub use catalog::{Course, Instructor, Student};
pub use filter::BatchFilter;

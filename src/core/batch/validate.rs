//! Client-side validation of creation requests
//!
//! Runs before any request is issued; failures never reach the network.

use crate::core::types::{BatchType, NewBatch, NewIndividualBatch};
use crate::utils::error::{DeskError, Result};
use chrono::NaiveTime;

/// Validate a group or individual creation request
pub fn validate_new_batch(batch: &NewBatch) -> Result<()> {
    if batch.name.trim().is_empty() {
        return Err(DeskError::validation("batch name is required"));
    }
    if batch.code.trim().is_empty() {
        return Err(DeskError::validation("batch code is required"));
    }
    if batch.course_id.trim().is_empty() {
        return Err(DeskError::validation("a course must be selected"));
    }
    if batch.capacity < 1 {
        return Err(DeskError::validation("capacity must be at least 1"));
    }
    if batch.batch_type == BatchType::Individual && batch.capacity != 1 {
        return Err(DeskError::validation(format!(
            "individual batches must have capacity 1, got {}",
            batch.capacity
        )));
    }
    if batch.end_date < batch.start_date {
        return Err(DeskError::validation("end date must not precede start date"));
    }

    for entry in &batch.schedule {
        if entry.day.trim().is_empty() {
            return Err(DeskError::validation("schedule entry is missing a day"));
        }
        let start = parse_time(&entry.start_time)?;
        let end = parse_time(&entry.end_time)?;
        if end <= start {
            return Err(DeskError::validation(format!(
                "schedule on {} ends before it starts",
                entry.day
            )));
        }
    }

    Ok(())
}

/// Validate a 1:1 creation request
pub fn validate_individual(request: &NewIndividualBatch) -> Result<()> {
    if request.batch.batch_type != BatchType::Individual {
        return Err(DeskError::validation(
            "individual batch request must have batch_type 'individual'",
        ));
    }
    validate_new_batch(&request.batch)?;
    if let Some(student) = &request.student_id {
        if student.trim().is_empty() {
            return Err(DeskError::validation("student id must not be blank"));
        }
    }
    Ok(())
}

fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| DeskError::validation(format!("invalid time '{}', expected HH:MM", value)))
}

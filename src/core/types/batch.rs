//! Batch entity and its value types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::DeskError;

/// Lifecycle state of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BatchStatus {
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

impl BatchStatus {
    pub const ALL: [BatchStatus; 4] = [
        BatchStatus::Upcoming,
        BatchStatus::Active,
        BatchStatus::Completed,
        BatchStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Upcoming => "Upcoming",
            BatchStatus::Active => "Active",
            BatchStatus::Completed => "Completed",
            BatchStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatchStatus {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upcoming" => Ok(BatchStatus::Upcoming),
            "active" | "ongoing" => Ok(BatchStatus::Active),
            "completed" => Ok(BatchStatus::Completed),
            "cancelled" | "canceled" => Ok(BatchStatus::Cancelled),
            other => Err(DeskError::validation(format!("unknown batch status '{}'", other))),
        }
    }
}

/// Group batches hold many students, individual (1:1) batches exactly one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchType {
    #[default]
    Group,
    Individual,
}

impl BatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchType::Group => "group",
            BatchType::Individual => "individual",
        }
    }
}

impl fmt::Display for BatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatchType {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "group" => Ok(BatchType::Group),
            "individual" | "1:1" | "one_on_one" => Ok(BatchType::Individual),
            other => Err(DeskError::validation(format!("unknown batch type '{}'", other))),
        }
    }
}

/// One weekly slot, times as `HH:MM`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

impl ScheduleEntry {
    pub fn new(day: &str, start_time: &str, end_time: &str) -> Self {
        Self {
            day: day.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
        }
    }
}

/// Instructor fields embedded in a batch record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Instructor assignment, resolved once when a record is reconciled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InstructorRef {
    #[default]
    Unassigned,
    ById(String),
    Embedded(InstructorSummary),
}

impl InstructorRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            InstructorRef::Unassigned => None,
            InstructorRef::ById(id) => Some(id),
            InstructorRef::Embedded(summary) => Some(&summary.id),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            InstructorRef::Embedded(summary) => Some(&summary.name),
            _ => None,
        }
    }
}

/// Canonical in-memory batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: String,
    pub name: String,
    pub code: String,
    pub course_id: Option<String>,
    pub course_name: Option<String>,
    pub capacity: u32,
    pub enrolled: u32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub schedule: Vec<ScheduleEntry>,
    pub instructor: InstructorRef,
    pub batch_type: BatchType,
    pub status: BatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Batch {
    /// Statuses this batch may move to next
    pub fn allowed_next(&self) -> &'static [BatchStatus] {
        self.status.allowed_next()
    }

    pub fn seats_left(&self) -> u32 {
        self.capacity.saturating_sub(self.enrolled)
    }

    pub fn is_full(&self) -> bool {
        self.enrolled >= self.capacity
    }
}

/// Creation request for a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBatch {
    #[serde(rename = "batch_name")]
    pub name: String,
    #[serde(rename = "batch_code")]
    pub code: String,
    #[serde(rename = "course")]
    pub course_id: String,
    pub capacity: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,
    #[serde(rename = "instructor", default, skip_serializing_if = "Option::is_none")]
    pub instructor_id: Option<String>,
    #[serde(default)]
    pub batch_type: BatchType,
    #[serde(default = "default_new_status")]
    pub status: BatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Creation request for a 1:1 batch, optionally enrolling the student right away
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIndividualBatch {
    #[serde(flatten)]
    pub batch: NewBatch,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

fn default_new_status() -> BatchStatus {
    BatchStatus::Upcoming
}

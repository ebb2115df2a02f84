//! List reconciliation
//!
//! The backend wraps list responses inconsistently across endpoints and versions.
//! Every body goes through [`Envelope::decode`] and every record through a lenient
//! coercion into the canonical [`Batch`], so the rest of the crate only ever sees
//! one shape. Accepted envelopes:
//!
//! 1. a bare array: `[ ... ]`
//! 2. `{ "data": [ ... ] }`
//! 3. `{ "data": { "data": [ ... ] } }`
//! 4. `{ "data": { "success": true, "data": [ ... ] } }`

use crate::core::types::{
    Batch, BatchStatus, BatchType, InstructorRef, InstructorSummary, ScheduleEntry,
};
use crate::utils::error::{DeskError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Decoded response envelope, borrowing the record array from the body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope<'a> {
    Bare(&'a [Value]),
    Data(&'a [Value]),
    Nested(&'a [Value]),
    SuccessNested(&'a [Value]),
}

impl<'a> Envelope<'a> {
    pub fn decode(body: &'a Value) -> Result<Self> {
        match body {
            Value::Array(items) => Ok(Envelope::Bare(items)),
            Value::Object(map) => match map.get("data") {
                Some(Value::Array(items)) => Ok(Envelope::Data(items)),
                Some(Value::Object(inner)) => match (inner.get("data"), inner.get("success")) {
                    (Some(Value::Array(items)), None) => Ok(Envelope::Nested(items)),
                    (Some(Value::Array(items)), Some(Value::Bool(true))) => {
                        Ok(Envelope::SuccessNested(items))
                    }
                    (Some(Value::Array(_)), Some(flag)) => Err(DeskError::shape(format!(
                        "data.success is {} instead of true",
                        flag
                    ))),
                    (Some(other), _) => Err(DeskError::shape(format!(
                        "data.data is {} instead of an array",
                        kind(other)
                    ))),
                    (None, _) => Err(DeskError::shape("data object without a data array")),
                },
                Some(other) => Err(DeskError::shape(format!(
                    "data is {} instead of an array or object",
                    kind(other)
                ))),
                None => Err(DeskError::shape("object without a data field")),
            },
            other => Err(DeskError::shape(format!(
                "expected an array or object, got {}",
                kind(other)
            ))),
        }
    }

    pub fn records(&self) -> &'a [Value] {
        match *self {
            Envelope::Bare(items)
            | Envelope::Data(items)
            | Envelope::Nested(items)
            | Envelope::SuccessNested(items) => items,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Envelope::Bare(_) => "bare",
            Envelope::Data(_) => "data",
            Envelope::Nested(_) => "data.data",
            Envelope::SuccessNested(_) => "data.success+data.data",
        }
    }
}

/// Outcome of reconciling one response body
#[derive(Debug)]
pub struct Reconciled<T> {
    pub records: Vec<T>,
    /// Records dropped because they could not be coerced
    pub skipped: usize,
    /// Set when the envelope itself was not recognized
    pub error: Option<DeskError>,
}

impl<T> Reconciled<T> {
    fn unrecognized(error: DeskError) -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into a `Result`, failing only on an unrecognized envelope
    pub fn into_result(self) -> Result<Vec<T>> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.records),
        }
    }
}

/// Normalize a batch list body into canonical batches
pub fn reconcile_batches(body: &Value, now: DateTime<Utc>) -> Reconciled<Batch> {
    let envelope = match Envelope::decode(body) {
        Ok(envelope) => envelope,
        Err(error) => {
            warn!("Unrecognized batch list envelope: {}", error);
            return Reconciled::unrecognized(error);
        }
    };
    debug!(
        "Reconciling {} batch records from '{}' envelope",
        envelope.records().len(),
        envelope.name()
    );

    let mut records = Vec::with_capacity(envelope.records().len());
    let mut skipped = 0;
    for raw in envelope.records() {
        match coerce_batch(raw, now) {
            Ok(batch) => records.push(batch),
            Err(reason) => {
                warn!("Skipping batch record: {}", reason);
                skipped += 1;
            }
        }
    }

    Reconciled {
        records,
        skipped,
        error: None,
    }
}

/// Normalize a list body of any serde-decodable catalog record
pub fn reconcile_records<T: DeserializeOwned>(body: &Value) -> Reconciled<T> {
    let envelope = match Envelope::decode(body) {
        Ok(envelope) => envelope,
        Err(error) => {
            warn!("Unrecognized list envelope: {}", error);
            return Reconciled::unrecognized(error);
        }
    };

    let mut records = Vec::with_capacity(envelope.records().len());
    let mut skipped = 0;
    for raw in envelope.records() {
        match T::deserialize(raw) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Skipping record: {}", e);
                skipped += 1;
            }
        }
    }

    Reconciled {
        records,
        skipped,
        error: None,
    }
}

/// Locate the single record in a `get`/`create` response body
pub fn unwrap_record(body: &Value) -> Result<&Value> {
    let mut current = body;
    // At most two levels of `data` wrapping, as with lists.
    for _ in 0..2 {
        match current {
            Value::Object(map) if looks_like_record(map) => return Ok(current),
            Value::Object(map) => match map.get("data") {
                Some(inner @ Value::Object(_)) => current = inner,
                _ => break,
            },
            _ => break,
        }
    }
    match current {
        Value::Object(map) if looks_like_record(map) => Ok(current),
        other => Err(DeskError::shape(format!(
            "expected a single record, got {}",
            kind(other)
        ))),
    }
}

/// Reconcile a single-record body into a batch
pub fn reconcile_batch(body: &Value, now: DateTime<Utc>) -> Result<Batch> {
    let record = unwrap_record(body)?;
    coerce_batch(record, now).map_err(DeskError::Parse)
}

fn looks_like_record(map: &Map<String, Value>) -> bool {
    map.contains_key("_id") || map.contains_key("id")
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Wire record with every known spelling of every field
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBatch {
    #[serde(rename = "_id")]
    mongo_id: Option<Value>,
    id: Option<Value>,
    batch_name: Option<String>,
    name: Option<String>,
    batch_code: Option<String>,
    code: Option<String>,
    course: Option<Value>,
    course_id: Option<String>,
    capacity: Option<Value>,
    enrolled_students: Option<Value>,
    enrolled_count: Option<Value>,
    start_date: Option<String>,
    end_date: Option<String>,
    schedule: Option<Value>,
    instructor: Option<Value>,
    instructor_id: Option<Value>,
    batch_type: Option<String>,
    status: Option<String>,
    #[serde(alias = "createdAt")]
    created_at: Option<String>,
    #[serde(alias = "updatedAt")]
    updated_at: Option<String>,
}

fn coerce_batch(raw: &Value, now: DateTime<Utc>) -> std::result::Result<Batch, String> {
    let raw = RawBatch::deserialize(raw).map_err(|e| format!("malformed record: {}", e))?;

    let id = raw
        .mongo_id
        .as_ref()
        .or(raw.id.as_ref())
        .and_then(id_string)
        .ok_or_else(|| "record has no id".to_string())?;

    let status = match raw.status.as_deref() {
        Some(s) => s
            .parse::<BatchStatus>()
            .map_err(|_| format!("batch {} has unknown status '{}'", id, s))?,
        None => BatchStatus::Upcoming,
    };

    let batch_type = raw
        .batch_type
        .as_deref()
        .and_then(|t| t.parse::<BatchType>().ok())
        .unwrap_or_default();

    let enrolled = raw
        .enrolled_students
        .as_ref()
        .or(raw.enrolled_count.as_ref())
        .and_then(count)
        .unwrap_or(0);

    let capacity = match batch_type {
        BatchType::Individual => {
            if let Some(c) = raw.capacity.as_ref().and_then(count) {
                if c != 1 {
                    warn!("Individual batch {} reported capacity {}, using 1", id, c);
                }
            }
            1
        }
        BatchType::Group => raw
            .capacity
            .as_ref()
            .and_then(count)
            .filter(|c| *c >= 1)
            .unwrap_or_else(|| enrolled.max(1)),
    };

    let (course_id, course_name) = resolve_course(raw.course.as_ref(), raw.course_id);
    let instructor = resolve_instructor(raw.instructor.as_ref(), raw.instructor_id.as_ref());

    let name = raw
        .batch_name
        .or(raw.name)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| id.clone());
    let code = raw.batch_code.or(raw.code).unwrap_or_default();

    Ok(Batch {
        id,
        name,
        code,
        course_id,
        course_name,
        capacity,
        enrolled,
        start_date: raw.start_date.as_deref().and_then(parse_date),
        end_date: raw.end_date.as_deref().and_then(parse_date),
        schedule: raw.schedule.as_ref().map(coerce_schedule).unwrap_or_default(),
        instructor,
        batch_type,
        status,
        created_at: raw
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(now),
        updated_at: raw
            .updated_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(now),
    })
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        // Extended JSON: {"$oid": "..."}
        Value::Object(map) => map.get("$oid").and_then(id_string),
        _ => None,
    }
}

/// A count given as a number, a numeric string, or an array of members
fn count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n.min(u32::MAX as u64) as u32),
        Value::String(s) => s.trim().parse().ok(),
        Value::Array(items) => Some(items.len() as u32),
        _ => None,
    }
}

fn resolve_course(
    course: Option<&Value>,
    course_id: Option<String>,
) -> (Option<String>, Option<String>) {
    match course {
        Some(Value::String(id)) if !id.is_empty() => (Some(id.clone()), None),
        Some(Value::Object(map)) => {
            let id = map
                .get("_id")
                .or_else(|| map.get("id"))
                .and_then(id_string)
                .or(course_id);
            let name = ["title", "name", "course_name"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string);
            (id, name)
        }
        _ => (course_id, None),
    }
}

/// Embedded object wins over a bare id; both are never kept.
fn resolve_instructor(instructor: Option<&Value>, instructor_id: Option<&Value>) -> InstructorRef {
    match instructor {
        Some(Value::Object(map)) => {
            let id = map.get("_id").or_else(|| map.get("id")).and_then(id_string);
            let name = ["name", "fullName", "full_name"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string);
            match (id, name) {
                (Some(id), Some(name)) => {
                    return InstructorRef::Embedded(InstructorSummary {
                        id,
                        name,
                        email: map.get("email").and_then(Value::as_str).map(str::to_string),
                    });
                }
                (Some(id), None) => return InstructorRef::ById(id),
                _ => {}
            }
        }
        Some(value @ Value::String(_)) => {
            if let Some(id) = id_string(value) {
                return InstructorRef::ById(id);
            }
        }
        _ => {}
    }

    instructor_id
        .and_then(id_string)
        .map(InstructorRef::ById)
        .unwrap_or_default()
}

#[derive(Deserialize)]
struct RawScheduleEntry {
    day: String,
    #[serde(alias = "startTime")]
    start_time: String,
    #[serde(alias = "endTime")]
    end_time: String,
}

fn coerce_schedule(value: &Value) -> Vec<ScheduleEntry> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| RawScheduleEntry::deserialize(item).ok())
        .map(|entry| ScheduleEntry {
            day: entry.day,
            start_time: entry.start_time,
            end_time: entry.end_time,
        })
        .collect()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(value).map(|ts| ts.date_naive()))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

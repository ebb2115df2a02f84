//! In-memory implementation of [`BatchApi`]
//!
//! Backs the `--offline` mode of the CLI and the board tests. Records are served
//! in the same wire format the real server uses, wrapped in a configurable
//! envelope. Endpoints can be switched into a failing state to exercise
//! rollback and fallback paths.

use super::api::BatchApi;
use crate::core::batch::fallback::{sample_batches, sample_courses, sample_instructors};
use crate::core::types::{
    Batch, BatchFilter, BatchStatus, BatchType, Course, Instructor, InstructorRef,
    NewBatch, NewIndividualBatch, Student,
};
use crate::utils::error::{DeskError, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Endpoint identifiers for call counting and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListBatches,
    GetBatch,
    CreateGroupBatch,
    CreateIndividualBatch,
    DeleteBatch,
    UpdateBatchStatus,
    ListCourses,
    ListInstructors,
    ListStudents,
}

/// Which list envelope to answer with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnvelopeStyle {
    Bare,
    Data,
    Nested,
    #[default]
    SuccessNested,
}

impl EnvelopeStyle {
    pub fn wrap(&self, records: Vec<Value>) -> Value {
        match self {
            EnvelopeStyle::Bare => Value::Array(records),
            EnvelopeStyle::Data => json!({ "data": records }),
            EnvelopeStyle::Nested => json!({ "data": { "data": records } }),
            EnvelopeStyle::SuccessNested => json!({ "data": { "success": true, "data": records } }),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    batches: Vec<Batch>,
    courses: Vec<Course>,
    instructors: Vec<Instructor>,
    students: Vec<Student>,
    envelope: EnvelopeStyle,
    failing: HashSet<Endpoint>,
    calls: HashMap<Endpoint, usize>,
    next_id: u64,
}

/// Server stand-in holding everything in memory
#[derive(Debug, Default)]
pub struct MemoryBatchApi {
    inner: Mutex<Inner>,
    latency: Duration,
}

impl MemoryBatchApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeded with the offline sample catalog
    pub fn with_sample_data() -> Self {
        let api = Self::with_batches(sample_batches());
        {
            let mut inner = api.inner.lock();
            inner.courses = sample_courses();
            inner.instructors = sample_instructors();
        }
        api
    }

    pub fn with_batches(batches: Vec<Batch>) -> Self {
        let api = Self::new();
        api.inner.lock().batches = batches;
        api
    }

    pub fn with_students(self, students: Vec<Student>) -> Self {
        self.inner.lock().students = students;
        self
    }

    /// Delay every response by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_envelope(self, envelope: EnvelopeStyle) -> Self {
        self.inner.lock().envelope = envelope;
        self
    }

    /// Make `endpoint` answer with 503 until switched back
    pub fn set_failing(&self, endpoint: Endpoint, failing: bool) {
        let mut inner = self.inner.lock();
        if failing {
            inner.failing.insert(endpoint);
        } else {
            inner.failing.remove(&endpoint);
        }
    }

    /// Number of requests received by `endpoint`
    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.inner.lock().calls.get(&endpoint).copied().unwrap_or(0)
    }

    /// Server-side view of the batches
    pub fn stored_batches(&self) -> Vec<Batch> {
        self.inner.lock().batches.clone()
    }

    async fn enter(&self, endpoint: Endpoint) -> Result<()> {
        let failing = {
            let mut inner = self.inner.lock();
            *inner.calls.entry(endpoint).or_insert(0) += 1;
            inner.failing.contains(&endpoint)
        };
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if failing {
            return Err(DeskError::api(503, "service unavailable"));
        }
        Ok(())
    }

    fn wrap_list<T: Serialize>(&self, records: &[T]) -> Result<Value> {
        let values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(self.inner.lock().envelope.wrap(values))
    }

    fn insert(&self, request: &NewBatch, enrolled: u32) -> Value {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let now = Utc::now();
        let course_name = inner
            .courses
            .iter()
            .find(|c| c.id == request.course_id)
            .map(|c| c.title.clone());
        let batch = Batch {
            id: format!("mem-{}", inner.next_id),
            name: request.name.clone(),
            code: request.code.clone(),
            course_id: Some(request.course_id.clone()),
            course_name,
            capacity: request.capacity,
            enrolled,
            start_date: Some(request.start_date),
            end_date: Some(request.end_date),
            schedule: request.schedule.clone(),
            instructor: request
                .instructor_id
                .clone()
                .map(InstructorRef::ById)
                .unwrap_or_default(),
            batch_type: request.batch_type,
            status: request.status,
            created_at: now,
            updated_at: now,
        };
        let wire = batch_to_wire(&batch);
        inner.batches.push(batch);
        json!({ "success": true, "data": wire })
    }
}

/// Render a batch the way the platform API does
pub fn batch_to_wire(batch: &Batch) -> Value {
    let instructor = match &batch.instructor {
        InstructorRef::Unassigned => Value::Null,
        InstructorRef::ById(id) => Value::String(id.clone()),
        InstructorRef::Embedded(summary) => json!({
            "_id": summary.id,
            "name": summary.name,
            "email": summary.email,
        }),
    };
    let course = match (&batch.course_id, &batch.course_name) {
        (Some(id), Some(title)) => json!({ "_id": id, "title": title }),
        (Some(id), None) => Value::String(id.clone()),
        _ => Value::Null,
    };
    json!({
        "_id": batch.id,
        "batch_name": batch.name,
        "batch_code": batch.code,
        "course": course,
        "capacity": batch.capacity,
        "enrolled_students": batch.enrolled,
        "start_date": batch.start_date,
        "end_date": batch.end_date,
        "schedule": batch.schedule,
        "instructor": instructor,
        "batch_type": batch.batch_type,
        "status": batch.status,
        "createdAt": batch.created_at.to_rfc3339(),
        "updatedAt": batch.updated_at.to_rfc3339(),
    })
}

#[async_trait]
impl BatchApi for MemoryBatchApi {
    async fn list_batches(&self, filter: &BatchFilter) -> Result<Value> {
        self.enter(Endpoint::ListBatches).await?;
        let inner = self.inner.lock();
        let records = inner
            .batches
            .iter()
            .filter(|b| filter.matches(b))
            .map(batch_to_wire)
            .collect();
        Ok(inner.envelope.wrap(records))
    }

    async fn get_batch(&self, id: &str) -> Result<Value> {
        self.enter(Endpoint::GetBatch).await?;
        let inner = self.inner.lock();
        inner
            .batches
            .iter()
            .find(|b| b.id == id)
            .map(|b| json!({ "success": true, "data": batch_to_wire(b) }))
            .ok_or_else(|| DeskError::api(404, "Batch not found"))
    }

    async fn create_group_batch(&self, batch: &NewBatch) -> Result<Value> {
        self.enter(Endpoint::CreateGroupBatch).await?;
        Ok(self.insert(batch, 0))
    }

    async fn create_individual_batch(&self, request: &NewIndividualBatch) -> Result<Value> {
        self.enter(Endpoint::CreateIndividualBatch).await?;
        let mut batch = request.batch.clone();
        batch.batch_type = BatchType::Individual;
        batch.capacity = 1;
        let enrolled = u32::from(request.student_id.is_some());
        Ok(self.insert(&batch, enrolled))
    }

    async fn delete_batch(&self, id: &str) -> Result<Value> {
        self.enter(Endpoint::DeleteBatch).await?;
        let mut inner = self.inner.lock();
        let index = inner
            .batches
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| DeskError::api(404, "Batch not found"))?;
        inner.batches.remove(index);
        Ok(json!({ "success": true, "message": "Batch deleted" }))
    }

    async fn update_batch_status(&self, id: &str, status: BatchStatus) -> Result<Value> {
        self.enter(Endpoint::UpdateBatchStatus).await?;
        let mut inner = self.inner.lock();
        let batch = inner
            .batches
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| DeskError::api(404, "Batch not found"))?;
        batch.status = status;
        batch.updated_at = Utc::now();
        Ok(json!({ "success": true, "data": batch_to_wire(batch) }))
    }

    async fn list_courses(&self) -> Result<Value> {
        self.enter(Endpoint::ListCourses).await?;
        let courses = self.inner.lock().courses.clone();
        self.wrap_list(&courses)
    }

    async fn list_instructors(&self) -> Result<Value> {
        self.enter(Endpoint::ListInstructors).await?;
        let instructors = self.inner.lock().instructors.clone();
        self.wrap_list(&instructors)
    }

    async fn list_students(&self, _page: Option<u32>) -> Result<Value> {
        self.enter(Endpoint::ListStudents).await?;
        let students = self.inner.lock().students.clone();
        self.wrap_list(&students)
    }
}

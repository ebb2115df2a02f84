//! Offline sample data
//!
//! Served when a primary read fails so the board stays usable in a degraded state.

use crate::core::types::{
    Batch, BatchStatus, BatchType, Course, Instructor, InstructorRef, InstructorSummary,
    ScheduleEntry,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

pub fn sample_courses() -> Vec<Course> {
    vec![
        Course {
            id: "sample-course-1".to_string(),
            title: "Full-Stack Web Development".to_string(),
            description: Some("HTML, CSS, JavaScript and a backend framework".to_string()),
            category: Some("Development".to_string()),
        },
        Course {
            id: "sample-course-2".to_string(),
            title: "Data Science Foundations".to_string(),
            description: Some("Statistics, Python and visualization".to_string()),
            category: Some("Data".to_string()),
        },
    ]
}

pub fn sample_instructors() -> Vec<Instructor> {
    vec![
        Instructor {
            id: "sample-instructor-1".to_string(),
            name: "Priya Raman".to_string(),
            email: Some("priya@example.com".to_string()),
            expertise: vec!["JavaScript".to_string(), "React".to_string()],
        },
        Instructor {
            id: "sample-instructor-2".to_string(),
            name: "Tomás Ortega".to_string(),
            email: Some("tomas@example.com".to_string()),
            expertise: vec!["Python".to_string(), "Statistics".to_string()],
        },
    ]
}

pub fn sample_batches() -> Vec<Batch> {
    let stamp = epoch();
    vec![
        Batch {
            id: "sample-batch-1".to_string(),
            name: "Web Dev Morning".to_string(),
            code: "WD-M-01".to_string(),
            course_id: Some("sample-course-1".to_string()),
            course_name: Some("Full-Stack Web Development".to_string()),
            capacity: 25,
            enrolled: 18,
            start_date: date(2025, 2, 3),
            end_date: date(2025, 5, 30),
            schedule: vec![
                ScheduleEntry::new("Monday", "09:00", "11:00"),
                ScheduleEntry::new("Wednesday", "09:00", "11:00"),
            ],
            instructor: InstructorRef::Embedded(InstructorSummary {
                id: "sample-instructor-1".to_string(),
                name: "Priya Raman".to_string(),
                email: None,
            }),
            batch_type: BatchType::Group,
            status: BatchStatus::Active,
            created_at: stamp,
            updated_at: stamp,
        },
        Batch {
            id: "sample-batch-2".to_string(),
            name: "Data Science Weekend".to_string(),
            code: "DS-W-01".to_string(),
            course_id: Some("sample-course-2".to_string()),
            course_name: Some("Data Science Foundations".to_string()),
            capacity: 30,
            enrolled: 0,
            start_date: date(2025, 6, 7),
            end_date: date(2025, 9, 28),
            schedule: vec![ScheduleEntry::new("Saturday", "10:00", "13:00")],
            instructor: InstructorRef::ById("sample-instructor-2".to_string()),
            batch_type: BatchType::Group,
            status: BatchStatus::Upcoming,
            created_at: stamp,
            updated_at: stamp,
        },
        Batch {
            id: "sample-batch-3".to_string(),
            name: "React Mentoring 1:1".to_string(),
            code: "WD-1on1-07".to_string(),
            course_id: Some("sample-course-1".to_string()),
            course_name: Some("Full-Stack Web Development".to_string()),
            capacity: 1,
            enrolled: 1,
            start_date: date(2024, 9, 2),
            end_date: date(2024, 12, 20),
            schedule: vec![ScheduleEntry::new("Thursday", "17:00", "18:00")],
            instructor: InstructorRef::ById("sample-instructor-1".to_string()),
            batch_type: BatchType::Individual,
            status: BatchStatus::Completed,
            created_at: stamp,
            updated_at: stamp,
        },
    ]
}

//! Read-only catalog entities referenced by batches

use serde::{Deserialize, Serialize};

/// Course as listed by the catalog endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "name", alias = "course_name")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Instructor as listed by the instructors endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "fullName", alias = "full_name")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
}

/// Student as listed by the students endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(alias = "fullName", alias = "full_name")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

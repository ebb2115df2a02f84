//! Course curriculum tree and lesson navigation

use crate::utils::error::{DeskError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    #[default]
    Video,
    Article,
    Quiz,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default, alias = "type")]
    pub kind: LessonKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// Ordered sections, each holding ordered lessons
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Curriculum {
    pub sections: Vec<Section>,
}

/// Where a lesson sits in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonPosition {
    pub section: usize,
    pub lesson: usize,
    /// Index in the flattened lesson order
    pub overall: usize,
}

/// Neighbours of a lesson in reading order, across section boundaries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjacent<'a> {
    pub previous: Option<&'a Lesson>,
    pub next: Option<&'a Lesson>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CurriculumDoc {
    Sections(Vec<Section>),
    Wrapped { sections: Vec<Section> },
    Course { curriculum: Vec<Section> },
}

impl Curriculum {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Accepts a bare section array, `{ "sections": [...] }` or `{ "curriculum": [...] }`
    pub fn from_json(text: &str) -> Result<Self> {
        let doc: CurriculumDoc = serde_json::from_str(text)
            .map_err(|e| DeskError::parse(format!("invalid curriculum: {}", e)))?;
        let sections = match doc {
            CurriculumDoc::Sections(sections)
            | CurriculumDoc::Wrapped { sections }
            | CurriculumDoc::Course {
                curriculum: sections,
            } => sections,
        };
        Ok(Self { sections })
    }

    /// Lessons in reading order
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.sections.iter().flat_map(|s| s.lessons.iter())
    }

    pub fn total_lessons(&self) -> usize {
        self.sections.iter().map(|s| s.lessons.len()).sum()
    }

    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons().find(|l| l.id == id)
    }

    pub fn locate(&self, id: &str) -> Option<LessonPosition> {
        let mut overall = 0;
        for (section_index, section) in self.sections.iter().enumerate() {
            for (lesson_index, lesson) in section.lessons.iter().enumerate() {
                if lesson.id == id {
                    return Some(LessonPosition {
                        section: section_index,
                        lesson: lesson_index,
                        overall,
                    });
                }
                overall += 1;
            }
        }
        None
    }

    /// `None` when the lesson is not part of this curriculum
    pub fn adjacent(&self, id: &str) -> Option<Adjacent<'_>> {
        let position = self.locate(id)?;
        let previous = position
            .overall
            .checked_sub(1)
            .and_then(|index| self.lessons().nth(index));
        let next = self.lessons().nth(position.overall + 1);
        Some(Adjacent { previous, next })
    }

    /// Fraction of this curriculum's lessons that are in `completed`
    pub fn completion(&self, completed: &HashSet<String>) -> f64 {
        let total = self.total_lessons();
        if total == 0 {
            return 0.0;
        }
        let done = self.lessons().filter(|l| completed.contains(&l.id)).count();
        done as f64 / total as f64
    }
}

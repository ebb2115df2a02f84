//! Per-lesson notes, video bookmarks and progress

use super::curriculum::Curriculum;
use super::store::KeyValueStore;
use crate::utils::error::{DeskError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

pub fn notes_key(lesson_id: &str) -> String {
    format!("lesson-{}-notes", lesson_id)
}

pub fn bookmarks_key(lesson_id: &str) -> String {
    format!("video-bookmarks-{}", lesson_id)
}

pub fn progress_key(lesson_id: &str) -> String {
    format!("lesson-{}-progress", lesson_id)
}

// JSON has no NaN or infinity; they would be stored as null and break the list.
fn check_time(time_secs: f64) -> Result<()> {
    if !time_secs.is_finite() || time_secs < 0.0 {
        return Err(DeskError::validation(format!(
            "bookmark time must be a non-negative number of seconds, got {}",
            time_secs
        )));
    }
    Ok(())
}

/// A labelled point in a lesson video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub time_secs: f64,
    pub label: String,
}

impl Bookmark {
    pub fn new(time_secs: f64, label: impl Into<String>) -> Self {
        Self {
            time_secs,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonProgress {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub position_secs: f64,
}

/// Lesson-viewer state on top of a [`KeyValueStore`].
///
/// Unreadable stored values are treated as absent; the viewer must keep working
/// with whatever the store holds.
#[derive(Debug)]
pub struct LessonNotes<S> {
    store: S,
}

impl<S: KeyValueStore> LessonNotes<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Saved notes, empty when none
    pub fn notes(&self, lesson_id: &str) -> String {
        self.store.get(&notes_key(lesson_id)).unwrap_or_default()
    }

    /// Blank text clears the entry
    pub fn save_notes(&self, lesson_id: &str, text: &str) -> Result<()> {
        let key = notes_key(lesson_id);
        if text.trim().is_empty() {
            self.store.remove(&key)
        } else {
            self.store.set(&key, text)
        }
    }

    /// Bookmarks ordered by time
    pub fn bookmarks(&self, lesson_id: &str) -> Vec<Bookmark> {
        self.read_json(&bookmarks_key(lesson_id)).unwrap_or_default()
    }

    /// Times must be finite and not negative
    pub fn add_bookmark(&self, lesson_id: &str, bookmark: Bookmark) -> Result<Vec<Bookmark>> {
        check_time(bookmark.time_secs)?;
        let mut bookmarks = self.bookmarks(lesson_id);
        bookmarks.push(bookmark);
        bookmarks.sort_by(|a, b| a.time_secs.total_cmp(&b.time_secs));
        self.write_bookmarks(lesson_id, &bookmarks)?;
        Ok(bookmarks)
    }

    /// Out-of-range indexes leave the list untouched
    pub fn remove_bookmark(&self, lesson_id: &str, index: usize) -> Result<Vec<Bookmark>> {
        let mut bookmarks = self.bookmarks(lesson_id);
        if index < bookmarks.len() {
            bookmarks.remove(index);
            self.write_bookmarks(lesson_id, &bookmarks)?;
        }
        Ok(bookmarks)
    }

    pub fn progress(&self, lesson_id: &str) -> LessonProgress {
        self.read_json(&progress_key(lesson_id)).unwrap_or_default()
    }

    pub fn save_progress(&self, lesson_id: &str, progress: &LessonProgress) -> Result<()> {
        let text = serde_json::to_string(progress)?;
        self.store.set(&progress_key(lesson_id), &text)
    }

    /// Remember the playback position without touching completion
    pub fn record_position(&self, lesson_id: &str, position_secs: f64) -> Result<()> {
        if !position_secs.is_finite() {
            return Err(DeskError::validation(format!(
                "playback position must be finite, got {}",
                position_secs
            )));
        }
        let mut progress = self.progress(lesson_id);
        progress.position_secs = position_secs.max(0.0);
        self.save_progress(lesson_id, &progress)
    }

    pub fn mark_completed(&self, lesson_id: &str, completed: bool) -> Result<()> {
        let mut progress = self.progress(lesson_id);
        progress.completed = completed;
        self.save_progress(lesson_id, &progress)
    }

    /// Ids of the curriculum's lessons marked completed
    pub fn completed_lessons(&self, curriculum: &Curriculum) -> HashSet<String> {
        curriculum
            .lessons()
            .filter(|lesson| self.progress(&lesson.id).completed)
            .map(|lesson| lesson.id.clone())
            .collect()
    }

    fn write_bookmarks(&self, lesson_id: &str, bookmarks: &[Bookmark]) -> Result<()> {
        let key = bookmarks_key(lesson_id);
        if bookmarks.is_empty() {
            return self.store.remove(&key);
        }
        let text = serde_json::to_string(bookmarks)?;
        self.store.set(&key, &text)
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = self.store.get(key)?;
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring unreadable value for {}: {}", key, e);
                None
            }
        }
    }
}

//! Lesson viewer support: curriculum navigation and locally persisted notes

pub mod curriculum;
pub mod notes;
pub mod store;

pub use curriculum::{Adjacent, Curriculum, Lesson, LessonKind, LessonPosition, Section};
pub use notes::{Bookmark, LessonNotes, LessonProgress};
pub use store::{FileStore, KeyValueStore, MemoryStore};

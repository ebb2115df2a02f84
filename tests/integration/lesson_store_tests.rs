//! Lesson viewer persistence tests
//!
//! Notes, bookmarks and progress written through `FileStore` must survive a
//! reopen, the way browser storage survives a page reload.

#[cfg(test)]
mod tests {
    use coursedesk::config::ConfigBuilder;
    use coursedesk::core::lesson::notes::{bookmarks_key, notes_key, progress_key};
    use coursedesk::core::lesson::{Bookmark, LessonProgress};
    use coursedesk::{Curriculum, FileStore, KeyValueStore, LessonNotes};
    use std::fs;
    use tempfile::TempDir;

    const CURRICULUM: &str = r#"{
        "curriculum": [
            {"_id": "sec-1", "title": "Getting started", "lessons": [
                {"_id": "les-1", "title": "Install the toolchain", "duration_minutes": 8},
                {"_id": "les-2", "title": "Hello, cargo", "type": "article"}
            ]},
            {"_id": "sec-2", "title": "Ownership", "lessons": [
                {"_id": "les-3", "title": "Moves and copies"}
            ]}
        ]
    }"#;

    fn notes_in(dir: &TempDir) -> LessonNotes<FileStore> {
        let config = ConfigBuilder::new().data_dir(dir.path()).build().unwrap();
        LessonNotes::new(FileStore::open(config.storage.lesson_store_path()).unwrap())
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let notes = notes_in(&dir);
            notes.save_notes("les-1", "rustup default stable").unwrap();
            notes.add_bookmark("les-1", Bookmark::new(61.5, "PATH setup")).unwrap();
            notes.record_position("les-1", 300.0).unwrap();
            notes.mark_completed("les-1", true).unwrap();
        }

        let notes = notes_in(&dir);
        assert_eq!(notes.notes("les-1"), "rustup default stable");
        assert_eq!(notes.bookmarks("les-1"), vec![Bookmark::new(61.5, "PATH setup")]);
        assert_eq!(
            notes.progress("les-1"),
            LessonProgress {
                completed: true,
                position_secs: 300.0
            }
        );
        assert_eq!(
            notes.store().keys(),
            vec![notes_key("les-1"), progress_key("les-1"), bookmarks_key("les-1")]
        );
    }

    #[test]
    fn test_stored_layout_is_a_flat_string_map() {
        let dir = TempDir::new().unwrap();
        let notes = notes_in(&dir);
        notes.add_bookmark("les-2", Bookmark::new(5.0, "intro")).unwrap();

        let raw = fs::read_to_string(dir.path().join("lessons.json")).unwrap();
        let map: std::collections::HashMap<String, String> = serde_json::from_str(&raw).unwrap();
        let stored: serde_json::Value = serde_json::from_str(&map["video-bookmarks-les-2"]).unwrap();
        assert_eq!(stored, serde_json::json!([{ "time_secs": 5.0, "label": "intro" }]));
    }

    #[test]
    fn test_navigation_and_progress_over_a_course() {
        let dir = TempDir::new().unwrap();
        let notes = notes_in(&dir);
        let curriculum = Curriculum::from_json(CURRICULUM).unwrap();

        let adjacent = curriculum.adjacent("les-2").unwrap();
        assert_eq!(adjacent.previous.map(|l| l.title.as_str()), Some("Install the toolchain"));
        assert_eq!(adjacent.next.map(|l| l.id.as_str()), Some("les-3"));
        assert!(curriculum.adjacent("les-3").unwrap().next.is_none());

        for id in ["les-1", "les-3"] {
            notes.mark_completed(id, true).unwrap();
        }
        notes.mark_completed("les-3", false).unwrap();
        let done = notes.completed_lessons(&curriculum);
        assert_eq!(done.len(), 1);
        assert!((curriculum.completion(&done) - 1.0 / 3.0).abs() < 1e-9);
    }
}

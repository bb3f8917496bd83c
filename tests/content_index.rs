//! Content Index Integration Tests
//!
//! Tests for directory scanning, metadata descriptions, and ordering.

use std::path::Path;

use sandbox::library::{build_index, default_description, EntryKind, IndexError, IndexOptions, IndexOrder};
use tempfile::TempDir;

fn make_project(root: &Path, name: &str, readme: Option<&str>) {
    let dir = root.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    if let Some(content) = readme {
        std::fs::write(dir.join("Readme.md"), content).unwrap();
    }
}

#[tokio::test]
async fn test_one_entry_per_item() {
    let temp = TempDir::new().unwrap();
    make_project(temp.path(), "a", None);
    make_project(temp.path(), "b", None);
    make_project(temp.path(), "c", None);

    let entries = build_index(temp.path(), &IndexOptions::default()).await.unwrap();

    assert_eq!(entries.len(), 3);
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert!(entries.iter().all(|e| e.kind == EntryKind::Directory));
    assert_eq!(entries[0].path, temp.path().join("a"));
}

#[tokio::test]
async fn test_empty_directory() {
    let temp = TempDir::new().unwrap();

    let entries = build_index(temp.path(), &IndexOptions::default()).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_missing_directory_is_fatal() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("Practice_Projects");

    let result = build_index(&missing, &IndexOptions::default()).await;
    match result {
        Err(IndexError::DirectoryNotFound { path }) => assert_eq!(path, missing),
        other => panic!("Expected DirectoryNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_description_from_third_line() {
    let temp = TempDir::new().unwrap();
    make_project(
        temp.path(),
        "weather",
        Some("# Weather\n\n   Shows the forecast for your city.   \nMore text\n"),
    );

    let entries = build_index(temp.path(), &IndexOptions::default()).await.unwrap();
    assert_eq!(entries[0].description, "Shows the forecast for your city.");
    assert_eq!(entries[0].title, "Weather");
}

#[tokio::test]
async fn test_default_description_when_metadata_missing_or_short() {
    let temp = TempDir::new().unwrap();
    make_project(temp.path(), "nodocs", None);
    make_project(temp.path(), "short", Some("# Short\nonly two lines\n"));

    let entries = build_index(temp.path(), &IndexOptions::default()).await.unwrap();

    let nodocs = entries.iter().find(|e| e.name == "nodocs").unwrap();
    assert_eq!(nodocs.description, default_description("nodocs"));
    assert!(nodocs.description.contains("nodocs"));

    let short = entries.iter().find(|e| e.name == "short").unwrap();
    assert_eq!(short.description, default_description("short"));
}

#[tokio::test]
async fn test_files_are_listed_with_default_description() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("0_Output.php"), "<?php echo 'hi'; ?>").unwrap();
    std::fs::write(temp.path().join("1_Comments.php"), "<?php // note ?>").unwrap();

    let entries = build_index(temp.path(), &IndexOptions::default()).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.kind == EntryKind::File));
    assert_eq!(entries[0].title, "0_Output.php");
    assert_eq!(entries[0].description, "This is a sample 0_Output.php project.");
}

#[tokio::test]
async fn test_title_capitalizes_first_character_only() {
    let temp = TempDir::new().unwrap();
    make_project(temp.path(), "abc", None);
    make_project(temp.path(), "todoApp", None);

    let entries = build_index(temp.path(), &IndexOptions::default()).await.unwrap();
    let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Abc", "TodoApp"]);
}

#[tokio::test]
async fn test_ignore_patterns_exclude_entries() {
    let temp = TempDir::new().unwrap();
    make_project(temp.path(), ".git", None);
    make_project(temp.path(), "visible", None);
    std::fs::write(temp.path().join(".DS_Store"), "").unwrap();

    let all = build_index(temp.path(), &IndexOptions::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let options = IndexOptions {
        ignore: vec![".*".to_string()],
        ..Default::default()
    };
    let filtered = build_index(temp.path(), &options).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "visible");
}

#[tokio::test]
async fn test_custom_metadata_file_and_line() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("calc");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("ABOUT.txt"), "A calculator\n").unwrap();

    let options = IndexOptions {
        metadata_file: "ABOUT.txt".to_string(),
        description_line: 1,
        ..Default::default()
    };
    let entries = build_index(temp.path(), &options).await.unwrap();
    assert_eq!(entries[0].description, "A calculator");
}

#[tokio::test]
async fn test_filesystem_order_keeps_every_entry() {
    let temp = TempDir::new().unwrap();
    for name in ["zeta", "alpha", "mid"] {
        make_project(temp.path(), name, None);
    }

    let options = IndexOptions {
        order: IndexOrder::Filesystem,
        ..Default::default()
    };
    let entries = build_index(temp.path(), &options).await.unwrap();

    let mut names: Vec<String> = entries.into_iter().map(|e| e.name).collect();
    names.sort();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
}

#[tokio::test]
async fn test_rebuild_is_idempotent() {
    let temp = TempDir::new().unwrap();
    make_project(temp.path(), "one", Some("# One\n\nFirst project\n"));
    make_project(temp.path(), "two", None);

    let options = IndexOptions::default();
    let first = build_index(temp.path(), &options).await.unwrap();
    let second = build_index(temp.path(), &options).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_index_reflects_directory_changes() {
    let temp = TempDir::new().unwrap();
    make_project(temp.path(), "one", None);

    let options = IndexOptions::default();
    assert_eq!(build_index(temp.path(), &options).await.unwrap().len(), 1);

    make_project(temp.path(), "two", None);
    assert_eq!(build_index(temp.path(), &options).await.unwrap().len(), 2);
}

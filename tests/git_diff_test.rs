//! Integration tests for local change sets and tracked-file listing.
//!
//! Exercises `src/git/` against temporary git repositories.

mod common;

use common::TestRepo;
use neo::git::{IndexLister, LocalDiff, changes_between, resolve_range, tracked_files};
use neo::source::{ChangeSetProvider, RepositoryLister};
use neo::{ChangeStatus, ChangedFile};

fn sorted(mut files: Vec<ChangedFile>) -> Vec<ChangedFile> {
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

#[test]
fn test_changes_between_reports_each_status() {
    let repo = TestRepo::new();
    repo.write("database-us/schema.sql", "create table us (id int);\n");
    repo.write("database-fr/schema.sql", "create table fr (id int);\n");
    repo.write("README.md", "hello\n");
    let base = repo.commit("initial");

    repo.write("database-fr/schema.sql", "create table fr (id bigint);\n");
    repo.write("database-de/schema.sql", "create table de (id int);\n");
    repo.remove("README.md");
    let head = repo.commit("change things");

    let files = changes_between(&repo.repo, &base.to_string(), Some(&head.to_string()))
        .expect("Failed to diff");

    assert_eq!(
        sorted(files),
        vec![
            ChangedFile::new("README.md", ChangeStatus::Deleted),
            ChangedFile::new("database-de/schema.sql", ChangeStatus::Added),
            ChangedFile::new("database-fr/schema.sql", ChangeStatus::Modified),
        ]
    );
}

#[test]
fn test_changes_between_detects_renames() {
    let repo = TestRepo::new();
    let content = "line one\nline two\nline three\nline four\nline five\n";
    repo.write("old/module.rs", content);
    let base = repo.commit("initial");

    repo.rename("old/module.rs", "new/module.rs");
    repo.commit("move module");

    let files = changes_between(&repo.repo, &base.to_string(), None).expect("Failed to diff");

    assert_eq!(files, vec![ChangedFile::renamed("old/module.rs", "new/module.rs")]);
}

#[test]
fn test_changes_between_uses_merge_base() {
    let repo = TestRepo::new();
    repo.write("shared.txt", "shared\n");
    let root = repo.commit("initial");
    repo.branch("feature", root);

    // Base moves on after the feature branched off.
    repo.write("main-only.txt", "main\n");
    let base_tip = repo.commit("main work");

    repo.checkout("feature");
    repo.write("feature.txt", "feature\n");
    repo.commit("feature work");

    let files = changes_between(&repo.repo, &base_tip.to_string(), Some("HEAD"))
        .expect("Failed to diff");

    assert_eq!(files, vec![ChangedFile::new("feature.txt", ChangeStatus::Added)]);
}

#[test]
fn test_resolve_range_defaults_head() {
    let repo = TestRepo::new();
    repo.write("a.txt", "a\n");
    let first = repo.commit("first");
    repo.write("a.txt", "b\n");
    let second = repo.commit("second");

    let range = resolve_range(&repo.repo, &first.to_string(), None).expect("Failed to resolve");

    assert_eq!(range.from, first);
    assert_eq!(range.to, second);
    assert_eq!(range.to_ref, "HEAD");
}

#[test]
fn test_unknown_reference_is_an_error() {
    let repo = TestRepo::new();
    repo.write("a.txt", "a\n");
    repo.commit("first");

    let err = changes_between(&repo.repo, "does-not-exist", None).unwrap_err();
    assert!(err.to_string().contains("does-not-exist"));
}

#[tokio::test]
async fn test_local_diff_provider() {
    let repo = TestRepo::new();
    repo.write("services/api/main.go", "package main\n");
    let base = repo.commit("initial");
    repo.write("services/web/main.go", "package main\n");
    repo.commit("add web");

    let provider = LocalDiff::new(repo.path(), base.to_string(), None);
    let files = provider.get_changes().await.expect("Failed to get changes");

    assert_eq!(
        files,
        vec![ChangedFile::new("services/web/main.go", ChangeStatus::Added)]
    );
}

#[test]
fn test_tracked_files_lists_index() {
    let repo = TestRepo::new();
    repo.write("b/file.txt", "b\n");
    repo.write("a/file.txt", "a\n");
    repo.commit("initial");
    std::fs::write(repo.path().join("untracked.txt"), "x\n").unwrap();

    let files = tracked_files(&repo.repo).expect("Failed to read index");
    assert_eq!(files, vec!["a/file.txt", "b/file.txt"]);

    let listed = IndexLister::new(repo.path())
        .list_all_files()
        .expect("Failed to list");
    assert_eq!(listed, files);
}

#[test]
fn test_index_lister_outside_repository_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = IndexLister::new(dir.path()).list_all_files();
    assert!(result.is_err());
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn init_source_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let run = |args: &[&str]| {
        let status = std::process::Command::new("git")
            .args(args)
            .current_dir(dir.path())
            .env_remove("GIT_DIR")
            .env_remove("GIT_WORK_TREE")
            .status()
            .unwrap();
        assert!(status.success(), "git {args:?} failed");
    };
    run(&["init", "--initial-branch=main"]);
    run(&["config", "user.email", "test@example.com"]);
    run(&["config", "user.name", "test"]);
    run(&["commit", "--allow-empty", "-m", "init"]);
    dir
}

#[tokio::test]
async fn resolves_the_head_commit_of_an_existing_branch() {
    let source = init_source_repo();
    let url = source.path().to_str().unwrap();

    let commit = query_head_commit(url, "main").await.unwrap();
    assert_eq!(commit.len(), 40);
    assert!(commit.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn fails_for_a_nonexistent_repository() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("does-not-exist");
    let err = query_head_commit(bogus.to_str().unwrap(), "main").await.unwrap_err();
    assert!(matches!(err, CoreError::WorkspaceFailure { .. }));
}

#[tokio::test]
async fn fails_for_a_branch_that_does_not_exist() {
    let source = init_source_repo();
    let url = source.path().to_str().unwrap();
    let err = query_head_commit(url, "no-such-branch").await.unwrap_err();
    assert!(matches!(err, CoreError::WorkspaceFailure { .. }));
}

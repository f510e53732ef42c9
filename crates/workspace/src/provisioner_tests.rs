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
async fn provision_clones_into_a_fresh_directory() {
    let source = init_source_repo();
    let root = tempfile::tempdir().unwrap();
    let provisioner = WorkspaceProvisioner::new(root.path());

    let source_url = source.path().to_str().unwrap();
    let guard = provisioner.provision(source_url, "main", source_url).await.unwrap();

    assert!(guard.path().join(".git").exists());
    assert!(guard.path().starts_with(root.path()));
}

#[tokio::test]
async fn dropping_the_guard_removes_the_directory() {
    let source = init_source_repo();
    let root = tempfile::tempdir().unwrap();
    let provisioner = WorkspaceProvisioner::new(root.path());
    let source_url = source.path().to_str().unwrap();

    let guard = provisioner.provision(source_url, "main", source_url).await.unwrap();
    let path = guard.path().to_path_buf();
    assert!(path.exists());
    drop(guard);
    assert!(!path.exists());
}

#[tokio::test]
async fn provision_fails_for_a_nonexistent_repository() {
    let root = tempfile::tempdir().unwrap();
    let provisioner = WorkspaceProvisioner::new(root.path());
    let bogus = root.path().join("does-not-exist");
    let bogus_url = bogus.to_str().unwrap();

    let err = provisioner.provision(bogus_url, "main", bogus_url).await.unwrap_err();
    assert!(matches!(err, CoreError::CloneFailed(_)));
}

#[tokio::test]
async fn provision_times_out_cleanly() {
    let source = init_source_repo();
    let root = tempfile::tempdir().unwrap();
    let provisioner =
        WorkspaceProvisioner::new(root.path()).with_clone_timeout(Duration::from_nanos(1));
    let source_url = source.path().to_str().unwrap();

    let err = provisioner.provision(source_url, "main", source_url).await.unwrap_err();
    assert!(matches!(err, CoreError::Timeout(_)));
}

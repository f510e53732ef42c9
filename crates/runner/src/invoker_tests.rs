// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::os::unix::fs::PermissionsExt;

fn fake_runner(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    let script = dir.join("fake-runner.sh");
    std::fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&script).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script, perms).unwrap();
    script
}

fn request(mode: RunMode) -> RunnerRequest {
    RunnerRequest {
        playbook_path: "site.yml".into(),
        inventory_path: "inventory/hosts.ini".into(),
        target_hosts: None,
        private_key_path: None,
        become_password_file: None,
        become_method: None,
        mode,
        environment: Default::default(),
    }
}

#[tokio::test]
async fn run_captures_and_parses_successful_output() {
    let dir = tempfile::tempdir().unwrap();
    let script = fake_runner(
        &dir,
        "echo 'PLAY [site] ***'\n\
         echo 'TASK [t] ***'\n\
         echo 'ok: [h1]'\n\
         echo 'PLAY RECAP ***'\n\
         echo 'h1 : ok=1 changed=0 unreachable=0 failed=0 skipped=0'",
    );

    let invoker = ProcessRunnerInvoker::new(script.to_str().unwrap());
    let result = invoker.run(&request(RunMode::Apply)).await.unwrap();

    assert!(result.exit_ok);
    assert_eq!(result.play_name.as_deref(), Some("site"));
    assert_eq!(result.changed_total, 0);
}

#[tokio::test]
async fn run_reports_nonzero_exit_as_not_ok() {
    let dir = tempfile::tempdir().unwrap();
    let script = fake_runner(&dir, "echo 'boom' 1>&2\nexit 1");

    let invoker = ProcessRunnerInvoker::new(script.to_str().unwrap());
    let result = invoker.run(&request(RunMode::Apply)).await.unwrap();

    assert!(!result.exit_ok);
    assert!(result.raw_stderr.contains("boom"));
}

#[tokio::test]
async fn run_emits_become_method_alongside_become_password_file() {
    let dir = tempfile::tempdir().unwrap();
    let args_path = dir.path().join("args.txt");
    let script = fake_runner(
        &dir,
        &format!("echo \"$@\" > {}\necho 'PLAY RECAP ***'", args_path.display()),
    );
    let become_file = dir.path().join("become-pass");
    std::fs::write(&become_file, "secret\n").unwrap();

    let mut request = request(RunMode::Apply);
    request.become_password_file = Some(become_file);
    request.become_method = Some(BecomeMethod::Runas);

    let invoker = ProcessRunnerInvoker::new(script.to_str().unwrap());
    invoker.run(&request).await.unwrap();

    let args = std::fs::read_to_string(&args_path).unwrap();
    assert!(args.contains("--become-method=runas"));
}

#[tokio::test]
async fn run_times_out_when_the_process_hangs() {
    let dir = tempfile::tempdir().unwrap();
    let script = fake_runner(&dir, "sleep 5");

    let invoker =
        ProcessRunnerInvoker::new(script.to_str().unwrap()).with_timeout(std::time::Duration::from_millis(50));
    let err = invoker.run(&request(RunMode::Apply)).await.unwrap_err();
    assert!(matches!(err, CoreError::Timeout(_)));
}

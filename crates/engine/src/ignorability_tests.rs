// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn timestamp_only_diff_is_ignorable() {
    let diff = "PLAY [site] ***\n+  mtime: 1700000000\n+  ansible_date_time.iso8601: 2026-07-31T00:00:00Z\n";
    assert!(diff_is_ignorable(diff, None));
}

#[test]
fn service_lifecycle_line_is_never_ignorable() {
    let diff = "+  service: nginx started\n";
    assert!(!diff_is_ignorable(diff, None));
}

#[test]
fn mixed_diff_with_one_real_line_is_not_ignorable() {
    let diff = "+  mtime: 1700000000\n+  config_value: 42\n";
    assert!(!diff_is_ignorable(diff, None));
}

#[test]
fn task_name_install_forces_real_drift_even_with_no_diff_lines() {
    assert!(!diff_is_ignorable("", Some("Install nginx package")));
}

#[test]
fn task_name_unrelated_does_not_force_real_drift() {
    assert!(diff_is_ignorable("+  mtime: 1700000000\n", Some("Gather facts")));
}

#[test]
fn headers_and_banners_are_excluded_from_classification() {
    let diff = "--- before\n+++ after\n@@ -1,2 +1,2 @@\nPLAY [site] ***\nTASK [x] ***\nPLAY RECAP ***\n[WARNING]: some warning\n+  mtime: 1700000000\n";
    assert!(diff_is_ignorable(diff, None));
}

#[test]
fn empty_diff_is_ignorable() {
    assert!(diff_is_ignorable("", None));
}

#[test]
fn general_ignorable_keyword_line_is_ignorable() {
    assert!(diff_is_ignorable("+  generated by: tool v1\n", None));
}

#[test]
fn service_keyword_overrides_timestamp_match_on_same_line() {
    let diff = "+  service restarted at 1700000000\n";
    assert!(!diff_is_ignorable(diff, None));
}

#[test]
fn monotonicity_adding_a_matching_keyword_keeps_diff_ignorable() {
    let base = "+  mtime: 1700000000\n";
    let with_extra_keyword = "+  mtime: 1700000000\n+  last_modified: yesterday\n";
    assert!(diff_is_ignorable(base, None));
    assert!(diff_is_ignorable(with_extra_keyword, None));
}

#[test]
fn run_is_ignorable_when_every_task_segment_is_ignorable() {
    let run = "PLAY [site] ***\nTASK [Gather facts] ***\nok: [h1]\nTASK [Check timestamp] ***\n+  mtime: 1700000000\nPLAY RECAP ***\n";
    assert!(run_is_ignorable(run));
}

#[test]
fn run_is_not_ignorable_when_a_task_name_forces_real_drift() {
    let run = "PLAY [site] ***\nTASK [Install nginx package] ***\n+  mtime: 1700000000\nPLAY RECAP ***\n";
    assert!(!run_is_ignorable(run));
}

#[test]
fn run_is_not_ignorable_when_an_unrelated_task_has_a_real_diff_line() {
    let run = "PLAY [site] ***\nTASK [Gather facts] ***\n+  mtime: 1700000000\nTASK [Write config] ***\n+  config_value: 42\nPLAY RECAP ***\n";
    assert!(!run_is_ignorable(run));
}

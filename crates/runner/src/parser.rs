// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single pure parser for runner stdout, used by both the Job Orchestrator
//! (apply mode) and the Drift Detector (check mode) — spec.md §9: "Define a
//! single `RunnerResult` type produced by one parser; consumers read fields."

use crate::types::{HostRecap, RunnerResult, TaskOutcome, TaskStatus};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static PLAY_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^PLAY \[(?P<name>.*)\]").expect("constant regex pattern is valid"));
static TASK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^TASK \[(?P<name>.*)\]").expect("constant regex pattern is valid"));
static RESULT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<status>ok|changed|failed|skipping): \[(?P<host>[^\]]+)\](?:\s*=>\s*(?P<detail>.*))?$")
        .expect("constant regex pattern is valid")
});
static RECAP_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<host>\S+)\s*:\s*ok=(?P<ok>\d+)\s+changed=(?P<changed>\d+)\s+unreachable=(?P<unreachable>\d+)\s+failed=(?P<failed>\d+)\s+skipped=(?P<skipped>\d+)",
    )
    .expect("constant regex pattern is valid")
});

/// Parse runner stdout into a `RunnerResult`. Never fails: malformed or
/// truncated output simply yields fewer tasks/recap entries, since the
/// orchestrator always has the exit status as the authoritative signal.
pub fn parse_runner_output(stdout: &str, stderr: &str, exit_ok: bool) -> RunnerResult {
    let mut play_name = None;
    let mut current_task = String::new();
    let mut tasks = Vec::new();
    let mut recap = HashMap::new();

    for line in stdout.lines() {
        let line = line.trim_end();

        if let Some(caps) = PLAY_LINE.captures(line) {
            play_name = Some(caps["name"].to_string());
            continue;
        }
        if let Some(caps) = TASK_LINE.captures(line) {
            current_task = caps["name"].to_string();
            continue;
        }
        if let Some(caps) = RESULT_LINE.captures(line) {
            let status = match &caps["status"] {
                "ok" => TaskStatus::Ok,
                "changed" => TaskStatus::Changed,
                "failed" => TaskStatus::Failed,
                _ => TaskStatus::Skipped,
            };
            tasks.push(TaskOutcome {
                task_name: current_task.clone(),
                host: caps["host"].to_string(),
                status,
                detail: caps.name("detail").map(|m| m.as_str().to_string()),
            });
            continue;
        }
        if let Some(caps) = RECAP_LINE.captures(line) {
            let host = caps["host"].to_string();
            let parse_u32 = |name: &str| caps[name].parse::<u32>().unwrap_or(0);
            recap.insert(
                host,
                HostRecap {
                    ok: parse_u32("ok"),
                    changed: parse_u32("changed"),
                    unreachable: parse_u32("unreachable"),
                    failed: parse_u32("failed"),
                    skipped: parse_u32("skipped"),
                },
            );
        }
    }

    let changed_total: u32 = recap.values().map(|r| r.changed).sum();

    RunnerResult {
        exit_ok,
        raw_stdout: stdout.to_string(),
        raw_stderr: stderr.to_string(),
        play_name,
        tasks,
        recap,
        changed_total,
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds `Job::output`: a stable layout a UI can parse (spec.md §4.8).

use chrono::{TimeZone, Utc};
use driftctl_runner::{RunnerResult, TaskStatus};

/// Renders an epoch-millisecond timestamp as the RFC 3339 string used in
/// report headers.
pub fn format_finished_at(epoch_ms: u64) -> String {
    Utc.timestamp_millis_opt(epoch_ms as i64)
        .single()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| epoch_ms.to_string())
}

pub fn structured_report(result: &RunnerResult, finished_at: &str, error: Option<&str>) -> String {
    let mut out = String::new();

    let header = if error.is_some() { "FAILED" } else { "SUCCESS" };
    let play = result.play_name.as_deref().unwrap_or("unknown play");
    out.push_str(&format!("{header}: {play} at {finished_at}\n\n"));

    for task in &result.tasks {
        let glyph = match task.status {
            TaskStatus::Ok => "ok",
            TaskStatus::Changed => "changed",
            TaskStatus::Failed => "failed",
            TaskStatus::Skipped => "skipped",
        };
        match &task.detail {
            Some(detail) => out.push_str(&format!(
                "[{glyph}] {} ({}) - {detail}\n",
                task.task_name, task.host
            )),
            None => out.push_str(&format!("[{glyph}] {} ({})\n", task.task_name, task.host)),
        }
    }
    out.push('\n');

    out.push_str("RECAP\n");
    let mut hosts: Vec<&String> = result.recap.keys().collect();
    hosts.sort();
    for host in hosts {
        let recap = &result.recap[host];
        out.push_str(&format!(
            "{host}: ok={} changed={} failed={} skipped={} unreachable={}\n",
            recap.ok, recap.changed, recap.failed, recap.skipped, recap.unreachable
        ));
    }

    if let Some(error) = error {
        out.push_str("\nERROR\n");
        out.push_str(error);
        out.push('\n');
        if !result.raw_stderr.trim().is_empty() {
            out.push_str("\nstderr excerpt:\n");
            out.push_str(result.raw_stderr.trim());
            out.push('\n');
        }
        if error.to_lowercase().contains("connection refused") {
            out.push_str("\nhint: check SSH reachability to the target host.\n");
        }
    }

    out
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;

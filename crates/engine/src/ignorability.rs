// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diff-line ignorability classifier for the Drift Detector (C10).
//!
//! A diff line is ignorable when it matches only dynamic, non-semantic
//! content (timestamps, workspace temp paths, hash-like noise); a diff set
//! is ignorable iff every line in it is ignorable. Service-lifecycle
//! keywords always win: a line mentioning them is never ignorable,
//! regardless of what else it matches.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

const SERVICE_LIFECYCLE_KEYWORDS: &[&str] = &[
    "service",
    "systemctl",
    "start",
    "stop",
    "restart",
    "enable",
    "disable",
];

const GENERAL_IGNORABLE_KEYWORDS: &[&str] = &[
    "timestamp",
    "last_modified",
    "generated by",
    "iso8601",
    "utc",
    "gmt",
];

static DYNAMIC_CONTENT_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        // ISO-8601 / RFC-3339 timestamps, with or without a UTC offset.
        r"\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:?\d{2})?",
        // Epoch seconds/milliseconds: a bare 10-13 digit run.
        r"\b\d{10,13}\b",
        // Human-readable dates, e.g. "31 Jul 2026" or "Jul 31, 2026".
        r"\b\d{1,2}\s+[A-Za-z]{3,9}\s+\d{4}\b",
        r"\b[A-Za-z]{3,9}\s+\d{1,2},?\s+\d{4}\b",
        // Time-of-day, e.g. "14:32:07".
        r"\b\d{2}:\d{2}:\d{2}\b",
        // Template expressions referencing date/time/timestamp.
        r"\{\{[^}]*\b(date|time|timestamp)\b[^}]*\}\}",
        // Long hex runs plausibly representing hashes or ids.
        r"\b[0-9a-fA-F]{16,}\b",
        // PID-like bare decimals in a pid= style attribute.
        r"\bpid[=:]\s*\d+\b",
        // Workspace temp paths.
        r"/tmp/repo-drift-[^\s]*",
        r"ansible-local-[^\s]*",
        // Timestamp-bearing attribute names.
        r"\b(atime|mtime|ctime|access_time|modification_time|creation_time)\b",
        r"\bansible_date_time\.\w+\b",
    ])
    .expect("static regex set is valid")
});

static WORD_BOUNDARY_CACHE: Lazy<Vec<Regex>> = Lazy::new(|| {
    SERVICE_LIFECYCLE_KEYWORDS
        .iter()
        .map(|kw| Regex::new(&format!(r"(?i)\b{kw}\b")).expect("static regex is valid"))
        .collect()
});

fn is_diff_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    if !(trimmed.starts_with('+') || trimmed.starts_with('-')) {
        return false;
    }
    if trimmed.starts_with("+++") || trimmed.starts_with("---") || trimmed.starts_with("@@") {
        return false;
    }
    true
}

fn is_banner_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("PLAY")
        || trimmed.starts_with("TASK")
        || trimmed.starts_with("PLAY RECAP")
        || trimmed.starts_with("[WARNING]:")
}

fn mentions_service_lifecycle(line: &str) -> bool {
    WORD_BOUNDARY_CACHE.iter().any(|re| re.is_match(line))
}

fn mentions_general_ignorable_keyword(line: &str) -> bool {
    let lower = line.to_lowercase();
    GENERAL_IGNORABLE_KEYWORDS
        .iter()
        .any(|kw| lower.contains(kw))
}

/// True when `task_name` itself indicates the kind of change that always
/// counts as real drift: package install/remove or service lifecycle.
pub fn task_name_forces_real_drift(task_name: &str) -> bool {
    let lower = task_name.to_lowercase();
    let package_action = ["install", "remove", "uninstall"]
        .iter()
        .any(|kw| lower.contains(kw));
    let service_action = ["start", "stop", "enable", "disable"]
        .iter()
        .any(|kw| lower.contains(kw));
    package_action || service_action
}

fn line_is_ignorable(line: &str) -> bool {
    if mentions_service_lifecycle(line) {
        return false;
    }
    DYNAMIC_CONTENT_PATTERNS.is_match(line) || mentions_general_ignorable_keyword(line)
}

/// Classifies a raw diff blob (as emitted by the runner's `--diff` output)
/// as ignorable iff every `+`/`-` content line within it is ignorable.
/// A diff with no content lines at all is considered ignorable.
pub fn diff_is_ignorable(diff: &str, task_name: Option<&str>) -> bool {
    if let Some(task_name) = task_name {
        if task_name_forces_real_drift(task_name) {
            return false;
        }
    }

    diff.lines()
        .filter(|line| !is_banner_line(line))
        .filter(|line| is_diff_line(line))
        .all(line_is_ignorable)
}

static TASK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^TASK \[(?P<name>.*)\]").expect("static regex is valid"));

/// Splits a runner's raw stdout into the diff lines that follow each `TASK`
/// banner, so ignorability can be judged per task instead of over the whole
/// blob — a line belonging to an install/remove/service-lifecycle task must
/// not be masked just because other tasks in the same run only touched
/// timestamps.
fn task_diff_segments(raw_stdout: &str) -> Vec<(String, String)> {
    let mut segments = Vec::new();
    let mut current_task: Option<String> = None;
    let mut current_lines: Vec<&str> = Vec::new();

    for line in raw_stdout.lines() {
        if let Some(caps) = TASK_LINE.captures(line) {
            if let Some(name) = current_task.take() {
                segments.push((name, current_lines.join("\n")));
            }
            current_task = Some(caps["name"].to_string());
            current_lines = Vec::new();
            continue;
        }
        if current_task.is_some() {
            current_lines.push(line);
        }
    }
    if let Some(name) = current_task.take() {
        segments.push((name, current_lines.join("\n")));
    }
    segments
}

/// Classifies an entire runner run as ignorable iff every task's diff
/// segment is ignorable, judged against that task's own name rather than a
/// single name applied to the whole run (spec.md §4.10 / §9 Open Question).
pub fn run_is_ignorable(raw_stdout: &str) -> bool {
    task_diff_segments(raw_stdout)
        .iter()
        .all(|(task_name, diff)| diff_is_ignorable(diff, Some(task_name)))
}

#[cfg(test)]
#[path = "ignorability_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inventory Materializer (C4).

use driftctl_core::error::CoreError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Materialize the host list the runner consumes, per spec.md §4.4:
/// write the request's inventory mapping if non-empty, otherwise require
/// `<workspace>/inventory/hosts.ini` to already exist.
pub fn materialize_inventory(
    workspace: &Path,
    inventory: Option<&HashMap<String, HashMap<String, String>>>,
) -> Result<PathBuf, CoreError> {
    let inventory_dir = workspace.join("inventory");
    let hosts_path = inventory_dir.join("hosts.ini");

    match inventory {
        Some(map) if !map.is_empty() => {
            std::fs::create_dir_all(&inventory_dir).map_err(|e| {
                let message = format!("creating {}: {e}", inventory_dir.display());
                CoreError::inventory_missing_with(message, e)
            })?;
            std::fs::write(&hosts_path, render_ini(map)).map_err(|e| {
                let message = format!("writing {}: {e}", hosts_path.display());
                CoreError::inventory_missing_with(message, e)
            })?;
            Ok(hosts_path)
        }
        _ if hosts_path.exists() => Ok(hosts_path),
        _ => Err(CoreError::inventory_missing(format!("{} not found", hosts_path.display()))),
    }
}

/// Locate an existing inventory for a drift re-check (spec.md §4.10 step 3):
/// `inventory/hosts.ini`, else `inventory.ini` at the repo root.
pub fn locate_inventory(workspace: &Path) -> Result<PathBuf, CoreError> {
    let nested = workspace.join("inventory").join("hosts.ini");
    if nested.exists() {
        return Ok(nested);
    }
    let at_root = workspace.join("inventory.ini");
    if at_root.exists() {
        return Ok(at_root);
    }
    Err(CoreError::inventory_missing(format!(
        "neither {} nor {} exists",
        nested.display(),
        at_root.display()
    )))
}

fn render_ini(map: &HashMap<String, HashMap<String, String>>) -> String {
    let mut groups: Vec<&String> = map.keys().collect();
    groups.sort();

    let mut out = String::new();
    for group in groups {
        out.push('[');
        out.push_str(group);
        out.push_str("]\n");

        let hosts = &map[group];
        let mut names: Vec<&String> = hosts.keys().collect();
        names.sort();
        for name in names {
            out.push_str(name);
            out.push(' ');
            out.push_str(&hosts[name]);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod tests;

//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use bytesize::ByteSize;
use chrono::{DateTime, Utc};
use serde_json::Value;

use fwctl_api::{Page, TimeRange};

use crate::cli::{PageArgs, TimeRangeArgs};
use crate::error::CliError;
use crate::output;

/// Keys under which paged backend responses carry their rows.
const RECORD_KEYS: &[&str] = &["records", "items", "list", "users", "logs", "rules", "data"];

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON in {}: {e}", path.display()),
    })
}

/// Write a downloaded body to `path` and report its size.
pub fn write_download(path: &Path, body: &[u8], quiet: bool) -> Result<(), CliError> {
    std::fs::write(path, body)?;
    if !quiet {
        eprintln!(
            "Saved {} to {}",
            ByteSize::b(u64::try_from(body.len()).unwrap_or(u64::MAX)),
            path.display()
        );
    }
    Ok(())
}

// ── Argument conversion ─────────────────────────────────────────────

impl From<PageArgs> for Page {
    fn from(args: PageArgs) -> Self {
        Page {
            page: args.page.max(1),
            size: args.size.max(1),
        }
    }
}

fn parse_time(field: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, CliError> {
    raw.map(|raw| {
        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| CliError::Validation {
                field: field.into(),
                reason: format!("expected RFC 3339 timestamp, got '{raw}': {e}"),
            })
    })
    .transpose()
}

pub fn time_range(args: &TimeRangeArgs) -> Result<TimeRange, CliError> {
    let range = TimeRange {
        start_time: parse_time("since", args.since.as_deref())?,
        end_time: parse_time("until", args.until.as_deref())?,
    };
    if let (Some(start), Some(end)) = (range.start_time, range.end_time) {
        if start > end {
            return Err(CliError::Validation {
                field: "since".into(),
                reason: "window start is after its end".into(),
            });
        }
    }
    Ok(range)
}

// ── Loose JSON access ───────────────────────────────────────────────

/// Rows of a listing: the payload itself when it is an array, otherwise
/// the first array found under a well-known key.
pub fn records(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Object(map) => RECORD_KEYS
            .iter()
            .find_map(|key| map.get(*key))
            .map(records)
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// A field of a JSON object as display text (empty when absent).
pub fn field(value: &Value, key: &str) -> String {
    value.get(key).map(output::scalar).unwrap_or_default()
}

/// Total count reported by a paged response, when present.
pub fn total(value: &Value) -> Option<u64> {
    value.get("total").and_then(Value::as_u64)
}

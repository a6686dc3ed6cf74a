//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Colorize a health / status word.
pub fn status_label(status: &str, color: bool) -> String {
    if !color {
        return status.to_owned();
    }
    match status {
        "healthy" | "running" | "connected" | "ok" => status.green().to_string(),
        "unhealthy" | "disconnected" | "error" | "down" => status.red().to_string(),
        _ => status.yellow().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Render an untyped backend payload (stats, detail views).
///
/// Tables show one row per top-level field; nested values are inlined as
/// compact JSON.
pub fn render_value(format: OutputFormat, value: &Value) -> String {
    render_single(format, value, render_kv_table, |v| match v {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{k}={}", scalar(v)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => scalar(other),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn render_kv_table(value: &Value) -> String {
    let rows: Vec<FieldRow> = match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| FieldRow {
                field: k.clone(),
                value: scalar(v),
            })
            .collect(),
        Value::Null => return String::new(),
        other => return scalar(other),
    };
    render_table(&rows)
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// A JSON value as a single display cell.
pub fn scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => render_json(value, true),
    }
}

fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

fn render_yaml<T: Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn plain_value_emits_key_value_lines() {
        let out = render_value(
            OutputFormat::Plain,
            &json!({"total_requests": 42, "unique_ips": 7}),
        );
        assert_eq!(out, "total_requests=42\nunique_ips=7");
    }

    #[test]
    fn table_value_lists_fields() {
        let out = render_value(OutputFormat::Table, &json!({"banned": 3}));
        assert!(out.contains("banned"));
        assert!(out.contains('3'));
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_value(OutputFormat::JsonCompact, &json!({"a": [1, 2]}));
        assert_eq!(out, r#"{"a":[1,2]}"#);
    }

    #[test]
    fn yaml_value_snapshot() {
        let out = render_value(
            OutputFormat::Yaml,
            &json!({"banned": 3, "reason": "credential stuffing"}),
        );
        insta::assert_snapshot!(out, @r"
        banned: 3
        reason: credential stuffing
        ");
    }

    #[test]
    fn scalars_render_without_quotes() {
        assert_eq!(scalar(&json!("abc")), "abc");
        assert_eq!(scalar(&Value::Null), "");
        assert_eq!(scalar(&json!(true)), "true");
    }
}

//! Access log command handlers.

use serde_json::Value;
use tabled::Tabled;

use fwctl_api::{LogExportQuery, LogQuery, Page};
use fwctl_core::Console;

use crate::cli::{ExportFormat, GlobalOpts, LogListArgs, LogsArgs, LogsCommand, SortDir};
use crate::error::CliError;
use crate::output;

use super::util;

const READ: &str = "logs:read";
const WRITE: &str = "logs:write";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Fingerprint")]
    fingerprint: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Score")]
    score: String,
}

impl From<&Value> for LogRow {
    fn from(v: &Value) -> Self {
        let time = match util::field(v, "timestamp") {
            t if t.is_empty() => util::field(v, "created_at"),
            t => t,
        };
        Self {
            time,
            fingerprint: util::field(v, "fingerprint"),
            ip: util::field(v, "ip"),
            method: util::field(v, "method"),
            path: util::field(v, "path"),
            action: util::field(v, "action"),
            score: util::field(v, "score"),
        }
    }
}

fn render_logs(global: &GlobalOpts, payload: &Value) {
    let rows = util::records(payload);
    let out = output::render_list(global.output, &rows, |v| LogRow::from(v), |v| {
        util::field(v, "fingerprint")
    });
    output::print_output(&out, global.quiet);
    if let (Some(total), false) = (util::total(payload), global.quiet) {
        eprintln!("{} of {total} entries", rows.len());
    }
}

fn log_query(args: LogListArgs) -> Result<LogQuery, CliError> {
    let range = util::time_range(&args.range)?;
    Ok(LogQuery {
        page: Page::from(args.page),
        fingerprint: args.fingerprint,
        ip: args.ip,
        user_agent: args.user_agent,
        path: args.path,
        method: args.method.map(|m| m.to_uppercase()),
        action: args.action,
        min_score: args.min_score,
        max_score: args.max_score,
        start_time: range.start_time,
        end_time: range.end_time,
        order_by: args.order_by,
        order_dir: args.order_dir.map(|d| {
            match d {
                SortDir::Asc => "asc",
                SortDir::Desc => "desc",
            }
            .to_owned()
        }),
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: LogsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let api = console.api();
    match args.command {
        LogsCommand::List(list) => {
            console.require_permission(READ)?;
            let query = log_query(list)?;
            let payload = api.get_access_logs(&query).await?;
            render_logs(global, &payload);
            Ok(())
        }

        LogsCommand::Recent { minutes, limit } => {
            console.require_permission(READ)?;
            let payload = api.get_recent_access_logs(minutes, limit).await?;
            render_logs(global, &payload);
            Ok(())
        }

        LogsCommand::Stats(range) => {
            console.require_permission(READ)?;
            let range = util::time_range(&range)?;
            let stats = api.get_log_stats(&range).await?;
            output::print_output(&output::render_value(global.output, &stats), global.quiet);
            Ok(())
        }

        LogsCommand::User { fingerprint, page } => {
            console.require_permission(READ)?;
            let payload = api
                .get_user_access_logs(&fingerprint, Page::from(page))
                .await?;
            render_logs(global, &payload);
            Ok(())
        }

        LogsCommand::Search { keyword, page } => {
            console.require_permission(READ)?;
            let payload = api.search_logs(&keyword, Page::from(page)).await?;
            render_logs(global, &payload);
            Ok(())
        }

        LogsCommand::Export {
            file,
            format,
            fingerprint,
            range,
        } => {
            console.require_permission(READ)?;
            let query = LogExportQuery {
                format: Some(
                    match format {
                        ExportFormat::Csv => "csv",
                        ExportFormat::Json => "json",
                    }
                    .to_owned(),
                ),
                fingerprint,
                range: util::time_range(&range)?,
            };
            let body = api.export_logs(&query).await?;
            util::write_download(&file, &body, global.quiet)
        }

        LogsCommand::Cleanup { days } => {
            console.require_permission(WRITE)?;
            if !util::confirm(
                &format!("Delete all access logs older than {days} days?"),
                global.yes,
            )? {
                return Ok(());
            }
            let result = api.cleanup_logs(days).await?;
            output::print_output(&output::render_value(global.output, &result), global.quiet);
            Ok(())
        }
    }
}

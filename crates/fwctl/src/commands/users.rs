//! User and score handlers.

use serde_json::Value;
use tabled::Tabled;

use fwctl_api::{BatchScoreOperation, BatchScoreRequest, Page, ScoreAdjustment};
use fwctl_core::Console;

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const READ: &str = "users:read";
const WRITE: &str = "scores:write";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "Fingerprint")]
    fingerprint: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Requests")]
    requests: String,
    #[tabled(rename = "Last IP")]
    ip: String,
    #[tabled(rename = "Last Seen")]
    last_seen: String,
}

impl From<&Value> for UserRow {
    fn from(v: &Value) -> Self {
        Self {
            fingerprint: util::field(v, "fingerprint"),
            score: util::field(v, "score"),
            requests: util::field(v, "request_count"),
            ip: util::field(v, "ip"),
            last_seen: util::field(v, "last_seen"),
        }
    }
}

fn render_users(global: &GlobalOpts, payload: &Value) {
    let rows = util::records(payload);
    let out = output::render_list(global.output, &rows, |v| UserRow::from(v), |v| {
        util::field(v, "fingerprint")
    });
    output::print_output(&out, global.quiet);
}

fn render_detail(global: &GlobalOpts, payload: &Value) {
    output::print_output(&output::render_value(global.output, payload), global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    console: &Console,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let api = console.api();
    match args.command {
        UsersCommand::List(page) => {
            console.require_permission(READ)?;
            let payload = api.get_user_list(Page::from(page)).await?;
            render_users(global, &payload);
            Ok(())
        }

        UsersCommand::Show { fingerprint } => {
            console.require_permission(READ)?;
            let detail = api.get_user_detail(&fingerprint).await?;
            render_detail(global, &detail);
            Ok(())
        }

        UsersCommand::Score {
            fingerprint,
            history,
        } => {
            console.require_permission(READ)?;
            let score = api.get_user_score(&fingerprint).await?;
            render_detail(global, &score);
            if let Some(hours) = history {
                let trend = api.get_user_score_history(&fingerprint, hours).await?;
                let points = util::records(&trend);
                if points.is_empty() {
                    render_detail(global, &trend);
                } else {
                    let out = output::render_list(
                        global.output,
                        &points,
                        |v| HistoryRow::from(v),
                        |v| util::field(v, "score"),
                    );
                    output::print_output(&out, global.quiet);
                }
            }
            Ok(())
        }

        UsersCommand::ResetScore {
            mut fingerprints,
            reason,
        } => {
            console.require_permission(WRITE)?;
            if fingerprints.len() == 1 {
                let fingerprint = fingerprints.remove(0);
                api.reset_user_score(&fingerprint).await?;
                if !global.quiet {
                    eprintln!("Score reset for {fingerprint}");
                }
                return Ok(());
            }
            let count = fingerprints.len();
            if !util::confirm(&format!("Reset scores for {count} users?"), global.yes)? {
                return Ok(());
            }
            let result = api
                .batch_score_operation(&BatchScoreRequest {
                    operation: BatchScoreOperation::Reset,
                    fingerprints,
                    adjustment: None,
                    reason,
                })
                .await?;
            render_detail(global, &result);
            Ok(())
        }

        UsersCommand::AdjustScore {
            mut fingerprints,
            by,
            reason,
        } => {
            console.require_permission(WRITE)?;
            if by == 0 {
                return Err(CliError::Validation {
                    field: "by".into(),
                    reason: "adjustment must be non-zero".into(),
                });
            }
            if fingerprints.len() == 1 {
                let fingerprint = fingerprints.remove(0);
                let result = api
                    .adjust_user_score(
                        &fingerprint,
                        &ScoreAdjustment {
                            adjustment: by,
                            reason,
                        },
                    )
                    .await?;
                render_detail(global, &result);
                return Ok(());
            }
            let result = api
                .batch_score_operation(&BatchScoreRequest {
                    operation: BatchScoreOperation::Adjust,
                    fingerprints,
                    adjustment: Some(by),
                    reason,
                })
                .await?;
            render_detail(global, &result);
            Ok(())
        }

        UsersCommand::Low { threshold, page } => {
            console.require_permission(READ)?;
            let payload = api
                .get_low_score_users(threshold, Page::from(page))
                .await?;
            render_users(global, &payload);
            Ok(())
        }

        UsersCommand::Stats => {
            console.require_permission(READ)?;
            let stats = api.get_score_stats().await?;
            render_detail(global, &stats);
            Ok(())
        }
    }
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl From<&Value> for HistoryRow {
    fn from(v: &Value) -> Self {
        Self {
            time: util::field(v, "timestamp"),
            score: util::field(v, "score"),
            reason: util::field(v, "reason"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn user_row_reads_score_record_fields() {
        let row = UserRow::from(&json!({
            "fingerprint": "fp-9",
            "score": 12,
            "request_count": 340,
            "last_seen": "2026-10-18T23:59:00Z"
        }));
        assert_eq!(row.fingerprint, "fp-9");
        assert_eq!(row.score, "12");
        assert_eq!(row.requests, "340");
        assert_eq!(row.ip, "");
    }
}

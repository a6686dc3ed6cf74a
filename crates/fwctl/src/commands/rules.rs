//! Ban and whitelist rule handlers.

use serde_json::Value;
use tabled::Tabled;

use fwctl_api::{BanRequest, BatchBanRequest, Page, WhitelistRequest};
use fwctl_core::Console;

use crate::cli::{GlobalOpts, RulesArgs, RulesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const READ: &str = "rules:read";
const WRITE: &str = "rules:write";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "Fingerprint")]
    fingerprint: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Expires")]
    expires: String,
}

impl From<&Value> for RuleRow {
    fn from(v: &Value) -> Self {
        Self {
            fingerprint: util::field(v, "fingerprint"),
            reason: util::field(v, "reason"),
            created: util::field(v, "created_at"),
            expires: util::field(v, "expires_at"),
        }
    }
}

fn render_rules(global: &GlobalOpts, payload: &Value) {
    let rows = util::records(payload);
    let out = output::render_list(global.output, &rows, |v| RuleRow::from(v), |v| {
        util::field(v, "fingerprint")
    });
    output::print_output(&out, global.quiet);
}

fn done(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{message}");
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    console: &Console,
    args: RulesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let api = console.api();
    match args.command {
        RulesCommand::Bans(page) => {
            console.require_permission(READ)?;
            let payload = api.get_banned_users(Page::from(page)).await?;
            render_rules(global, &payload);
            Ok(())
        }

        RulesCommand::Ban {
            mut fingerprints,
            reason,
            duration,
        } => {
            console.require_permission(WRITE)?;
            if fingerprints.len() == 1 {
                let fingerprint = fingerprints.remove(0);
                api.ban_user(&BanRequest {
                    fingerprint: fingerprint.clone(),
                    reason,
                    duration: duration.clone(),
                })
                .await?;
                done(global, &format!("Banned {fingerprint} for {duration}"));
            } else {
                let count = fingerprints.len();
                if !util::confirm(&format!("Ban {count} fingerprints for {duration}?"), global.yes)? {
                    return Ok(());
                }
                api.batch_ban_users(&BatchBanRequest {
                    fingerprints,
                    reason,
                    duration: duration.clone(),
                })
                .await?;
                done(global, &format!("Banned {count} fingerprints for {duration}"));
            }
            Ok(())
        }

        RulesCommand::Unban { fingerprint } => {
            console.require_permission(WRITE)?;
            api.unban_user(&fingerprint).await?;
            done(global, &format!("Unbanned {fingerprint}"));
            Ok(())
        }

        RulesCommand::Whitelist(page) => {
            console.require_permission(READ)?;
            let payload = api.get_whitelist_users(Page::from(page)).await?;
            render_rules(global, &payload);
            Ok(())
        }

        RulesCommand::Allow {
            fingerprint,
            reason,
        } => {
            console.require_permission(WRITE)?;
            api.add_to_whitelist(&WhitelistRequest {
                fingerprint: fingerprint.clone(),
                reason,
            })
            .await?;
            done(global, &format!("Whitelisted {fingerprint}"));
            Ok(())
        }

        RulesCommand::Disallow { fingerprint } => {
            console.require_permission(WRITE)?;
            api.remove_from_whitelist(&fingerprint).await?;
            done(global, &format!("Removed {fingerprint} from the whitelist"));
            Ok(())
        }

        RulesCommand::Analysis { fingerprint } => {
            console.require_permission(READ)?;
            let analysis = api.get_user_analysis(&fingerprint).await?;
            output::print_output(
                &output::render_value(global.output, &analysis),
                global.quiet,
            );
            Ok(())
        }

        RulesCommand::Stats => {
            console.require_permission(READ)?;
            let stats = api.get_rule_stats().await?;
            output::print_output(&output::render_value(global.output, &stats), global.quiet);
            Ok(())
        }

        RulesCommand::Cleanup => {
            console.require_permission(WRITE)?;
            let result = api.cleanup_expired_rules().await?;
            output::print_output(&output::render_value(global.output, &result), global.quiet);
            Ok(())
        }
    }
}

//! Backend configuration handlers (`/config` resource).

use tabled::Tabled;

use fwctl_api::Page;
use fwctl_core::Console;

use crate::cli::{GlobalOpts, SettingsArgs, SettingsCommand, SettingsSection};
use crate::error::CliError;
use crate::output;

use super::util;

const READ: &str = "settings:read";
const WRITE: &str = "settings:write";

/// Path segment used by `POST /config/reset/{kind}`.
fn reset_kind(section: SettingsSection) -> &'static str {
    match section {
        SettingsSection::System => "system",
        SettingsSection::Scoring => "scoring",
        SettingsSection::Limiter => "limiter",
    }
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Section")]
    section: String,
    #[tabled(rename = "Operator")]
    operator: String,
    #[tabled(rename = "Change")]
    change: String,
}

impl From<&serde_json::Value> for HistoryRow {
    fn from(v: &serde_json::Value) -> Self {
        Self {
            time: util::field(v, "created_at"),
            section: util::field(v, "type"),
            operator: util::field(v, "operator"),
            change: util::field(v, "description"),
        }
    }
}

pub async fn handle(
    console: &Console,
    args: SettingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let api = console.api();
    match args.command {
        SettingsCommand::Show { section } => {
            console.require_permission(READ)?;
            let config = match section {
                SettingsSection::System => api.get_system_config().await?,
                SettingsSection::Scoring => api.get_scoring_config().await?,
                SettingsSection::Limiter => api.get_limiter_config().await?,
            };
            output::print_output(&output::render_value(global.output, &config), global.quiet);
            Ok(())
        }

        SettingsCommand::Update { section, from_file } => {
            console.require_permission(WRITE)?;
            let body = util::read_json_file(&from_file)?;
            let updated = match section {
                SettingsSection::System => api.update_system_config(&body).await?,
                SettingsSection::Scoring => api.update_scoring_config(&body).await?,
                SettingsSection::Limiter => api.update_limiter_config(&body).await?,
            };
            output::print_output(&output::render_value(global.output, &updated), global.quiet);
            Ok(())
        }

        SettingsCommand::Reset { section } => {
            console.require_permission(WRITE)?;
            let kind = reset_kind(section);
            if !util::confirm(
                &format!("Reset the {kind} configuration to defaults?"),
                global.yes,
            )? {
                return Ok(());
            }
            api.reset_config(kind).await?;
            if !global.quiet {
                eprintln!("{kind} configuration reset");
            }
            Ok(())
        }

        SettingsCommand::Export { file } => {
            console.require_permission(READ)?;
            let body = api.export_config().await?;
            util::write_download(&file, &body, global.quiet)
        }

        SettingsCommand::Import { from_file } => {
            console.require_permission(WRITE)?;
            let body = util::read_json_file(&from_file)?;
            if !util::confirm("Replace the backend configuration?", global.yes)? {
                return Ok(());
            }
            let result = api.import_config(&body).await?;
            output::print_output(&output::render_value(global.output, &result), global.quiet);
            Ok(())
        }

        SettingsCommand::History(page) => {
            console.require_permission(READ)?;
            let payload = api.get_config_history(Page::from(page)).await?;
            let rows = util::records(&payload);
            let out = output::render_list(
                global.output,
                &rows,
                |v| HistoryRow::from(v),
                |v| util::field(v, "created_at"),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

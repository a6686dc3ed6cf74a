//! Backend status: system info and health in one view.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::Tabled;

use fwctl_core::{Console, HealthSnapshot, SystemInfo};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct StatusView {
    server: String,
    system: SystemInfo,
    health: HealthSnapshot,
    session: Option<String>,
}

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Service")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
}

fn detail(view: &StatusView, color: bool) -> String {
    let info = &view.system;
    let mut lines = vec![
        format!("Server:        {}", view.server),
        format!("System:        {} {}", info.name, info.version),
        format!(
            "Status:        {}",
            output::status_label(&info.status, color)
        ),
        format!(
            "Health:        {}",
            output::status_label(&view.health.status.to_string(), color)
        ),
    ];
    if !info.uptime.is_empty() {
        lines.push(format!("Uptime:        {}", info.uptime));
    }
    lines.push(format!(
        "Registration:  {}",
        if info.user_registration_allowed {
            "open"
        } else {
            "closed"
        }
    ));
    lines.push(format!(
        "Session:       {}",
        view.session.as_deref().unwrap_or("not logged in")
    ));

    if !view.health.services.is_empty() {
        let rows: Vec<ServiceRow> = view
            .health
            .services
            .iter()
            .map(|(name, state)| ServiceRow {
                name: name.clone(),
                state: output::status_label(state, color),
            })
            .collect();
        lines.push(String::new());
        lines.push(
            tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string(),
        );
    }
    lines.join("\n")
}

fn spinner(global: &GlobalOpts) -> Option<ProgressBar> {
    if global.quiet || global.output != OutputFormat::Table {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Contacting backend...");
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

pub async fn handle(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let pb = spinner(global);
    console.refresh_status().await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let system = console.system();
    let session = console.session();
    let view = StatusView {
        server: console.api().base_url().to_string(),
        system: system.system_info(),
        health: system.health_status(),
        session: session.is_logged_in().then(|| session.username()),
    };

    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        &view,
        |v| detail(v, color),
        |v| v.health.status.to_string(),
    );
    output::print_output(&out, global.quiet);

    if system.is_healthy() {
        Ok(())
    } else {
        Err(CliError::Api {
            message: "backend reports unhealthy".into(),
            status: None,
        })
    }
}

//! Proxy detection handlers.

use fwctl_core::Console;

use crate::cli::{GlobalOpts, ProxyArgs, ProxyCommand};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    console: &Console,
    args: ProxyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let api = console.api();
    let payload = match args.command {
        ProxyCommand::Info => {
            console.require_permission("proxy:read")?;
            api.get_proxy_info().await?
        }
        ProxyCommand::Config => {
            console.require_permission("proxy:read")?;
            api.get_proxy_config().await?
        }
        ProxyCommand::Stats => {
            console.require_permission("proxy:read")?;
            api.get_proxy_stats().await?
        }
        ProxyCommand::Test { from_file } => {
            console.require_permission("proxy:read")?;
            let sample = util::read_json_file(&from_file)?;
            api.test_proxy_detection(&sample).await?
        }
        ProxyCommand::Validate { from_file } => {
            console.require_permission("proxy:read")?;
            let config = util::read_json_file(&from_file)?;
            api.validate_proxy_config(&config).await?
        }
    };
    output::print_output(&output::render_value(global.output, &payload), global.quiet);
    Ok(())
}

//! Command dispatch: bridges CLI args -> console calls -> output formatting.

pub mod config_cmd;
pub mod logs;
pub mod proxy;
pub mod rules;
pub mod session;
pub mod settings;
pub mod status;
pub mod users;
pub mod util;

use fwctl_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    console: &Console,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => session::login(console, resolved, args, global).await,
        Command::Logout => session::logout(console, global),
        Command::Whoami => session::whoami(console, global),
        Command::Status => status::handle(console, global).await,
        Command::Logs(args) => logs::handle(console, args, global).await,
        Command::Rules(args) => rules::handle(console, args, global).await,
        Command::Users(args) => users::handle(console, args, global).await,
        Command::Proxy(args) => proxy::handle(console, args, global).await,
        Command::Settings(args) => settings::handle(console, args, global).await,
        // Handled before a console exists
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not need a backend connection".into(),
        )),
    }
}

//! Terminal front end for request failures.
//!
//! Errors print as a single red line on stderr. The re-authentication
//! question is asked with dialoguer and declined outright when stdin is
//! not a terminal.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;

use fwctl_core::Notifier;

pub struct TerminalNotifier {
    color: bool,
    quiet: bool,
    interactive: bool,
}

impl TerminalNotifier {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self {
            color,
            quiet,
            interactive: io::stdin().is_terminal() && io::stderr().is_terminal(),
        }
    }
}

impl Notifier for TerminalNotifier {
    fn error(&self, message: &str) {
        let mut stderr = io::stderr().lock();
        let _ = if self.color {
            writeln!(stderr, "{} {message}", "✗".red().bold())
        } else {
            writeln!(stderr, "error: {message}")
        };
    }

    fn confirm_reauth(&self, prompt: &str) -> bool {
        if !self.interactive {
            if !self.quiet {
                eprintln!("{prompt} Run `fwctl login` to continue.");
            }
            return false;
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()
            .unwrap_or(false)
    }
}

// User notification seam
//
// The normalizer reports every failure through exactly one `Notifier`
// call. Front ends decide how that looks: the CLI prints to stderr and
// asks on the terminal, tests record the calls.

use tracing::{error, warn};

/// Single-line transient messages plus the blocking re-auth question.
pub trait Notifier: Send + Sync {
    /// Show a transient error message.
    fn error(&self, message: &str);

    /// Ask whether the user wants to log in again.
    /// Returns `true` when the user accepts.
    fn confirm_reauth(&self, prompt: &str) -> bool;
}

/// Invoked when the user accepts the re-authentication prompt.
pub trait ReauthHandler: Send + Sync {
    fn reauthenticate(&self);
}

/// Notifier that only logs. Used when no front end is attached;
/// it declines every re-auth prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        error!(%message, "request failed");
    }

    fn confirm_reauth(&self, prompt: &str) -> bool {
        warn!(%prompt, "re-authentication requested, no interactive front end");
        false
    }
}

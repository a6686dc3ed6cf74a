//! Clap derive structures for the `fwctl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap so the build script can include it directly.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fwctl -- administer a SecureFingerprint firewall from the command line
#[derive(Debug, Parser)]
#[command(
    name = "fwctl",
    version,
    about = "Administer the SecureFingerprint firewall from the command line",
    long_about = "Console for the SecureFingerprint firewall / anti-fraud backend.\n\n\
        Browse access logs, manage ban and whitelist rules, inspect and adjust\n\
        user scores, and check backend health through the /api/v1 admin API.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "FWCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 's', env = "FWCTL_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FWCTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "FWCTL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "FWCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in to the console
    Login(LoginArgs),

    /// End the current session
    Logout,

    /// Show the logged-in identity
    Whoami,

    /// Show backend version and health
    #[command(alias = "st")]
    Status,

    /// Browse and manage access logs
    #[command(alias = "log")]
    Logs(LogsArgs),

    /// Manage ban and whitelist rules
    #[command(alias = "rule")]
    Rules(RulesArgs),

    /// Inspect users and their scores
    #[command(alias = "user")]
    Users(UsersArgs),

    /// View backend proxy detection
    Proxy(ProxyArgs),

    /// View and manage backend configuration
    Settings(SettingsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Page selection shared by list commands.
#[derive(Debug, Clone, Copy, Args)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Results per page
    #[arg(long, short = 'l', default_value = "20")]
    pub size: u32,
}

/// Optional RFC 3339 time window.
#[derive(Debug, Clone, Args)]
pub struct TimeRangeArgs {
    /// Window start (RFC 3339, e.g. 2026-01-01T00:00:00Z)
    #[arg(long)]
    pub since: Option<String>,

    /// Window end (RFC 3339)
    #[arg(long)]
    pub until: Option<String>,
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (defaults to the profile's username)
    #[arg(long, short = 'u', env = "FWCTL_USERNAME")]
    pub username: Option<String>,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

// ── Logs ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// List access logs with optional filters
    #[command(alias = "ls")]
    List(LogListArgs),

    /// Show entries from the last few minutes
    Recent {
        /// Look-back window in minutes
        #[arg(long, short = 'm', default_value = "60")]
        minutes: u32,

        /// Maximum number of entries
        #[arg(long, short = 'l', default_value = "100")]
        limit: u32,
    },

    /// Aggregate access statistics
    Stats(TimeRangeArgs),

    /// Access history for one fingerprint
    User {
        /// Device fingerprint
        fingerprint: String,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Keyword search across logs
    Search {
        /// Search keyword
        keyword: String,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Download logs to a file
    Export {
        /// Destination file
        #[arg(long, short = 'f')]
        file: PathBuf,

        /// Export format
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Restrict to one fingerprint
        #[arg(long)]
        fingerprint: Option<String>,

        #[command(flatten)]
        range: TimeRangeArgs,
    },

    /// Delete logs older than N days
    Cleanup {
        /// Retention in days
        #[arg(long, short = 'd')]
        days: u32,
    },
}

#[derive(Debug, Args)]
pub struct LogListArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Filter by fingerprint
    #[arg(long)]
    pub fingerprint: Option<String>,

    /// Filter by client IP
    #[arg(long)]
    pub ip: Option<String>,

    /// Filter by user agent substring
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Filter by request path
    #[arg(long)]
    pub path: Option<String>,

    /// Filter by HTTP method
    #[arg(long)]
    pub method: Option<String>,

    /// Filter by action taken (allow, challenge, block, ...)
    #[arg(long)]
    pub action: Option<String>,

    /// Minimum score
    #[arg(long, allow_negative_numbers = true)]
    pub min_score: Option<i64>,

    /// Maximum score
    #[arg(long, allow_negative_numbers = true)]
    pub max_score: Option<i64>,

    #[command(flatten)]
    pub range: TimeRangeArgs,

    /// Sort column
    #[arg(long)]
    pub order_by: Option<String>,

    /// Sort direction
    #[arg(long)]
    pub order_dir: Option<SortDir>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortDir {
    Asc,
    Desc,
}

// ── Rules ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RulesCommand {
    /// List banned fingerprints
    Bans(PageArgs),

    /// Ban one or more fingerprints
    Ban {
        /// Fingerprints to ban
        #[arg(required = true)]
        fingerprints: Vec<String>,

        /// Reason recorded with the ban
        #[arg(long, short = 'r', default_value = "manual ban")]
        reason: String,

        /// Ban duration (e.g. 1h, 24h, 168h)
        #[arg(long, short = 'd', default_value = "24h")]
        duration: String,
    },

    /// Lift a ban
    Unban {
        /// Device fingerprint
        fingerprint: String,
    },

    /// List whitelisted fingerprints
    Whitelist(PageArgs),

    /// Add a fingerprint to the whitelist
    Allow {
        /// Device fingerprint
        fingerprint: String,

        /// Reason recorded with the entry
        #[arg(long, short = 'r', default_value = "manual whitelist")]
        reason: String,
    },

    /// Remove a fingerprint from the whitelist
    Disallow {
        /// Device fingerprint
        fingerprint: String,
    },

    /// Rule analysis for one fingerprint
    Analysis {
        /// Device fingerprint
        fingerprint: String,
    },

    /// Rule statistics
    Stats,

    /// Remove expired rules
    Cleanup,
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List tracked users
    #[command(alias = "ls")]
    List(PageArgs),

    /// Show one user's details
    Show {
        /// Device fingerprint
        fingerprint: String,
    },

    /// Show a user's score (and optionally its history)
    Score {
        /// Device fingerprint
        fingerprint: String,

        /// Include score history for the last N hours
        #[arg(long)]
        history: Option<u32>,
    },

    /// Reset scores back to the baseline
    ResetScore {
        /// Fingerprints to reset
        #[arg(required = true)]
        fingerprints: Vec<String>,

        /// Reason recorded with the reset
        #[arg(long, short = 'r', default_value = "manual reset")]
        reason: String,
    },

    /// Raise or lower scores
    AdjustScore {
        /// Fingerprints to adjust
        #[arg(required = true)]
        fingerprints: Vec<String>,

        /// Signed adjustment (e.g. 10 or -25)
        #[arg(long, short = 'b', allow_negative_numbers = true)]
        by: i32,

        /// Reason recorded with the adjustment
        #[arg(long, short = 'r', default_value = "manual adjustment")]
        reason: String,
    },

    /// Users scoring below a threshold
    Low {
        /// Score threshold
        #[arg(long, short = 't', default_value = "30", allow_negative_numbers = true)]
        threshold: i32,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Aggregate score statistics
    Stats,
}

// ── Proxy ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProxyArgs {
    #[command(subcommand)]
    pub command: ProxyCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProxyCommand {
    /// Detector information
    Info,

    /// Current detector configuration
    Config,

    /// Detection statistics
    Stats,

    /// Run the detector against a JSON sample request
    Test {
        /// JSON file with the sample request
        #[arg(long, short = 'f')]
        from_file: PathBuf,
    },

    /// Validate a JSON detector configuration
    Validate {
        /// JSON file with the configuration
        #[arg(long, short = 'f')]
        from_file: PathBuf,
    },
}

// ── Settings (backend configuration) ─────────────────────────────────

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SettingsSection {
    System,
    Scoring,
    Limiter,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show a configuration section
    Show {
        #[arg(default_value = "system")]
        section: SettingsSection,
    },

    /// Replace a configuration section from a JSON file
    Update {
        section: SettingsSection,

        /// JSON file with the new configuration
        #[arg(long, short = 'f')]
        from_file: PathBuf,
    },

    /// Reset a configuration section to defaults
    Reset { section: SettingsSection },

    /// Download the full configuration
    Export {
        /// Destination file
        #[arg(long, short = 'f')]
        file: PathBuf,
    },

    /// Upload a full configuration from a JSON file
    Import {
        /// JSON file to import
        #[arg(long, short = 'f')]
        from_file: PathBuf,
    },

    /// Configuration change history
    History(PageArgs),
}

// ── Config (CLI profiles) ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the current configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

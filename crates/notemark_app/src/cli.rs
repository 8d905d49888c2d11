use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use notemark_engine::DEFAULT_API_BASE;
use notemark_logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "notemark", version)]
#[command(about = "Save web pages as bookmark cards in a Notion page")]
pub struct Cli {
    /// Draft file holding the document id, caption, toggles and pending URLs.
    #[arg(
        long,
        env = "NOTEMARK_DRAFT",
        default_value = ".notemark_draft.ron",
        global = true
    )]
    pub draft: PathBuf,

    #[arg(long, value_enum, default_value_t = LogTarget::File, global = true)]
    pub log: LogTarget,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import the given URLs (or the pending list, or the active page)
    Import(ImportArgs),

    /// Inspect or edit the saved draft
    #[command(subcommand)]
    Draft(DraftCommand),
}

/// The page open in the browser, if any.
#[derive(Debug, Clone, Default, Args)]
pub struct TabArgs {
    #[arg(long)]
    pub active_tab_url: Option<String>,

    /// Rendered DOM of the active page, saved as an HTML file.
    #[arg(long, requires = "active_tab_url")]
    pub active_tab_snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ImportArgs {
    /// Target page id or URL; falls back to the draft.
    #[arg(long)]
    pub document: Option<String>,

    /// URL to import; repeat for several.
    #[arg(long = "url")]
    pub urls: Vec<String>,

    /// File with one URL per line.
    #[arg(long)]
    pub urls_file: Option<PathBuf>,

    /// Caption shown under every bookmark card; falls back to the draft.
    #[arg(long)]
    pub caption: Option<String>,

    /// Import a list and keep unfinished URLs in the draft.
    #[arg(long)]
    pub batch: bool,

    /// Also add the page's cover image above each bookmark.
    #[arg(long)]
    pub cover: bool,

    #[command(flatten)]
    pub tab: TabArgs,

    #[command(flatten)]
    pub service: ServiceArgs,

    /// Delay between targets, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 800)]
    pub pause_ms: u64,
}

#[derive(Debug, Clone, Args)]
pub struct ServiceArgs {
    #[arg(long, env = "NOTEMARK_USER_ID")]
    pub user_id: Option<String>,

    #[arg(long, env = "NOTEMARK_SESSION_TOKEN", hide_env_values = true)]
    pub session_token: Option<String>,

    #[arg(long, env = "NOTEMARK_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

impl Default for ServiceArgs {
    fn default() -> Self {
        Self {
            user_id: None,
            session_token: None,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum DraftCommand {
    /// Print the saved draft
    Show,

    /// Empty the pending URL list
    Clear,

    /// Append the active page to the pending URL list
    AddCurrent {
        #[arg(long)]
        active_tab_url: String,
    },

    /// Store fields as the editing form would
    Set(DraftSetArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct DraftSetArgs {
    #[arg(long)]
    pub document: Option<String>,

    #[arg(long)]
    pub caption: Option<String>,

    /// Replace the pending list; only kept while batch mode is on.
    #[arg(long = "url")]
    pub urls: Vec<String>,

    #[arg(long)]
    pub batch: Option<bool>,

    #[arg(long)]
    pub cover: Option<bool>,
}

//! CLI command definitions and handlers

mod analyze;
mod compare;
mod history;
mod input;

use crate::config::UserConfig;
use crate::engine::ScoringEngine;
use crate::history::AnalyticsStore;
use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;

/// Parse and validate a history count (at least 1)
fn parse_count(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

/// PhishGuard - heuristic phishing email scorer
///
/// 100% LOCAL - No account needed. No email text leaves your machine.
#[derive(Parser, Debug)]
#[command(name = "phishguard")]
#[command(
    version,
    about = "Heuristic phishing email scorer: 0-100 risk score with human-readable reasons",
    long_about = "PhishGuard scores email text against a fixed table of phishing heuristics \
(urgency, prize and threat language, suspicious links, brand impersonation, requests for \
sensitive data) and explains every point it adds.\n\n\
100% LOCAL - No account needed. No email text leaves your machine.",
    after_help = "\
Examples:
  phishguard analyze email.txt                 Score an email saved to a file
  pbpaste | phishguard analyze                 Score an email from stdin
  phishguard analyze email.txt -f markdown -o report.md
  phishguard compare a.txt b.txt               Which of two emails is safer
  phishguard history                           Recent analyses
  phishguard export -f csv -o history.csv      Export history"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Directory holding history.json and stats.json (overrides PHISHGUARD_DATA_DIR and config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score an email and record it in history
    #[command(after_help = "\
Examples:
  phishguard analyze email.txt                       Score a file
  phishguard analyze --text \"Verify now at http://10.0.0.1\"
  cat email.txt | phishguard analyze -               Read from stdin
  phishguard analyze email.txt --format json         JSON output for scripting
  phishguard analyze email.txt -f markdown -o r.md   Markdown report to a file
  phishguard analyze email.txt --explain             Per-rule point breakdown
  phishguard analyze email.txt --fail-on phishing    Exit code 1 when phishing (CI mode)")]
    Analyze {
        /// Email file ('-' or omitted reads stdin)
        file: Option<PathBuf>,

        /// Email text given inline instead of a file
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// Output format: text, markdown (or md), json
        #[arg(long, short = 'f', value_parser = ["text", "markdown", "md", "json"])]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Do not record this analysis in history or stats
        #[arg(long)]
        no_save: bool,

        /// Show how many points each rule added
        #[arg(long)]
        explain: bool,

        /// Exit with code 1 if the email is at this risk level or higher
        /// Values: suspicious, phishing (default: none - always exit 0)
        #[arg(long, value_parser = ["suspicious", "phishing"])]
        fail_on: Option<String>,

        /// Disable emoji in output (cleaner for CI logs)
        #[arg(long)]
        no_emoji: bool,
    },

    /// Fast estimate of the score (four checks, nothing recorded)
    Quick {
        /// Email file ('-' or omitted reads stdin)
        file: Option<PathBuf>,

        /// Email text given inline instead of a file
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
    },

    /// List the links in an email and flag suspicious ones
    Urls {
        /// Email file ('-' or omitted reads stdin)
        file: Option<PathBuf>,

        /// Email text given inline instead of a file
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score two emails side by side
    #[command(after_help = "\
Examples:
  phishguard compare a.txt b.txt                     Side-by-side scores
  phishguard compare a.txt b.txt --format json       JSON output for scripting")]
    Compare {
        /// First email file
        a: PathBuf,

        /// Second email file
        b: PathBuf,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Do not record either analysis in history or stats
        #[arg(long)]
        no_save: bool,
    },

    /// Show, inspect or clear recent analyses
    #[command(after_help = "\
Examples:
  phishguard history                                 List recent analyses (newest first)
  phishguard history --show 2                        Full details for entry #2
  phishguard history --json                          JSON output for scripting
  phishguard history --clear                         Forget all recorded analyses")]
    History {
        /// Remove every entry (stats are kept)
        #[arg(long, conflicts_with_all = ["show", "json"])]
        clear: bool,

        /// Show full details for entry N (1 = newest)
        #[arg(long, value_parser = parse_count)]
        show: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show aggregate counters over every recorded analysis
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the history as CSV or JSON
    #[command(after_help = "\
Examples:
  phishguard export                                  CSV to stdout
  phishguard export -f json -o history.json          JSON to a file")]
    Export {
        /// Export format: csv, json
        #[arg(long, short = 'f', default_value = "csv", value_parser = ["csv", "json"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Manage configuration (init, show)
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize config file with example settings
    Init,
    /// Show current config and paths
    Show,
}

/// Settings resolved from flags, environment and config file
pub(crate) struct Session {
    pub config: UserConfig,
    pub data_dir: PathBuf,
    pub engine: ScoringEngine,
}

impl Session {
    fn new(cli_data_dir: Option<PathBuf>) -> Self {
        let config = UserConfig::load();
        let data_dir = cli_data_dir.unwrap_or_else(|| config.data_dir());
        let engine = ScoringEngine::new(config.engine_config());
        Self {
            config,
            data_dir,
            engine,
        }
    }

    /// The persistent store, or a throwaway one when nothing should be saved
    pub fn store(&self, save: bool) -> AnalyticsStore {
        if save {
            AnalyticsStore::open(&self.data_dir, self.config.history_limit())
        } else {
            AnalyticsStore::in_memory(self.config.history_limit())
        }
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let session = Session::new(cli.data_dir);

    match cli.command {
        Commands::Analyze {
            file,
            text,
            format,
            output,
            no_save,
            explain,
            fail_on,
            no_emoji,
        } => {
            let format = format.unwrap_or_else(|| session.config.output_format().to_string());
            analyze::run(
                &session,
                analyze::AnalyzeArgs {
                    source: input::Source::new(file, text),
                    format: &format,
                    output: output.as_deref(),
                    save: !no_save,
                    explain,
                    fail_on,
                    no_emoji: no_emoji || session.config.no_emoji(),
                },
            )
        }

        Commands::Quick { file, text } => analyze::quick(&input::Source::new(file, text)),

        Commands::Urls { file, text, json } => {
            analyze::urls(&input::Source::new(file, text), json)
        }

        Commands::Compare {
            a,
            b,
            format,
            no_save,
        } => compare::run(&session, &a, &b, &format, !no_save),

        Commands::History { clear, show, json } => {
            if clear {
                history::clear(&session)
            } else {
                history::list(&session, show, json)
            }
        }

        Commands::Stats { json } => history::stats(&session, json),

        Commands::Export { format, output } => {
            history::export(&session, &format, output.as_deref())
        }

        Commands::Config { action } => run_config_action(&session, action),

        Commands::Version => {
            println!("phishguard {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn run_config_action(session: &Session, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let (path, created) = UserConfig::init_user_config()?;
            if !created {
                println!("Config already exists at: {}", path.display());
                println!("Edit it directly or run {}", style("phishguard config show").cyan());
                return Ok(());
            }
            println!("✅ Config initialized at: {}", path.display());
            println!("\nEdit it to change defaults, or set via environment:");
            println!("  export PHISHGUARD_DATA_DIR=\"/path/to/data\"");
            println!("  export PHISHGUARD_HISTORY_LIMIT=50");
            Ok(())
        }
        ConfigAction::Show => show_config(session),
    }
}

fn show_config(session: &Session) -> Result<()> {
    let config = &session.config;
    let engine = config.engine_config();

    println!("📁 Config paths:");
    if let Some(user_path) = UserConfig::user_config_path() {
        let status = if user_path.exists() {
            style("✓").green().to_string()
        } else {
            style("(not found)").dim().to_string()
        };
        println!("  Config: {} {}", user_path.display(), status);
    }
    println!("  Data:   {}", session.data_dir.display());
    println!();
    println!("⚙️  Settings:");
    println!("  max_input_bytes = {}", engine.max_input_bytes);
    println!("  preview_chars   = {}", engine.preview_chars);
    println!("  history limit   = {}", config.history_limit());
    println!("  output format   = {}", config.output_format());
    println!("  no_emoji        = {}", config.no_emoji());
    Ok(())
}

//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url::Url;

use wikiharvest_core::{ProgressReporter, run_scrape, write_output};
use wikiharvest_mediawiki::{WikiClient, WikiEndpoint};
use wikiharvest_shared::{
    AppConfig, LayoutMode, ScrapeConfig, ScrapeOutput, init_config, load_config, load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// wikiharvest: export wiki item pages to JSON.
#[derive(Parser)]
#[command(
    name = "wikiharvest",
    version,
    about = "Walk a MediaWiki category tree and export every item page as structured JSON.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Traverse the root category and extract every item page.
    Scrape(ScrapeArgs),

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Flags for `scrape`. Each one overrides the matching config file value.
#[derive(clap::Args, Debug, Default)]
pub(crate) struct ScrapeArgs {
    /// Output JSON path.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// User-Agent sent with every request.
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Pause after each request, in milliseconds.
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Stop after this many pages (0 = no limit).
    #[arg(long)]
    pub limit: Option<usize>,

    /// Wiki origin, e.g. https://deadbydaylight.wiki.gg.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Root category to traverse.
    #[arg(long)]
    pub category: Option<String>,

    /// Item table column layout: positional or headers.
    #[arg(long)]
    pub layout: Option<LayoutMode>,

    /// Config file to use instead of ~/.wikiharvest/wikiharvest.toml.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show {
        /// Config file to read instead of the default location.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "wikiharvest=info",
        1 => "wikiharvest=debug",
        _ => "wikiharvest=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Scrape(args) => cmd_scrape(args).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show { config } => cmd_config_show(config.as_deref()),
        },
    }
}

async fn cmd_scrape(args: ScrapeArgs) -> Result<()> {
    let app_config = read_config(args.config.as_deref())?;
    let config = resolve_scrape_config(&app_config, &args)?;

    info!(
        base_url = %config.base_url,
        root = %config.root_category,
        delay_ms = config.delay.as_millis(),
        limit = ?config.limit,
        layout = ?config.layout,
        "starting scrape"
    );

    let client = WikiClient::new(&WikiEndpoint::from(&config))?;
    let progress = CliProgress::new();
    let started = Instant::now();

    let output = match run_scrape(&client, &config, &progress).await {
        Ok(output) => output,
        Err(e) => {
            progress.bar.abandon_with_message("scrape failed");
            return Err(e.into());
        }
    };

    write_output(&config.output, &output)?;

    println!();
    println!("  Scrape complete!");
    println!("  Source:  {}", output.source);
    println!("  Items:   {}", output.count);
    println!("  Errors:  {}", output.errors.len());
    println!("  Output:  {}", config.output.display());
    println!(
        "  Elapsed: {:.1}s",
        started.elapsed().as_secs_f64()
    );
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = read_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Config resolution
// ---------------------------------------------------------------------------

fn read_config(path: Option<&Path>) -> Result<AppConfig> {
    Ok(match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    })
}

/// Merge CLI flags over the file/default configuration.
fn resolve_scrape_config(app_config: &AppConfig, args: &ScrapeArgs) -> Result<ScrapeConfig> {
    let mut config = ScrapeConfig::try_from(app_config)?;

    if let Some(base_url) = &args.base_url {
        config.base_url =
            Url::parse(base_url).map_err(|e| eyre!("invalid base URL '{base_url}': {e}"))?;
    }
    if let Some(category) = &args.category {
        config.root_category = category.clone();
    }
    if let Some(user_agent) = &args.user_agent {
        config.user_agent = user_agent.clone();
    }
    if let Some(delay_ms) = args.delay_ms {
        config.delay = Duration::from_millis(delay_ms);
    }
    if let Some(limit) = args.limit {
        config.limit = (limit > 0).then_some(limit);
    }
    if let Some(out) = &args.out {
        config.output = out.clone();
    }
    if let Some(layout) = args.layout {
        config.layout = layout;
    }

    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter: a spinner during traversal, then a bar over the
/// discovered pages.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    fn switch_to_bar(&self, total: usize) {
        if self.bar.length() == Some(total as u64) {
            return;
        }
        self.bar.set_length(total as u64);
        if let Ok(style) =
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {wide_msg}")
        {
            self.bar.set_style(style.progress_chars("=> "));
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn item_processed(&self, title: &str, ok: bool, current: usize, total: usize) {
        self.switch_to_bar(total);
        self.bar.set_position(current as u64);
        let mark = if ok { "" } else { " (failed)" };
        self.bar.set_message(format!("{title}{mark}"));
    }

    fn done(&self, _output: &ScrapeOutput) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("wikiharvest").chain(args.iter().copied())).unwrap()
    }

    fn scrape_args(cli: Cli) -> ScrapeArgs {
        match cli.command {
            Command::Scrape(args) => args,
            Command::Config { .. } => panic!("expected scrape"),
        }
    }

    #[test]
    fn defaults_come_from_config() {
        let config = resolve_scrape_config(&AppConfig::default(), &ScrapeArgs::default()).unwrap();
        assert_eq!(config.root_category, "Category:Items");
        assert_eq!(config.delay, Duration::from_millis(250));
        assert_eq!(config.limit, None);
        assert_eq!(config.layout, LayoutMode::Positional);
    }

    #[test]
    fn flags_override_config() {
        let args = scrape_args(parse(&[
            "scrape",
            "--out",
            "/tmp/items.json",
            "--delay-ms",
            "0",
            "--limit",
            "5",
            "--base-url",
            "https://wiki.example",
            "--category",
            "Category:Survivor Items",
            "--layout",
            "headers",
        ]));

        let config = resolve_scrape_config(&AppConfig::default(), &args).unwrap();
        assert_eq!(config.output, PathBuf::from("/tmp/items.json"));
        assert_eq!(config.delay, Duration::ZERO);
        assert_eq!(config.limit, Some(5));
        assert_eq!(config.base_url.as_str(), "https://wiki.example/");
        assert_eq!(config.root_category, "Category:Survivor Items");
        assert_eq!(config.layout, LayoutMode::Headers);
    }

    #[test]
    fn zero_limit_means_unlimited() {
        let args = scrape_args(parse(&["scrape", "--limit", "0"]));
        let config = resolve_scrape_config(&AppConfig::default(), &args).unwrap();
        assert_eq!(config.limit, None);
    }

    #[test]
    fn empty_user_agent_is_rejected() {
        let args = scrape_args(parse(&["scrape", "--user-agent", "  "]));
        assert!(resolve_scrape_config(&AppConfig::default(), &args).is_err());
    }

    #[test]
    fn bad_layout_flag_fails_to_parse() {
        let result = Cli::try_parse_from(["wikiharvest", "scrape", "--layout", "diagonal"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["config", "show", "-vv", "--log-format", "json"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.log_format, LogFormat::Json));
    }
}

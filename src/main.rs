// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use easylaw::app_config::{self, Config};
use easylaw::app_controller::{Controller, HostContext};
use easylaw::cache::CacheStore;
use easylaw::diagnostics::LogSink;
use easylaw::errors::{AppError, ConfigError};
use easylaw::file_utils::FileManager;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replace placeholders in a page with the provider documents
    Render(RenderArgs),

    /// Mark cached documents as stale so the next render fetches them again
    Invalidate(InvalidateArgs),

    /// Generate shell completions for easylaw
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Page file containing placeholders
    #[arg(value_name = "PAGE")]
    page: PathBuf,

    /// Write the rendered page here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Domain the license is registered for
    #[arg(short, long, env = "EASYLAW_DOMAIN")]
    domain: Option<String>,

    /// Language tag of the site (e.g. 'de-DE', 'en')
    #[arg(short, long, default_value = "de-DE")]
    site_language: String,

    /// Show diagnostics even if the configuration disables them
    #[arg(long)]
    debug: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct InvalidateArgs {
    /// Only entries of this document type (e.g. 'dse')
    #[arg(long)]
    document: Option<String>,

    /// Only entries in this language (e.g. 'de')
    #[arg(long)]
    language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// easylaw - legal texts for content pages
///
/// Embeds privacy policies and imprints from easyrechtssicher.de into pages.
#[derive(Parser, Debug)]
#[command(name = "easylaw")]
#[command(version)]
#[command(about = "Embed cached legal texts into content pages")]
#[command(long_about = "easylaw replaces {jteasylaw <type>[, <language>]} placeholders with documents
downloaded from easyrechtssicher.de and caches them on disk.

EXAMPLES:
    easylaw render page.html -d example.org              # Render to stdout
    easylaw render page.html -d example.org -o out.html  # Render to a file
    easylaw render page.html --debug -l debug            # Show diagnostics
    easylaw invalidate --document dse                    # Refetch on next render
    easylaw completions bash > easylaw.bash              # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at trace so the configured level can be applied later through set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Render(args) => run_render(args).await,
        Commands::Invalidate(args) => run_invalidate(args),
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "easylaw", &mut std::io::stdout());
            Ok(())
        }
    }
}

async fn run_render(options: RenderArgs) -> Result<()> {
    let config = load_config(&options.config_path, options.log_level.clone())?;

    let domain = options
        .domain
        .clone()
        .or_else(|| config.domain.clone())
        .ok_or_else(|| anyhow!("A domain is required: pass --domain or set 'domain' in the config"))?;

    let text = FileManager::read_to_string(&options.page)?;

    let mut context = HostContext::new(options.site_language.clone(), domain);
    context.debug = options.debug;

    let controller = Controller::with_config(config);
    let output = controller
        .prepare_content(&context, &text, &mut LogSink)
        .await;

    let document = output.with_inline_stylesheet();
    match &options.output {
        Some(path) => {
            FileManager::write_to_file(path, &document)?;
            info!("Success: {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout();
            stdout
                .write_all(document.as_bytes())
                .context("Failed to write rendered page to stdout")?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn run_invalidate(options: InvalidateArgs) -> Result<()> {
    let config = load_config(&options.config_path, options.log_level.clone())?;
    let cache = CacheStore::new(config.cache_root());

    let language = options.language.as_deref().map(str::to_lowercase);
    let document = options.document.as_deref().map(str::to_lowercase);

    let count = invalidate_entries(&cache, language.as_deref(), document.as_deref())?;
    if count == 0 {
        warn!("No cached documents found in {:?}", cache.root());
    } else {
        info!("Invalidated {} cached document(s)", count);
    }

    Ok(())
}

/// Mark matching cache entries as stale, returning how many were touched
fn invalidate_entries(
    cache: &CacheStore,
    language: Option<&str>,
    document: Option<&str>,
) -> Result<usize, AppError> {
    let entries = cache.entries(language, document)?;

    for entry in &entries {
        cache.invalidate(entry)?;
        info!("Invalidated {:?}", entry);
    }

    Ok(entries.len())
}

/// Load the configuration file, creating a default one when it is missing
fn load_config(config_path: &str, cli_log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| AppError::from(ConfigError::Malformed(e.to_string())))
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(log_level) = cli_log_level {
        config.log_level = log_level.into();
    }

    let log_level = match config.log_level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    };
    log::set_max_level(log_level);

    Ok(config)
}

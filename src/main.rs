// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use ptradutor::app_config::{self, Config, TranslationProvider};
use ptradutor::app_controller::Controller;
use ptradutor::corpus::{CorpusName, Domain, Split, Tier};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Ollama,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
        }
    }
}

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
    /// Translate the missing texts of a corpus into the data directory
    Translate(TranslateArgs),

    /// Build a tier from the translation stores and write it as JSON Lines
    Publish {
        /// Tier to publish
        #[arg(value_name = "TIER")]
        tier: Tier,
    },

    /// Build a tier and log how many records each stage kept
    Stats {
        /// Tier to inspect
        #[arg(value_name = "TIER")]
        tier: Tier,
    },

    /// Generate shell completions for ptradutor
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Target language code, also the prefix of the store names
    #[arg(short, long)]
    lang: Option<String>,

    /// Corpus to translate (pt_vid, frmt or dsl_tl)
    #[arg(short, long, required_unless_present = "sequential")]
    name: Option<CorpusName>,

    /// Only translate this domain
    #[arg(short, long)]
    domain: Option<Domain>,

    /// Only translate this split
    #[arg(short, long)]
    split: Option<Split>,

    /// Translate every corpus into one store, one text at a time
    #[arg(long, conflicts_with_all = ["name", "domain", "split"])]
    sequential: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,
}

/// PTradutor - Portuguese-English parallel corpus builder
///
/// Machine-translates Portuguese corpora into a resumable store, filters the
/// translated pairs through quality tiers and publishes them.
#[derive(Parser, Debug)]
#[command(name = "ptradutor")]
#[command(version = "1.0.0")]
#[command(about = "Build a filtered Portuguese-English parallel corpus")]
#[command(long_about = "PTradutor translates Portuguese corpora and publishes raw, clean and superclean tiers.

EXAMPLES:
    ptradutor translate -l en -n pt_vid -d journalistic -s train
    ptradutor translate -l en -n frmt               # Every domain and split of frmt
    ptradutor translate --sequential                # All corpora into a single store
    ptradutor stats superclean                      # Per-stage yield of the superclean tier
    ptradutor publish clean                         # Write data/hf/clean/*.jsonl
    ptradutor completions bash > ptradutor.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: String,

    /// Set logging level
    #[arg(long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
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
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Load `conf.json`, creating it with defaults when missing
fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path).context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        let config: Config =
            serde_json::from_reader(reader).context(format!("Failed to parse config file: {}", config_path))?;
        Ok(config)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();

        let config_json =
            serde_json::to_string_pretty(&config).context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the configuration says otherwise
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "ptradutor", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = load_config(&cli.config)?;

    // Override config with CLI options if provided
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Commands::Translate(args) = &cli.command {
        if let Some(lang) = &args.lang {
            config.target_language = lang.clone();
        }
        if let Some(provider) = &args.provider {
            config.translation.provider = provider.clone().into();
        }
        if let Some(model) = &args.model {
            config.translation.model = model.clone();
        }
    }

    config.validate().context("Configuration validation failed")?;

    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Translate(args) => {
            if args.sequential {
                controller.run_sequential().await?;
            } else if let Some(name) = args.name {
                controller.run_translate(name, args.domain, args.split).await?;
            }
        }
        Commands::Publish { tier } => {
            let summary = controller.run_publish(tier)?;
            info!("Wrote {} rows to {} files", summary.rows, summary.files.len());
        }
        Commands::Stats { tier } => {
            controller.run_stats(tier)?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

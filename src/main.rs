// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use vidweave::app_config::{Config, LogLevel};
use vidweave::app_controller::{Controller, GenerationRequest};
use vidweave::caption_burner::SubtitleStyle;
use vidweave::file_utils::FileManager;

/// CLI Wrapper for SubtitleStyle to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSubtitleStyle {
    Professional,
    Modern,
    Cinematic,
}

impl From<CliSubtitleStyle> for SubtitleStyle {
    fn from(cli_style: CliSubtitleStyle) -> Self {
        match cli_style {
            CliSubtitleStyle::Professional => SubtitleStyle::Professional,
            CliSubtitleStyle::Modern => SubtitleStyle::Modern,
            CliSubtitleStyle::Cinematic => SubtitleStyle::Cinematic,
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

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble a narrated, captioned video
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Generate shell completions for vidweave
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Narration audio file rendered by the TTS engine
    #[arg(short, long, value_name = "AUDIO_PATH")]
    audio: PathBuf,

    /// Spoken script text, or a path to a text file containing it
    #[arg(short = 't', long, value_name = "SCRIPT")]
    script: String,

    /// Directory of visual assets (images and clips)
    #[arg(short = 'd', long, value_name = "ASSETS_DIR")]
    assets_dir: PathBuf,

    /// Output video path
    #[arg(short, long, default_value = "output/video.mp4")]
    output: PathBuf,

    /// Produce and burn captions
    #[arg(short = 'b', long)]
    subtitles: bool,

    /// Caption style preset
    #[arg(long, value_enum)]
    subtitle_style: Option<CliSubtitleStyle>,

    /// Spoken-content language tag (e.g. 'en-US', 'fr')
    #[arg(short, long)]
    language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// vidweave - Narrated video assembly with synchronized captions
///
/// Assembles a video from a narration audio track and a directory of visual
/// assets, reconciling the visual timeline against the narration duration and
/// optionally burning in synchronized captions.
#[derive(Parser, Debug)]
#[command(name = "vidweave")]
#[command(author = "vidweave contributors")]
#[command(version = "0.1.0")]
#[command(about = "Narrated video assembly with synchronized captions")]
#[command(long_about = "vidweave assembles narrated videos from an audio track and visual assets,
forcing both timelines into exact alignment and adding synchronized captions.

EXAMPLES:
    vidweave generate -a narration.mp3 -t script.txt -d assets/ -o video.mp4
    vidweave generate -a narration.mp3 -t \"Spoken text.\" -d assets/ -b
    vidweave generate -a narration.mp3 -t script.txt -d assets/ -b --subtitle-style cinematic
    vidweave generate -a narration.mp3 -t script.txt -d assets/ -l fr-FR -b
    vidweave completions bash > vidweave.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

CAPTION STYLES:
    professional - white bold sans with black outline (default)
    modern       - larger sans with navy outline
    cinematic    - gold serif with heavy outline")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
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

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // The max level can be raised after config load, so defer to it
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());
            let emoji = Self::get_emoji_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {}{}\x1B[0m",
                color,
                now,
                emoji,
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
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "vidweave", &mut std::io::stdout());
            Ok(())
        }
        Commands::Generate(args) => run_generate(args).await,
    }
}

async fn run_generate(options: GenerateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter_for(&cmd_log_level.clone().into()));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
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

    // Override config with CLI options if provided
    if let Some(style) = &options.subtitle_style {
        config.subtitle_style = style.clone().into();
    }
    if let Some(language) = &options.language {
        config.language = language.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter_for(&config.log_level));
    }

    // The script argument is either inline text or a path to a text file
    let script = if Path::new(&options.script).is_file() {
        FileManager::read_to_string(&options.script)?
    } else {
        options.script.clone()
    };

    if !options.assets_dir.is_dir() {
        return Err(anyhow!(
            "Assets directory does not exist: {:?}",
            options.assets_dir
        ));
    }

    let subtitle_style = config.subtitle_style;
    let language = Some(config.language.clone());
    let controller = Controller::with_config(config)?;

    let outcome = controller
        .run(GenerationRequest {
            script,
            audio_path: options.audio,
            assets_dir: options.assets_dir,
            output_path: options.output,
            enable_subtitles: options.subtitles,
            subtitle_style,
            language,
        })
        .await?;

    println!("Video: {}", outcome.video_path.display());
    if let Some(subtitle_path) = &outcome.subtitle_path {
        println!(
            "Captions: {} ({})",
            subtitle_path.display(),
            if outcome.captions_burned { "burned in" } else { "sidecar only" }
        );
    }

    Ok(())
}

fn level_filter_for(level: &LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

//! CLI entry point for the declaration lister.
//!
//! Provides commands for listing declarations, dumping tokens and managing
//! settings. Main components: Cli parser, Commands enum and one handler per
//! command.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use lcdecl::display::THEME;
use lcdecl::error::ParseError;
use lcdecl::indexing::read_source;
use lcdecl::io::{ExitCode, ListingOptions, OutputFormat, OutputManager};
use lcdecl::{
    BatchParser, DeclarationKind, FileWalker, IndexError, LanguageStandard, Lexer, Settings,
};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// List the declarations in C and C++ source files
#[derive(Parser)]
#[command(
    name = "lcdecl",
    version = env!("CARGO_PKG_VERSION"),
    about = "List the declarations in C and C++ source files",
    long_about = "Scan C and C++ sources and print an inventory of classes, structs, \
                  functions, variables and friend declarations with their scope, \
                  access level, modifiers, bases and parameters.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Language standard, e.g. c99, c++11, c++20 (overrides config)
    #[arg(long = "std", global = true, env = "LCDECL_STD")]
    standard: Option<String>,

    /// Log parser decisions to stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// List declarations in files or directories
    #[command(
        after_help = "Examples:\n  lcdecl list src\n  lcdecl list shapes.h --kind class --kind function\n  lcdecl list src --json --strict\n\nJSON paths:\n  .data.files[].declarations[].name\n  .data.files[].diagnostics[]\n  .data.summary.declarations"
    )]
    List {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Only list these kinds (class, struct, union, enum, namespace,
        /// function, variable, friend)
        #[arg(short, long = "kind", value_delimiter = ',', value_parser = parse_kind)]
        kinds: Vec<DeclarationKind>,

        /// Do not print diagnostics
        #[arg(long)]
        no_diagnostics: bool,

        /// Exit with code 4 when any error diagnostic is reported
        #[arg(long)]
        strict: bool,

        /// Number of threads to use (overrides config)
        #[arg(short, long)]
        threads: Option<usize>,
    },

    /// Dump the token stream of one file with a configured extension
    Tokens {
        file: PathBuf,

        /// One JSON object per token (JSON Lines)
        #[arg(long)]
        json: bool,

        /// Keep comments and preprocessor directives
        #[arg(long)]
        trivia: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings from .lcdecl/settings.toml")]
    Config {
        #[arg(long)]
        json: bool,
    },

    /// Initialize project
    #[command(about = "Set up .lcdecl directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_kind(value: &str) -> Result<DeclarationKind, String> {
    value.parse().map_err(|e: &str| e.to_string())
}

/// Settings printed as TOML in text mode and as plain JSON otherwise
#[derive(Serialize)]
#[serde(transparent)]
struct SettingsView<'a>(&'a Settings);

impl fmt::Display for SettingsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = toml::to_string_pretty(self.0).map_err(|_| fmt::Error)?;
        writeln!(f, "Current Configuration:")?;
        writeln!(f, "{}", "=".repeat(50))?;
        write!(f, "{text}")
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, IndexError> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path).map_err(|e| IndexError::ConfigError {
            reason: format!("loading {}: {e}", path.display()),
        })?,
        None => Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            eprintln!("Using default configuration.");
            Settings::default()
        }),
    };

    if let Some(value) = &cli.standard {
        settings.parsing.standard =
            value
                .parse::<LanguageStandard>()
                .map_err(|reason| ParseError::UnknownStandard {
                    value: value.clone(),
                    reason,
                })?;
    }
    if cli.debug {
        settings.debug = true;
    }
    Ok(settings)
}

fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn run_list(
    settings: Settings,
    paths: &[PathBuf],
    kinds: Vec<DeclarationKind>,
    strict: bool,
    output: &mut OutputManager,
) -> std::io::Result<ExitCode> {
    let start = Instant::now();
    let settings = Arc::new(settings);

    let files = match FileWalker::new(settings.clone()).collect(paths) {
        Ok(files) => files,
        Err(err) => return output.error(&err),
    };
    if files.is_empty() {
        let names = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return output.not_found("Source files in", &names);
    }

    let results = BatchParser::new(settings.clone())
        .with_kinds(kinds)
        .parse_files(&files);

    let options = ListingOptions {
        show_diagnostics: settings.output.show_diagnostics,
        strict,
        standard: settings.parsing.standard,
        elapsed: Some(start.elapsed()),
    };
    output.listing(&results, options)
}

fn run_tokens(
    settings: Settings,
    file: &Path,
    trivia: bool,
    output: &mut OutputManager,
) -> std::io::Result<ExitCode> {
    let keywords = settings.keyword_table();
    let walker = FileWalker::new(Arc::new(settings));
    if file.is_file() && !walker.is_supported(file) {
        let error = IndexError::UnsupportedFileType {
            path: file.to_path_buf(),
            extension: file
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default(),
            supported: walker.supported_extensions(),
        };
        return output.error(&error);
    }

    let source = match read_source(file) {
        Ok(source) => source,
        Err(err) => return output.error(&err),
    };
    let tokens: Vec<_> = Lexer::new(&source, &keywords)
        .skip_trivia(!trivia)
        .collect();
    output.tokens(&tokens)
}

fn run_init(force: bool, output: &mut OutputManager) -> std::io::Result<ExitCode> {
    match Settings::init_config_file(force) {
        Ok(path) => {
            output.info(&THEME.success_with_icon(&format!(
                "Created configuration file at: {}",
                path.display()
            )))?;
            output.info("Edit this file to customize your settings.")?;
            Ok(ExitCode::Success)
        }
        Err(err) => output.error(&err),
    }
}

fn run(cli: Cli) -> std::io::Result<ExitCode> {
    let json_flag = match &cli.command {
        Commands::List { json, .. } | Commands::Tokens { json, .. } | Commands::Config { json } => {
            *json
        }
        Commands::Init { .. } => false,
    };

    let mut settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(err) => {
            return OutputManager::new(OutputFormat::from_json_flag(json_flag)).error(&err);
        }
    };
    init_tracing(settings.debug);

    let format = OutputFormat::resolve(json_flag, settings.output.format);
    let mut output = OutputManager::new(format);

    match cli.command {
        Commands::List {
            paths,
            kinds,
            no_diagnostics,
            strict,
            threads,
            ..
        } => {
            if let Some(threads) = threads {
                settings.batch.parallel_threads = threads;
            }
            if no_diagnostics {
                settings.output.show_diagnostics = false;
            }
            run_list(settings, &paths, kinds, strict, &mut output)
        }
        Commands::Tokens { file, trivia, .. } => run_tokens(settings, &file, trivia, &mut output),
        Commands::Config { .. } => output.success(SettingsView(&settings)),
        Commands::Init { force } => run_init(force, &mut output),
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => {
            if !code.is_success() {
                tracing::debug!("exit {}: {}", i32::from(code), code.description());
            }
            code.into()
        }
        // A closed pipe (e.g. `lcdecl list src | head`) is not a failure
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => ExitCode::Success.into(),
        Err(err) => {
            eprintln!("{}", THEME.error_with_icon(&format!("Output failed: {err}")));
            ExitCode::IoError.into()
        }
    }
}

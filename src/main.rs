//! Binary entry point for the tugstyle CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Fix every Java file under src/ using a Checkstyle configuration
//! tugstyle --config config/checkstyle/checkstyle.xml fix src
//!
//! # Report files that would change, without writing; exits 1 if any would
//! tugstyle --config checkstyle.xml check src
//!
//! # List the rules that can be fixed
//! tugstyle rules
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use tugstyle::report::{emit_response, ErrorResponse, RunReport};
use tugstyle::{runner, FixOptions, OutputErrorCode, TugstyleError};
use tugstyle_core::{discover_java_files, CheckstyleConfig, DiscoveryOptions, Properties};
use tugstyle_java::{Scheduler, DEFAULT_MAX_PASSES};
use tugstyle_rules::{RuleRegistry, KNOWN_RULES};

/// Fix Checkstyle violations in Java sources.
#[derive(Parser, Debug)]
#[command(name = "tugstyle", version, about = "Fix Checkstyle violations in Java sources")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Checkstyle configuration file.
    #[arg(long, short = 'f', global = true, conflicts_with = "inline_config")]
    config: Option<PathBuf>,

    /// Checkstyle configuration given inline as XML.
    #[arg(long, short = 'c', global = true)]
    inline_config: Option<String>,

    /// Value for a `${name}` reference in the configuration, as `name=value`.
    #[arg(long = "property", short = 'p', global = true, value_parser = parse_property)]
    properties: Vec<(String, String)>,

    /// Only process files matching this glob.
    #[arg(long, short = 'r', global = true)]
    glob: Option<String>,

    /// Process at most this many files.
    #[arg(long, short = 'l', global = true)]
    limit: Option<usize>,

    /// Skip a configured rule. Can be repeated.
    #[arg(long, global = true)]
    exclude: Vec<String>,

    /// Never touch files matching this glob. Can be repeated.
    #[arg(long, global = true)]
    exclude_path: Vec<String>,

    /// Pass ceiling for the fixpoint loop.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_PASSES)]
    max_passes: usize,

    /// Print a JSON report instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Log level, used when TUGSTYLE_LOG is not set.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Log line format.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,
}

/// Parse a property in `name=value` format.
fn parse_property(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("invalid property '{}', expected 'name=value'", s)),
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fix files in place.
    Fix {
        /// Files or directories to process (default: current directory).
        paths: Vec<PathBuf>,
        /// Compute fixes without writing them.
        #[arg(long)]
        dry_run: bool,
    },
    /// Report files that would change. Nothing is written.
    Check {
        /// Files or directories to process (default: current directory).
        paths: Vec<PathBuf>,
    },
    /// List the rules tugstyle can fix.
    Rules,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level, cli.global.log_format);

    let json = cli.global.json;
    match execute(cli) {
        Ok(code) => code,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            if json {
                let _ = emit_response(&ErrorResponse::from_error(&err), &mut io::stdout());
                let _ = io::stdout().flush();
            } else {
                eprintln!("tugstyle: {err}");
            }
            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize the tracing subscriber. `TUGSTYLE_LOG` overrides `--log-level`.
fn init_tracing(level: LogLevel, format: LogFormat) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("TUGSTYLE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn execute(cli: Cli) -> Result<ExitCode, TugstyleError> {
    match cli.command {
        Command::Rules => {
            execute_rules(&cli.global)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Fix { paths, dry_run } => {
            let report = execute_run(&cli.global, paths, dry_run)?;
            print_report(&cli.global, &report, if dry_run { "would fix" } else { "fixed" })?;
            Ok(exit_code(&report, false))
        }
        Command::Check { paths } => {
            let report = execute_run(&cli.global, paths, true)?;
            print_report(&cli.global, &report, "would fix")?;
            Ok(exit_code(&report, true))
        }
    }
}

/// Failed files give the apply error code. In `check` mode files that would
/// change give 1.
fn exit_code(report: &RunReport, check: bool) -> ExitCode {
    if report.summary.failed > 0 {
        return ExitCode::from(OutputErrorCode::ApplyError.code());
    }
    if check && report.summary.fixed > 0 {
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn load_config(global: &GlobalArgs) -> Result<CheckstyleConfig, TugstyleError> {
    let properties: Properties = global.properties.iter().cloned().collect();
    match (&global.config, &global.inline_config) {
        (Some(path), _) => Ok(CheckstyleConfig::load(path, &properties)?),
        (None, Some(xml)) => Ok(CheckstyleConfig::parse(xml, &properties)?),
        (None, None) => Err(TugstyleError::invalid_args(
            "no configuration: pass --config or --inline-config",
        )),
    }
}

fn execute_run(
    global: &GlobalArgs,
    paths: Vec<PathBuf>,
    dry_run: bool,
) -> Result<RunReport, TugstyleError> {
    let config = load_config(global)?;
    let registry = RuleRegistry::from_config(&config, global.exclude.as_slice());
    if registry.is_empty() {
        return Err(TugstyleError::invalid_args(
            "the configuration enables no rule that tugstyle can fix",
        ));
    }
    debug!(rules = ?registry.names().collect::<Vec<_>>(), "configured rules");

    let suppressions = config.suppressions.with_excluded_paths(global.exclude_path.as_slice())?;
    let roots = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    };
    let discovery = DiscoveryOptions {
        glob: global.glob.clone(),
        limit: global.limit,
        ..DiscoveryOptions::default()
    };
    let files = discover_java_files(&roots, &discovery)?;

    let options = FixOptions {
        registry,
        suppressions,
        scheduler: Scheduler::new(global.max_passes),
        dry_run,
    };
    Ok(runner::run(&files, &options))
}

fn print_report(global: &GlobalArgs, report: &RunReport, verb: &str) -> Result<(), TugstyleError> {
    let mut stdout = io::stdout();
    let written = if global.json {
        emit_response(report, &mut stdout)
    } else {
        print_text(report, verb, &mut stdout)
    };
    written.map_err(|e| TugstyleError::internal(format!("failed to write report: {e}")))
}

fn print_text(report: &RunReport, verb: &str, out: &mut impl Write) -> io::Result<()> {
    for file in report.changed_files() {
        writeln!(out, "{verb} {} ({})", file.path, file.changed_rules.join(", "))?;
    }
    for file in report.files.iter().filter(|f| f.error.is_some()) {
        writeln!(
            out,
            "failed {}: {}",
            file.path,
            file.error.as_deref().unwrap_or_default()
        )?;
    }
    let s = &report.summary;
    writeln!(
        out,
        "{} files: {} {verb}, {} unchanged, {} suppressed, {} failed",
        s.files, s.fixed, s.unchanged, s.suppressed, s.failed
    )
}

fn execute_rules(global: &GlobalArgs) -> Result<(), TugstyleError> {
    let mut names = KNOWN_RULES.to_vec();
    names.sort_unstable();
    let mut stdout = io::stdout();
    let written = if global.json {
        emit_response(&names, &mut stdout)
    } else {
        names.iter().try_for_each(|name| writeln!(stdout, "{name}"))
    };
    written.map_err(|e| TugstyleError::internal(format!("failed to write rule list: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fix_with_globals() {
        let cli = Cli::try_parse_from([
            "tugstyle",
            "--config",
            "checkstyle.xml",
            "--exclude",
            "HiddenField",
            "--exclude",
            "FinalClass",
            "-p",
            "basedir=/src",
            "fix",
            "--dry-run",
            "src",
            "test",
        ])
        .unwrap();
        assert_eq!(cli.global.config, Some(PathBuf::from("checkstyle.xml")));
        assert_eq!(cli.global.exclude, ["HiddenField", "FinalClass"]);
        assert_eq!(
            cli.global.properties,
            [("basedir".to_string(), "/src".to_string())]
        );
        assert_eq!(cli.global.max_passes, DEFAULT_MAX_PASSES);
        match cli.command {
            Command::Fix { paths, dry_run } => {
                assert!(dry_run);
                assert_eq!(paths, [PathBuf::from("src"), PathBuf::from("test")]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_globals_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tugstyle", "check", "-r", "**/*Test.java", "-l", "5", "--json",
        ])
        .unwrap();
        assert_eq!(cli.global.glob.as_deref(), Some("**/*Test.java"));
        assert_eq!(cli.global.limit, Some(5));
        assert!(cli.global.json);
        assert!(matches!(cli.command, Command::Check { .. }));
    }

    #[test]
    fn test_config_and_inline_config_conflict() {
        let result = Cli::try_parse_from([
            "tugstyle",
            "-f",
            "a.xml",
            "-c",
            "<module name=\"Checker\"/>",
            "rules",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_property() {
        assert_eq!(
            parse_property("a=b=c"),
            Ok(("a".to_string(), "b=c".to_string()))
        );
        assert!(parse_property("novalue").is_err());
        assert!(parse_property("=x").is_err());
    }

    #[test]
    fn test_missing_config_is_invalid_arguments() {
        let cli = Cli::try_parse_from(["tugstyle", "fix"]).unwrap();
        let err = execute(cli).unwrap_err();
        assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
    }
}

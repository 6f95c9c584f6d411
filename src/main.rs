//! CLI tool to check and fix dot placement in JavaScript files.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dotloc::{Config, Diagnostic, DotPosition, fix_source, lint_source};

#[derive(Debug, Parser)]
#[command(name = "dotloc", version, about = "Check where member-access dots are placed")]
struct Cli {
    /// Log more (`-v` for debug, `-vv` for trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report misplaced dots, optionally fixing them in place.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Files to check.
    #[arg(required = true, value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Apply fixes and write the files back.
    #[arg(long)]
    fix: bool,

    /// Path to a `dotloc.toml` configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the configured dot position.
    #[arg(long, value_enum)]
    dot_location: Option<DotLocationArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DotLocationArg {
    Object,
    Property,
}

impl From<DotLocationArg> for DotPosition {
    fn from(arg: DotLocationArg) -> Self {
        match arg {
            DotLocationArg::Object => Self::Object,
            DotLocationArg::Property => Self::Property,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitStatus {
    /// No diagnostics remain.
    Success,
    /// At least one diagnostic remains.
    Failure,
    /// A file or the configuration could not be processed.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => Self::SUCCESS,
            ExitStatus::Failure => Self::from(1),
            ExitStatus::Error => Self::from(2),
        }
    }
}

struct FileReport {
    diagnostics: Vec<Diagnostic>,
    fixed: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(status) => status.into(),
        Err(err) => {
            // writeln instead of eprintln so a closed stderr doesn't panic.
            let mut stderr = io::stderr().lock();
            writeln!(stderr, "dotloc failed").ok();
            for cause in err.chain() {
                writeln!(stderr, "  Cause: {cause}").ok();
            }
            ExitStatus::Error.into()
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<ExitStatus> {
    match cli.command {
        Command::Check(args) => check(&args),
    }
}

fn check(args: &CheckArgs) -> Result<ExitStatus> {
    let mut config = match &args.config {
        Some(path) => Config::load(path).context("invalid configuration")?,
        None => Config::default(),
    };
    if let Some(position) = args.dot_location {
        config = config.with_dot_location(position.into());
    }
    debug!(?config, files = args.files.len(), fix = args.fix, "checking");

    let results: Vec<(&Path, Result<FileReport>)> = args
        .files
        .par_iter()
        .map(|path| (path.as_path(), check_file(path, &config, args.fix)))
        .collect();

    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    let mut remaining = 0;
    let mut fixed = 0;
    let mut failed = 0;

    for (path, result) in results {
        match result {
            Ok(report) => {
                fixed += report.fixed;
                remaining += report.diagnostics.len();
                for diagnostic in &report.diagnostics {
                    print_diagnostic(&mut stdout, path, diagnostic)?;
                }
            }
            Err(err) => {
                failed += 1;
                writeln!(stderr, "{}: {err:#}", "error".red().bold()).ok();
            }
        }
    }

    if fixed > 0 {
        writeln!(stdout, "Fixed {fixed} issue(s).")?;
    }
    if remaining > 0 {
        writeln!(stdout, "Found {remaining} issue(s).")?;
    } else if failed == 0 {
        writeln!(stdout, "{}", "All checks passed!".green())?;
    }

    Ok(if failed > 0 {
        ExitStatus::Error
    } else if remaining > 0 {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    })
}

fn check_file(path: &Path, config: &Config, fix: bool) -> Result<FileReport> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    if !fix {
        let diagnostics = lint_source(&source, config)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        return Ok(FileReport {
            diagnostics,
            fixed: 0,
        });
    }

    let report = fix_source(&source, config)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    if report.fixed > 0 {
        fs::write(path, &report.output)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), fixed = report.fixed, "wrote fixes");
    }
    Ok(FileReport {
        diagnostics: report.remaining,
        fixed: report.fixed,
    })
}

fn print_diagnostic(out: &mut impl Write, path: &Path, diagnostic: &Diagnostic) -> io::Result<()> {
    let start = diagnostic.location.start;
    writeln!(
        out,
        "{}:{}:{}: {} {}",
        path.display().to_string().bold(),
        start.line,
        start.column,
        diagnostic.rule.red(),
        diagnostic.message()
    )
}

/// go-groups:
/// Rewrites the `import ( ... )` blocks of Go source files so that the
/// standard library comes first and every external package root gets its
/// own blank-line separated group, each sorted. Everything outside the
/// import blocks is left byte for byte as it was, then gofmt tidies up.
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use go_groups::core::engine::OutputMode;
use go_groups::core::version;
use go_groups::utils::{self, PathError, RunOptions};

const EXIT_BAD_FLAGS: u8 = 1;
const EXIT_BAD_STDIN: u8 = 2;
const EXIT_INTERNAL_ERROR: u8 = 3;

#[derive(Parser)]
#[command(name = "go-groups")]
#[command(about = "Groups and sorts the imports of Go source files")]
#[command(disable_version_flag = true)]
struct Cli {
    /// List files whose formatting differs
    #[arg(short = 'l')]
    list: bool,

    /// Write result to (source) file instead of stdout
    #[arg(short = 'w')]
    write: bool,

    /// Display diffs instead of rewriting files
    #[arg(short = 'd')]
    diff: bool,

    /// Display the version of go-groups
    #[arg(short = 'v')]
    version: bool,

    /// Do not run gofmt over rewritten files
    #[arg(long = "no-gofmt")]
    no_gofmt: bool,

    /// Also process generated files
    #[arg(short = 'g', long = "generated")]
    generated: bool,

    /// Settings file to use instead of a discovered .go-groups.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Files or directories to process; stdin when omitted
    paths: Vec<PathBuf>,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            return ExitCode::from(EXIT_BAD_FLAGS);
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
    };
    init_tracing(cli.verbose);

    if cli.version {
        version::run();
        return ExitCode::SUCCESS;
    }

    let options = RunOptions {
        mode: OutputMode {
            list: cli.list,
            write: cli.write,
            diff: cli.diff,
        },
        no_gofmt: cli.no_gofmt,
        include_generated: cli.generated,
        config: cli.config,
    };

    if cli.paths.is_empty() {
        if cli.write {
            utils::report_error("cannot use -w with standard input");
            return ExitCode::from(EXIT_BAD_STDIN);
        }
        if let Err(err) = utils::run_stdin(&options) {
            utils::report_error(&format!("failed to parse stdin: {err:#}"));
            return ExitCode::from(EXIT_BAD_FLAGS);
        }
        return ExitCode::SUCCESS;
    }

    match utils::run_paths(&options, &cli.paths) {
        Ok(()) => ExitCode::SUCCESS,
        Err(PathError::Missing(path, err)) => {
            utils::report_error(&format!("no files matching '{}': {err}", path.display()));
            ExitCode::from(EXIT_BAD_FLAGS)
        }
        Err(PathError::Internal(err)) => {
            utils::report_error(&format!("{err:#}"));
            ExitCode::from(EXIT_INTERNAL_ERROR)
        }
    }
}

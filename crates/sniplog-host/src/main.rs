mod host;
mod logging;
mod message;
mod sink;

use std::io;
use std::path::PathBuf;

use clap::Parser;

use crate::host::{Host, HostConfig};
use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "sniplog-host",
    version,
    about = "Native messaging host that appends browser text snippets to a log file"
)]
struct Cli {
    /// Path of the append-only snippet log.
    #[arg(
        long,
        value_name = "PATH",
        env = "SNIPLOG_LOG_FILE",
        default_value = "/tmp/sniplog.log"
    )]
    log_file: PathBuf,

    /// Maximum accepted frame payload in bytes.
    #[arg(long, value_name = "BYTES")]
    max_payload: Option<usize>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LogLevel,

    /// Arguments the browser appends when launching the host (extension
    /// origin, and a parent window handle on some platforms). Accepted so
    /// launch never fails argument parsing; otherwise unused.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    browser_args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    tracing::info!(log_file = %cli.log_file.display(), "sniplog native host started");
    if !cli.browser_args.is_empty() {
        tracing::debug!(args = ?cli.browser_args, "browser launch arguments");
    }

    let mut config = HostConfig::new(cli.log_file);
    if let Some(max_payload) = cli.max_payload {
        config.max_payload_size = max_payload;
    }

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    Host::new(stdin, stdout, config).run();

    // run() returns only on clean end-of-stream; every runtime fault is
    // absorbed inside the loop, so the sole exit path is status 0.
}

use std::{fs::File, path::PathBuf, process::ExitCode, sync::{Arc, Mutex}, time::Duration};

use chrono::{DateTime, Local};
use clap::{ArgAction, Parser};
use harness::{
    config::{Mode, RunConfig},
    error::{ConfigError, RunLogError},
    run_log,
};
use mc_client::Client;
use tracing_subscriber::fmt::time::ChronoLocal;

#[derive(Parser)]
#[command(author, version, about, long_about = None, disable_help_flag = true)]
struct Cli {
    /// hostname
    #[arg(short = 'h', long, default_value = "127.0.0.1")]
    host: String,

    /// port
    #[arg(short, long, default_value_t = 11211)]
    port: u16,

    /// concurrency level
    #[arg(short, long, default_value_t = 10)]
    concurrency: usize,

    /// test count
    #[arg(short = 'n', long, default_value_t = 10_000)]
    count: usize,

    /// test method: push or pop
    #[arg(short, long, default_value = "push")]
    mode: String,

    /// topic to test
    #[arg(short, long, default_value = "StressTestTool")]
    topic: String,

    /// line to test
    #[arg(short, long, default_value = "Line")]
    line: String,

    /// per-operation deadline in milliseconds; operations wait forever when unset
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// directory the run log is written to
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,

    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    fn into_config(self) -> Result<RunConfig, ConfigError> {
        let mode: Mode = self.mode.parse()?;
        RunConfig {
            host: self.host,
            port: self.port,
            concurrency: self.concurrency,
            count: self.count,
            mode,
            topic: self.topic,
            line: self.line,
            op_timeout: self.timeout_ms.map(Duration::from_millis),
        }
        .validate()
    }
}

/// Failures that end the process before any traffic is sent.
enum StartupError {
    Config(ConfigError),
    RunLog(RunLogError),
}

struct Startup {
    config: RunConfig,
    log_file: File,
    log_name: String,
}

/// Validates the flags, then creates the run log. Nothing touches the log
/// directory unless the configuration is valid.
fn start(cli: Cli, now: &DateTime<Local>) -> Result<Startup, StartupError> {
    let log_dir = cli.log_dir.clone();
    let config = cli.into_config().map_err(StartupError::Config)?;

    let log_name = run_log::file_name(config.mode, now, config.concurrency, config.count);
    let log_file = run_log::open(&log_dir, &log_name).map_err(StartupError::RunLog)?;
    Ok(Startup {
        config,
        log_file,
        log_name,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let Startup {
        config,
        log_file,
        log_name,
    } = match start(cli, &Local::now()) {
        Ok(startup) => startup,
        Err(StartupError::Config(e)) => {
            println!("{}", e);
            return ExitCode::FAILURE;
        }
        Err(StartupError::RunLog(e)) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_timer(ChronoLocal::new("%Y-%m-%dT%H:%M:%S%.6f%:z".to_string()))
        .with_ansi(false)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    let config = Arc::new(config);
    let addr = config.address();
    let op_timeout = config.op_timeout;
    tracing::info!("Starting {} run against {} as {}", config.mode, addr, log_name);

    let report = harness::run(config, || Client::new(addr.clone()).with_timeout(op_timeout)).await;
    report.emit();

    ExitCode::SUCCESS
}

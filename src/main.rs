use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use core_runtime::config::{FixerConfig, DEFAULT_HANDOFF_CAPACITY, DEFAULT_TOOL_NAME};
use core_runtime::events::{CoreEvent, RunOutcome, DEFAULT_EVENT_BUFFER_SIZE};
use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
use core_service::bootstrap_desktop;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "takeout-fixer",
    version,
    about = "Copy a Google Photos takeout and restore capture dates from its JSON sidecars"
)]
struct Cli {
    /// Root of the extracted takeout archive
    #[arg(long, env = "TAKEOUT_FIXER_INPUT")]
    input: PathBuf,

    /// Root of the mirrored output tree
    #[arg(long, env = "TAKEOUT_FIXER_OUTPUT")]
    output: PathBuf,

    /// Only scan and report what would be processed
    #[arg(long, default_value_t = false)]
    scan_only: bool,

    /// Keep targets that already exist in the output tree
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,

    /// Metadata tool looked up on PATH
    #[arg(long, default_value = DEFAULT_TOOL_NAME)]
    tool: String,

    /// Kill a single tool invocation after this many seconds
    #[arg(long)]
    tool_timeout_secs: Option<u64>,

    /// Capacity of the copy to metadata queue
    #[arg(long, default_value_t = DEFAULT_HANDOFF_CAPACITY)]
    queue_capacity: usize,

    /// Progress output
    #[arg(long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// pretty, json or compact
    #[arg(long, env = "TAKEOUT_FIXER_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// trace, debug, info, warn or error
    #[arg(long, env = "TAKEOUT_FIXER_LOG_LEVEL", default_value = "warn")]
    log_level: LogLevel,
}

impl Cli {
    fn fixer_config(&self) -> Result<FixerConfig> {
        let mut builder = FixerConfig::builder()
            .input_root(&self.input)
            .output_root(&self.output)
            .scan_only(self.scan_only)
            .overwrite_existing(!self.no_overwrite)
            .handoff_capacity(self.queue_capacity)
            .tool_name(&self.tool);
        if let Some(secs) = self.tool_timeout_secs {
            builder = builder.tool_timeout(Duration::from_secs(secs));
        }
        builder.build().context("invalid run configuration")
    }

    fn logging_config(&self) -> LoggingConfig {
        let config = LoggingConfig::default().with_level(self.log_level);
        match self.log_format {
            Some(format) => config.with_format(format),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.logging_config()).context("failed to initialise logging")?;

    let config = cli.fixer_config()?;
    let service = bootstrap_desktop(DEFAULT_EVENT_BUFFER_SIZE)?;
    let mut events = service.subscribe();

    let run = service.run(&config);
    tokio::pin!(run);
    let mut cancelling = false;

    let result = loop {
        tokio::select! {
            result = &mut run => break result,
            event = events.recv() => match event {
                Ok(event) => print_event(&event, cli.format)?,
                Err(RecvError::Lagged(n)) => {
                    warn!(skipped = n, "Progress output fell behind");
                    eprintln!("({} progress messages dropped, see the tally at the end)", n);
                }
                Err(RecvError::Closed) => {}
            },
            signal = tokio::signal::ctrl_c(), if !cancelling => {
                signal.context("failed to listen for Ctrl-C")?;
                cancelling = true;
                service.cancel().await;
            }
        }
    };

    for event in events.drain() {
        print_event(&event, cli.format)?;
    }

    let report = result?;
    info!(
        copied = report.copied,
        updated = report.updated,
        failures = report.failures(),
        elapsed_ms = report.elapsed().num_milliseconds(),
        "Run finished"
    );
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
        OutputFormat::Human if report.failures() > 0 => eprintln!("{}", report),
        OutputFormat::Human => println!("{}", report),
    }

    Ok(match report.outcome {
        RunOutcome::Completed | RunOutcome::ScanOnly => ExitCode::SUCCESS,
        RunOutcome::Cancelled => ExitCode::from(130),
        RunOutcome::Aborted => ExitCode::FAILURE,
    })
}

fn print_event(event: &CoreEvent, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(event)?),
        OutputFormat::Human => match event {
            CoreEvent::Progress(p) if p.is_error => {
                eprintln!("[{} {}/{}] {}", p.phase, p.done, p.total, p.message)
            }
            CoreEvent::Progress(p) => {
                println!("[{} {}/{}] {}", p.phase, p.done, p.total, p.message)
            }
            CoreEvent::Finished(f) => println!("{}", f.message),
        },
    }
    Ok(())
}

// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use page2sheet::{
    summarize, AppError, CaptureConfig, CaptureOrchestrator, CommandCredentialProvider,
    CommandLineInput, CredentialProvider, CycleOutcome, EnvCredentialProvider, EventReader,
    FallbackCredentialProvider, FanoutSink, HttpPageExtractor, LogSink, RecordingSink,
    SheetsHttpClient, TabEvent, ValidatedConfig,
};
use std::fs;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::task::JoinHandle;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("page2sheet.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "[{l}] {m}{n}"
    };

    // stdout is reserved for the run summary
    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)
        .with_context(|| format!("opening log file {}", log_file_path.display()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config).context("installing logger")?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Wires the HTTP collaborators into an orchestrator. Diagnostics go to the
/// log and are also kept in `recorded` for the end-of-run report.
fn build_orchestrator(
    cli: &CommandLineInput,
    config: CaptureConfig,
    validated: &ValidatedConfig,
    recorded: Arc<RecordingSink>,
) -> Result<CaptureOrchestrator, AppError> {
    let store = SheetsHttpClient::from_config(validated, &config.user_agent)?;

    let page_client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()?;
    let extractor = HttpPageExtractor::new(page_client, config.max_content_length);

    let credentials = FallbackCredentialProvider::new(vec![
        Arc::new(EnvCredentialProvider::new()) as Arc<dyn CredentialProvider>,
        Arc::new(CommandCredentialProvider::new(&cli.token_command)?),
    ]);

    let diagnostics = FanoutSink::new()
        .with_sink(Arc::new(LogSink))
        .with_sink(recorded);

    Ok(CaptureOrchestrator::new(
        Arc::new(config),
        Arc::new(extractor),
        Arc::new(credentials),
        Arc::new(store),
    )
    .with_diagnostics(Arc::new(diagnostics)))
}

fn spawn_cycle(
    orchestrator: &Arc<CaptureOrchestrator>,
    event: TabEvent,
) -> JoinHandle<CycleOutcome> {
    let orchestrator = Arc::clone(orchestrator);
    tokio::spawn(async move { orchestrator.handle_event(&event).await })
}

/// Starts one cycle per event as events arrive, then waits for all of them.
/// Unreadable input ends reading early but never abandons started cycles.
async fn run_captures(
    cli: &CommandLineInput,
    orchestrator: Arc<CaptureOrchestrator>,
) -> Vec<CycleOutcome> {
    let mut handles = Vec::new();

    if let Some(url) = &cli.url {
        handles.push(spawn_cycle(&orchestrator, TabEvent::complete(0, url.as_str())));
    } else {
        let mut reader = EventReader::new(BufReader::new(tokio::io::stdin()));
        let read = reader
            .forward_events(|event| handles.push(spawn_cycle(&orchestrator, event)))
            .await;
        log::debug!("Read {} event(s) from stdin", read);
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for result in futures::future::join_all(handles).await {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            // A panicking cycle takes down its own task only.
            Err(e) => log::error!("Capture task ended abnormally: {}", e),
        }
    }
    outcomes
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).map_err(AppError::from)?;

    let config = CaptureConfig::resolve(&cli)?;
    let validated = config.validate().map_err(AppError::from)?;
    let view_url = config.spreadsheet_view_url();

    let recorded = Arc::new(RecordingSink::new());
    let orchestrator = Arc::new(build_orchestrator(
        &cli,
        config,
        &validated,
        Arc::clone(&recorded),
    )?);
    let outcomes = run_captures(&cli, orchestrator).await;

    let summary = summarize(&outcomes);
    println!("{}", summary);

    let failures = recorded.failure_count();
    if failures > 0 {
        println!("⚠️  {} step(s) reported problems; see the log for details", failures);
    }
    let rejected = recorded
        .events()
        .iter()
        .filter(|event| event.token_rejected())
        .count();
    if rejected > 0 {
        println!(
            "🔑 Google rejected the access token {} time(s); check its scopes and expiry",
            rejected
        );
    }
    if let Some(url) = view_url {
        println!("📄 Spreadsheet: {}", url);
    }

    Ok(())
}

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{BufWriter, Stdout};
use tokio_util::sync::CancellationToken;

use tagstream::config::DEFAULT_SETTINGS_FILE;
use tagstream::prelude::*;

const USAGE: &str = "Usage: tagstream [settings.json] [--replay <capture.jsonl>]";

#[tokio::main]
async fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    CliApp::new("tagstream")
        .with_signal_snapshot(true)
        .run(|stdout, shutdown| run_analyser(args, stdout, shutdown))
        .await
}

/// Parsed command line
#[derive(Debug, PartialEq, Eq)]
struct CliArgs {
    settings: PathBuf,
    replay: Option<PathBuf>,
}

/// Parse and validate command-line arguments
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, AppError> {
    let mut settings = None;
    let mut replay = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--replay" => {
                let path = args
                    .next()
                    .ok_or_else(|| AppError::InvalidArguments(USAGE.to_string()))?;
                replay = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err(AppError::InvalidArguments(USAGE.to_string())),
            flag if flag.starts_with("--") => {
                return Err(AppError::InvalidArguments(format!("Unknown option {flag}. {USAGE}")));
            }
            _ if settings.is_none() => settings = Some(PathBuf::from(arg)),
            _ => return Err(AppError::InvalidArguments(USAGE.to_string())),
        }
    }

    Ok(CliArgs {
        settings: settings.unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE)),
        replay,
    })
}

/// Main application logic - ingests the stream and writes a final summary
async fn run_analyser(
    args: CliArgs,
    mut stdout: BufWriter<Stdout>,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let config = AppConfig::load(&args.settings)?;
    tagstream::logging::init(config.log_file.as_deref())?;

    let statistics = Arc::new(ConcurrentTweetStatistics::new());

    let results = match &args.replay {
        Some(capture) => {
            let settings = config.replay_settings(capture);
            drive(statistics.clone(), ReplayTransport::new(capture), settings, &shutdown).await
        }
        None => {
            let settings = config.stream_settings()?;
            let transport = HttpTransport::new(&config.tweet_fields)?;
            drive(statistics.clone(), transport, settings, &shutdown).await
        }
    };

    write_summary(&statistics.snapshot(config.top_tags), &mut stdout).await?;

    match results.into_last_end() {
        Some(SessionEnd::Failed(e)) => Err(e.into()),
        _ => Ok(()),
    }
}

/// Run one processor to completion or until shutdown
async fn drive<T>(
    statistics: Arc<ConcurrentTweetStatistics>,
    transport: T,
    settings: StreamSettings,
    shutdown: &CancellationToken,
) -> ProcessorResults
where
    T: Transport + 'static,
{
    let mut processor = StreamProcessor::new(statistics, transport, SkipErrors)
        .with_settings(settings)
        .with_shutdown(shutdown);

    processor.start();
    processor.join().await
}

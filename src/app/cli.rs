use std::future::Future;

use tokio::io::{BufWriter, Stdout};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::error::AppError;

/// Reusable CLI application runner that handles:
/// - Signal handling (SIGINT, SIGTERM, SIGHUP)
/// - Stdout buffering
/// - Exit codes (0 = success, 1 = error, 130 = SIGINT, 143 = SIGTERM, 129 = SIGHUP)
/// - Graceful shutdown through a cancellation token
pub struct CliApp {
    name: String,
    graceful_shutdown: bool,
}

impl CliApp {
    /// Create a new CLI application runner
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            graceful_shutdown: false,
        }
    }

    /// On a signal, cancel the shutdown token and let the main function
    /// finish (e.g. write a final summary) before exiting
    pub fn with_signal_snapshot(mut self, enabled: bool) -> Self {
        self.graceful_shutdown = enabled;
        self
    }

    /// Run the CLI application with signal handling and resource cleanup.
    ///
    /// The main function gets a buffered stdout writer and a token that is
    /// cancelled when a signal arrives. It is responsible for flushing.
    ///
    /// This function never returns - it calls std::process::exit with the appropriate code
    pub async fn run<F, Fut>(self, main_fn: F) -> !
    where
        F: FnOnce(BufWriter<Stdout>, CancellationToken) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        info!(app = %self.name, "Starting");

        let writer = BufWriter::new(tokio::io::stdout());
        let shutdown = CancellationToken::new();

        let main_fut = main_fn(writer, shutdown.clone());
        tokio::pin!(main_fut);
        let signal_fut = wait_for_signal();
        tokio::pin!(signal_fut);

        let code = tokio::select! {
            result = &mut main_fut => exit_code(result),
            signal_code = &mut signal_fut => {
                if self.graceful_shutdown {
                    eprintln!("Interrupted, writing final summary...");
                    shutdown.cancel();
                    if let Err(e) = main_fut.await {
                        eprintln!("Error: {}", e);
                    }
                }
                signal_code
            }
        };

        std::process::exit(code);
    }
}

fn exit_code(result: Result<(), AppError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!(error = %e, "Exiting with error");
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Wait for any Unix signal (SIGINT, SIGTERM, SIGHUP) or Ctrl+C.
/// Returns the exit code to use (130 for SIGINT, 143 for SIGTERM, etc.)
///
/// If the handlers cannot be installed this never resolves.
async fn wait_for_signal() -> i32 {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let handlers = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
            signal(SignalKind::hangup()),
        );
        let (mut sigterm, mut sigint, mut sighup) = match handlers {
            (Ok(term), Ok(int), Ok(hup)) => (term, int, hup),
            _ => {
                warn!("Failed to install signal handlers");
                return std::future::pending().await;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                eprintln!("Received SIGTERM");
                143 // 128 + 15
            }
            _ = sigint.recv() => {
                eprintln!("Received SIGINT");
                130 // 128 + 2
            }
            _ = sighup.recv() => {
                eprintln!("Received SIGHUP");
                129 // 128 + 1
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            return std::future::pending().await;
        }
        eprintln!("Received Ctrl+C");
        130
    }
}

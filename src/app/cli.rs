use std::future::Future;

use tokio::io::{BufWriter, Stdout};
use tracing::Level;

use super::error::AppError;

/// Environment variable holding the log level (`error`, `warn`, `info`, `debug`, `trace`)
pub const LOG_ENV: &str = "FANOUT_LOG";

/// Output handles passed to the application's main function
pub struct Writers {
    pub stdout: BufWriter<Stdout>,
}

impl Writers {
    fn new() -> Self {
        Self {
            stdout: BufWriter::new(tokio::io::stdout()),
        }
    }
}

/// Reusable CLI application runner that handles:
/// - Logging setup (stderr, level from `FANOUT_LOG`)
/// - Argument parsing
/// - Signal handling (SIGINT, SIGTERM, SIGHUP)
/// - Exit codes (0 = success, 1 = error, 2 = bad arguments, 130 = SIGINT, 143 = SIGTERM)
pub struct CliApp {
    name: String,
    default_level: Level,
}

impl CliApp {
    /// Create a new CLI application runner
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            default_level: Level::WARN,
        }
    }

    /// Log level used when `FANOUT_LOG` is unset or unparseable
    pub fn with_default_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Attach the argument parser
    pub fn with_args<A, P>(self, parse: P) -> CliRunner<P>
    where
        P: FnOnce(Vec<String>) -> Result<A, AppError>,
    {
        CliRunner { app: self, parse }
    }

    fn log_level(&self) -> Level {
        std::env::var(LOG_ENV)
            .ok()
            .and_then(|value| value.trim().parse::<Level>().ok())
            .unwrap_or(self.default_level)
    }

    fn init_tracing(&self) {
        // A subscriber may already be installed (e.g. by a test harness)
        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(self.log_level())
            .with_target(false)
            .try_init();
    }

    /// Race the main future against termination signals and map the result to an exit code
    async fn run_main<A, F, Fut>(&self, main_fn: F, args: A) -> i32
    where
        F: FnOnce(Writers, A) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        tokio::select! {
            result = main_fn(Writers::new(), args) => {
                match result {
                    Ok(()) => 0,
                    Err(e) => {
                        eprintln!("{}: {}", self.name, e);
                        1
                    }
                }
            }
            signal_code = wait_for_signal() => signal_code,
        }
    }
}

/// A [`CliApp`] with its argument parser attached
pub struct CliRunner<P> {
    app: CliApp,
    parse: P,
}

impl<P> CliRunner<P> {
    /// Run the CLI application on a fresh multi-threaded tokio runtime
    ///
    /// This function never returns - it calls std::process::exit with the appropriate code
    pub fn run<A, F, Fut>(self, main_fn: F) -> !
    where
        P: FnOnce(Vec<String>) -> Result<A, AppError>,
        F: FnOnce(Writers, A) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        let CliRunner { app, parse } = self;
        app.init_tracing();

        let args = match parse(std::env::args().collect()) {
            Ok(args) => args,
            Err(e) => {
                eprintln!("{}: {}", app.name, e);
                std::process::exit(2);
            }
        };

        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                eprintln!("{}: failed to start runtime: {}", app.name, e);
                std::process::exit(1);
            }
        };

        let code = runtime.block_on(app.run_main(main_fn, args));
        std::process::exit(code);
    }
}

/// Wait for any Unix signal (SIGINT, SIGTERM, SIGHUP) or Ctrl+C
/// Returns the exit code to use (130 for SIGINT, 143 for SIGTERM, etc.)
///
/// A handler that cannot be installed is logged and never fires.
async fn wait_for_signal() -> i32 {
    #[cfg(unix)]
    {
        use tokio::signal::unix::SignalKind;

        let mut sigterm = install_handler(SignalKind::terminate(), "SIGTERM");
        let mut sigint = install_handler(SignalKind::interrupt(), "SIGINT");
        let mut sighup = install_handler(SignalKind::hangup(), "SIGHUP");

        tokio::select! {
            _ = recv_or_pending(&mut sigterm) => {
                tracing::warn!("Received SIGTERM");
                143 // 128 + 15
            }
            _ = recv_or_pending(&mut sigint) => {
                tracing::warn!("Received SIGINT");
                130 // 128 + 2
            }
            _ = recv_or_pending(&mut sighup) => {
                tracing::warn!("Received SIGHUP");
                129 // 128 + 1
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to setup Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        tracing::warn!("Received Ctrl+C");
        130
    }
}

#[cfg(unix)]
fn install_handler(
    kind: tokio::signal::unix::SignalKind,
    name: &str,
) -> Option<tokio::signal::unix::Signal> {
    match tokio::signal::unix::signal(kind) {
        Ok(signal) => Some(signal),
        Err(e) => {
            tracing::error!(signal = name, error = %e, "Failed to setup signal handler");
            None
        }
    }
}

/// Resolve on the next delivery, or never if no handler is installed
#[cfg(unix)]
async fn recv_or_pending(signal: &mut Option<tokio::signal::unix::Signal>) {
    match signal {
        Some(signal) => {
            signal.recv().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_app_new() {
        let app = CliApp::new("test-app");
        assert_eq!(app.name, "test-app");
        assert_eq!(app.default_level, Level::WARN);
    }

    #[test]
    fn cli_app_with_default_level() {
        let app = CliApp::new("test-app").with_default_level(Level::DEBUG);
        assert_eq!(app.default_level, Level::DEBUG);
    }

    #[tokio::test]
    async fn main_result_maps_to_exit_code() {
        let app = CliApp::new("test-app");

        let ok = app.run_main(|_, ()| async { Ok(()) }, ()).await;
        assert_eq!(ok, 0);

        let failed = app
            .run_main(
                |_, ()| async { Err(AppError::InvalidArguments("bad".to_string())) },
                (),
            )
            .await;
        assert_eq!(failed, 1);
    }

    #[tokio::test]
    async fn main_receives_parsed_args() {
        let app = CliApp::new("test-app");

        let code = app
            .run_main(
                |_, count: usize| async move {
                    if count == 3 {
                        Ok(())
                    } else {
                        Err(AppError::InvalidArguments("wrong".to_string()))
                    }
                },
                3,
            )
            .await;
        assert_eq!(code, 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_signal_handler_never_fires() {
        let mut none = None;
        let waited =
            tokio::time::timeout(std::time::Duration::from_millis(20), recv_or_pending(&mut none))
                .await;
        assert!(waited.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn signal_handlers_install() {
        use tokio::signal::unix::SignalKind;

        assert!(install_handler(SignalKind::hangup(), "SIGHUP").is_some());
    }
}

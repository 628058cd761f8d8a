// Logs: console + fichier journalier (logs/microblog.log.YYYY-MM-DD)

use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "microblog.log";

/// Installe le subscriber global. Le guard retourné doit vivre jusqu'à la
/// fin du programme, sinon les dernières lignes du fichier sont perdues.
pub fn init(log_dir: &Path) -> WorkerGuard {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (file_writer, guard) = file_writer(log_dir);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .init();

    tracing::info!(log_dir = %log_dir.display(), "Logging initialized");
    guard
}

/// Writer non bloquant vers un fichier qui tourne chaque jour
pub fn file_writer(log_dir: &Path) -> (NonBlocking, WorkerGuard) {
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    tracing_appender::non_blocking(appender)
}

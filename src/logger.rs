use std::path::Path;
use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, fmt};

static GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
static INIT: OnceLock<()> = OnceLock::new();

/// Initializes tracing once for the whole process, writing to stderr.
/// `RUST_LOG` overrides `default_filter`.
pub fn init_logging(default_filter: &str) {
    INIT.get_or_init(|| {
        let filter = env_filter(default_filter);
        let subscriber = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Like [`init_logging`], but appends plain text to a log file instead.
pub fn init_file_logging<P: AsRef<Path>>(path: P, default_filter: &str) {
    INIT.get_or_init(|| {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }

        let file = match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => file,
            Err(err) => {
                eprintln!("could not open log file {}: {err}", path.display());
                return;
            }
        };

        let (writer, guard) = tracing_appender::non_blocking(file);
        let _ = GUARD.set(guard);

        let subscriber = fmt()
            .with_env_filter(env_filter(default_filter))
            .with_ansi(false)
            .with_target(true)
            .with_writer(writer)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

fn env_filter(default_filter: &str) -> EnvFilter {
    if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(default_filter).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

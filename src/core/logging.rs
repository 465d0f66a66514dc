use crate::shared::paths::{ensure_dir, get_log_dir};
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Targets that get a log file of their own. Everything else goes to `system.log`.
const ROUTED_TARGETS: [&str; 1] = ["capture"];

pub struct LoggingGuards {
    _guards: Vec<WorkerGuard>,
}

struct TargetWriter {
    writers: Vec<(&'static str, NonBlocking)>,
    system_writer: NonBlocking,
}

impl TargetWriter {
    fn writer_for(&self, target: &str) -> &NonBlocking {
        self.writers
            .iter()
            .find(|(name, _)| target_matches(target, name))
            .map(|(_, writer)| writer)
            .unwrap_or(&self.system_writer)
    }
}

fn target_matches(target: &str, name: &str) -> bool {
    target == name
        || target
            .strip_prefix(name)
            .is_some_and(|rest| rest.starts_with("::"))
}

impl<'a> MakeWriter<'a> for TargetWriter {
    type Writer = NonBlocking;

    fn make_writer(&'a self) -> Self::Writer {
        self.system_writer.clone()
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        self.writer_for(meta.target()).clone()
    }
}

/// Installs the global subscriber, writing daily-rolled files under the logs directory.
pub fn init_logging() -> LoggingGuards {
    init_logging_in(&get_log_dir())
}

pub fn init_logging_in(log_dir: &Path) -> LoggingGuards {
    if let Err(e) = ensure_dir(log_dir) {
        eprintln!("Failed to create logs directory {:?}: {}", log_dir, e);
    }

    let (writer, guards) = open_writers(log_dir);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false),
    );

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global tracing subscriber: {}", e);
    }

    tracing::info!(target: "system", "Logging initialized at {:?}", log_dir);

    LoggingGuards { _guards: guards }
}

fn open_writers(log_dir: &Path) -> (TargetWriter, Vec<WorkerGuard>) {
    let mut guards = Vec::new();
    let mut writers = Vec::new();

    for target in ROUTED_TARGETS {
        let (non_blocking, guard) = daily_writer(log_dir, &format!("{}.log", target));
        writers.push((target, non_blocking));
        guards.push(guard);
    }

    let (system_writer, system_guard) = daily_writer(log_dir, "system.log");
    guards.push(system_guard);

    let writer = TargetWriter {
        writers,
        system_writer,
    };
    (writer, guards)
}

/// Daily-rolled `log_dir/file_name`, or stderr if the file cannot be opened.
fn daily_writer(log_dir: &Path, file_name: &str) -> (NonBlocking, WorkerGuard) {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(file_name)
        .build(log_dir);

    match appender {
        Ok(appender) => tracing_appender::non_blocking(appender),
        Err(e) => {
            eprintln!("Failed to open {} in {:?}, logging to stderr: {}", file_name, log_dir, e);
            tracing_appender::non_blocking(std::io::stderr())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_matching() {
        assert!(target_matches("capture", "capture"));
        assert!(target_matches("capture::bitmap", "capture"));
        assert!(!target_matches("capturex", "capture"));
        assert!(!target_matches("system", "capture"));
    }

    #[test]
    fn test_writers_fall_back_when_log_dir_is_a_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let not_a_dir = dir.path().join("logs");
        std::fs::write(&not_a_dir, b"plain file").unwrap();

        let (writer, guards) = open_writers(&not_a_dir);

        assert_eq!(writer.writers.len(), ROUTED_TARGETS.len());
        assert_eq!(guards.len(), ROUTED_TARGETS.len() + 1);
        assert!(not_a_dir.is_file());
    }

    #[test]
    fn test_init_survives_unusable_log_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let not_a_dir = dir.path().join("logs");
        std::fs::write(&not_a_dir, b"plain file").unwrap();

        let _guards = init_logging_in(&not_a_dir);

        assert!(not_a_dir.is_file());
    }

    #[test]
    fn test_writers_create_daily_files() {
        let dir = tempfile::TempDir::new().unwrap();

        let (_writer, guards) = open_writers(dir.path());
        drop(guards);

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(names.iter().any(|n| n.starts_with("capture.log")));
        assert!(names.iter().any(|n| n.starts_with("system.log")));
    }
}

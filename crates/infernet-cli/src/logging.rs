//! Tracing subscriber setup.

use anyhow::{Context as _, Result};
use infernet_node::{LogConfig, LogFormat, LogRotation};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber.
///
/// The console layer writes to stderr so that stdout stays reserved for
/// command output. Its filter is `RUST_LOG`, else `--verbose` (debug), else
/// `log.level`. When a log file is configured it receives JSON at
/// `log.file_level` independently of the console, and the returned guard must
/// be held until exit to flush it.
pub fn init_logging(
    config: &LogConfig,
    file: Option<&Path>,
    verbose: bool,
    no_color: bool,
) -> Result<Option<WorkerGuard>> {
    let console_level = if verbose { "debug" } else { config.level.as_str() };
    let console_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(console_level))
        .with_context(|| format!("invalid log level: {console_level}"))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();

    layers.push(match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed(),
        LogFormat::Text => fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(!no_color)
            .with_target(false)
            .with_filter(console_filter)
            .boxed(),
    });

    let guard = match file {
        Some(path) => {
            let file_filter = EnvFilter::try_new(&config.file_level)
                .with_context(|| format!("invalid log file level: {}", config.file_level))?;
            let (writer, guard) = tracing_appender::non_blocking(file_appender(config, path)?);
            layers.push(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(file_filter)
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("logging already initialized")?;

    Ok(guard)
}

/// Rolling appender for `path`, keeping at most `log.max_files` files.
///
/// Rotated files are named `<file name>.<date>`; with rotation `never` the
/// file is written at `path` itself.
fn file_appender(config: &LogConfig, path: &Path) -> Result<RollingFileAppender> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .with_context(|| format!("log path has no file name: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;

    let rotation = match config.rotation {
        LogRotation::Never => Rotation::NEVER,
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
    };

    RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(name.to_string_lossy())
        .max_log_files(config.max_files.max(1))
        .build(dir)
        .with_context(|| format!("cannot open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_unrotated_file_is_written_at_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("node.log");
        let config = LogConfig {
            rotation: LogRotation::Never,
            ..LogConfig::default()
        };

        let mut appender = file_appender(&config, &path).unwrap();
        appender.write_all(b"{\"message\":\"hello\"}\n").unwrap();
        appender.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("hello"));
    }

    #[test]
    fn test_daily_file_uses_name_as_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("node.log");

        let mut appender = file_appender(&LogConfig::default(), &path).unwrap();
        appender.write_all(b"line\n").unwrap();
        appender.flush().unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("node.log."), "{names:?}");
    }
}

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{layer::Identity, prelude::*, EnvFilter};

use crate::config::{LogFormat, LogRotation, LoggingConfig};

/// Initialize logging: stdout plus an optional rolling file appender.
/// A level set in config wins over `RUST_LOG`; the fallback is "info".
pub fn init_with_config(cfg: &LoggingConfig) {
    let filter = match &cfg.level {
        Some(level) => EnvFilter::new(level.as_str()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let file_writer = if cfg.enable_file_logging {
        rolling_file_writer(cfg)
    } else {
        None
    };

    match cfg.format {
        LogFormat::Json => {
            let stdout_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_timer(UtcTime::rfc_3339())
                .with_writer(std::io::stdout);
            let registry = tracing_subscriber::registry().with(filter).with(stdout_layer);
            match file_writer {
                Some(writer) => {
                    let file_layer = tracing_subscriber::fmt::layer()
                        .json()
                        .with_ansi(false)
                        .with_timer(UtcTime::rfc_3339())
                        .with_writer(writer);
                    let _ = registry.with(file_layer).try_init();
                }
                None => {
                    let _ = registry.with(Identity::new()).try_init();
                }
            }
        }
        LogFormat::Text => {
            let stdout_layer = tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_timer(UtcTime::rfc_3339())
                .with_writer(std::io::stdout);
            let registry = tracing_subscriber::registry().with(filter).with(stdout_layer);
            match file_writer {
                Some(writer) => {
                    let file_layer = tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_timer(UtcTime::rfc_3339())
                        .with_writer(writer);
                    let _ = registry.with(file_layer).try_init();
                }
                None => {
                    let _ = registry.with(Identity::new()).try_init();
                }
            }
        }
    }
}

/// Build the non-blocking rolling file writer, or None when the log
/// directory cannot be created.
fn rolling_file_writer(cfg: &LoggingConfig) -> Option<tracing_appender::non_blocking::NonBlocking> {
    let rotation = match cfg.rotation {
        LogRotation::Hourly => tracing_appender::rolling::Rotation::HOURLY,
        LogRotation::Never => tracing_appender::rolling::Rotation::NEVER,
        LogRotation::Daily => tracing_appender::rolling::Rotation::DAILY,
    };

    if let Err(err) = std::fs::create_dir_all(&cfg.dir) {
        eprintln!(
            "Failed to create log directory '{}' ({err}), continuing with stdout logs",
            cfg.dir
        );
        return None;
    }

    let appender =
        tracing_appender::rolling::RollingFileAppender::new(rotation, &cfg.dir, &cfg.filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    // Keep guard alive for process lifetime
    let _leaked: &'static _ = Box::leak(Box::new(guard));

    Some(non_blocking)
}

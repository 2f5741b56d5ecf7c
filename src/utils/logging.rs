use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

pub const CLI_PREFIX: &str = "cli";

/// Modules that log at the requested level. Everything else in the crate only reports warnings.
const LOG_TARGETS: [&str; 4] = ["charts", "session", "storage", "cli"];

const DEFAULT_LEVEL: &str = "debug";

fn log_filter(level: &str) -> EnvFilter {
    let crate_name = env!("CARGO_PKG_NAME").replace('-', "_");
    let targets = LOG_TARGETS
        .iter()
        .map(|target| format!("{crate_name}::{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");
    EnvFilter::new(format!("{crate_name}=warn,{targets}"))
}

/// Sets up chart and storage logging inside `application_data_path/logs`. Logs are rotated daily
/// and only the last 5 files are kept. Without an explicit level the
/// `RUST_LOG` filter is used as is, falling back to `debug`.
pub fn enable_logging(
    prefix: &str,
    application_data_path: &Path,
    log_level: Option<LevelFilter>,
    show_std: bool,
) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(5)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(application_data_path.join("logs"))?;

    let stdout = std::io::stdout.with_filter(move |_| show_std);

    let filter = match log_level {
        Some(level) => log_filter(&level.to_string().to_lowercase()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter(DEFAULT_LEVEL)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stdout.and(appender))
        .pretty()
        .init();
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});

#[cfg(test)]
mod tests {
    use super::log_filter;

    #[test]
    fn filter_names_every_logged_module() {
        let filter = log_filter("debug").to_string();
        for target in ["charts", "session", "storage", "cli"] {
            assert!(
                filter.contains(&format!("statboard::{target}=debug")),
                "{filter}"
            );
        }
        assert!(filter.contains("statboard=warn"), "{filter}");
    }
}

use std::path::Path;

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "THYME_LOG";

/// Sends tracing output to daily rolling files under `<data_dir>/logs`.
///
/// Logs never go to the terminal, which the report browser owns. `THYME_LOG`
/// takes either a bare level (`debug`) applied to this crate, or full
/// `EnvFilter` directives (`thyme=trace,rusqlite=debug`).
pub fn enable_logging(data_dir: &Path, level: Option<LevelFilter>) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(7)
        .filename_prefix("thyme")
        .filename_suffix("log")
        .build(data_dir.join("logs"))?;

    let env = std::env::var(LOG_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter_directive(level, env.as_deref())))
        .with_writer(appender)
        .with_ansi(false)
        .init();
    Ok(())
}

fn filter_directive(level: Option<LevelFilter>, env: Option<&str>) -> String {
    let target = env!("CARGO_PKG_NAME").replace('-', "_");
    match (level, env.map(str::trim)) {
        (Some(level), _) => format!("{target}={level}"),
        (None, Some(env)) if env.contains('=') => env.to_string(),
        (None, Some(env)) if !env.is_empty() => format!("{target}={env}"),
        (None, _) => format!("{target}=info"),
    }
}

//! Tracing subscriber setup: stdout by default, plus a daily rolling file
//! when `LOG_DIR` is set.

use std::{env, sync::OnceLock};

use tracing_appender::{
    non_blocking,
    non_blocking::NonBlocking,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{fmt, time::ChronoLocal, writer::MakeWriterExt},
};

/// Keeps the non-blocking writer alive so buffered logs flush on shutdown.
static LOG_GUARD: OnceLock<non_blocking::WorkerGuard> = OnceLock::new();

pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(false);

    match env::var("LOG_DIR") {
        Ok(dir) => {
            let stdout = std::io::stdout.with_max_level(tracing::Level::INFO);
            builder.with_writer(stdout.and(file_writer(dir))).init();
        }
        Err(_) => builder.init(),
    }

    tracing::info!("logger initialized");
}

fn file_writer(dir: String) -> NonBlocking {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("riftsquad.log")
        .build(&dir)
        .expect("failed to create log file");

    let (writer, guard) = non_blocking(appender);
    LOG_GUARD.set(guard).expect("LOG_GUARD already set");

    writer
}

use super::Application;
use crate::extension::TomlTableExt;
use std::{fs, io, sync::OnceLock};
use tracing::Level;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{time::ChronoLocal, writer::MakeWriterExt},
    layer::SubscriberExt,
};

/// Initializes the tracing subscriber.
pub(super) fn init<APP: Application + ?Sized>() {
    if TRACING_APPENDER_GUARD.get().is_some() {
        tracing::warn!("tracing subscriber has already been initialized");
        return;
    }

    let app_env = APP::env();
    let in_dev_mode = app_env.is_dev();
    let mut event_format = if in_dev_mode { "pretty" } else { "json" };
    let mut level_filter = if in_dev_mode {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    let mut stdout_max_level = if in_dev_mode {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let mut env_filter = if in_dev_mode {
        "info,kmt_core=debug,kmt_axum=debug,kmt_tracker=debug"
    } else {
        "warn,kmt_core=info,kmt_axum=info,kmt_tracker=info"
    };

    let mut log_dir = "logs";
    let mut log_rotation = "daily";
    let mut max_log_files = 30;
    let mut ansi_terminal = true;
    let mut display_target = true;
    let mut display_filename = false;
    let mut display_line_number = false;
    let mut flatten_event = false;
    if let Some(config) = APP::get_config("tracing") {
        if let Some(dir) = config.get_str("log-dir") {
            log_dir = dir;
        }
        if let Some(rotation) = config.get_str("log-rotation") {
            log_rotation = rotation;
        }
        if let Some(max_files) = config.get_usize("max-log-files") {
            max_log_files = max_files;
        }
        if let Some(format) = config.get_str("format") {
            event_format = format;
        }
        if let Some(level) = config.get_str("level") {
            match (level.parse::<Level>(), level.parse::<LevelFilter>()) {
                (Ok(level), Ok(filter)) => {
                    stdout_max_level = level;
                    level_filter = filter;
                }
                _ => eprintln!("invalid tracing level `{level}`"),
            }
        }
        if let Some(filter) = config.get_str("filter") {
            env_filter = filter;
        }
        ansi_terminal = config.get_bool("ansi").unwrap_or(true);
        display_target = config.get_bool("display-target").unwrap_or(true);
        display_filename = config.get_bool("display-filename").unwrap_or(in_dev_mode);
        display_line_number = config
            .get_bool("display-line-number")
            .unwrap_or(in_dev_mode);
        flatten_event = config.get_bool("flatten-event").unwrap_or(false);
    }

    let log_dir = APP::parse_path(log_dir);
    if !log_dir.exists() {
        if let Err(err) = fs::create_dir_all(&log_dir) {
            let log_dir = log_dir.display();
            eprintln!("fail to create the log directory `{log_dir}`: {err}");
        }
    }

    let rotation = match log_rotation {
        "minutely" => Rotation::MINUTELY,
        "hourly" => Rotation::HOURLY,
        "daily" => Rotation::DAILY,
        _ => Rotation::NEVER,
    };
    let app_name = APP::name();
    let file_appender = match RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(format!("{app_name}.{}", app_env.as_str()))
        .filename_suffix("log")
        .max_log_files(max_log_files.max(1))
        .build(&log_dir)
    {
        Ok(appender) => appender,
        Err(err) => {
            eprintln!("fail to initialize the rolling file appender: {err}");
            return;
        }
    };
    let (non_blocking_appender, worker_guard) = tracing_appender::non_blocking(file_appender);

    // Format layer
    let stdout = io::stdout.with_max_level(stdout_max_level);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(ansi_terminal)
        .with_target(display_target)
        .with_file(display_filename)
        .with_line_number(display_line_number)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(stdout.and(non_blocking_appender));

    let env_filter_layer = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .parse_lossy(env_filter);
    let subscriber = tracing_subscriber::registry().with(env_filter_layer);
    match event_format {
        "compact" => {
            let subscriber = subscriber.with(fmt_layer.compact());
            if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
                tracing::warn!(
                    "fail to set the default subscriber with a `Compact` formatter: {err}"
                );
            }
        }
        "json" => {
            let json_fmt_layer = fmt_layer
                .json()
                .flatten_event(flatten_event)
                .with_current_span(true);
            let subscriber = subscriber.with(json_fmt_layer);
            if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
                tracing::warn!("fail to set the default subscriber with a `Json` formatter: {err}");
            }
        }
        "pretty" => {
            let subscriber = subscriber.with(fmt_layer.pretty());
            if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
                tracing::warn!(
                    "fail to set the default subscriber with a `Pretty` formatter: {err}"
                );
            }
        }
        _ => {
            let subscriber = subscriber.with(fmt_layer);
            if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
                tracing::warn!("fail to set the default subscriber with a `Full` formatter: {err}");
            }
        }
    }
    if TRACING_APPENDER_GUARD.set(worker_guard).is_err() {
        tracing::warn!("fail to set the worker guard for the tracing appender");
    }
}

/// Tracing appender guard.
static TRACING_APPENDER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

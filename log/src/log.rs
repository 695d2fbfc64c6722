use cfg_if::cfg_if;
use std::fmt;
use std::sync::{Arc, Mutex};

pub use ::log::{Level, LevelFilter};

/// A log sink that can be installed into the log subsystem using the
/// [`pipe`] function; it receives every message that passes the level filter.
pub trait Sink: Send + Sync + 'static {
    fn write(&self, target: Option<&str>, level: Level, args: &fmt::Arguments<'_>) -> bool;
}

lazy_static::lazy_static! {
    static ref LEVEL_FILTER: Mutex<LevelFilter> = Mutex::new(LevelFilter::Trace);
    static ref SINK: Mutex<Option<Arc<dyn Sink>>> = Mutex::new(None);
}

/// Returns true if `level` passes the currently set [`LevelFilter`]
#[inline(always)]
pub fn log_level_enabled(level: Level) -> bool {
    match LEVEL_FILTER.lock() {
        Ok(filter) => *filter >= level,
        Err(_) => true,
    }
}

/// Enable filtering of log messages using the [`LevelFilter`]
pub fn set_log_level(level: LevelFilter) {
    if let Ok(mut filter) = LEVEL_FILTER.lock() {
        *filter = level;
    }
}

/// Installs `sink` as the log receiver; `pipe(None)` removes it.
pub fn pipe(sink: Option<Arc<dyn Sink>>) {
    if let Ok(mut current) = SINK.lock() {
        *current = sink;
    }
}

#[inline(always)]
fn to_sink(target: Option<&str>, level: Level, args: &fmt::Arguments<'_>) -> bool {
    if !cfg!(feature = "sink") {
        return false;
    }
    // clone out of the lock so that a sink may log or re-pipe
    let sink = SINK.lock().ok().and_then(|sink| sink.clone());
    match sink {
        Some(sink) => sink.write(target, level, args),
        None => false,
    }
}

pub mod impls {
    use super::*;

    #[inline(always)]
    fn emit(target: Option<&str>, level: Level, args: &fmt::Arguments<'_>) {
        if !log_level_enabled(level) || to_sink(target, level, args) {
            return;
        }
        cfg_if! {
            if #[cfg(target_arch = "wasm32")] {
                let text = args.to_string();
                match level {
                    Level::Error => crate::console::error(&text),
                    Level::Warn => crate::console::warn(&text),
                    _ => crate::console::log(&text),
                }
            } else {
                println!("{args}");
            }
        }
    }

    #[inline(always)]
    pub fn error_impl(target: Option<&str>, args: &fmt::Arguments<'_>) {
        emit(target, Level::Error, args)
    }

    #[inline(always)]
    pub fn warn_impl(target: Option<&str>, args: &fmt::Arguments<'_>) {
        emit(target, Level::Warn, args)
    }

    #[inline(always)]
    pub fn info_impl(target: Option<&str>, args: &fmt::Arguments<'_>) {
        emit(target, Level::Info, args)
    }

    #[inline(always)]
    pub fn debug_impl(target: Option<&str>, args: &fmt::Arguments<'_>) {
        emit(target, Level::Debug, args)
    }

    #[inline(always)]
    pub fn trace_impl(target: Option<&str>, args: &fmt::Arguments<'_>) {
        emit(target, Level::Trace, args)
    }
}

/// Format and log message with [`Level::Error`]
#[macro_export]
macro_rules! log_error {
    (target: $target:expr, $($arg:tt)+) => (
        $crate::impls::error_impl(Some($target), &format_args!($($arg)+))
    );

    ($($arg:tt)+) => (
        $crate::impls::error_impl(None, &format_args!($($arg)+))
    )
}

/// Format and log message with [`Level::Warn`]
#[macro_export]
macro_rules! log_warning {
    (target: $target:expr, $($arg:tt)+) => (
        $crate::impls::warn_impl(Some($target), &format_args!($($arg)+))
    );

    ($($arg:tt)+) => (
        $crate::impls::warn_impl(None, &format_args!($($arg)+))
    )
}

/// Format and log message with [`Level::Info`]
#[macro_export]
macro_rules! log_info {
    (target: $target:expr, $($arg:tt)+) => (
        $crate::impls::info_impl(Some($target), &format_args!($($arg)+))
    );

    ($($arg:tt)+) => (
        $crate::impls::info_impl(None, &format_args!($($arg)+))
    )
}

/// Format and log message with [`Level::Debug`]
#[macro_export]
macro_rules! log_debug {
    (target: $target:expr, $($arg:tt)+) => (
        $crate::impls::debug_impl(Some($target), &format_args!($($arg)+))
    );

    ($($arg:tt)+) => (
        $crate::impls::debug_impl(None, &format_args!($($arg)+))
    )
}

/// Format and log message with [`Level::Trace`]
#[macro_export]
macro_rules! log_trace {
    (target: $target:expr, $($arg:tt)+) => (
        $crate::impls::trace_impl(Some($target), &format_args!($($arg)+))
    );

    ($($arg:tt)+) => (
        $crate::impls::trace_impl(None, &format_args!($($arg)+))
    )
}

//! Logging facilities.
//!
//! All macros take a [`SimulationContext`](crate::SimulationContext) (or anything with `name()` and `time()`
//! methods) and prefix the message with the current simulation time, the log level and the component name.

use atty::Stream;
use colored::{Color, ColoredString, Colorize};
use log::Level;

/// Applies the color to the string if stderr (log) goes to console.
pub fn get_colored(s: &str, color: Color) -> ColoredString {
    if atty::is(Stream::Stderr) {
        s.color(color)
    } else {
        s.normal()
    }
}

/// Returns the padded and colored label for a log level.
pub fn level_label(level: Level) -> ColoredString {
    let color = match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        Level::Info => Color::Green,
        Level::Debug => Color::Blue,
        Level::Trace => Color::Cyan,
    };
    get_colored(&format!("{:<5}", level.as_str()), color)
}

/// Logs a message at the level chosen at runtime.
///
/// # Examples
///
/// ```rust
/// use dpsim_core::{log_at, Simulation};
///
/// let mut sim = Simulation::new(123);
/// let ctx = sim.create_context("runner");
/// let verbose = true;
/// let level = if verbose { log::Level::Info } else { log::Level::Debug };
/// log_at!(level, ctx, "task {} completed", 42);
/// ```
#[macro_export]
macro_rules! log_at {
    ($level:expr, $ctx:expr, $msg:expr) => (
        log::log!(
            target: $ctx.name(),
            $level,
            "[{} {} {}] {}",
            $ctx.time(), $crate::log::level_label($level), $ctx.name(), $msg
        )
    );
    ($level:expr, $ctx:expr, $format:expr, $($arg:tt)+) => (
        log::log!(
            target: $ctx.name(),
            $level,
            concat!("[{} {} {}] ", $format),
            $ctx.time(), $crate::log::level_label($level), $ctx.name(), $($arg)+
        )
    );
}

/// Logs a message at the info level.
///
/// # Examples
///
/// ```rust
/// use std::io::Write;
/// use env_logger::Builder;
/// use dpsim_core::{log_info, Simulation, SimulationContext};
///
/// struct Component {
///     ctx: SimulationContext,
/// }
///
/// impl Component {
///     fn start(&self) {
///         log_info!(self.ctx, "started");
///     }
/// }
///
/// // configure env_logger
/// Builder::from_default_env()
///     .format(|buf, record| writeln!(buf, "{}", record.args()))
///     .init();
///
/// let mut sim = Simulation::new(123);
/// let comp = Component { ctx: sim.create_context("comp") };
/// comp.start();
/// ```
#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $($arg:tt)+) => ($crate::log_at!(log::Level::Info, $ctx, $($arg)+));
}

/// Logs a message at the debug level.
///
/// See [`log_info!`](crate::log_info!).
#[macro_export]
macro_rules! log_debug {
    ($ctx:expr, $($arg:tt)+) => ($crate::log_at!(log::Level::Debug, $ctx, $($arg)+));
}

/// Logs a message at the trace level.
///
/// See [`log_info!`](crate::log_info!).
#[macro_export]
macro_rules! log_trace {
    ($ctx:expr, $($arg:tt)+) => ($crate::log_at!(log::Level::Trace, $ctx, $($arg)+));
}

/// Logs a message at the warn level.
///
/// See [`log_info!`](crate::log_info!).
#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $($arg:tt)+) => ($crate::log_at!(log::Level::Warn, $ctx, $($arg)+));
}

/// Logs a message at the error level.
///
/// See [`log_info!`](crate::log_info!).
#[macro_export]
macro_rules! log_error {
    ($ctx:expr, $($arg:tt)+) => ($crate::log_at!(log::Level::Error, $ctx, $($arg)+));
}

//! Logging abstraction
//!
//! Provides unified logging macros that work across different targets:
//! - Embedded (`defmt` feature): Uses defmt
//! - Host tests: Uses println!
//! - Host non-test: No-op
//!
//! Every macro is additionally gated by the process-wide [`Verbosity`]:
//! errors and warnings are always emitted, info is dropped when `Quiet`,
//! debug and trace only pass when `Verbose`.

use core::sync::atomic::{AtomicU8, Ordering};

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Diagnostic verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verbosity {
    /// Errors and warnings only
    Quiet = 0,
    /// Lifecycle messages as well
    #[default]
    Normal = 1,
    /// Per-sentence diagnostics as well
    Verbose = 2,
}

impl Verbosity {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Verbosity::Quiet,
            1 => Verbosity::Normal,
            _ => Verbosity::Verbose,
        }
    }

    /// Whether `level` passes at this verbosity
    pub fn allows(self, level: LogLevel) -> bool {
        match level {
            LogLevel::Error | LogLevel::Warn => true,
            LogLevel::Info => self >= Verbosity::Normal,
            LogLevel::Debug | LogLevel::Trace => self >= Verbosity::Verbose,
        }
    }
}

static VERBOSITY: AtomicU8 = AtomicU8::new(Verbosity::Normal as u8);

/// Set the process-wide diagnostic verbosity
pub fn set_verbosity(verbosity: Verbosity) {
    VERBOSITY.store(verbosity as u8, Ordering::Relaxed);
}

/// Current process-wide diagnostic verbosity
pub fn verbosity() -> Verbosity {
    Verbosity::from_u8(VERBOSITY.load(Ordering::Relaxed))
}

/// Whether a message at `level` would currently be emitted
#[inline]
pub fn enabled(level: LogLevel) -> bool {
    verbosity().allows(level)
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($level:ident, $defmt:ident, $prefix:literal, $($arg:tt)*) => {{
        if $crate::core::logging::enabled($crate::core::logging::LogLevel::$level) {
            #[cfg(feature = "defmt")]
            ::defmt::$defmt!($($arg)*);

            #[cfg(all(not(feature = "defmt"), test))]
            println!("{} {}", $prefix, format!($($arg)*));

            #[cfg(all(not(feature = "defmt"), not(test)))]
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { $crate::__log_at!(Info, info, "[INFO] ", $($arg)*) };
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::__log_at!(Warn, warn, "[WARN] ", $($arg)*) };
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { $crate::__log_at!(Error, error, "[ERROR]", $($arg)*) };
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::__log_at!(Debug, debug, "[DEBUG]", $($arg)*) };
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => { $crate::__log_at!(Trace, trace, "[TRACE]", $($arg)*) };
}

use std::fmt;

use crate::color::{self, MaybePaint};

pub const DEFAULT_EXIT_CODE: i32 = 1;

pub(crate) fn fmt_error<S: fmt::Display>(f: &mut fmt::Formatter<'_>, text: S) -> fmt::Result {
    write!(
        f,
        "{} {}",
        color::ERROR_LABEL.maybe_paint("error:"),
        color::DIAGNOSTIC.maybe_paint(text.to_string())
    )
}

pub(crate) fn fmt_warn<S: fmt::Display>(f: &mut fmt::Formatter<'_>, text: S) -> fmt::Result {
    write!(
        f,
        "{} {}",
        color::WARNING_LABEL.maybe_paint("warning:"),
        color::DIAGNOSTIC.maybe_paint(text.to_string())
    )
}

struct Diagnostic<'a> {
    text: &'a str,
    is_error: bool,
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_error {
            fmt_error(f, self.text)
        } else {
            fmt_warn(f, self.text)
        }
    }
}

pub(crate) fn error_internal(text: &str) {
    eprintln!(
        "{}",
        Diagnostic {
            text,
            is_error: true
        }
    );
}

pub(crate) fn warn_internal(text: &str) {
    eprintln!(
        "{}",
        Diagnostic {
            text,
            is_error: false
        }
    );
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => ({
        let formatted = format!($($arg)*);
        $crate::utils::errors::warn_internal(&formatted);
    })
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => ({
        let formatted = format!($($arg)*);
        $crate::utils::errors::error_internal(&formatted);
    })
}

#[macro_export]
macro_rules! die {
    ($($arg:tt)*) => ({
        let formatted = format!($($arg)*);
        $crate::utils::errors::error_internal(&formatted);
        ::std::process::exit($crate::utils::errors::DEFAULT_EXIT_CODE);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ColorMode;

    #[test]
    fn test_plain_diagnostics() {
        color::configure_color(ColorMode::Off);

        let error = Diagnostic {
            text: "failed to fetch cars",
            is_error: true,
        };
        let warning = Diagnostic {
            text: "no dealer contacts are configured",
            is_error: false,
        };

        assert_eq!(error.to_string(), "error: failed to fetch cars");
        assert_eq!(
            warning.to_string(),
            "warning: no dealer contacts are configured"
        );
    }
}

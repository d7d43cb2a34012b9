//! Terminal styles, and the switch that turns them off.

use crate::cli::ColorMode;
use lazy_static::lazy_static;
use nu_ansi_term::{AnsiString, Color, Style};
use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};

lazy_static! {
    // Chat
    pub(crate) static ref USER_PROMPT: Style = Color::Blue.bold();
    pub(crate) static ref ASSISTANT_PROMPT: Style = Color::Green.bold();
    pub(crate) static ref USER_INPUT: Style = Color::Default.bold();
    pub(crate) static ref HINT: Style = Color::DarkGray.normal();

    // Diagnostics
    pub(crate) static ref ERROR_LABEL: Style = Color::Red.bold();
    pub(crate) static ref WARNING_LABEL: Style = Color::Yellow.bold();
    pub(crate) static ref DIAGNOSTIC: Style = Color::Default.bold();
}

static USE_COLOR: AtomicBool = AtomicBool::new(true);

pub(crate) fn configure_color(cmode: ColorMode) {
    USE_COLOR.store(cmode == ColorMode::On, Ordering::Relaxed);
}

pub(crate) fn color_mode() -> ColorMode {
    match USE_COLOR.load(Ordering::Relaxed) {
        true => ColorMode::On,
        false => ColorMode::Off,
    }
}

pub(crate) trait MaybePaint {
    /// Paints `text` unless color is off, in which case it comes back bare.
    #[must_use]
    fn maybe_paint<'a, T: Into<Cow<'a, str>>>(self, text: T) -> AnsiString<'a>;
}

impl MaybePaint for Style {
    fn maybe_paint<'a, T: Into<Cow<'a, str>>>(self, text: T) -> AnsiString<'a> {
        match color_mode() {
            ColorMode::On => self.paint(text),
            ColorMode::Off => Style::default().paint(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_when_off() {
        configure_color(ColorMode::Off);

        assert_eq!(color_mode(), ColorMode::Off);
        assert_eq!(ASSISTANT_PROMPT.maybe_paint("[assistant] ").to_string(), "[assistant] ");
        assert_eq!(ERROR_LABEL.maybe_paint(String::from("error:")).to_string(), "error:");
    }
}

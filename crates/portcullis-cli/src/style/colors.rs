//! Semantic color palette for terminal output.

use owo_colors::{OwoColorize, Style};

/// Granted decisions and completed steps.
pub fn success_style() -> Style {
    Style::new().green().bold()
}

/// Denied decisions and failures.
pub fn error_style() -> Style {
    Style::new().red().bold()
}

pub fn muted_style() -> Style {
    Style::new().dimmed()
}

pub fn header_style() -> Style {
    Style::new().bold().underline()
}

/// Paths, ids and attribute names.
pub fn code_style() -> Style {
    Style::new().cyan()
}

/// Trait extension to apply semantic styles.
///
/// Every method degrades to plain text when colors are disabled.
pub trait SemanticStyle {
    fn paint(&self, style: Style) -> String;

    fn success(&self) -> String {
        self.paint(success_style())
    }

    fn error(&self) -> String {
        self.paint(error_style())
    }

    fn muted(&self) -> String {
        self.paint(muted_style())
    }

    fn header(&self) -> String {
        self.paint(header_style())
    }

    fn code(&self) -> String {
        self.paint(code_style())
    }
}

impl<T: std::fmt::Display> SemanticStyle for T {
    fn paint(&self, style: Style) -> String {
        if super::no_color() {
            self.to_string()
        } else {
            self.style(style).to_string()
        }
    }
}

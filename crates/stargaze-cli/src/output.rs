//! Terminal output formatting utilities.

use colored::{ColoredString, Colorize};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message (always prints to stderr).
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning message (always prints to stderr).
pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print an info message.
pub fn info(msg: &str) {
    println!("{} {}", "→".blue(), msg);
}

/// Print essential machine-readable output.
pub fn essential(msg: &str) {
    println!("{msg}");
}

/// Quota health bands used to colour rate-limit output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaBand {
    /// Under 2% left.
    Critical,
    /// Under 48% left.
    Low,
    /// Plenty left.
    Healthy,
}

impl QuotaBand {
    /// Band for a remaining-quota percentage.
    #[must_use]
    pub const fn for_percent(percent: i64) -> Self {
        if percent < 2 {
            Self::Critical
        } else if percent < 48 {
            Self::Low
        } else {
            Self::Healthy
        }
    }

    /// Colour `text` for this band.
    #[must_use]
    pub fn paint(self, text: &str) -> ColoredString {
        match self {
            Self::Critical => text.red(),
            Self::Low => text.yellow(),
            Self::Healthy => text.green(),
        }
    }
}

/// Format a star count with thousands separators, or a dimmed marker when
/// the repository no longer exists.
#[must_use]
pub fn star_count(count: Option<u64>) -> String {
    let Some(count) = count else {
        return "not found".dimmed().to_string();
    };

    format!("★ {}", stargaze_core::group_thousands(count))
}

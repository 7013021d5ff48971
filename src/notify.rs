//! Transient notifications shown after saves and validation failures.

use std::time::{Duration, Instant};

use owo_colors::OwoColorize;

/// How long a toast stays visible.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

enum_display!(ToastLevel, {
    Success => "success",
    Info => "info",
    Warning => "warning",
    Error => "error",
});

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub timestamp: Instant,
}

impl Toast {
    pub fn new(message: String, level: ToastLevel) -> Self {
        Self {
            message,
            level,
            timestamp: Instant::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Error)
    }

    pub fn is_error(&self) -> bool {
        self.level == ToastLevel::Error
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.timestamp) >= TOAST_DURATION
    }

    /// One-line coloured rendering for terminal output.
    pub fn render(&self) -> String {
        match self.level {
            ToastLevel::Success => format!("{} {}", "✓".green(), self.message),
            ToastLevel::Info => format!("{} {}", "i".cyan(), self.message),
            ToastLevel::Warning => format!("{} {}", "!".yellow(), self.message.yellow()),
            ToastLevel::Error => format!("{} {}", "✗".red(), self.message.red()),
        }
    }
}

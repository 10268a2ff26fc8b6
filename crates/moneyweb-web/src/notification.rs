//! Toast notifications
//!
//! The page carries one notification region, rendered by [`base_html`]
//! from the [`NotificationCenter`] held in the application state. Handlers
//! append to it either with an out-of-band swap (on success) or by
//! retargeting the whole response (on error).
//!
//! [`base_html`]: crate::base_html

use moneyweb_config::NotificationConfig;
use moneyweb_utils::{escape_html, generate_id};

pub const REGION_ID: &str = "notifications";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

impl NotificationLevel {
    fn classes(&self) -> &'static str {
        match self {
            NotificationLevel::Success => "bg-green-50 border-green-300 text-green-800",
            NotificationLevel::Info => "bg-blue-50 border-blue-300 text-blue-800",
            NotificationLevel::Error => "bg-red-50 border-red-300 text-red-800",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotificationCenter {
    auto_dismiss_ms: u64,
}

impl NotificationCenter {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            auto_dismiss_ms: config.auto_dismiss_ms,
        }
    }

    pub fn auto_dismiss_ms(&self) -> u64 {
        self.auto_dismiss_ms
    }

    /// The empty region, placed once in every full page
    pub fn region(&self) -> String {
        format!(
            "<div id='{}' class='fixed top-4 right-4 z-50 space-y-2 w-80' aria-live='polite'></div>",
            REGION_ID
        )
    }

    /// A single dismissible toast
    pub fn render(&self, level: NotificationLevel, message: &str) -> String {
        format!(
            r#"<div id='{}' role='alert' data-dismiss-after='{}' class='flex items-start justify-between gap-2 p-3 border rounded-lg shadow {}'><span>{}</span><button type='button' onclick='this.parentElement.remove()' class='text-sm opacity-60 hover:opacity-100'>&times;</button></div>"#,
            generate_id("toast"),
            self.auto_dismiss_ms,
            level.classes(),
            escape_html(message)
        )
    }

    /// A toast wrapped for an out-of-band append to the region
    pub fn oob(&self, level: NotificationLevel, message: &str) -> String {
        format!(
            "<div hx-swap-oob='beforeend:#{}'>{}</div>",
            REGION_ID,
            self.render(level, message)
        )
    }

    pub fn success(&self, message: &str) -> String {
        self.oob(NotificationLevel::Success, message)
    }
}

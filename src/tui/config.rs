//! Display settings for the chat TUI
//!
//! Names and icons shown in the header and next to messages.

/// Application display configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Full assistant name displayed in the header
    pub app_name: String,
    /// Label for assistant messages
    pub assistant_label: String,
    /// Label for user messages
    pub user_label: String,
    /// Version string (with dev suffix outside tagged builds)
    pub version: String,
    /// Icon for the header
    pub header_icon: String,
    /// Render message timestamps
    pub show_timestamps: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "Lexi Legal Assistant".to_string(),
            assistant_label: "Lexi".to_string(),
            user_label: "You".to_string(),
            version: format!(
                "{}{}",
                env!("CARGO_PKG_VERSION"),
                env!("LEXI_VERSION_SUFFIX")
            ),
            header_icon: "⚖".to_string(),
            show_timestamps: true,
        }
    }
}

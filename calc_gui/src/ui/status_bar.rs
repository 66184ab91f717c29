//! Status Bar (Bottom)
//!
//! Displays:
//! - Settings source (calc.toml or built-in defaults)
//! - Report author
//! - Status messages

use iced::widget::{row, text, Space};
use iced::{Element, Length, Padding};

use crate::Message;

/// Render the status bar
pub fn view_status_bar<'a>(
    settings_source: &'a str,
    author: &'a str,
    status: &'a str,
) -> Element<'a, Message> {
    let author_info = if author.is_empty() {
        String::new()
    } else {
        format!("  |  Author: {}", author)
    };

    row![
        text(format!("Settings: {}{}", settings_source, author_info)).size(10),
        Space::new().width(Length::Fill),
        text(status).size(10),
    ]
    .padding(Padding::from([4, 0]))
    .into()
}

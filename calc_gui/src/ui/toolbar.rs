//! Toolbar component
//!
//! Page tabs on the left; PDF export, JSON copy and the theme toggle on the right.

use iced::widget::{button, row, text, Space};
use iced::{Alignment, Element, Length, Padding};

use crate::{Message, Page};

/// Render the application header with title
pub fn view_header(page: Page) -> Element<'static, Message> {
    row![
        text("Solcabo").size(28),
        Space::new().width(Length::Fill),
        text(page.title()).size(14),
    ]
    .align_y(Alignment::Center)
    .into()
}

/// Render page tabs and actions. Export and copy are disabled on pages
/// without a report.
pub fn view_toolbar(current: Page, can_export: bool, dark_mode: bool) -> Element<'static, Message> {
    let tabs = Page::ALL.iter().fold(row![].spacing(4), |r, &page| {
        r.push(
            button(text(page.title()).size(11))
                .on_press(Message::SelectPage(page))
                .padding(Padding::from([4, 10]))
                .style(if page == current { button::primary } else { button::secondary }),
        )
    });

    let theme_label = if dark_mode { "Light Mode" } else { "Dark Mode" };

    row![
        tabs,
        Space::new().width(Length::Fill),
        button(text("Copy JSON").size(11))
            .on_press_maybe(can_export.then_some(Message::CopyJson))
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
        button(text("Export PDF").size(11))
            .on_press_maybe(can_export.then_some(Message::ExportPdf))
            .padding(Padding::from([4, 8]))
            .style(button::primary),
        button(text(theme_label).size(11))
            .on_press(Message::ToggleDarkMode)
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
    ]
    .spacing(4)
    .padding(Padding::from([4, 0]))
    .align_y(Alignment::Center)
    .into()
}

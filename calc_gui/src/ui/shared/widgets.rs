//! Small form and result widgets used by every page

use iced::widget::{column, row, text, text_input, Column, Space};
use iced::{Alignment, Color, Element, Length};

use calc_core::CalcError;

use crate::Message;

pub const PASS_COLOR: [f32; 3] = [0.2, 0.6, 0.2];
pub const FAIL_COLOR: [f32; 3] = [0.8, 0.2, 0.2];
pub const INFO_COLOR: [f32; 3] = [0.3, 0.45, 0.7];
pub const MUTED_COLOR: [f32; 3] = [0.5, 0.5, 0.5];

/// Label + text input on one line
pub fn labeled_input<'a>(
    label: &'a str,
    value: &'a str,
    on_change: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    row![
        text(label).size(11).width(Length::Fixed(150.0)),
        text_input("", value)
            .on_input(on_change)
            .width(Length::Fill)
            .padding(4)
            .size(11),
    ]
    .align_y(Alignment::Center)
    .into()
}

/// Label + any control (pick list, checkbox) on one line
pub fn labeled<'a>(
    label: &'a str,
    control: impl Into<Element<'a, Message>>,
) -> Element<'a, Message> {
    row![text(label).size(11).width(Length::Fixed(150.0)), control.into()]
        .align_y(Alignment::Center)
        .into()
}

/// "Name ........ value" line of a results panel
pub fn value_line<'a>(label: impl Into<String>, value: impl Into<String>) -> Element<'a, Message> {
    row![
        text(label.into()).size(11).width(Length::Fixed(220.0)),
        text(value.into()).size(11),
    ]
    .into()
}

pub fn section_title<'a>(title: &'a str) -> Column<'a, Message> {
    column![text(title).size(14), Space::new().height(6)]
}

/// Validation error block shown in place of results
pub fn error_view(error: &CalcError) -> Column<'_, Message> {
    let field = match error.field() {
        Some(field) => format!("Field: {}", field),
        None => error.error_code().to_string(),
    };
    column![
        text("Invalid input").size(14).color(FAIL_COLOR),
        Space::new().height(6),
        text(error.to_string()).size(11).color(FAIL_COLOR),
        text(field).size(10).color(Color::from_rgb(0.5, 0.5, 0.5)),
    ]
    .spacing(2)
}

/// Grey hint text
pub fn hint<'a>(message: impl Into<String>) -> Element<'a, Message> {
    text(message.into()).size(11).color(MUTED_COLOR).into()
}

//! Shading page
//!
//! Left: latitude (DMS or pasted coordinates), panel width, tilt, slope.
//! Right: γ and h update as the user types; d1 and d after "Calculate".

use iced::widget::{
    button, column, container, row, scrollable, text, text_input, Canvas, Column, Space,
};
use iced::{Alignment, Element, Length, Padding};

use calc_core::format::{fmt2, fmt_decimals, UNDEFINED};

use super::shared::row_diagram::{RowDiagram, RowDiagramData};
use super::shared::widgets::{
    error_view, hint, labeled_input, section_title, value_line, MUTED_COLOR,
};
use crate::forms::{ShadingField, ShadingForm};
use crate::Message;

pub fn view(form: &ShadingForm) -> Element<'_, Message> {
    let input_panel = container(scrollable(view_inputs(form).padding(8)))
        .width(Length::FillPortion(45))
        .style(container::bordered_box)
        .padding(5);

    let results_panel = container(scrollable(view_results(form).padding(8)))
        .width(Length::FillPortion(55))
        .style(container::bordered_box)
        .padding(5);

    row![input_panel, Space::new().width(10), results_panel]
        .height(Length::Fill)
        .into()
}

fn view_inputs(form: &ShadingForm) -> Column<'_, Message> {
    let field = |f: ShadingField| move |s: String| Message::ShadingFieldChanged(f, s);

    let coords = row![
        text_input("38.7223, -9.1393", &form.coords)
            .on_input(Message::ShadingCoordsChanged)
            .on_submit(Message::ApplyCoordinates)
            .width(Length::Fill)
            .padding(4)
            .size(11),
        button(text("Use").size(11))
            .on_press(Message::ApplyCoordinates)
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
    ]
    .spacing(4)
    .align_y(Alignment::Center);

    let latitude = column![
        section_title("Latitude"),
        labeled_input("Degrees:", &form.lat_deg, field(ShadingField::LatDeg)),
        labeled_input("Minutes:", &form.lat_min, field(ShadingField::LatMin)),
        labeled_input("Seconds:", &form.lat_sec, field(ShadingField::LatSec)),
        Space::new().height(4),
        text("Or paste decimal coordinates (lat, lon):").size(10).color(MUTED_COLOR),
        coords,
    ]
    .spacing(6);

    let panel = column![
        section_title("Panel"),
        labeled_input("Label:", &form.label, Message::ShadingLabelChanged),
        labeled_input("Width b (m):", &form.width, field(ShadingField::Width)),
        labeled_input("Tilt β (°):", &form.tilt, field(ShadingField::Tilt)),
        labeled_input("Ground slope α (°):", &form.slope, field(ShadingField::Slope)),
    ]
    .spacing(6);

    let actions = row![
        button(text("Calculate").size(12))
            .on_press(Message::CalculateShading)
            .padding(Padding::from([6, 12]))
            .style(button::primary),
        button(text("Reset").size(12))
            .on_press(Message::ResetShading)
            .padding(Padding::from([6, 12]))
            .style(button::secondary),
    ]
    .spacing(6);

    column![
        latitude,
        Space::new().height(12),
        panel,
        Space::new().height(15),
        actions,
        Space::new().height(15),
        text("d1 = h / tan(γ − α) + 0,20 m    d = d1 + b·cos β").size(10).color(MUTED_COLOR),
    ]
}

fn view_results(form: &ShadingForm) -> Column<'_, Message> {
    let live = match form.preview() {
        Some((gama, h)) => column![
            value_line("Solar elevation γ (21 Dec):", format!("{}°", fmt2(gama))),
            value_line("Panel height h:", format!("{} m", fmt2(h))),
        ],
        None => column![hint("Enter valid values to see γ and h.")],
    }
    .spacing(4);

    let mut content = column![section_title("Geometry"), live].spacing(4);

    if let Some(error) = &form.error {
        return content.push(Space::new().height(12)).push(error_view(error));
    }

    let Some((input, result)) = &form.computed else {
        return content
            .push(Space::new().height(12))
            .push(hint("Press Calculate to get the row spacing."));
    };

    let distances = if result.is_defined() {
        column![
            value_line("Minimum clear distance d1:", format!("{} m", fmt2(result.d1_m))),
            value_line("Row pitch d:", format!("{} m", fmt2(result.d_m))),
        ]
    } else {
        column![
            value_line("Minimum clear distance d1:", UNDEFINED),
            value_line("Row pitch d:", UNDEFINED),
            hint("The sun ray is parallel to the ground slope; no finite spacing exists."),
        ]
    }
    .spacing(4);

    let title = if input.label.is_empty() {
        "Row spacing".to_string()
    } else {
        format!("Row spacing - {}", input.label)
    };

    content = content
        .push(Space::new().height(12))
        .push(text(title).size(14))
        .push(Space::new().height(6))
        .push(value_line(
            "Latitude:",
            format!("{} ({}°)", input.latitude_dms(), fmt_decimals(result.latitude_deg, 4)),
        ))
        .push(distances)
        .push(Space::new().height(15));

    let sketch = RowDiagram::new(RowDiagramData::from_calc(input, result));
    let diagram: Element<'_, Message> = Canvas::new(sketch)
        .width(Length::Fill)
        .height(Length::Fixed(220.0))
        .into();

    content.push(diagram)
}

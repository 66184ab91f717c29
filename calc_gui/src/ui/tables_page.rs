//! RTIEBT reference tables (read-only)

use iced::widget::{column, container, pick_list, row, scrollable, text, Column, Row, Space};
use iced::{Element, Length};

use calc_core::format::{fmt1, fmt2, UNDEFINED};
use calc_core::rtiebt::ampacity::sizing_rows;
use calc_core::rtiebt::correction::{temperature_factor_entry, TABULATED_TEMPS_C};
use calc_core::rtiebt::reference::{
    table_for, ReferenceColumn, GROUPING_SUMMARY, TEMPERATURE_SUMMARY,
};
use calc_core::rtiebt::{grouping_factor, ConductorMaterial, InstallationMethod, Insulation};

use super::shared::widgets::{labeled, section_title, FAIL_COLOR, MUTED_COLOR};
use crate::Message;

const CELL: f32 = 62.0;

fn cell<'a>(value: String) -> Element<'a, Message> {
    text(value).size(11).width(Length::Fixed(CELL)).into()
}

fn header_cell<'a>(value: &'a str) -> Element<'a, Message> {
    text(value).size(10).width(Length::Fixed(CELL)).into()
}

fn optional(value: Option<f64>, fmt: fn(f64) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| UNDEFINED.to_string())
}

pub fn view(material: ConductorMaterial) -> Element<'static, Message> {
    let content = column![
        view_reference(material),
        Space::new().height(20),
        view_sizing(),
        Space::new().height(20),
        row![view_temperature(), Space::new().width(30), view_grouping()],
    ]
    .padding(8);

    container(scrollable(content))
        .style(container::bordered_box)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(5)
        .into()
}

fn view_reference(material: ConductorMaterial) -> Column<'static, Message> {
    let table = table_for(material);

    let header = ReferenceColumn::ALL
        .iter()
        .fold(Row::new().push(header_cell("mm²")), |r, c| r.push(header_cell(c.code())));
    let headings = ReferenceColumn::ALL.iter().fold(Row::new().push(header_cell("")), |r, c| {
        r.push(text(c.heading()).size(9).color(MUTED_COLOR).width(Length::Fixed(CELL)))
    });

    let rows = table.rows.iter().fold(Column::new().spacing(2), |col, entry| {
        let line = entry
            .values_a
            .iter()
            .fold(Row::new().push(cell(fmt1(entry.section_mm2))), |r, v| {
                r.push(cell(optional(*v, fmt1)))
            });
        col.push(line)
    });

    let mut col = column![
        section_title(table.reference),
        labeled(
            "Conductor:",
            pick_list(&ConductorMaterial::ALL[..], Some(material), Message::TablesMaterialSelected)
                .text_size(11)
                .width(Length::Fixed(160.0)),
        ),
        text(table.conditions).size(10).color(MUTED_COLOR),
    ]
    .spacing(4);

    if table.approximate {
        col = col.push(text("Approximate values, indicative only.").size(10).color(FAIL_COLOR));
    }

    let temps = TEMPERATURE_SUMMARY
        .iter()
        .map(|(t, f)| format!("{}: {}", t, fmt2(*f)))
        .collect::<Vec<_>>()
        .join("   ");
    let groups = GROUPING_SUMMARY
        .iter()
        .map(|(n, f)| format!("{}: {}", n, fmt2(*f)))
        .collect::<Vec<_>>()
        .join("   ");

    col.push(Space::new().height(6))
        .push(header)
        .push(headings)
        .push(rows)
        .push(Space::new().height(6))
        .push(text(format!("Temperature factors - {}", temps)).size(10))
        .push(text(format!("Grouping factors - {}", groups)).size(10))
}

fn view_sizing() -> Column<'static, Message> {
    let header = InstallationMethod::ALL
        .iter()
        .filter(|m| m.is_tabulated())
        .fold(Row::new().push(header_cell("mm²")), |r, m| r.push(header_cell(m.code())));

    let rows = sizing_rows().fold(Column::new().spacing(2), |col, (section, values)| {
        let line = values
            .iter()
            .fold(Row::new().push(cell(fmt1(section.0))), |r, v| r.push(cell(fmt1(v.0))));
        col.push(line)
    });

    column![
        section_title("Sizing ampacity (A) - copper, PVC, 30 °C"),
        text("Methods E, F and G are not tabulated for sizing; see the reference table above.")
            .size(10)
            .color(MUTED_COLOR),
        Space::new().height(4),
        header,
        rows,
    ]
    .spacing(2)
}

fn view_temperature() -> Column<'static, Message> {
    let insulations = [Insulation::Pvc, Insulation::Xlpe];
    let header = insulations
        .iter()
        .fold(Row::new().push(header_cell("°C")), |r, i| r.push(header_cell(i.display_name())));

    let rows = TABULATED_TEMPS_C.iter().fold(Column::new().spacing(2), |col, &t| {
        let line = insulations.iter().fold(Row::new().push(cell(t.to_string())), |r, &i| {
            r.push(cell(optional(temperature_factor_entry(i, f64::from(t)), fmt2)))
        });
        col.push(line)
    });

    column![
        section_title("Temperature correction"),
        header,
        rows,
        text("Other temperatures and EPR use 1,00.").size(10).color(MUTED_COLOR),
    ]
    .spacing(2)
}

fn view_grouping() -> Column<'static, Message> {
    let rows = (1..=9).fold(Column::new().spacing(2), |col, n| {
        col.push(Row::new().push(cell(n.to_string())).push(cell(fmt2(grouping_factor(n)))))
    });

    column![
        section_title("Grouping correction"),
        Row::new().push(header_cell("n")).push(header_cell("factor")),
        rows,
        text("Groups above 9 use the 9-conductor value.").size(10).color(MUTED_COLOR),
    ]
    .spacing(2)
}

//! Circuit schedule page
//!
//! One editable row per circuit; derived columns (I_b, I_2, 1.45·I_z, U,
//! ΔU%, ΣΔU%) and both protection conditions recompute on every edit.

use iced::widget::{
    button, column, container, pick_list, row, scrollable, text, text_input, Column, Row, Space,
};
use iced::{Alignment, Element, Length, Padding};
use uuid::Uuid;

use calc_core::calculations::circuit_schedule::{
    CableType, CircuitRow, CircuitRowResult, PowerUnit, ProtectionType, PARALLEL_CHOICES,
};
use calc_core::format::{fmt1, fmt2};
use calc_core::rtiebt::ConductorMaterial;

use super::shared::widgets::{labeled_input, FAIL_COLOR, MUTED_COLOR, PASS_COLOR};
use crate::forms::{CircuitField, RowText, ScheduleForm};
use crate::Message;

const COLUMNS: [(&str, f32); 18] = [
    ("Circuit", 150.0),
    ("P", 55.0),
    ("Unit", 70.0),
    ("Material", 90.0),
    ("Cable", 85.0),
    ("n", 35.0),
    ("S (mm²)", 55.0),
    ("L (m)", 55.0),
    ("I_b (A)", 60.0),
    ("I_n (A)", 55.0),
    ("I_z (A)", 55.0),
    ("Method", 55.0),
    ("Protection", 120.0),
    ("I_2 (A)", 55.0),
    ("1,45·I_z", 60.0),
    ("ΔU (V)", 55.0),
    ("ΔU %", 50.0),
    ("Σ ΔU %", 55.0),
];

pub fn view(form: &ScheduleForm) -> Element<'_, Message> {
    let header = COLUMNS
        .iter()
        .fold(Row::new().spacing(4), |r, (title, width)| {
            r.push(text(*title).size(10).width(Length::Fixed(*width)))
        })
        .push(text("C1").size(10).width(Length::Fixed(36.0)))
        .push(text("C2").size(10).width(Length::Fixed(36.0)));

    let rows = form.schedule.rows.iter().fold(Column::new().spacing(4), |col, circuit| {
        let text_row = form.text.get(&circuit.id);
        col.push(view_row(circuit, text_row, form.result(circuit.id), form.schedule.rows.len() > 1))
    });

    let table = column![header, rows].spacing(6).padding(8);

    let failing = form.results.iter().filter(|r| !r.passes()).count();
    let summary = if failing == 0 {
        text(format!("{} circuits - all protection conditions satisfied", form.results.len()))
            .size(11)
            .color(PASS_COLOR)
    } else {
        text(format!("{} of {} circuits fail a protection condition", failing, form.results.len()))
            .size(11)
            .color(FAIL_COLOR)
    };

    let toolbar = row![
        container(labeled_input(
            "Schedule label:",
            &form.schedule.label,
            Message::ScheduleLabelChanged
        ))
            .width(Length::Fixed(420.0)),
        Space::new().width(Length::Fill),
        summary,
        Space::new().width(12),
        button(text("+ Add circuit").size(11))
            .on_press(Message::AddCircuit)
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
    ]
    .align_y(Alignment::Center);

    let legend = text(
        "C1: I_b < I_n < I_z    C2: I_2 < 1,45·I_z    kW → I_b = 1,45·P    kVA → I_b = P / (√3·0,4)    I_b may be overwritten",
    )
    .size(10)
    .color(MUTED_COLOR);

    column![
        toolbar,
        Space::new().height(8),
        container(scrollable(table).direction(scrollable::Direction::Both {
            vertical: scrollable::Scrollbar::default(),
            horizontal: scrollable::Scrollbar::default(),
        }))
        .style(container::bordered_box)
        .height(Length::Fill)
        .padding(5),
        Space::new().height(6),
        legend,
    ]
    .into()
}

fn cell<'a>(
    id: Uuid,
    field: CircuitField,
    text_row: Option<&'a RowText>,
    width: f32,
) -> Element<'a, Message> {
    let value = text_row.map(|t| t.get(field)).unwrap_or("");
    let invalid = text_row.and_then(|t| t.invalid) == Some(field);
    let input = text_input("", value)
        .on_input(move |s| Message::CircuitFieldChanged(id, field, s))
        .width(Length::Fixed(width))
        .padding(3)
        .size(11);
    if invalid {
        input
            .style(|theme, status| {
                let mut style = text_input::default(theme, status);
                style.border.color = FAIL_COLOR.into();
                style
            })
            .into()
    } else {
        input.into()
    }
}

fn computed<'a>(value: String, width: f32) -> Element<'a, Message> {
    text(value).size(11).width(Length::Fixed(width)).into()
}

fn condition<'a>(ok: bool) -> Element<'a, Message> {
    let (label, color) = if ok { ("OK", PASS_COLOR) } else { ("FAIL", FAIL_COLOR) };
    text(label).size(11).color(color).width(Length::Fixed(36.0)).into()
}

fn view_row<'a>(
    circuit: &'a CircuitRow,
    text_row: Option<&'a RowText>,
    result: Option<&'a CircuitRowResult>,
    removable: bool,
) -> Element<'a, Message> {
    let id = circuit.id;
    let width = |i: usize| COLUMNS[i].1;

    let mut r = Row::new()
        .spacing(4)
        .align_y(Alignment::Center)
        .push(cell(id, CircuitField::Label, text_row, width(0)))
        .push(cell(id, CircuitField::Power, text_row, width(1)))
        .push(
            pick_list(&PowerUnit::ALL[..], Some(circuit.power_unit), move |u| {
                Message::CircuitUnitSelected(id, u)
            })
            .text_size(11)
            .width(Length::Fixed(width(2))),
        )
        .push(
            pick_list(&ConductorMaterial::ALL[..], Some(circuit.material), move |m| {
                Message::CircuitMaterialSelected(id, m)
            })
            .text_size(11)
            .width(Length::Fixed(width(3))),
        )
        .push(
            pick_list(&CableType::ALL[..], circuit.cable_type, move |c| {
                Message::CircuitCableSelected(id, c)
            })
            .placeholder("-")
            .text_size(11)
            .width(Length::Fixed(width(4))),
        )
        .push(
            pick_list(&PARALLEL_CHOICES[..], Some(circuit.parallel), move |n| {
                Message::CircuitParallelSelected(id, n)
            })
            .text_size(11)
            .width(Length::Fixed(width(5))),
        )
        .push(cell(id, CircuitField::Section, text_row, width(6)))
        .push(cell(id, CircuitField::Length, text_row, width(7)))
        .push(cell(id, CircuitField::DesignCurrent, text_row, width(8)))
        .push(cell(id, CircuitField::In, text_row, width(9)))
        .push(cell(id, CircuitField::Iz, text_row, width(10)))
        .push(cell(id, CircuitField::Method, text_row, width(11)))
        .push(
            pick_list(&ProtectionType::ALL[..], Some(circuit.protection), move |p| {
                Message::CircuitProtectionSelected(id, p)
            })
            .text_size(11)
            .width(Length::Fixed(width(12))),
        );

    if let Some(res) = result {
        r = r
            .push(computed(fmt1(res.i2_a), width(13)))
            .push(computed(fmt1(res.iz_145_a), width(14)))
            .push(computed(fmt2(res.u_v), width(15)))
            .push(computed(fmt2(res.du_percent), width(16)))
            .push(computed(fmt2(res.du_total_percent), width(17)))
            .push(condition(res.condition1))
            .push(condition(res.condition2));
    }

    let remove = button(text("×").size(11))
        .on_press_maybe(removable.then_some(Message::RemoveCircuit(id)))
        .padding(Padding::from([2, 6]))
        .style(button::secondary);

    r.push(remove).into()
}

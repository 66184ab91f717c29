//! Cable sizing page
//!
//! Displays:
//! - Circuit data (current, phases, voltage, length, usage)
//! - Installation (method, material, insulation, temperature, grouping)
//! - Results: both minimum sections, the chosen section, voltage drop,
//!   ampacity, protection and the verification report

use iced::widget::{
    button, column, container, pick_list, row, rule, scrollable, text, Column, Space,
};
use iced::{Element, Length, Padding};

use calc_core::calculations::cable_sizing::{
    CableSizingInput, CableSizingResult, ObservationKind, PhaseSystem,
};
use calc_core::format::{fmt1, fmt2, fmt_percent, UNDEFINED};
use calc_core::rtiebt::{ConductorMaterial, InstallationMethod, Insulation, UsageType};

use super::shared::widgets::{
    error_view, hint, labeled, labeled_input, section_title, value_line, FAIL_COLOR, INFO_COLOR,
    MUTED_COLOR, PASS_COLOR,
};
use crate::forms::{CableField, CableForm};
use crate::Message;

pub fn view(form: &CableForm) -> Element<'_, Message> {
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

fn view_inputs(form: &CableForm) -> Column<'_, Message> {
    let field = |f: CableField| move |s: String| Message::CableFieldChanged(f, s);
    let input = &form.input;

    let circuit = column![
        section_title("Circuit"),
        labeled_input("Label:", &form.label, Message::CableLabelChanged),
        labeled_input("Design current I_b (A):", &form.current, field(CableField::Current)),
        labeled(
            "Phase system:",
            pick_list(&PhaseSystem::ALL[..], Some(input.phases), Message::PhasesSelected)
                .text_size(11)
                .width(Length::Fill),
        ),
        labeled_input("Voltage (V):", &form.voltage, field(CableField::Voltage)),
        labeled_input("Length (m):", &form.length, field(CableField::Length)),
        labeled(
            "Usage:",
            pick_list(&UsageType::ALL[..], Some(input.usage), Message::UsageSelected)
                .text_size(11)
                .width(Length::Fill),
        ),
    ]
    .spacing(6);

    let installation = column![
        section_title("Installation"),
        labeled(
            "Method:",
            pick_list(&InstallationMethod::ALL[..], Some(input.method), Message::MethodSelected)
                .text_size(11)
                .width(Length::Fill),
        ),
        text(input.method.description()).size(10).color(MUTED_COLOR),
        labeled(
            "Conductor:",
            pick_list(&ConductorMaterial::ALL[..], Some(input.material), Message::MaterialSelected)
                .text_size(11)
                .width(Length::Fill),
        ),
        labeled(
            "Insulation:",
            pick_list(&Insulation::ALL[..], Some(input.insulation), Message::InsulationSelected)
                .text_size(11)
                .width(Length::Fill),
        ),
        labeled_input(
            "Ambient temperature (°C):",
            &form.temperature,
            field(CableField::Temperature)
        ),
        labeled_input("Grouped conductors:", &form.conductors, field(CableField::Conductors)),
    ]
    .spacing(6);

    let actions = row![
        button(text("Calculate").size(12))
            .on_press(Message::CalculateCable)
            .padding(Padding::from([6, 12]))
            .style(button::primary),
        button(text("Reset").size(12))
            .on_press(Message::ResetCable)
            .padding(Padding::from([6, 12]))
            .style(button::secondary),
    ]
    .spacing(6);

    column![
        circuit,
        Space::new().height(12),
        installation,
        Space::new().height(15),
        actions,
    ]
}

fn view_results(form: &CableForm) -> Column<'_, Message> {
    if let Some(error) = &form.error {
        return error_view(error);
    }
    match &form.computed {
        Some((input, result)) => view_calculation_results(input, result),
        None => column![hint("Fill in the circuit and press Calculate.")],
    }
}

fn view_calculation_results<'a>(
    input: &'a CableSizingInput,
    result: &'a CableSizingResult,
) -> Column<'a, Message> {
    let verdict = if result.passes() {
        text(result.verdict()).size(16).color(PASS_COLOR)
    } else {
        text(result.verdict()).size(16).color(FAIL_COLOR)
    };

    let headline = text(format!(
        "{} {} mm² {} / {} - protection {} A",
        input.material.symbol(),
        fmt1(result.section_mm2),
        input.insulation,
        input.method.code(),
        fmt1(result.breaker_a),
    ))
    .size(12);

    let drop = column![
        text("Voltage drop").size(13),
        value_line(
            "Admissible drop:",
            format!("{} ({} V)", fmt_percent(result.drop_limit_percent), fmt2(result.allowed_drop_v)),
        ),
        value_line("Phase factor k:", fmt2(result.k_factor)),
        value_line("Minimum section by drop:", format!("{} mm²", fmt2(result.drop_section_mm2))),
        value_line(
            "Drop at chosen section:",
            format!(
                "{} V ({})",
                fmt2(result.voltage_drop_v),
                fmt_percent(result.voltage_drop_percent)
            ),
        ),
    ]
    .spacing(3);

    let table_iz = match result.table_ampacity_a {
        Some(iz) => format!("{} A", fmt1(iz)),
        None => UNDEFINED.to_string(),
    };
    let ampacity = column![
        text("Ampacity").size(13),
        value_line("Temperature factor:", fmt2(result.temperature_factor)),
        value_line("Grouping factor:", fmt2(result.grouping_factor)),
        value_line("Corrected current I'_b:", format!("{} A", fmt2(result.corrected_current_a))),
        value_line(
            "Minimum section by ampacity:",
            format!("{} mm²", fmt1(result.ampacity_section_mm2)),
        ),
        value_line("Table ampacity:", table_iz),
        value_line("Corrected ampacity I_z:", format!("{} A", fmt2(result.corrected_ampacity_a))),
    ]
    .spacing(3);

    let selection = column![
        text("Selection").size(13),
        value_line("Required section:", format!("{} mm²", fmt2(result.required_section_mm2))),
        value_line("Standard section:", format!("{} mm²", fmt1(result.section_mm2))),
        value_line("Protection I_n:", format!("{} A", fmt1(result.breaker_a))),
    ]
    .spacing(3);

    let observations = result.observations.iter().fold(
        column![text("Verification").size(13)].spacing(3),
        |col, obs| {
            let (mark, color) = match obs.kind {
                ObservationKind::Pass => ("OK", PASS_COLOR),
                ObservationKind::Fail => ("FAIL", FAIL_COLOR),
                ObservationKind::Info => ("i", INFO_COLOR),
            };
            col.push(
                row![
                    text(mark).size(11).color(color).width(Length::Fixed(36.0)),
                    text(obs.message.as_str()).size(11),
                ]
                .spacing(4),
            )
        },
    );

    column![
        verdict,
        headline,
        Space::new().height(10),
        selection,
        Space::new().height(8),
        rule::horizontal(1),
        Space::new().height(8),
        drop,
        Space::new().height(8),
        ampacity,
        Space::new().height(8),
        rule::horizontal(1),
        Space::new().height(8),
        observations,
    ]
    .spacing(2)
}

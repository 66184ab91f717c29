//! Plain-text rendering of results for the terminal.

use calc_core::calculations::cable_sizing::{CableSizingInput, CableSizingResult, ObservationKind};
use calc_core::calculations::circuit_schedule::{CircuitRowResult, CircuitSchedule};
use calc_core::calculations::shading::{ShadingInput, ShadingResult};
use calc_core::format::{fmt1, fmt2, fmt_decimals, fmt_percent, UNDEFINED};
use calc_core::rtiebt::ampacity::sizing_rows;
use calc_core::rtiebt::correction::{temperature_factor_entry, TABULATED_TEMPS_C};
use calc_core::rtiebt::reference::{
    table_for, ReferenceColumn, ReferenceTable, GROUPING_SUMMARY, TEMPERATURE_SUMMARY,
};
use calc_core::rtiebt::{grouping_factor, ConductorMaterial, InstallationMethod, Insulation};
use serde::Serialize;

const RULE: &str = "------------------------------------------------------------";

fn line(label: &str, value: String) {
    println!("  {:<34} {}", label, value);
}

pub fn print_shading(input: &ShadingInput, result: &ShadingResult) {
    println!("PV inter-row shading distance");
    println!("{}", RULE);
    let latitude = fmt_decimals(result.latitude_deg, 4);
    line("Latitude", format!("{} ({}°)", input.latitude_dms(), latitude));
    line("Panel width b", format!("{} m", fmt2(input.b_m)));
    line("Tilt β", format!("{}°", fmt1(input.beta_deg)));
    line("Ground slope α", format!("{}°", fmt1(input.alfa_deg)));
    println!("{}", RULE);
    line("Solar elevation γ (21 Dec)", format!("{}°", fmt2(result.gama_deg)));
    line("Panel height h", format!("{} m", fmt2(result.h_m)));
    if result.is_defined() {
        line("Clear distance d1", format!("{} m", fmt2(result.d1_m)));
        line("Row pitch d", format!("{} m", fmt2(result.d_m)));
    } else {
        line("Clear distance d1", UNDEFINED.to_string());
        line("Row pitch d", UNDEFINED.to_string());
        println!("  Shadow length is undefined for this geometry.");
    }
}

pub fn print_cable(input: &CableSizingInput, result: &CableSizingResult) {
    println!("RTIEBT cable sizing");
    println!("{}", RULE);
    line("Design current I_b", format!("{} A", fmt1(input.current_a)));
    line("Voltage", format!("{} V ({})", fmt1(input.voltage_v), input.phases));
    line("Length", format!("{} m", fmt1(input.length_m)));
    line("Usage", input.usage.to_string());
    line("Method", format!("{} - {}", input.method.code(), input.method.description()));
    line("Conductor", format!("{} / {}", input.material, input.insulation));
    line("Ambient temperature", format!("{} °C", fmt1(input.ambient_temp_c)));
    line("Grouped conductors", input.conductor_count.to_string());
    println!("{}", RULE);
    line(
        "Admissible drop",
        format!("{} ({} V)", fmt_percent(result.drop_limit_percent), fmt2(result.allowed_drop_v)),
    );
    line("Section by voltage drop", format!("{} mm²", fmt2(result.drop_section_mm2)));
    line("Temperature factor", fmt2(result.temperature_factor));
    line("Grouping factor", fmt2(result.grouping_factor));
    line("Corrected current I'_b", format!("{} A", fmt1(result.corrected_current_a)));
    line("Section by ampacity", format!("{} mm²", fmt1(result.ampacity_section_mm2)));
    line("Section", format!("{} mm²", fmt1(result.section_mm2)));
    line(
        "Voltage drop",
        format!("{} V ({})", fmt2(result.voltage_drop_v), fmt_percent(result.voltage_drop_percent)),
    );
    let iz = match result.table_ampacity_a {
        Some(_) => format!("{} A", fmt1(result.corrected_ampacity_a)),
        None => UNDEFINED.to_string(),
    };
    line("Ampacity I_z", iz);
    line("Protection I_n", format!("{} A", fmt1(result.breaker_a)));
    println!("{}", RULE);
    println!("  {}", result.verdict());
    for obs in &result.observations {
        let tag = match obs.kind {
            ObservationKind::Pass => "ok  ",
            ObservationKind::Fail => "FAIL",
            ObservationKind::Info => "info",
        };
        println!("  [{}] {}", tag, obs.message);
    }
}

pub fn print_schedule(schedule: &CircuitSchedule, results: &[CircuitRowResult]) {
    if !schedule.label.is_empty() {
        println!("{}", schedule.label);
    }
    println!(
        "{:<24} {:>9} {:>8} {:>8} {:>8} {:>7} {:>7} {:>7} {:>4} {:>4}",
        "Circuit", "I_b (A)", "I_n (A)", "I_z (A)", "I_2 (A)", "ΔU %", "Σ %", "S mm²", "C1", "C2"
    );
    println!("{}{}", RULE, "-----------------------------");
    for (row, res) in schedule.rows.iter().zip(results) {
        let ok = |b: bool| if b { "ok" } else { "FAIL" };
        println!(
            "{:<24} {:>9} {:>8} {:>8} {:>8} {:>7} {:>7} {:>7} {:>4} {:>4}",
            truncate(&row.label, 24),
            fmt2(res.ib_a),
            fmt1(row.in_a),
            fmt1(row.iz_a),
            fmt2(res.i2_a),
            fmt2(res.du_percent),
            fmt2(res.du_total_percent),
            fmt1(row.section_mm2),
            ok(res.condition1),
            ok(res.condition2),
        );
    }
    let failing = results.iter().filter(|r| !r.passes()).count();
    println!();
    if failing == 0 {
        println!("All {} circuits satisfy both protection conditions.", results.len());
    } else {
        println!("{} of {} circuits fail a protection condition.", failing, results.len());
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max - 1).collect();
        out.push('…');
        out
    }
}

pub fn print_tables(material: ConductorMaterial) {
    println!("Sizing ampacity (A), copper PVC, 30 °C");
    print!("{:>8}", "mm²");
    for method in InstallationMethod::ALL.iter().filter(|m| m.is_tabulated()) {
        print!("{:>8}", method.code());
    }
    println!();
    for (section, values) in sizing_rows() {
        print!("{:>8}", fmt1(section.0));
        for value in values {
            print!("{:>8}", fmt1(value.0));
        }
        println!();
    }

    println!();
    println!("Temperature correction factors");
    print!("{:>8}", "°C");
    for insulation in [Insulation::Pvc, Insulation::Xlpe] {
        print!("{:>8}", insulation.to_string());
    }
    println!();
    for temp in TABULATED_TEMPS_C {
        print!("{:>8}", temp);
        for insulation in [Insulation::Pvc, Insulation::Xlpe] {
            let factor = temperature_factor_entry(insulation, f64::from(temp));
            print!("{:>8}", factor.map(fmt2).unwrap_or_else(|| UNDEFINED.to_string()));
        }
        println!();
    }

    println!();
    println!("Grouping correction factors");
    for count in 1..=9 {
        println!("{:>8}{:>8}", count, fmt2(grouping_factor(count)));
    }

    println!();
    print_reference(table_for(material));
}

fn print_reference(table: &ReferenceTable) {
    println!("{} - {} ({})", table.reference, table.material, table.conditions);
    if table.approximate {
        println!("Approximate values, indicative only.");
    }
    print!("{:>8}", "mm²");
    for column in ReferenceColumn::ALL {
        print!("{:>8}", column.code());
    }
    println!();
    for row in table.rows {
        print!("{:>8}", fmt1(row.section_mm2));
        for value in row.values_a {
            print!("{:>8}", value.map(fmt1).unwrap_or_else(|| UNDEFINED.to_string()));
        }
        println!();
    }
    println!();
    let temps: Vec<String> = TEMPERATURE_SUMMARY
        .iter()
        .map(|(t, f)| format!("{} {}", t, fmt2(*f)))
        .collect();
    println!("Temperature: {}", temps.join(" · "));
    let groups: Vec<String> = GROUPING_SUMMARY
        .iter()
        .map(|(n, f)| format!("{} {}", n, fmt2(*f)))
        .collect();
    println!("Grouping:    {}", groups.join(" · "));
}

/// All tables in one JSON document
#[derive(Debug, Serialize)]
pub struct TablesJson {
    pub sizing: Vec<SizingRowJson>,
    pub temperature: Vec<TemperatureRowJson>,
    pub grouping: Vec<(u32, f64)>,
    pub reference: &'static ReferenceTable,
}

#[derive(Debug, Serialize)]
pub struct SizingRowJson {
    pub section_mm2: f64,
    /// A1, A2, B1, B2, C, D
    pub ampacity_a: [f64; 6],
}

#[derive(Debug, Serialize)]
pub struct TemperatureRowJson {
    pub ambient_c: i32,
    pub pvc: Option<f64>,
    pub xlpe: Option<f64>,
}

pub fn tables_json(material: ConductorMaterial) -> TablesJson {
    TablesJson {
        sizing: sizing_rows()
            .map(|(section, values)| SizingRowJson {
                section_mm2: section.0,
                ampacity_a: values.map(|a| a.0),
            })
            .collect(),
        temperature: TABULATED_TEMPS_C
            .iter()
            .map(|&t| TemperatureRowJson {
                ambient_c: t,
                pvc: temperature_factor_entry(Insulation::Pvc, f64::from(t)),
                xlpe: temperature_factor_entry(Insulation::Xlpe, f64::from(t)),
            })
            .collect(),
        grouping: (1..=9).map(|n| (n, grouping_factor(n))).collect(),
        reference: table_for(material),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Main board to inverter", 10), "Main boar…");
    }

    #[test]
    fn test_tables_json() {
        let tables = tables_json(ConductorMaterial::Aluminum);
        assert_eq!(tables.sizing.len(), 15);
        assert_eq!(tables.temperature.len(), TABULATED_TEMPS_C.len());
        assert_eq!(tables.grouping[2], (3, 0.7));
        assert!(tables.reference.approximate);

        let json = serde_json::to_value(&tables).unwrap();
        assert_eq!(json["sizing"][1]["section_mm2"], 2.5);
    }
}

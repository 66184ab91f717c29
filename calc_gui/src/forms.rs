//! Form state for the calculator pages.
//!
//! Text inputs hold what the user typed; each form parses its buffers into
//! a `calc_core` input on demand, naming the offending field on failure.
//! Both `.` and `,` are accepted as the decimal separator.

use std::collections::HashMap;
use std::str::FromStr;

use calc_core::calculations::cable_sizing::{CableSizingInput, CableSizingResult, PhaseSystem};
use calc_core::calculations::circuit_schedule::{CircuitRow, CircuitRowResult, CircuitSchedule};
use calc_core::calculations::shading::{ShadingInput, ShadingResult};
use calc_core::errors::{CalcError, CalcResult};
use calc_core::format::fmt_decimals;
use calc_core::geo::parse_coordinates;
use calc_core::CalcSettings;
use uuid::Uuid;

/// Parse a typed number, accepting a decimal comma
pub fn parse_field<T: FromStr>(field: &str, text: &str) -> CalcResult<T> {
    let normalized = text.trim().replace(',', ".");
    normalized
        .parse::<T>()
        .map_err(|_| CalcError::invalid_input(field, text.trim(), "Not a valid number"))
}

/// Plain-decimal rendering for prefilled text inputs
fn to_text(value: f64) -> String {
    let s = fmt_decimals(value, 4);
    let s = s.replace('\u{a0}', "");
    if s.contains(',') {
        s.trim_end_matches('0').trim_end_matches(',').to_string()
    } else {
        s
    }
}

// ============================================================================
// Shading
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingField {
    LatDeg,
    LatMin,
    LatSec,
    Width,
    Tilt,
    Slope,
}

#[derive(Debug, Clone)]
pub struct ShadingForm {
    pub label: String,
    pub lat_deg: String,
    pub lat_min: String,
    pub lat_sec: String,
    pub width: String,
    pub tilt: String,
    pub slope: String,
    pub coords: String,
    /// Input and result of the last successful "Calculate"
    pub computed: Option<(ShadingInput, ShadingResult)>,
    pub error: Option<CalcError>,
}

impl ShadingForm {
    pub fn from_input(input: &ShadingInput) -> Self {
        ShadingForm {
            label: input.label.clone(),
            lat_deg: input.lat_deg.to_string(),
            lat_min: input.lat_min.to_string(),
            lat_sec: input.lat_sec.to_string(),
            width: to_text(input.b_m),
            tilt: to_text(input.beta_deg),
            slope: to_text(input.alfa_deg),
            coords: String::new(),
            computed: None,
            error: None,
        }
    }

    pub fn field_mut(&mut self, field: ShadingField) -> &mut String {
        match field {
            ShadingField::LatDeg => &mut self.lat_deg,
            ShadingField::LatMin => &mut self.lat_min,
            ShadingField::LatSec => &mut self.lat_sec,
            ShadingField::Width => &mut self.width,
            ShadingField::Tilt => &mut self.tilt,
            ShadingField::Slope => &mut self.slope,
        }
    }

    pub fn to_input(&self) -> CalcResult<ShadingInput> {
        Ok(ShadingInput {
            label: self.label.trim().to_string(),
            lat_deg: parse_field("lat_deg", &self.lat_deg)?,
            lat_min: parse_field("lat_min", &self.lat_min)?,
            lat_sec: parse_field("lat_sec", &self.lat_sec)?,
            b_m: parse_field("b_m", &self.width)?,
            beta_deg: parse_field("beta_deg", &self.tilt)?,
            alfa_deg: parse_field("alfa_deg", &self.slope)?,
        })
    }

    /// Solar elevation and panel height for the current fields.
    ///
    /// Recomputed on every keystroke; `None` while the form does not validate.
    pub fn preview(&self) -> Option<(f64, f64)> {
        let input = self.to_input().ok()?;
        input.validate().ok()?;
        Some((input.solar_elevation().0, input.panel_height().0))
    }

    /// Fill the latitude fields from the "lat, lon" text box
    pub fn apply_coordinates(&mut self) -> CalcResult<()> {
        let coords = parse_coordinates(&self.coords)?;
        let dms = coords.latitude_dms();
        self.lat_deg = dms.degrees.to_string();
        self.lat_min = dms.minutes.to_string();
        self.lat_sec = dms.seconds.to_string();
        Ok(())
    }

    pub fn calculate(&mut self) {
        let outcome = self.to_input().and_then(|input| {
            calc_core::calculations::shading::calculate(&input).map(|result| (input, result))
        });
        match outcome {
            Ok(computed) => {
                self.computed = Some(computed);
                self.error = None;
            }
            Err(e) => {
                self.computed = None;
                self.error = Some(e);
            }
        }
    }
}

// ============================================================================
// Cable sizing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CableField {
    Current,
    Voltage,
    Length,
    Temperature,
    Conductors,
}

#[derive(Debug, Clone)]
pub struct CableForm {
    pub label: String,
    pub current: String,
    pub voltage: String,
    pub length: String,
    pub temperature: String,
    pub conductors: String,
    /// Enumerated fields are edited in place
    pub input: CableSizingInput,
    pub computed: Option<(CableSizingInput, CableSizingResult)>,
    pub error: Option<CalcError>,
}

impl CableForm {
    pub fn from_input(input: &CableSizingInput) -> Self {
        CableForm {
            label: input.label.clone(),
            current: to_text(input.current_a),
            voltage: to_text(input.voltage_v),
            length: to_text(input.length_m),
            temperature: to_text(input.ambient_temp_c),
            conductors: input.conductor_count.to_string(),
            input: input.clone(),
            computed: None,
            error: None,
        }
    }

    pub fn field_mut(&mut self, field: CableField) -> &mut String {
        match field {
            CableField::Current => &mut self.current,
            CableField::Voltage => &mut self.voltage,
            CableField::Length => &mut self.length,
            CableField::Temperature => &mut self.temperature,
            CableField::Conductors => &mut self.conductors,
        }
    }

    /// Change the phase system; the voltage field follows
    pub fn set_phases(&mut self, phases: PhaseSystem) {
        self.input.set_phases(phases);
        self.voltage = to_text(self.input.voltage_v);
    }

    pub fn to_input(&self) -> CalcResult<CableSizingInput> {
        Ok(CableSizingInput {
            label: self.label.trim().to_string(),
            current_a: parse_field("current_a", &self.current)?,
            voltage_v: parse_field("voltage_v", &self.voltage)?,
            length_m: parse_field("length_m", &self.length)?,
            ambient_temp_c: parse_field("ambient_temp_c", &self.temperature)?,
            conductor_count: parse_field("conductor_count", &self.conductors)?,
            ..self.input.clone()
        })
    }

    pub fn calculate(&mut self) {
        let outcome = self.to_input().and_then(|input| {
            calc_core::calculations::cable_sizing::calculate(&input).map(|result| (input, result))
        });
        match outcome {
            Ok(computed) => {
                self.computed = Some(computed);
                self.error = None;
            }
            Err(e) => {
                self.computed = None;
                self.error = Some(e);
            }
        }
    }
}

// ============================================================================
// Circuit schedule
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CircuitField {
    Label,
    Power,
    Section,
    Length,
    In,
    Iz,
    Method,
    DesignCurrent,
}

/// Text buffers of one schedule row
#[derive(Debug, Clone, Default)]
pub struct RowText {
    pub values: HashMap<CircuitField, String>,
    /// Field whose text does not parse or leaves the row invalid
    pub invalid: Option<CircuitField>,
}

impl RowText {
    fn from_row(row: &CircuitRow) -> Self {
        let values = [
            (CircuitField::Label, row.label.clone()),
            (CircuitField::Power, to_text(row.power)),
            (CircuitField::Section, to_text(row.section_mm2)),
            (CircuitField::Length, to_text(row.length_m)),
            (CircuitField::In, to_text(row.in_a)),
            (CircuitField::Iz, to_text(row.iz_a)),
            (CircuitField::Method, row.method_ref.clone()),
            (CircuitField::DesignCurrent, to_text(row.ib())),
        ]
        .into_iter()
        .collect();
        RowText { values, invalid: None }
    }

    pub fn get(&self, field: CircuitField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleForm {
    pub schedule: CircuitSchedule,
    pub text: HashMap<Uuid, RowText>,
    pub results: Vec<CircuitRowResult>,
}

impl Default for ScheduleForm {
    fn default() -> Self {
        Self::from_schedule(CircuitSchedule::new())
    }
}

impl ScheduleForm {
    pub fn from_schedule(schedule: CircuitSchedule) -> Self {
        let text = schedule.rows.iter().map(|r| (r.id, RowText::from_row(r))).collect();
        let results = schedule.evaluate();
        ScheduleForm { schedule, text, results }
    }

    pub fn add_row(&mut self) -> Uuid {
        let id = self.schedule.add_row();
        if let Some(row) = self.schedule.row(id) {
            self.text.insert(id, RowText::from_row(row));
        }
        self.refresh();
        id
    }

    pub fn remove_row(&mut self, id: Uuid) -> bool {
        let removed = self.schedule.remove_row(id);
        if removed {
            self.text.remove(&id);
            self.refresh();
        }
        removed
    }

    /// Store typed text and apply it to the row when it parses
    pub fn edit(&mut self, id: Uuid, field: CircuitField, value: String) {
        let Some(row) = self.schedule.row_mut(id) else {
            return;
        };
        let parsed = apply_field(row, field, &value);
        let text = self.text.entry(id).or_default();
        text.values.insert(field, value);
        text.invalid = match parsed {
            Ok(()) => None,
            Err(_) => Some(field),
        };
        if parsed.is_ok() && field == CircuitField::Power {
            // a new power supersedes a typed design current
            let ib = to_text(row.ib());
            text.values.insert(CircuitField::DesignCurrent, ib);
        }
        self.refresh();
    }

    /// Apply a change made through a picker
    pub fn update_row(&mut self, id: Uuid, change: impl FnOnce(&mut CircuitRow)) {
        if let Some(row) = self.schedule.row_mut(id) {
            change(row);
            let ib = to_text(row.ib());
            self.text.entry(id).or_default().values.insert(CircuitField::DesignCurrent, ib);
        }
        self.refresh();
    }

    pub fn refresh(&mut self) {
        self.results = self.schedule.evaluate();
    }

    pub fn result(&self, id: Uuid) -> Option<&CircuitRowResult> {
        self.results.iter().find(|r| r.id == id)
    }
}

/// Apply typed text to the row. The row only changes when the edited
/// row still validates.
fn apply_field(row: &mut CircuitRow, field: CircuitField, value: &str) -> CalcResult<()> {
    let number = |name: &str| -> CalcResult<f64> {
        if value.trim().is_empty() {
            Ok(0.0)
        } else {
            parse_field(name, value)
        }
    };
    let mut edited = row.clone();
    match field {
        CircuitField::Label => edited.label = value.to_string(),
        CircuitField::Method => edited.method_ref = value.to_string(),
        CircuitField::Power => {
            let power = number("power")?;
            edited.set_power(power, edited.power_unit);
        }
        CircuitField::Section => edited.section_mm2 = number("section_mm2")?,
        CircuitField::Length => edited.length_m = number("length_m")?,
        CircuitField::In => edited.in_a = number("in_a")?,
        CircuitField::Iz => edited.iz_a = number("iz_a")?,
        CircuitField::DesignCurrent => {
            edited.ib_override = if value.trim().is_empty() {
                None
            } else {
                Some(parse_field("ib_override", value)?)
            };
        }
    }
    edited.validate()?;
    *row = edited;
    Ok(())
}

/// Forms prefilled from the settings file
pub fn initial_forms(settings: &CalcSettings) -> (ShadingForm, CableForm, ScheduleForm) {
    (
        ShadingForm::from_input(&settings.shading_input()),
        CableForm::from_input(&settings.cable_input()),
        ScheduleForm::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::calculations::circuit_schedule::{PowerUnit, PARALLEL_CHOICES};

    #[test]
    fn test_parse_field_accepts_comma() {
        assert_eq!(parse_field::<f64>("b_m", " 1,5 ").unwrap(), 1.5);
        assert_eq!(parse_field::<i32>("lat_deg", "-38").unwrap(), -38);
        let err = parse_field::<u32>("lat_min", "-1").unwrap_err();
        assert_eq!(err.field(), Some("lat_min"));
    }

    #[test]
    fn test_to_text() {
        assert_eq!(to_text(1.0), "1");
        assert_eq!(to_text(2.5), "2,5");
        assert_eq!(to_text(230.0), "230");
        assert_eq!(to_text(12345.5), "12345,5");
    }

    #[test]
    fn test_shading_preview_and_calculate() {
        let mut form = ShadingForm::from_input(&ShadingInput::default());
        let (gama, h) = form.preview().unwrap();
        assert!((gama - 66.56).abs() < 1e-9);
        assert_eq!(h, 0.0);

        form.tilt = "abc".to_string();
        assert!(form.preview().is_none());
        form.calculate();
        assert_eq!(form.error.as_ref().and_then(CalcError::field), Some("beta_deg"));

        form.tilt = "0".to_string();
        form.calculate();
        let (_, result) = form.computed.as_ref().unwrap();
        assert!((result.d_m - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_apply_coordinates() {
        let mut form = ShadingForm::from_input(&ShadingInput::default());
        form.coords = "38.7223, -9.1393".to_string();
        form.apply_coordinates().unwrap();
        assert_eq!(form.lat_deg, "38");
        assert_eq!(form.lat_min, "43");

        form.coords = "nowhere".to_string();
        assert!(form.apply_coordinates().is_err());
        assert_eq!(form.lat_deg, "38");
    }

    #[test]
    fn test_cable_phases_sets_voltage() {
        let mut form = CableForm::from_input(&CableSizingInput::default());
        assert_eq!(form.voltage, "230");
        form.set_phases(PhaseSystem::ThreePhase);
        assert_eq!(form.voltage, "400");
        assert_eq!(form.to_input().unwrap().phases, PhaseSystem::ThreePhase);
    }

    #[test]
    fn test_cable_calculate() {
        let mut form = CableForm::from_input(&CableSizingInput::default());
        form.conductors = "1".to_string();
        form.calculate();
        let (_, result) = form.computed.as_ref().unwrap();
        assert_eq!(result.section_mm2, 2.5);

        form.temperature = "75".to_string();
        form.calculate();
        assert!(form.computed.is_none());
        assert_eq!(form.error.as_ref().and_then(CalcError::field), Some("ambient_temp_c"));
    }

    #[test]
    fn test_schedule_edit() {
        let mut form = ScheduleForm::default();
        let id = form.schedule.rows[0].id;

        form.edit(id, CircuitField::Power, "10".to_string());
        assert_eq!(form.schedule.rows[0].ib(), 14.5);
        assert_eq!(form.text[&id].get(CircuitField::DesignCurrent), "14,5");

        form.edit(id, CircuitField::Section, "x".to_string());
        assert_eq!(form.text[&id].invalid, Some(CircuitField::Section));
        assert_eq!(form.text[&id].get(CircuitField::Section), "x");

        form.update_row(id, |row| row.power_unit = PowerUnit::Kva);
        assert_eq!(form.schedule.rows[0].ib(), 14.4);
    }

    #[test]
    fn test_schedule_edit_rejects_negative_values() {
        let mut form = ScheduleForm::default();
        let id = form.schedule.rows[0].id;
        form.edit(id, CircuitField::Section, "16".to_string());
        assert!(form.text[&id].invalid.is_none());

        form.edit(id, CircuitField::Section, "-16".to_string());
        assert_eq!(form.text[&id].invalid, Some(CircuitField::Section));
        assert_eq!(form.schedule.rows[0].section_mm2, 16.0);

        let fields = [
            CircuitField::Length,
            CircuitField::In,
            CircuitField::Iz,
            CircuitField::DesignCurrent,
        ];
        for field in fields {
            form.edit(id, field, "-1".to_string());
            assert_eq!(form.text[&id].invalid, Some(field));
        }
        let row = &form.schedule.rows[0];
        assert_eq!((row.length_m, row.in_a, row.iz_a, row.ib_override), (0.0, 0.0, 0.0, None));

        form.edit(id, CircuitField::Length, "25".to_string());
        assert!(form.text[&id].invalid.is_none());
        assert_eq!(form.schedule.rows[0].length_m, 25.0);
    }

    #[test]
    fn test_parallel_choices_validate() {
        let mut form = ScheduleForm::default();
        let id = form.schedule.rows[0].id;
        for n in PARALLEL_CHOICES {
            form.update_row(id, |row| row.parallel = n);
            assert!(form.schedule.rows[0].validate().is_ok());
        }
        assert_eq!(form.schedule.rows[0].parallel, 5);
    }

    #[test]
    fn test_schedule_rows() {
        let mut form = ScheduleForm::default();
        let first = form.schedule.rows[0].id;
        assert!(!form.remove_row(first));

        let second = form.add_row();
        assert_eq!(form.results.len(), 2);
        assert!(form.result(second).is_some());
        assert!(form.remove_row(first));
        assert_eq!(form.schedule.rows.len(), 1);
        assert!(!form.text.contains_key(&first));
    }
}

//! # PDF Reports
//!
//! Renders calculation reports with Typst.
//!
//! ## Architecture
//!
//! - Typst templates are embedded as string constants
//! - Data is injected by `{{PLACEHOLDER}}` replacement before compilation
//! - Fonts come from `typst-assets`, so no files are read at runtime
//! - Output is raw PDF bytes (`Vec<u8>`); callers decide where they go
//!
//! ## Example
//!
//! ```rust,no_run
//! use calc_core::calculations::shading::{calculate, ShadingInput};
//! use calc_core::config::ReportSettings;
//! use calc_core::pdf::render_shading_pdf;
//!
//! let input = ShadingInput { lat_deg: 38, b_m: 2.0, beta_deg: 30.0, ..ShadingInput::default() };
//! let result = calculate(&input).unwrap();
//! let pdf = render_shading_pdf(&input, &result, &ReportSettings::default()).unwrap();
//! std::fs::write("shading.pdf", pdf).unwrap();
//! ```

use chrono::{Local, Utc};
use tracing::debug;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::cable_sizing::{CableSizingInput, CableSizingResult, ObservationKind};
use crate::calculations::circuit_schedule::{CircuitRowResult, CircuitSchedule};
use crate::calculations::shading::{ShadingInput, ShadingResult};
use crate::config::ReportSettings;
use crate::errors::{CalcError, CalcResult};
use crate::format::{fmt1, fmt2, fmt_decimals, fmt_percent};
use crate::rtiebt::rtiebt_ref;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Available fonts
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

/// Compile a finished Typst source to PDF bytes
fn compile_pdf(source: String) -> CalcResult<Vec<u8>> {
    let world = PdfWorld::new(source);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::report_error(format!("Typst compilation failed: {}", error_msgs.join("; ")))
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::report_error(format!("PDF rendering failed: {}", error_msgs.join("; ")))
    })?;

    debug!(bytes = pdf_bytes.len(), "pdf rendered");
    Ok(pdf_bytes)
}

// ============================================================================
// PDF Templates
// ============================================================================

/// Page setup and title block shared by every report
const REPORT_HEADER: &str = r##"
#set page(
  paper: "a4",
  flipped: {{FLIPPED}},
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
  header: align(right)[
    #text(size: 8pt, fill: gray)[{{COMPANY}}]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 8pt)[{{AUTHOR}}]],
      align(center)[#text(size: 8pt)[Page #counter(page).display()]],
      align(right)[#text(size: 8pt)[{{DATE}}]],
    )
  ]
)

#set text(size: 10pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 16pt, weight: "bold")[{{TITLE}}]
    #v(4pt)
    #text(size: 12pt)[{{LABEL}}]
  ]
]

#v(12pt)
"##;

const FOOTNOTE: &str = r##"
#v(24pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)
#text(size: 8pt, fill: gray)[
  Generated by Solcabo \
  Results should be verified by a qualified electrical engineer.
]
"##;

/// Typst template for the shading report
const SHADING_TEMPLATE: &str = r##"
== Input Parameters

#table(
  columns: (1fr, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Parameter*], [*Value*], [*Unit*]),
  [Latitude], [{{LAT_DMS}}], [],
  [Latitude (decimal)], [{{LATITUDE}}], [°],
  [Panel width, b], [{{B}}], [m],
  [Panel tilt, β], [{{BETA}}], [°],
  [Ground slope, α], [{{ALFA}}], [°],
)

#v(12pt)

== Method

$ gamma = max(0, 90 - |phi - (-23.44)|) = {{GAMA}} degree $

$ h = b sin(beta) = {{H}} "m" $

$ d_1 = h / tan(gamma - alpha) + 0.2 $

$ d = d_1 + b cos(beta) $

#v(12pt)

== Results

#table(
  columns: (1fr, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Result*], [*Value*], [*Unit*]),
  [Solar elevation, γ], [{{GAMA}}], [°],
  [Panel height, h], [{{H}}], [m],
  [Minimum gap between rows, d#sub[1]], [{{D1}}], [m],
  [Row pitch, d], [{{D}}], [m],
)

#let defined = "{{DEFINED}}"
#if defined != "yes" [
  #v(8pt)
  #text(fill: rgb("#a94442"))[
    The shadow length is undefined for these inputs (sun at or below the
    slope). Distances are shown as a dash.
  ]
]
"##;

/// Typst template for the cable sizing report
const CABLE_TEMPLATE: &str = r##"
== Input Parameters

#table(
  columns: (1fr, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right),
  table.header([*Parameter*], [*Value*]),
  [Design current, I#sub[b]], [{{CURRENT}} A],
  [Voltage, U], [{{VOLTAGE}} V],
  [Phase system], [{{PHASES}}],
  [Length, L], [{{LENGTH}} m],
  [Usage], [{{USAGE}}],
  [Installation method], [{{METHOD}}],
  [Conductor], [{{MATERIAL}}],
  [Insulation], [{{INSULATION}}],
  [Ambient temperature], [{{TEMP}} °C],
  [Grouped conductors], [{{COUNT}}],
)

#v(12pt)

== Sizing

$ S_"drop" = (k L I_b rho) / (Delta U_"max") = {{DROP_SECTION}} "mm"^2 $

$ I'_b = I_b / (f_"temp" f_"group") = {{CORRECTED_CURRENT}} "A" $

#table(
  columns: (1fr, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right),
  table.header([*Result*], [*Value*]),
  [Admissible drop], [{{LIMIT}} ({{ALLOWED_DROP}} V)],
  [Temperature factor ({{TABLE_XI}})], [{{F_TEMP}}],
  [Grouping factor ({{TABLE_XII}})], [{{F_GROUP}}],
  [Section by voltage drop], [{{DROP_SECTION}} mm²],
  [Section by ampacity], [{{AMP_SECTION}} mm²],
  [*Standard section*], [*{{SECTION}} mm²*],
  [Voltage drop], [{{DROP_V}} V ({{DROP_PERCENT}})],
  [Corrected ampacity, I#sub[z]], [{{IZ}} A],
  [Recommended protection, I#sub[n]], [{{BREAKER}} A],
)

#v(12pt)

== Verification

#table(
  columns: (auto, 1fr),
  inset: 6pt,
  stroke: 0.5pt,
  align: (center, left),
  table.header([*Status*], [*Observation*]),
{{OBSERVATIONS}}
)

#v(16pt)

#let verdict = "{{VERDICT}}"
#align(center)[
  #block(
    width: auto,
    fill: if verdict == "PASS" { rgb("#d4edda") } else { rgb("#f8d7da") },
    inset: 16pt,
    radius: 4pt
  )[
    #text(size: 14pt, weight: "bold")[{{VERDICT_TEXT}}]
  ]
]
"##;

/// Typst template for the circuit schedule report
const SCHEDULE_TEMPLATE: &str = r##"
#set text(size: 8pt)

#table(
  columns: (1fr, auto, auto, auto, auto, auto, auto, auto, auto, auto, auto, auto, auto, auto),
  inset: 4pt,
  stroke: 0.5pt,
  align: (left, right, right, right, right, right, right, left, right, right, right, right, center, center),
  table.header(
    [*Circuit*], [*P*], [*I#sub[b]* (A)], [*I#sub[n]* (A)], [*I#sub[z]* (A)],
    [*I#sub[2]* (A)], [*1,45 I#sub[z]* (A)], [*Cable*], [*L* (m)], [*U* (V)],
    [*DU*], [*DU total*], [*C1*], [*C2*],
  ),
{{ROWS}}
)

#v(8pt)
C1: I#sub[b] \< I#sub[n] \< I#sub[z]. C2: I#sub[2] \< 1,45 I#sub[z].
Resistivity at operating temperature: Cu 0,0225, Al 0,036 Ω·mm²/m.
"##;

// ============================================================================
// PDF Rendering Functions
// ============================================================================

fn header(title: &str, label: &str, report: &ReportSettings, landscape: bool) -> String {
    REPORT_HEADER
        .replace("{{FLIPPED}}", if landscape { "true" } else { "false" })
        .replace("{{COMPANY}}", &escape_typst(&report.company))
        .replace("{{AUTHOR}}", &escape_typst(&report.author))
        .replace("{{DATE}}", &Local::now().format("%d/%m/%Y").to_string())
        .replace("{{TITLE}}", title)
        .replace("{{LABEL}}", &escape_typst(label))
}

/// Render a shading calculation to PDF.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(CalcError)` - If rendering fails
pub fn render_shading_pdf(
    input: &ShadingInput,
    result: &ShadingResult,
    report: &ReportSettings,
) -> CalcResult<Vec<u8>> {
    let body = SHADING_TEMPLATE
        .replace("{{LAT_DMS}}", &input.latitude_dms().to_string())
        .replace("{{LATITUDE}}", &fmt_decimals(result.latitude_deg, 4))
        .replace("{{B}}", &fmt2(input.b_m))
        .replace("{{BETA}}", &fmt2(input.beta_deg))
        .replace("{{ALFA}}", &fmt2(input.alfa_deg))
        .replace("{{GAMA}}", &fmt2(result.gama_deg))
        .replace("{{H}}", &fmt2(result.h_m))
        .replace("{{D1}}", &fmt2(result.d1_m))
        .replace("{{D}}", &fmt2(result.d_m))
        .replace("{{DEFINED}}", if result.is_defined() { "yes" } else { "no" });

    let title = header("Inter-row Shading Distance", &input.label, report, false);
    let source = title + &body + FOOTNOTE;
    compile_pdf(source)
}

/// Render a cable sizing calculation to PDF.
pub fn render_cable_sizing_pdf(
    input: &CableSizingInput,
    result: &CableSizingResult,
    report: &ReportSettings,
) -> CalcResult<Vec<u8>> {
    let body = CABLE_TEMPLATE
        .replace("{{CURRENT}}", &fmt2(input.current_a))
        .replace("{{VOLTAGE}}", &fmt2(input.voltage_v))
        .replace("{{PHASES}}", input.phases.display_name())
        .replace("{{LENGTH}}", &fmt2(input.length_m))
        .replace("{{USAGE}}", &escape_typst(input.usage.display_name()))
        .replace("{{METHOD}}", &escape_typst(&input.method.to_string()))
        .replace("{{MATERIAL}}", &escape_typst(input.material.display_name()))
        .replace("{{INSULATION}}", input.insulation.display_name())
        .replace("{{TEMP}}", &fmt2(input.ambient_temp_c))
        .replace("{{COUNT}}", &input.conductor_count.to_string())
        .replace("{{LIMIT}}", &fmt_percent(result.drop_limit_percent))
        .replace("{{ALLOWED_DROP}}", &fmt2(result.allowed_drop_v))
        .replace("{{TABLE_XI}}", rtiebt_ref::TABLE_XI)
        .replace("{{TABLE_XII}}", rtiebt_ref::TABLE_XII)
        .replace("{{F_TEMP}}", &fmt2(result.temperature_factor))
        .replace("{{F_GROUP}}", &fmt2(result.grouping_factor))
        .replace("{{DROP_SECTION}}", &fmt2(result.drop_section_mm2))
        .replace("{{CORRECTED_CURRENT}}", &fmt2(result.corrected_current_a))
        .replace("{{AMP_SECTION}}", &fmt2(result.ampacity_section_mm2))
        .replace("{{SECTION}}", &fmt2(result.section_mm2))
        .replace("{{DROP_V}}", &fmt2(result.voltage_drop_v))
        .replace("{{DROP_PERCENT}}", &fmt_percent(result.voltage_drop_percent))
        .replace("{{IZ}}", &fmt2(result.corrected_ampacity_a))
        .replace("{{BREAKER}}", &fmt2(result.breaker_a))
        .replace("{{OBSERVATIONS}}", &build_observation_rows(result))
        .replace("{{VERDICT}}", if result.passes() { "PASS" } else { "FAIL" })
        .replace("{{VERDICT_TEXT}}", result.verdict());

    let source = header("Cable Sizing (RTIEBT)", &input.label, report, false) + &body + FOOTNOTE;
    compile_pdf(source)
}

/// Render a circuit schedule to PDF (A4 landscape).
pub fn render_circuit_schedule_pdf(
    schedule: &CircuitSchedule,
    results: &[CircuitRowResult],
    report: &ReportSettings,
) -> CalcResult<Vec<u8>> {
    if schedule.rows.len() != results.len() {
        return Err(CalcError::report_error(format!(
            "Schedule has {} rows but {} results",
            schedule.rows.len(),
            results.len()
        )));
    }

    let body = SCHEDULE_TEMPLATE.replace("{{ROWS}}", &build_schedule_rows(schedule, results));
    let title = header("Circuit Schedule - Three-phase", &schedule.label, report, true);
    let source = title + &body + FOOTNOTE;
    compile_pdf(source)
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '/' => "\\/".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Observation rows for the verification table
fn build_observation_rows(result: &CableSizingResult) -> String {
    result
        .observations
        .iter()
        .map(|o| {
            let status = match o.kind {
                ObservationKind::Pass => "OK",
                ObservationKind::Fail => "FAIL",
                ObservationKind::Info => "INFO",
            };
            format!("  [{}], [{}],", status, escape_typst(&o.message))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One table row per circuit
fn build_schedule_rows(schedule: &CircuitSchedule, results: &[CircuitRowResult]) -> String {
    let yes_no = |ok: bool| if ok { "OK" } else { "FAIL" };
    schedule
        .rows
        .iter()
        .zip(results)
        .map(|(row, r)| {
            let cable = format!(
                "{}{}× {} mm² {}",
                row.cable_type.map(|t| format!("{} ", t)).unwrap_or_default(),
                row.parallel,
                fmt1(row.section_mm2),
                row.material.symbol()
            );
            format!(
                "  [{}], [{} {}], [{}], [{}], [{}], [{}], [{}], [{}], [{}], [{}], [{}], [{}], [{}], [{}],",
                escape_typst(&row.label),
                fmt2(row.power),
                row.power_unit,
                fmt1(r.ib_a),
                fmt1(row.in_a),
                fmt1(row.iz_a),
                fmt1(r.i2_a),
                fmt1(r.iz_145_a),
                escape_typst(&cable),
                fmt1(row.length_m),
                fmt2(r.u_v),
                fmt_percent(r.du_percent),
                fmt_percent(r.du_total_percent),
                yes_no(r.condition1),
                yes_no(r.condition2),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

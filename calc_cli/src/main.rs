//! # Solcabo CLI
//!
//! Command-line front end for the shading and cable sizing calculators.
//!
//! ```text
//! solcabo shading --lat-deg 38 --lat-min 43 --width 2 --tilt 30
//! solcabo cable --current 32 --phases three --length 50 --method C
//! solcabo circuits schedule.json --pdf schedule.pdf
//! solcabo tables --material aluminum
//! solcabo coords "38.7223, -9.1393"
//! solcabo run item.json
//! ```
//!
//! `--json` prints results (or the structured error) as JSON on stdout.
//! Logs go to stderr; set `RUST_LOG=debug` to see each evaluation.

mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use calc_core::calculations::cable_sizing::{self, CableSizingInput, PhaseSystem};
use calc_core::calculations::circuit_schedule::{self, CircuitSchedule};
use calc_core::calculations::shading::{self, ShadingInput};
use calc_core::config::{CalcSettings, SETTINGS_FILE};
use calc_core::geo::parse_coordinates;
use calc_core::pdf;
use calc_core::rtiebt::{ConductorMaterial, InstallationMethod, Insulation, UsageType};
use calc_core::{CalcError, CalculationItem, CalculationOutput};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

#[derive(Parser, Debug)]
#[command(
    name = "solcabo",
    version,
    about = "PV inter-row shading and RTIEBT cable sizing calculator"
)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Settings file (defaults to ./calc.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Minimum distance between rows of tilted panels
    Shading(ShadingArgs),
    /// Size a low-voltage cable (section, voltage drop, protection)
    Cable(CableArgs),
    /// Verify a circuit schedule read from a JSON file
    Circuits(CircuitsArgs),
    /// Print the RTIEBT tables
    Tables(TablesArgs),
    /// Convert "lat, lon" decimal coordinates to DMS latitude
    Coords {
        /// Coordinates, e.g. "38.7223, -9.1393"
        #[arg(allow_hyphen_values = true)]
        text: String,
    },
    /// Run any calculation from a tagged JSON file ({"type": "Shading", ...})
    Run {
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ShadingArgs {
    /// Latitude degrees (negative for the southern hemisphere)
    #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
    lat_deg: i32,
    /// Latitude minutes
    #[arg(long, default_value_t = 0)]
    lat_min: u32,
    /// Latitude seconds
    #[arg(long, default_value_t = 0)]
    lat_sec: u32,
    /// Decimal "lat, lon" pair; replaces the DMS fields
    #[arg(long, allow_hyphen_values = true, conflicts_with_all = ["lat_deg", "lat_min", "lat_sec"])]
    coords: Option<String>,
    /// Panel width b (m) [default: from settings]
    #[arg(long)]
    width: Option<f64>,
    /// Panel tilt β (degrees)
    #[arg(long, default_value_t = 0.0)]
    tilt: f64,
    /// Ground slope α (degrees)
    #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
    slope: f64,
    /// Label printed on the report
    #[arg(long, default_value = "")]
    label: String,
    /// Write a PDF report
    #[arg(long)]
    pdf: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PhasesArg {
    Single,
    Three,
}

impl From<PhasesArg> for PhaseSystem {
    fn from(arg: PhasesArg) -> Self {
        match arg {
            PhasesArg::Single => PhaseSystem::SinglePhase,
            PhasesArg::Three => PhaseSystem::ThreePhase,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum UsageArg {
    Lighting,
    Sockets,
    Motors,
    Other,
}

impl From<UsageArg> for UsageType {
    fn from(arg: UsageArg) -> Self {
        match arg {
            UsageArg::Lighting => UsageType::Lighting,
            UsageArg::Sockets => UsageType::Sockets,
            UsageArg::Motors => UsageType::Motors,
            UsageArg::Other => UsageType::Other,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum MaterialArg {
    Copper,
    Aluminum,
}

impl From<MaterialArg> for ConductorMaterial {
    fn from(arg: MaterialArg) -> Self {
        match arg {
            MaterialArg::Copper => ConductorMaterial::Copper,
            MaterialArg::Aluminum => ConductorMaterial::Aluminum,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum InsulationArg {
    Pvc,
    Xlpe,
    Epr,
}

impl From<InsulationArg> for Insulation {
    fn from(arg: InsulationArg) -> Self {
        match arg {
            InsulationArg::Pvc => Insulation::Pvc,
            InsulationArg::Xlpe => Insulation::Xlpe,
            InsulationArg::Epr => Insulation::Epr,
        }
    }
}

/// Unset options fall back to the settings file, then to built-in defaults.
#[derive(Args, Debug)]
struct CableArgs {
    /// Design current I_b (A)
    #[arg(long)]
    current: Option<f64>,
    /// Nominal voltage (V) [default: 230 single-phase, 400 three-phase]
    #[arg(long)]
    voltage: Option<f64>,
    #[arg(long, value_enum, default_value_t = PhasesArg::Single)]
    phases: PhasesArg,
    /// One-way length (m)
    #[arg(long)]
    length: Option<f64>,
    #[arg(long, value_enum, default_value_t = UsageArg::Sockets)]
    usage: UsageArg,
    /// Installation method (A1, A2, B1, B2, C, D, E, F, G)
    #[arg(long)]
    method: Option<InstallationMethod>,
    #[arg(long, value_enum, default_value_t = MaterialArg::Copper)]
    material: MaterialArg,
    #[arg(long, value_enum)]
    insulation: Option<InsulationArg>,
    /// Ambient temperature (°C)
    #[arg(long, allow_hyphen_values = true)]
    temp: Option<f64>,
    /// Number of grouped conductors
    #[arg(long)]
    conductors: Option<u32>,
    /// Label printed on the report
    #[arg(long, default_value = "")]
    label: String,
    /// Write a PDF report
    #[arg(long)]
    pdf: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CircuitsArgs {
    /// JSON file with a circuit schedule ({"label": ..., "rows": [...]})
    file: PathBuf,
    /// Write a PDF report
    #[arg(long)]
    pdf: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TablesArgs {
    /// Reference table material
    #[arg(long, value_enum, default_value_t = MaterialArg::Copper)]
    material: MaterialArg,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = Registry::default()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

fn load_settings(path: Option<&Path>) -> Result<CalcSettings> {
    let settings = match path {
        Some(path) => CalcSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => CalcSettings::load_or_default(Path::new(SETTINGS_FILE))
            .with_context(|| format!("loading {}", SETTINGS_FILE))?,
    };
    Ok(settings)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_pdf(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "report written");
    Ok(())
}

fn run_shading(args: &ShadingArgs, settings: &CalcSettings, json: bool) -> Result<()> {
    let mut input = ShadingInput {
        label: args.label.clone(),
        lat_deg: args.lat_deg,
        lat_min: args.lat_min,
        lat_sec: args.lat_sec,
        b_m: args.width.unwrap_or(settings.shading.panel_width_m),
        beta_deg: args.tilt,
        alfa_deg: args.slope,
    };
    if let Some(text) = &args.coords {
        input.set_latitude(parse_coordinates(text)?.latitude);
    }

    let result = shading::calculate(&input)?;

    if json {
        print_json(&result)?;
    } else {
        report::print_shading(&input, &result);
    }
    if let Some(path) = &args.pdf {
        write_pdf(path, &pdf::render_shading_pdf(&input, &result, &settings.report)?)?;
    }
    Ok(())
}

fn run_cable(args: &CableArgs, settings: &CalcSettings, json: bool) -> Result<()> {
    let mut input = settings.cable_input();
    input.label = args.label.clone();
    input.set_phases(args.phases.into());
    input.usage = args.usage.into();
    input.material = args.material.into();
    if let Some(voltage) = args.voltage {
        input.voltage_v = voltage;
    }
    if let Some(current) = args.current {
        input.current_a = current;
    }
    if let Some(length) = args.length {
        input.length_m = length;
    }
    if let Some(method) = args.method {
        input.method = method;
    }
    if let Some(insulation) = args.insulation {
        input.insulation = insulation.into();
    }
    if let Some(temp) = args.temp {
        input.ambient_temp_c = temp;
    }
    if let Some(count) = args.conductors {
        input.conductor_count = count;
    }

    let result = cable_sizing::calculate(&input)?;

    if json {
        print_json(&result)?;
    } else {
        report::print_cable(&input, &result);
    }
    if let Some(path) = &args.pdf {
        write_pdf(path, &pdf::render_cable_sizing_pdf(&input, &result, &settings.report)?)?;
    }
    Ok(())
}

fn run_circuits(args: &CircuitsArgs, settings: &CalcSettings, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let schedule: CircuitSchedule = serde_json::from_str(&text).map_err(CalcError::from)?;
    let results = circuit_schedule::calculate(&schedule)?;

    if json {
        print_json(&results)?;
    } else {
        report::print_schedule(&schedule, &results);
    }
    if let Some(path) = &args.pdf {
        write_pdf(
            path,
            &pdf::render_circuit_schedule_pdf(&schedule, &results, &settings.report)?,
        )?;
    }
    Ok(())
}

fn run_tables(args: &TablesArgs, json: bool) -> Result<()> {
    let material: ConductorMaterial = args.material.into();
    if json {
        print_json(&report::tables_json(material))?;
    } else {
        report::print_tables(material);
    }
    Ok(())
}

fn run_coords(text: &str, json: bool) -> Result<()> {
    let coords = parse_coordinates(text)?;
    if json {
        print_json(&serde_json::json!({
            "coordinates": coords,
            "latitude_dms": coords.latitude_dms(),
        }))?;
    } else {
        println!("Latitude:  {} ({})", coords.latitude, coords.latitude_dms());
        println!("Longitude: {}", coords.longitude);
    }
    Ok(())
}

fn run_item(path: &Path, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let item: CalculationItem = serde_json::from_str(&text).map_err(CalcError::from)?;
    info!(kind = item.calc_type(), label = item.label(), "running calculation");
    let output = item.calculate()?;

    if json {
        return print_json(&output);
    }
    match (&item, &output) {
        (CalculationItem::Shading(input), CalculationOutput::Shading(result)) => {
            report::print_shading(input, result)
        }
        (CalculationItem::CableSizing(input), CalculationOutput::CableSizing(result)) => {
            report::print_cable(input, result)
        }
        (
            CalculationItem::CircuitSchedule(schedule),
            CalculationOutput::CircuitSchedule { rows },
        ) => report::print_schedule(schedule, rows),
        _ => print_json(&output)?,
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref())?;
    match &cli.command {
        Command::Shading(args) => run_shading(args, &settings, cli.json),
        Command::Cable(args) => run_cable(args, &settings, cli.json),
        Command::Circuits(args) => run_circuits(args, &settings, cli.json),
        Command::Tables(args) => run_tables(args, cli.json),
        Command::Coords { text } => run_coords(text, cli.json),
        Command::Run { file } => run_item(file, cli.json),
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let calc_error = err.chain().find_map(|e| e.downcast_ref::<CalcError>());
            if cli.json {
                if let Some(calc_error) = calc_error {
                    if let Ok(text) = serde_json::to_string_pretty(calc_error) {
                        println!("{}", text);
                    }
                }
            }
            eprintln!("error: {:#}", err);
            match calc_error {
                Some(CalcError::InvalidInput { .. }) | Some(CalcError::MissingField { .. }) => {
                    ExitCode::from(2)
                }
                _ => ExitCode::FAILURE,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cable_args() {
        let cli = Cli::try_parse_from([
            "solcabo", "cable", "--current", "32", "--phases", "three", "--method", "c", "--temp",
            "-5",
        ])
        .unwrap();
        match cli.command {
            Command::Cable(args) => {
                assert_eq!(args.current, Some(32.0));
                assert_eq!(args.method, Some(InstallationMethod::C));
                assert_eq!(args.temp, Some(-5.0));
                let settings = CalcSettings::default();
                assert!(run_cable(&args, &settings, true).is_ok());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_invalid_shading_is_calc_error() {
        let cli = Cli::try_parse_from(["solcabo", "shading", "--lat-deg", "95"]).unwrap();
        let err = run(&cli).unwrap_err();
        let calc_error = err.chain().find_map(|e| e.downcast_ref::<CalcError>());
        assert_eq!(calc_error.and_then(CalcError::field), Some("lat_deg"));
    }

    #[test]
    fn test_run_item_file() {
        let path = std::env::temp_dir().join(format!("solcabo-run-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"type":"Shading","lat_deg":0,"lat_min":0,"lat_sec":0,"b_m":1.0,"beta_deg":0.0,"alfa_deg":0.0}"#,
        )
        .unwrap();
        assert!(run_item(&path, false).is_ok());

        std::fs::write(
            &path,
            r#"{"type":"CableSizing","current_a":-1.0,"voltage_v":230.0,"phases":"single_phase","length_m":25.0,"usage":"sockets","method":"B1","material":"copper","ambient_temp_c":30.0,"conductor_count":1,"insulation":"PVC"}"#,
        )
        .unwrap();
        let err = run_item(&path, true).unwrap_err();
        let _ = std::fs::remove_file(&path);
        let calc_error = err.chain().find_map(|e| e.downcast_ref::<CalcError>());
        assert_eq!(calc_error.and_then(CalcError::field), Some("current_a"));
    }

    #[test]
    fn test_southern_coordinates_parse() {
        let cli = Cli::try_parse_from(["solcabo", "coords", "-33.86, 151.2"]).unwrap();
        match &cli.command {
            Command::Coords { text } => assert_eq!(text, "-33.86, 151.2"),
            other => panic!("unexpected command {:?}", other),
        }
        assert!(run(&cli).is_ok());
    }

    #[test]
    fn test_unknown_method_rejected() {
        assert!(Cli::try_parse_from(["solcabo", "cable", "--method", "Z9"]).is_err());
    }
}

//! # Solcabo GUI Application
//!
//! Graphical interface for the shading and cable sizing calculators.
//! Built with Iced for Windows, macOS, Linux and the browser (WASM).
//!
//! Pages: Shading, Cable sizing, Circuit schedule and the RTIEBT tables.
//! Nothing is persisted; forms start from `calc.toml` when one is found
//! in the working directory (native builds only).

mod export;
mod forms;
mod ui;

use iced::widget::{column, container, rule};
use iced::{Element, Length, Task, Theme};
use tracing::{info, warn};
use uuid::Uuid;

use calc_core::calculations::cable_sizing::PhaseSystem;
use calc_core::calculations::circuit_schedule::{self, CableType, PowerUnit, ProtectionType};
use calc_core::calculations::CalculationItem;
use calc_core::pdf;
use calc_core::rtiebt::{ConductorMaterial, InstallationMethod, Insulation, UsageType};
use calc_core::{CalcResult, CalcSettings};

use forms::{CableField, CableForm, CircuitField, ScheduleForm, ShadingField, ShadingForm};

// ============================================================================
// Pages
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Shading,
    Cable,
    Schedule,
    Tables,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Shading, Page::Cable, Page::Schedule, Page::Tables];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Shading => "Shading",
            Page::Cable => "Cable sizing",
            Page::Schedule => "Circuit schedule",
            Page::Tables => "RTIEBT tables",
        }
    }
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone)]
pub enum Message {
    // Navigation and actions
    SelectPage(Page),
    ToggleDarkMode,
    ExportPdf,
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    PdfSaved(Result<Option<String>, String>),
    CopyJson,

    // Shading
    ShadingLabelChanged(String),
    ShadingFieldChanged(ShadingField, String),
    ShadingCoordsChanged(String),
    ApplyCoordinates,
    CalculateShading,
    ResetShading,

    // Cable sizing
    CableLabelChanged(String),
    CableFieldChanged(CableField, String),
    PhasesSelected(PhaseSystem),
    UsageSelected(UsageType),
    MethodSelected(InstallationMethod),
    MaterialSelected(ConductorMaterial),
    InsulationSelected(Insulation),
    CalculateCable,
    ResetCable,

    // Circuit schedule
    ScheduleLabelChanged(String),
    AddCircuit,
    RemoveCircuit(Uuid),
    CircuitFieldChanged(Uuid, CircuitField, String),
    CircuitUnitSelected(Uuid, PowerUnit),
    CircuitMaterialSelected(Uuid, ConductorMaterial),
    CircuitCableSelected(Uuid, CableType),
    CircuitParallelSelected(Uuid, u32),
    CircuitProtectionSelected(Uuid, ProtectionType),

    // Tables
    TablesMaterialSelected(ConductorMaterial),
}

// ============================================================================
// Application state
// ============================================================================

pub struct App {
    page: Page,
    dark_mode: bool,
    settings: CalcSettings,
    /// Where the settings came from, for the status bar
    settings_source: String,
    status: String,
    shading: ShadingForm,
    cable: CableForm,
    schedule: ScheduleForm,
    tables_material: ConductorMaterial,
}

/// Settings from `calc.toml`, or the defaults if it is missing or invalid
#[cfg(not(target_arch = "wasm32"))]
fn load_settings() -> (CalcSettings, String, Option<String>) {
    use calc_core::config::SETTINGS_FILE;
    use std::path::Path;

    let path = Path::new(SETTINGS_FILE);
    let (mut settings, source, problem) = match CalcSettings::load_or_default(path) {
        Ok(settings) if path.exists() => (settings, SETTINGS_FILE.to_string(), None),
        Ok(settings) => (settings, "defaults".to_string(), None),
        Err(e) => {
            warn!(error = %e, "ignoring settings file");
            (CalcSettings::default(), "defaults".to_string(), Some(e.to_string()))
        }
    };
    if settings.report.author.is_empty() {
        settings.report.author = whoami::realname();
    }
    (settings, source, problem)
}

#[cfg(target_arch = "wasm32")]
fn load_settings() -> (CalcSettings, String, Option<String>) {
    (CalcSettings::default(), "defaults".to_string(), None)
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

impl App {
    fn new() -> Self {
        let (settings, settings_source, problem) = load_settings();
        let (shading, cable, schedule) = forms::initial_forms(&settings);
        let status = match problem {
            Some(problem) => format!("Settings not loaded: {}", problem),
            None => "Ready".to_string(),
        };
        info!(source = %settings_source, "settings loaded");

        App {
            page: Page::default(),
            dark_mode: false,
            settings,
            settings_source,
            status,
            shading,
            cable,
            schedule,
            tables_material: ConductorMaterial::Copper,
        }
    }

    fn title(&self) -> String {
        format!("Solcabo - {}", self.page.title())
    }

    fn theme(&self) -> Theme {
        if self.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn can_export(&self) -> bool {
        match self.page {
            Page::Shading => self.shading.computed.is_some(),
            Page::Cable => self.cable.computed.is_some(),
            Page::Schedule => true,
            Page::Tables => false,
        }
    }

    /// The current page's calculation as a tagged item
    fn current_item(&self) -> Option<CalculationItem> {
        match self.page {
            Page::Shading => {
                let (input, _) = self.shading.computed.as_ref()?;
                Some(CalculationItem::Shading(input.clone()))
            }
            Page::Cable => {
                let (input, _) = self.cable.computed.as_ref()?;
                Some(CalculationItem::CableSizing(input.clone()))
            }
            Page::Schedule => {
                let schedule = self.schedule.schedule.clone();
                Some(CalculationItem::CircuitSchedule(schedule))
            }
            Page::Tables => None,
        }
    }

    /// Report bytes and a suggested file name for the current page
    fn render_pdf(&self) -> CalcResult<Option<(Vec<u8>, String)>> {
        let report = &self.settings.report;
        let rendered = match self.page {
            Page::Shading => match &self.shading.computed {
                Some((input, result)) => Some((
                    pdf::render_shading_pdf(input, result, report)?,
                    export::suggested_file_name("shading", &input.label),
                )),
                None => None,
            },
            Page::Cable => match &self.cable.computed {
                Some((input, result)) => Some((
                    pdf::render_cable_sizing_pdf(input, result, report)?,
                    export::suggested_file_name("cable-sizing", &input.label),
                )),
                None => None,
            },
            Page::Schedule => {
                let schedule = &self.schedule.schedule;
                let results = circuit_schedule::calculate(schedule)?;
                Some((
                    pdf::render_circuit_schedule_pdf(schedule, &results, report)?,
                    export::suggested_file_name("circuits", &schedule.label),
                ))
            }
            Page::Tables => None,
        };
        Ok(rendered)
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SelectPage(page) => {
                self.page = page;
            }
            Message::ToggleDarkMode => {
                self.dark_mode = !self.dark_mode;
            }
            Message::ExportPdf => return self.export_pdf(),
            Message::PdfSaved(outcome) => {
                self.status = match outcome {
                    Ok(Some(path)) => {
                        info!(%path, "report saved");
                        format!("PDF saved to {} ({})", path, timestamp())
                    }
                    Ok(None) => "Export cancelled".to_string(),
                    Err(e) => {
                        warn!(error = %e, "report not saved");
                        e
                    }
                };
            }
            Message::CopyJson => {
                let Some(item) = self.current_item() else {
                    return Task::none();
                };
                match serde_json::to_string_pretty(&item) {
                    Ok(json) => {
                        self.status =
                            format!("{} input copied as JSON ({})", item.calc_type(), timestamp());
                        return iced::clipboard::write(json);
                    }
                    Err(e) => self.status = format!("JSON error: {}", e),
                }
            }

            // Shading
            Message::ShadingLabelChanged(value) => self.shading.label = value,
            Message::ShadingFieldChanged(field, value) => *self.shading.field_mut(field) = value,
            Message::ShadingCoordsChanged(value) => self.shading.coords = value,
            Message::ApplyCoordinates => match self.shading.apply_coordinates() {
                Ok(()) => self.status = "Latitude set from coordinates".to_string(),
                Err(e) => self.status = e.to_string(),
            },
            Message::CalculateShading => {
                self.shading.calculate();
                self.status = match &self.shading.error {
                    Some(e) => e.to_string(),
                    None => format!("Shading calculated ({})", timestamp()),
                };
            }
            Message::ResetShading => {
                self.shading = ShadingForm::from_input(&self.settings.shading_input());
            }

            // Cable sizing
            Message::CableLabelChanged(value) => self.cable.label = value,
            Message::CableFieldChanged(field, value) => *self.cable.field_mut(field) = value,
            Message::PhasesSelected(phases) => self.cable.set_phases(phases),
            Message::UsageSelected(usage) => self.cable.input.usage = usage,
            Message::MethodSelected(method) => self.cable.input.method = method,
            Message::MaterialSelected(material) => self.cable.input.material = material,
            Message::InsulationSelected(insulation) => self.cable.input.insulation = insulation,
            Message::CalculateCable => {
                self.cable.calculate();
                self.status = match (&self.cable.error, &self.cable.computed) {
                    (Some(e), _) => e.to_string(),
                    (None, Some((_, result))) => format!("{} ({})", result.verdict(), timestamp()),
                    (None, None) => String::new(),
                };
            }
            Message::ResetCable => {
                self.cable = CableForm::from_input(&self.settings.cable_input());
            }

            // Circuit schedule
            Message::ScheduleLabelChanged(value) => self.schedule.schedule.label = value,
            Message::AddCircuit => {
                self.schedule.add_row();
            }
            Message::RemoveCircuit(id) => {
                if !self.schedule.remove_row(id) {
                    self.status = "The schedule keeps at least one circuit".to_string();
                }
            }
            Message::CircuitFieldChanged(id, field, value) => self.schedule.edit(id, field, value),
            Message::CircuitUnitSelected(id, unit) => {
                self.schedule.update_row(id, |row| row.set_power(row.power, unit));
            }
            Message::CircuitMaterialSelected(id, material) => {
                self.schedule.update_row(id, |row| row.material = material);
            }
            Message::CircuitCableSelected(id, cable) => {
                self.schedule.update_row(id, |row| row.cable_type = Some(cable));
            }
            Message::CircuitParallelSelected(id, parallel) => {
                self.schedule.update_row(id, |row| row.parallel = parallel);
            }
            Message::CircuitProtectionSelected(id, protection) => {
                self.schedule.update_row(id, |row| row.protection = protection);
            }

            // Tables
            Message::TablesMaterialSelected(material) => self.tables_material = material,
        }
        Task::none()
    }

    fn export_pdf(&mut self) -> Task<Message> {
        let (bytes, file_name) = match self.render_pdf() {
            Ok(Some(rendered)) => rendered,
            Ok(None) => {
                self.status = "Calculate first, then export".to_string();
                return Task::none();
            }
            Err(e) => {
                warn!(error = %e, "report not rendered");
                self.status = e.to_string();
                return Task::none();
            }
        };
        info!(bytes = bytes.len(), %file_name, "report rendered");
        self.deliver_pdf(bytes, file_name)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn deliver_pdf(&mut self, bytes: Vec<u8>, file_name: String) -> Task<Message> {
        Task::perform(export::save_pdf(bytes, file_name), Message::PdfSaved)
    }

    #[cfg(target_arch = "wasm32")]
    fn deliver_pdf(&mut self, bytes: Vec<u8>, file_name: String) -> Task<Message> {
        self.status = match export::download_pdf(&bytes, &file_name) {
            Ok(()) => format!("Downloaded {} ({})", file_name, timestamp()),
            Err(e) => format!("Download failed: {}", e),
        };
        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        let page: Element<'_, Message> = match self.page {
            Page::Shading => ui::shading_page::view(&self.shading),
            Page::Cable => ui::cable_page::view(&self.cable),
            Page::Schedule => ui::schedule_page::view(&self.schedule),
            Page::Tables => ui::tables_page::view(self.tables_material),
        };

        let content = column![
            ui::toolbar::view_header(self.page),
            ui::toolbar::view_toolbar(self.page, self.can_export(), self.dark_mode),
            rule::horizontal(1),
            container(page).height(Length::Fill).padding([8, 0]),
            rule::horizontal(1),
            ui::status_bar::view_status_bar(
                &self.settings_source,
                &self.settings.report.author,
                &self.status,
            ),
        ]
        .spacing(4)
        .padding(12);

        container(content).width(Length::Fill).height(Length::Fill).into()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,wgpu=warn,naga=warn"));
    let _ = Registry::default().with(filter).with(fmt::layer()).try_init();
}

pub fn main() -> iced::Result {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    #[cfg(not(target_arch = "wasm32"))]
    init_tracing();

    iced::application(App::new, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window_size((1280.0, 820.0))
        .run()
}

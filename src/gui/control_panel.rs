//! Control Panel Widget
//! Left side panel with the data source, view toggle and export controls.

use egui::{Color32, RichText};

/// User settings for the chart
#[derive(Default, Clone)]
pub struct UserSettings {
    /// Path or URL typed into the source field
    pub source_input: String,
    pub merge_by_organization: bool,
}

/// Left side control panel with source selection and view controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub status: String,
    pub is_loading: bool,
    pub export_enabled: bool,
    pub last_click: Option<String>,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            status: "Ready".to_string(),
            is_loading: false,
            export_enabled: false,
            last_click: None,
        }
    }
}

impl ControlPanel {
    pub fn new(settings: UserSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📈 Topology Chart")
                    .size(22.0)
                    .color(Color32::from_rgb(35, 90, 130)),
            );
            ui.label(
                RichText::new("Top tier & minimal set sizes")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let edit = ui.add(
                    egui::TextEdit::singleline(&mut self.settings.source_input)
                        .hint_text("CSV path or https:// URL")
                        .desired_width(f32::INFINITY),
                );
                if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    action = ControlPanelAction::Load;
                }

                ui.add_space(5.0);
                ui.horizontal(|ui| {
                    ui.add_enabled_ui(!self.is_loading, |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                        if ui.button("⟳ Load").clicked() {
                            action = ControlPanelAction::Load;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== View Section =====
        ui.label(RichText::new("⚙️ View").size(14.0).strong());
        ui.add_space(5.0);

        if ui
            .checkbox(
                &mut self.settings.merge_by_organization,
                "Merge by organization",
            )
            .changed()
        {
            action = ControlPanelAction::ViewModeChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Image").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportImage;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            if self.is_loading {
                ui.spinner();
            }
            let status_color = if self.status.starts_with("Error") {
                Color32::from_rgb(220, 53, 69)
            } else if self.status.starts_with("Loaded") {
                Color32::from_rgb(40, 167, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        });

        if let Some(click) = &self.last_click {
            ui.add_space(5.0);
            ui.label(RichText::new(click).size(11.0).monospace());
        }

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Load,
    ViewModeChanged,
    ExportImage,
}

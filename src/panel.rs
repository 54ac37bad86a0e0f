//! The pre-alignment panel UI.
//!
//! Renders the node selectors, placement toggle buttons and registration
//! button, and wires them to a [`PreAlignController`]. The panel owns no
//! scene state of its own beyond the vestigial threshold section's volume
//! picks; everything else lives in the controller or the host.

use eframe::egui;

use crate::config::{PreAlignConfig, SelectorConfig};
use crate::controller::PreAlignController;
use crate::host::{NodeId, SceneRegistry};
use crate::selection::FiducialRole;
use crate::threshold::ThresholdDelegate;

pub struct PreAlignPanel {
    cfg: PreAlignConfig,
    pub controller: PreAlignController,
    threshold: Option<ThresholdDelegate>,

    // Threshold section state (not part of the pre-alignment selection).
    input_volume: Option<NodeId>,
    output_volume: Option<NodeId>,
    threshold_value: f64,

    last_error: Option<String>,
}

impl PreAlignPanel {
    pub const ADD_MOVING_LABEL: &'static str = "⊕ Place fiducials on moving model";
    pub const ADD_FIXED_LABEL: &'static str = "⊕ Place fiducials on fixed model";
    pub const STOP_PLACING_LABEL: &'static str = "⏹ Stop placing fiducials";
    pub const REGISTER_LABEL: &'static str = "▶ Perform fiducial registration";
    pub const APPLY_THRESHOLD_LABEL: &'static str = "Apply threshold";

    pub const MODELS_SECTION: &'static str = "Select Models";
    pub const FIDUCIALS_SECTION: &'static str = "Select Markup Fiducials";
    pub const THRESHOLD_SECTION: &'static str = "Threshold Volume";

    pub fn new(cfg: PreAlignConfig, mut controller: PreAlignController) -> Self {
        // Refresh derived state once so the host starts out of placement mode.
        controller.on_selection_changed();
        Self {
            cfg,
            controller,
            threshold: None,
            input_volume: None,
            output_volume: None,
            threshold_value: 0.0,
            last_error: None,
        }
    }

    /// Attach the threshold delegate backing the threshold section.
    pub fn with_threshold(mut self, delegate: ThresholdDelegate) -> Self {
        self.threshold = Some(delegate);
        self
    }

    pub fn config(&self) -> &PreAlignConfig {
        &self.cfg
    }

    /// Last surfaced error, shown at the bottom of the panel.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Render the panel into `ui`, reading the node lists from `scene`.
    pub fn ui(&mut self, ui: &mut egui::Ui, scene: &mut dyn SceneRegistry) {
        if self.cfg.features.help_text && !self.cfg.module.help_text.is_empty() {
            ui.label(self.cfg.module.help_text.clone());
            ui.separator();
        }

        if self.cfg.features.model_section {
            self.models_section(ui, scene);
        }
        if self.cfg.features.fiducial_section {
            self.fiducials_section(ui, scene);
        }
        if self.cfg.features.threshold_section && self.threshold.is_some() {
            self.threshold_section(ui, scene);
        }

        if let Some(err) = &self.last_error {
            ui.separator();
            ui.colored_label(ui.visuals().error_fg_color, err);
        }
    }

    fn models_section(&mut self, ui: &mut egui::Ui, scene: &mut dyn SceneRegistry) {
        egui::CollapsingHeader::new(Self::MODELS_SECTION)
            .default_open(true)
            .show(ui, |ui| {
                let mut optical = self.controller.selection().optical_model.clone();
                if node_selector(ui, "optical_model", &self.cfg.optical_selector, scene, &mut optical)
                {
                    self.controller.set_optical_model(optical);
                }

                let mut template = self.controller.selection().template_model.clone();
                if node_selector(
                    ui,
                    "template_model",
                    &self.cfg.template_selector,
                    scene,
                    &mut template,
                ) {
                    self.controller.set_template_model(template);
                }
            });
    }

    fn fiducials_section(&mut self, ui: &mut egui::Ui, scene: &mut dyn SceneRegistry) {
        egui::CollapsingHeader::new(Self::FIDUCIALS_SECTION)
            .default_open(true)
            .show(ui, |ui| {
                let mut moving = self.controller.selection().moving_fiducials.clone();
                if node_selector(
                    ui,
                    "moving_fiducials",
                    &self.cfg.moving_selector,
                    scene,
                    &mut moving,
                ) {
                    self.controller.set_moving_fiducials(moving);
                }

                let mut fixed = self.controller.selection().fixed_fiducials.clone();
                if node_selector(
                    ui,
                    "fixed_fiducials",
                    &self.cfg.fixed_selector,
                    scene,
                    &mut fixed,
                ) {
                    self.controller.set_fixed_fiducials(fixed);
                }

                let ready = self.controller.ready();
                let placing = self.controller.placing();

                // While placing either button acts as the stop toggle.
                let moving_label = if placing {
                    Self::STOP_PLACING_LABEL
                } else {
                    Self::ADD_MOVING_LABEL
                };
                if ui
                    .add_enabled(ready || placing, egui::Button::new(moving_label))
                    .on_hover_text("Place at least three fiducials on the moving model.")
                    .clicked()
                {
                    self.controller.toggle_placement(FiducialRole::Moving);
                }

                let fixed_label = if placing {
                    Self::STOP_PLACING_LABEL
                } else {
                    Self::ADD_FIXED_LABEL
                };
                if ui
                    .add_enabled(ready || placing, egui::Button::new(fixed_label))
                    .on_hover_text("Place at least three fiducials on the fixed model.")
                    .clicked()
                {
                    self.controller.toggle_placement(FiducialRole::Fixed);
                }

                if self.cfg.features.registration_button {
                    ui.separator();
                    if ui
                        .add_enabled(ready, egui::Button::new(Self::REGISTER_LABEL))
                        .on_hover_text("Pre-align the scan with the template model.")
                        .clicked()
                    {
                        match self.controller.request_registration() {
                            Ok(()) => self.last_error = None,
                            Err(err) => self.last_error = Some(err.to_string()),
                        }
                    }
                }
            });
    }

    fn threshold_section(&mut self, ui: &mut egui::Ui, scene: &mut dyn SceneRegistry) {
        egui::CollapsingHeader::new(Self::THRESHOLD_SECTION)
            .default_open(false)
            .show(ui, |ui| {
                let mut input = self.input_volume.clone();
                if node_selector(
                    ui,
                    "input_volume",
                    &self.cfg.input_volume_selector,
                    scene,
                    &mut input,
                ) {
                    self.input_volume = input;
                }

                let mut output = self.output_volume.clone();
                if node_selector(
                    ui,
                    "output_volume",
                    &self.cfg.output_volume_selector,
                    scene,
                    &mut output,
                ) {
                    self.output_volume = output;
                }

                ui.horizontal(|ui| {
                    ui.label("Threshold");
                    ui.add(egui::DragValue::new(&mut self.threshold_value).speed(0.5));
                });

                let have_both = self.input_volume.is_some() && self.output_volume.is_some();
                let clicked = ui
                    .add_enabled(have_both, egui::Button::new(Self::APPLY_THRESHOLD_LABEL))
                    .clicked();
                if clicked {
                    // Identity validation happens inside the delegate.
                    if let (Some(input), Some(output), Some(delegate)) = (
                        self.input_volume.clone(),
                        self.output_volume.clone(),
                        self.threshold.as_mut(),
                    ) {
                        match delegate.run(&input, &output, self.threshold_value, false) {
                            Ok(()) => self.last_error = None,
                            Err(err) => self.last_error = Some(err.to_string()),
                        }
                    }
                }
            });
    }
}

/// Render one node selector from its config. Returns whether the binding
/// changed, including the case where the bound node vanished from the scene.
fn node_selector(
    ui: &mut egui::Ui,
    salt: &str,
    cfg: &SelectorConfig,
    scene: &mut dyn SceneRegistry,
    current: &mut Option<NodeId>,
) -> bool {
    let mut changed = false;
    let nodes = scene.nodes(cfg.kind);

    if let Some(cur) = current.clone() {
        if !nodes.iter().any(|n| n.id == cur) {
            *current = None;
            changed = true;
        }
    }

    ui.horizontal(|ui| {
        let selected_text = current
            .as_ref()
            .and_then(|id| nodes.iter().find(|n| &n.id == id))
            .map(|n| n.name.clone())
            .unwrap_or_else(|| "(none)".to_string());

        egui::ComboBox::from_id_salt(salt)
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                if cfg.allow_none
                    && ui.selectable_label(current.is_none(), "(none)").clicked()
                    && current.is_some()
                {
                    *current = None;
                    changed = true;
                }
                for node in &nodes {
                    let is_current = current.as_ref() == Some(&node.id);
                    if ui.selectable_label(is_current, &node.name).clicked() && !is_current {
                        *current = Some(node.id.clone());
                        changed = true;
                    }
                }
            })
            .response
            .on_hover_text(&cfg.tooltip);

        ui.label(&cfg.label);

        if cfg.allow_create && ui.button("⊞ New").on_hover_text("Create a new node").clicked() {
            let handle = scene.create(cfg.kind, &format!("New {}", cfg.label));
            if cfg.select_on_creation {
                *current = Some(handle.id);
                changed = true;
            }
        }
        if cfg.allow_remove {
            let have_current = current.is_some();
            if ui
                .add_enabled(have_current, egui::Button::new("🗑"))
                .on_hover_text("Remove the selected node")
                .clicked()
            {
                if let Some(id) = current.take() {
                    scene.remove(&id);
                    changed = true;
                }
            }
        }
    });

    changed
}

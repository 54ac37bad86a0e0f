//! Configuration types for the pre-alignment panel.
//!
//! Every widget is driven by an explicit configuration struct enumerated
//! once at construction; there is no dynamic property assignment anywhere.

use crate::host::NodeKind;

// ─────────────────────────────────────────────────────────────────────────────
// Module metadata
// ─────────────────────────────────────────────────────────────────────────────

/// Discoverable-plugin metadata: title, category, contributors, help text.
/// None of this affects behavior.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ModuleInfo {
    pub title: String,
    pub category: String,
    pub contributors: Vec<String>,
    pub help_text: String,
    pub acknowledgement_text: String,
}

impl Default for ModuleInfo {
    fn default() -> Self {
        Self {
            title: "Pre-Align Tracker".to_string(),
            category: "Registration".to_string(),
            contributors: Vec::new(),
            help_text: "Pre-aligns the segmented tracker from the optical scan with the \
                        loaded template model. Run this before surface registration of \
                        the tracker scan and tracker model."
                .to_string(),
            acknowledgement_text: String::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-widget configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for one node-selector widget.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SelectorConfig {
    /// Label rendered next to the combo box.
    pub label: String,
    /// Hover tooltip.
    pub tooltip: String,
    /// Node kind the selector offers.
    pub kind: NodeKind,
    /// Offer a "(none)" entry that unbinds the slot.
    pub allow_none: bool,
    /// Show a create button that adds a fresh node to the scene.
    pub allow_create: bool,
    /// Show a remove button that deletes the currently selected node.
    pub allow_remove: bool,
    /// Bind a freshly created node immediately.
    pub select_on_creation: bool,
}

impl SelectorConfig {
    /// Selector over model nodes: no creation, no removal from here.
    pub fn model(label: &str, tooltip: &str) -> Self {
        Self {
            label: label.to_string(),
            tooltip: tooltip.to_string(),
            kind: NodeKind::Model,
            allow_none: false,
            allow_create: false,
            allow_remove: false,
            select_on_creation: false,
        }
    }

    /// Selector over fiducial sets: the user may create and remove sets.
    pub fn fiducials(label: &str, tooltip: &str) -> Self {
        Self {
            label: label.to_string(),
            tooltip: tooltip.to_string(),
            kind: NodeKind::FiducialSet,
            allow_none: false,
            allow_create: true,
            allow_remove: true,
            select_on_creation: true,
        }
    }

    /// Selector over scalar volumes (threshold section).
    pub fn volume(label: &str, tooltip: &str) -> Self {
        Self {
            label: label.to_string(),
            tooltip: tooltip.to_string(),
            kind: NodeKind::Volume,
            allow_none: true,
            allow_create: false,
            allow_remove: false,
            select_on_creation: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Feature flags
// ─────────────────────────────────────────────────────────────────────────────

/// Toggle individual panel sections on or off.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FeatureFlags {
    /// Show the model-selection section.
    pub model_section: bool,
    /// Show the fiducial-selection and placement section.
    pub fiducial_section: bool,
    /// Show the registration button.
    pub registration_button: bool,
    /// Show the vestigial volume-threshold section. Off by default; it is
    /// unrelated to pre-alignment and exists only for scaffold parity.
    pub threshold_section: bool,
    /// Show the module help text at the top of the panel.
    pub help_text: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            model_section: true,
            fiducial_section: true,
            registration_button: true,
            threshold_section: false,
            help_text: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PreAlignConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration for the pre-alignment panel.
#[derive(Clone)]
pub struct PreAlignConfig {
    /// Plugin metadata (title, category, help text).
    pub module: ModuleInfo,
    /// Section visibility toggles.
    pub features: FeatureFlags,

    /// Optical tracker scan selector.
    pub optical_selector: SelectorConfig,
    /// Template tracker model selector.
    pub template_selector: SelectorConfig,
    /// Moving fiducial-set selector.
    pub moving_selector: SelectorConfig,
    /// Fixed fiducial-set selector.
    pub fixed_selector: SelectorConfig,

    /// Input volume selector (threshold section).
    pub input_volume_selector: SelectorConfig,
    /// Output volume selector (threshold section).
    pub output_volume_selector: SelectorConfig,

    /// Optional eframe native-window options for standalone runs.
    pub native_options: Option<eframe::NativeOptions>,
}

impl Default for PreAlignConfig {
    fn default() -> Self {
        Self {
            module: ModuleInfo::default(),
            features: FeatureFlags::default(),
            optical_selector: SelectorConfig::model(
                "Optical scan of tracker",
                "Choose the optical image of the segmented tracker",
            ),
            template_selector: SelectorConfig::model(
                "Template model of tracker",
                "Choose the template model of the tracker",
            ),
            moving_selector: SelectorConfig::fiducials(
                "Moving fiducials",
                "Choose the fiducial set placed on the optical scan",
            ),
            fixed_selector: SelectorConfig::fiducials(
                "Fixed fiducials",
                "Choose the fiducial set placed on the template model",
            ),
            input_volume_selector: SelectorConfig::volume(
                "Input volume",
                "Volume to threshold",
            ),
            output_volume_selector: SelectorConfig::volume(
                "Output volume",
                "Destination volume; must differ from the input",
            ),
            native_options: None,
        }
    }
}

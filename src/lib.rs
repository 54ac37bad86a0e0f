//! prealign crate root: re-exports and module wiring.
//!
//! A fiducial pre-alignment panel for scene-graph visualization hosts:
//! pick a scanned tracker model and a template model, place matching
//! fiducial markers on each, and hand both point sets to the host's
//! built-in fiducial-registration routine ahead of surface registration.
//!
//! The crate is organized into cohesive modules:
//! - `host`: capability traits the embedding host implements
//! - `selection`: the four-slot selection state and readiness predicate
//! - `controller`: the selection & placement state machine
//! - `events`: subscription to controller activity
//! - `config`: per-widget configuration and plugin metadata
//! - `panel`: the egui panel UI
//! - `threshold`: the vestigial volume-threshold delegate
//! - `memory`: in-memory host for demos and tests
//! - `run`: standalone native-window entry point

pub mod config;
pub mod controller;
pub mod events;
pub mod host;
pub mod memory;
pub mod panel;
pub mod run;
pub mod selection;
pub mod threshold;

// Public re-exports for a compact external API
pub use config::{FeatureFlags, ModuleInfo, PreAlignConfig, SelectorConfig};
pub use controller::PreAlignController;
pub use events::{AlignEvent, EventController, EventFilter, EventKind};
pub use host::{
    CommandError, CommandParams, CommandRunner, FiducialRegistration, InteractionMode,
    InteractionState, NodeHandle, NodeId, NodeKind, PlacementTarget, RegistrationError,
    SceneRegistry,
};
pub use memory::MemoryHost;
pub use panel::PreAlignPanel;
pub use run::run_panel;
pub use selection::{FiducialRole, Selection};
pub use threshold::{ThresholdDelegate, ThresholdError, THRESHOLD_MODULE};

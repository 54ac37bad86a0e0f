//! Standalone demo: the pre-alignment panel against the in-memory host.
//!
//! Run with: cargo run --features demo --example panel_demo

use prealign::{
    MemoryHost, NodeKind, PreAlignConfig, PreAlignController, PreAlignPanel, ThresholdDelegate,
};

fn main() -> eframe::Result<()> {
    env_logger::init();

    let host = MemoryHost::new();
    host.add_node(NodeKind::Model, "Tracker scan (optical)");
    host.add_node(NodeKind::Model, "Tracker template");
    host.add_node(NodeKind::FiducialSet, "Moving fiducials");
    host.add_node(NodeKind::FiducialSet, "Fixed fiducials");
    host.add_node(NodeKind::Volume, "CT head");
    host.add_node(NodeKind::Volume, "CT head (output)");

    let controller = PreAlignController::new(
        Box::new(host.clone()),
        Box::new(host.clone()),
        Box::new(host.clone()),
    );

    let mut cfg = PreAlignConfig::default();
    cfg.features.help_text = true;
    cfg.features.threshold_section = true;

    let panel = PreAlignPanel::new(cfg, controller)
        .with_threshold(ThresholdDelegate::new(Box::new(host.clone())));

    prealign::run_panel(panel, Box::new(host))
}

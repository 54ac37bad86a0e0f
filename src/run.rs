//! Standalone entry point: open the panel in a native window.
//!
//! Embedders normally call [`PreAlignPanel::ui`](crate::panel::PreAlignPanel::ui)
//! from their own update loop; [`run_panel`] exists for demos and manual
//! testing against a host implementation such as
//! [`MemoryHost`](crate::memory::MemoryHost).

use eframe::egui;

use crate::host::SceneRegistry;
use crate::panel::PreAlignPanel;

struct PanelApp {
    panel: PreAlignPanel,
    scene: Box<dyn SceneRegistry>,
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.panel.ui(ui, self.scene.as_mut());
        });
    }
}

/// Open the panel in a native window against the given scene registry.
/// Blocks until the window is closed.
pub fn run_panel(panel: PreAlignPanel, scene: Box<dyn SceneRegistry>) -> eframe::Result<()> {
    let title = panel.config().module.title.clone();
    let mut opts = panel
        .config()
        .native_options
        .clone()
        .unwrap_or_default();

    if opts.viewport.inner_size.is_none() {
        opts.viewport = opts.viewport.clone().with_inner_size(egui::vec2(460.0, 620.0));
    }

    let app = PanelApp { panel, scene };
    eframe::run_native(
        &title,
        opts,
        Box::new(|cc| {
            // Install Phosphor icon font before creating the app.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}

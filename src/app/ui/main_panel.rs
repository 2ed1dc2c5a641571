use eframe::egui;
use crate::app::app_core::DashboardApp;

pub fn render_main_panel(app: &mut DashboardApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        app.plot.ui(ui, app.state.latest.as_ref(), &app.display);
    });
}

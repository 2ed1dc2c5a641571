use eframe::egui;
use crate::app::app_core::DashboardApp;
use crate::app::state::LinkStatus;

pub fn render_status_bar(app: &mut DashboardApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("status_bar")
        .min_height(40.0)
        .show(ctx, |ui| {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.label("Status:");

                let status_color = match app.state.status {
                    LinkStatus::Waiting => egui::Color32::from_rgb(255, 165, 0), // 橙色
                    LinkStatus::Receiving => egui::Color32::from_rgb(0, 200, 0), // 绿色
                    LinkStatus::Closed => egui::Color32::from_rgb(200, 0, 0),    // 红色
                };
                ui.colored_label(status_color, app.state.status.label());

                ui.separator();
                ui.label(format!("UDP {}", app.state.listen_addr));

                ui.separator();
                render_status_details(app, ui);
            });
            ui.add_space(5.0);
        });
}

fn render_status_details(app: &DashboardApp, ui: &mut egui::Ui) {
    match &app.state.latest {
        Some(snapshot) => {
            ui.label(format!("T+{:.2}s", snapshot.sample.timestamp));
            ui.separator();
            ui.label(format!("Accepted: {}", snapshot.stats.accepted));
            ui.separator();
            ui.label(format!("Dropped: {}", snapshot.stats.dropped()));
            ui.separator();
            ui.label(format!(
                "Trail: {} / Series: {}",
                snapshot.trail.len(),
                snapshot.series.len()
            ));
        }
        None => {
            ui.label("waiting for telemetry...");
        }
    }
}

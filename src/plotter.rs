use egui::Color32;
use egui_plot::{Line, MarkerShape, Plot, PlotBounds, PlotPoints, Points};

use crate::config::DisplayConfig;
use crate::types::Snapshot;

/// 参考天体轮廓的分段数
const BODY_SEGMENTS: usize = 72;

/// 格式化数字为固定宽度的 y 轴标签
fn format_fixed_width_y_label(value: f64) -> String {
    let abs_value = value.abs();
    if abs_value >= 1000.0 {
        format!("{:-8.1e}", value)
    } else if abs_value >= 100.0 {
        format!("{:-8.2}", value)
    } else {
        // 能量抖动很小，保留4位小数
        format!("{:-8.4}", value)
    }
}

fn rgb(color: [u8; 3]) -> Color32 {
    Color32::from_rgb(color[0], color[1], color[2])
}

/// 参考天体在 X/Y 平面上的圆形轮廓
pub fn body_outline(radius_km: f64, segments: usize) -> Vec<[f64; 2]> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let angle = i as f64 / segments as f64 * std::f64::consts::TAU;
            [radius_km * angle.cos(), radius_km * angle.sin()]
        })
        .collect()
}

/// 能量图的 y 轴范围：多于一个点时取 mean ± band
pub fn energy_bounds(snapshot: &Snapshot, band: f64) -> Option<(f64, f64)> {
    if snapshot.series.len() <= 1 {
        return None;
    }
    let mean = snapshot.mean_energy?;
    if !mean.is_finite() {
        return None;
    }
    Some((mean - band, mean + band))
}

/// 把时间序列和能量序列配成折线点
pub fn energy_points(times: &[f64], energies: &[f64]) -> Vec<[f64; 2]> {
    times.iter().zip(energies).map(|(&t, &e)| [t, e]).collect()
}

/// 轨道视图和能量视图
#[derive(Debug, Clone)]
pub struct OrbitPlot {
    body_outline: Vec<[f64; 2]>,
}

impl OrbitPlot {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            body_outline: body_outline(config.body_radius_km, BODY_SEGMENTS),
        }
    }

    pub fn ui(&self, ui: &mut egui::Ui, snapshot: Option<&Snapshot>, config: &DisplayConfig) {
        ui.columns(2, |columns| {
            columns[0].heading("Real-Time Orbit (X/Y, km)");
            self.plot_orbit(&mut columns[0], snapshot, config);

            let title = match snapshot {
                Some(s) => format!("Integrator Stability ({})", s.energy_label()),
                None => "Integrator Stability (Specific Energy)".to_string(),
            };
            columns[1].heading(title);
            self.plot_energy(&mut columns[1], snapshot, config);
        });
    }

    fn plot_orbit(&self, ui: &mut egui::Ui, snapshot: Option<&Snapshot>, config: &DisplayConfig) {
        let limit = config.view_limit_km;

        Plot::new("orbit_view")
            .data_aspect(1.0)
            .x_axis_formatter(|v, _| format!("{:.0}", v.value))
            .y_axis_formatter(|v, _| format!("{:.0}", v.value))
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([-limit, -limit], [limit, limit]));

                plot_ui.line(
                    Line::new("Earth", PlotPoints::from(self.body_outline.clone()))
                        .color(rgb(config.colors.body))
                        .width(1.0),
                );

                let Some(snapshot) = snapshot else {
                    return;
                };

                let trail: Vec<[f64; 2]> = snapshot.trail().iter().map(|p| [p[0], p[1]]).collect();
                plot_ui.line(
                    Line::new("Trail", PlotPoints::from(trail))
                        .color(rgb(config.colors.trail))
                        .width(1.0),
                );

                let current = snapshot.current_position();
                plot_ui.points(
                    Points::new("Spacecraft", PlotPoints::from(vec![[current[0], current[1]]]))
                        .shape(MarkerShape::Asterisk)
                        .radius(6.0)
                        .color(rgb(config.colors.current)),
                );
            });
    }

    fn plot_energy(&self, ui: &mut egui::Ui, snapshot: Option<&Snapshot>, config: &DisplayConfig) {
        let Some(snapshot) = snapshot else {
            ui.label("waiting for telemetry...");
            return;
        };

        let bounds = energy_bounds(snapshot, config.energy_band);
        let times = snapshot.times();
        let points = energy_points(&times, &snapshot.energies());
        let (t_min, t_max) = match (times.first(), times.last()) {
            (Some(&first), Some(&last)) => (first, last.max(first + 1e-3)),
            _ => (0.0, 1.0),
        };

        Plot::new("energy_view")
            .x_axis_formatter(|v, _| format!("{:.1}s", v.value))
            .y_axis_formatter(|v, _| format_fixed_width_y_label(v.value))
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                if let Some((y_min, y_max)) = bounds {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max([t_min, y_min], [t_max, y_max]));
                }
                plot_ui.line(
                    Line::new("Energy", PlotPoints::from(points))
                        .color(rgb(config.colors.energy))
                        .width(1.0),
                );
            });
    }
}

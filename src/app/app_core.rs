use std::net::SocketAddr;
use std::time::Duration;

use crossbeam_channel::Receiver;
use eframe::{egui, Frame};
use log::{info, warn};

use crate::config::DisplayConfig;
use crate::plotter::OrbitPlot;
use crate::telemetry::ShutdownSignal;
use crate::types::Snapshot;
use super::state::DashboardState;

pub struct DashboardApp {
    // 统一的状态管理
    pub state: DashboardState,

    // 显示配置
    pub display: DisplayConfig,

    pub plot: OrbitPlot,

    // 关闭信号，窗口关闭或 Ctrl-C 时触发
    pub shutdown: ShutdownSignal,
}

impl DashboardApp {
    pub fn new(
        listen_addr: SocketAddr,
        snapshot_receiver: Receiver<Snapshot>,
        display: DisplayConfig,
        shutdown: ShutdownSignal,
    ) -> Self {
        let plot = OrbitPlot::new(&display);

        info!("Dashboard ready, waiting for telemetry on {}", listen_addr);

        Self {
            state: DashboardState::new(listen_addr, snapshot_receiver),
            display,
            plot,
            shutdown,
        }
    }
}

/// 在界面之外等待关闭信号，然后关闭窗口
///
/// 窗口最小化时 `update` 可能不再被调用，Ctrl-C 需要主动唤醒事件循环。
pub fn spawn_close_watcher(ctx: egui::Context, shutdown: ShutdownSignal) {
    let spawned = std::thread::Builder::new()
        .name("close-watcher".to_string())
        .spawn(move || {
            while !shutdown.is_triggered() {
                std::thread::sleep(Duration::from_millis(50));
            }
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            ctx.request_repaint();
        });
    if let Err(e) = spawned {
        warn!("Unable to start close watcher: {}", e);
    }
}

pub fn native_options(display: &DisplayConfig) -> eframe::NativeOptions {
    eframe::NativeOptions {
        vsync: display.vsync,
        hardware_acceleration: eframe::HardwareAcceleration::Preferred,
        viewport: egui::ViewportBuilder::default()
            .with_title(display.title.clone())
            .with_inner_size([display.width, display.height])
            .with_resizable(true),
        ..Default::default()
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // 深色主题
        ctx.set_visuals(egui::Visuals::dark());

        // Ctrl-C 也要关闭窗口
        if self.shutdown.is_triggered() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        self.state.poll_snapshots();

        // 渲染UI组件
        crate::app::ui::render_status_bar(self, ctx);
        crate::app::ui::render_main_panel(self, ctx);

        ctx.request_repaint_after(Duration::from_millis(16));
    }
}

use std::error::Error;
use std::thread;
use std::time::Duration;

use log::{error, info};

use orbitscope::app::{native_options, snapshot_channel, spawn_close_watcher, DashboardApp};
use orbitscope::config::{AppConfig, ConfigManager};
use orbitscope::history::BoundedHistory;
use orbitscope::logger;
use orbitscope::telemetry::{
    join_telemetry, FixedPause, LogSink, ShutdownSignal, TelemetryError, TelemetryLoop, UdpSource,
};

fn main() {
    logger::init_logger();
    info!("OrbitScope starting");

    let config = match ConfigManager::load() {
        Ok(manager) => manager.get_config().clone(),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config) {
        error!("OrbitScope failed: {}", e);
        std::process::exit(1);
    }
    info!("Closing dashboard");
}

fn run(config: AppConfig) -> Result<(), Box<dyn Error>> {
    let addr = config.network.listen_addr()?;
    let source = UdpSource::bind(addr).map_err(|source| TelemetryError::Bind { addr, source })?;
    let listen_addr = source.local_addr();

    let shutdown = ShutdownSignal::new().with_waker(source.waker());
    shutdown.spawn_ctrl_c_listener()?;

    let history = BoundedHistory::new(config.history.trail_capacity, config.history.energy_capacity);
    let energy_model = config.physics.energy_model();
    let pacer = FixedPause(Duration::from_millis(config.display.render_pause_ms));

    if config.display.headless {
        let sink = LogSink::new(config.display.log_every, config.display.body_radius_km);
        let mut telemetry = TelemetryLoop::new(source, sink, history, energy_model)
            .with_buffer_size(config.network.recv_buffer_size)
            .with_shutdown_flag(shutdown.flag())
            .with_pacer(pacer);
        telemetry.run()?;
        return Ok(());
    }

    let (sink, snapshot_receiver) = snapshot_channel(shutdown.flag());
    let mut telemetry = TelemetryLoop::new(source, sink, history, energy_model)
        .with_buffer_size(config.network.recv_buffer_size)
        .with_shutdown_flag(shutdown.flag())
        .with_pacer(pacer);
    let telemetry_handle = thread::Builder::new()
        .name("telemetry".to_string())
        .spawn(move || telemetry.run())?;

    let app = DashboardApp::new(listen_addr, snapshot_receiver, config.display.clone(), shutdown.clone());
    let watcher_signal = shutdown.clone();
    let gui_result = eframe::run_native(
        &config.display.title,
        native_options(&config.display),
        Box::new(move |cc| {
            spawn_close_watcher(cc.egui_ctx.clone(), watcher_signal);
            Ok(Box::new(app))
        }),
    );

    // GUI 关闭后，发送关闭信号给遥测线程
    info!("GUI closed, signaling telemetry thread to shutdown");
    shutdown.trigger();

    // 遥测失败优先于界面错误上报，两种模式退出码一致
    let stats = join_telemetry(telemetry_handle)?;
    info!("Telemetry thread finished ({} packets accepted)", stats.accepted);

    gui_result?;
    Ok(())
}

use log::{error, info};

use orbitscope::config::ConfigManager;
use orbitscope::logger;
use orbitscope::sim::run_simulator;
use orbitscope::telemetry::ShutdownSignal;

fn main() {
    logger::init_logger();
    info!("Orbit simulator starting, press Ctrl-C to stop");

    let config = match ConfigManager::load() {
        Ok(manager) => manager.get_config().simulator.clone(),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let shutdown = ShutdownSignal::new();
    if let Err(e) = shutdown.spawn_ctrl_c_listener() {
        error!("Unable to install Ctrl-C handler: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run_simulator(&config, &shutdown) {
        error!("Simulator failed: {}", e);
        std::process::exit(1);
    }
}

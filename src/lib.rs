pub mod app;
pub mod codec;
pub mod config;
pub mod energy;
pub mod history;
pub mod logger;
pub mod plotter;
pub mod sim;
pub mod telemetry;
pub mod types;
pub mod units;

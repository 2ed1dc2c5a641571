pub mod app_core;
pub mod channel_sink;
pub mod state;
pub mod ui;

pub use app_core::{native_options, spawn_close_watcher, DashboardApp};
pub use channel_sink::{snapshot_channel, ChannelSink};
pub use state::{DashboardState, LinkStatus};

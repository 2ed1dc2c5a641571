pub mod telemetry_sample;
pub mod energy_record;
pub mod snapshot;
pub mod loop_stats;

pub use telemetry_sample::{norm, Quat, TelemetrySample, Vec3};
pub use energy_record::EnergyRecord;
pub use snapshot::Snapshot;
pub use loop_stats::LoopStats;

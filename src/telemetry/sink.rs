use std::time::Duration;

use log::info;

use crate::types::{norm, Snapshot};

/// 渲染端已经关闭，遥测循环应当停止
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("render sink closed")]
pub struct SinkClosed;

/// 渲染端，每个成功解码的数据报最多调用一次，同步执行
pub trait RenderSink {
    fn render(&mut self, snapshot: &Snapshot) -> Result<(), SinkClosed>;
}

/// 无界面模式：每 N 个快照打印一行状态
#[derive(Debug)]
pub struct LogSink {
    every: u64,
    body_radius_km: f64,
    count: u64,
}

impl LogSink {
    pub fn new(every: u64, body_radius_km: f64) -> Self {
        Self {
            every: every.max(1),
            body_radius_km,
            count: 0,
        }
    }

    pub fn status_line(&self, snapshot: &Snapshot) -> String {
        let altitude = norm(&snapshot.sample.position) - self.body_radius_km;
        let speed = norm(&snapshot.sample.velocity);
        format!(
            "T+{:.2}s | ALT: {:.3} km | V: {:.4} km/s | {} | dropped: {}",
            snapshot.sample.timestamp,
            altitude,
            speed,
            snapshot.energy_label(),
            snapshot.stats.dropped()
        )
    }
}

impl RenderSink for LogSink {
    fn render(&mut self, snapshot: &Snapshot) -> Result<(), SinkClosed> {
        if self.count % self.every == 0 {
            info!("{}", self.status_line(snapshot));
        }
        self.count += 1;
        Ok(())
    }
}

/// 每次渲染之后的节奏控制
pub trait Pacer {
    fn pause(&mut self);
}

/// 不暂停
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPause;

impl Pacer for NoPause {
    fn pause(&mut self) {}
}

/// 固定时长的 sleep
#[derive(Debug, Clone, Copy)]
pub struct FixedPause(pub Duration);

impl Pacer for FixedPause {
    fn pause(&mut self) {
        if !self.0.is_zero() {
            std::thread::sleep(self.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LoopStats, TelemetrySample};

    #[test]
    fn status_line_reports_altitude_and_speed() {
        let sink = LogSink::new(50, 6378.137);
        let snapshot = Snapshot {
            sample: TelemetrySample::new(1.5, [6778.137, 0.0, 0.0], [0.0, 7.66, 0.0], [1.0, 0.0, 0.0, 0.0]),
            energy: -29.4,
            trail: Vec::new(),
            series: Vec::new(),
            mean_energy: None,
            stats: LoopStats { received: 3, accepted: 2, malformed: 1, degenerate: 0 },
        };

        let line = sink.status_line(&snapshot);
        assert!(line.starts_with("T+1.50s | ALT: 400.000 km | V: 7.6600 km/s"));
        assert!(line.contains("E = -29.4000"));
        assert!(line.ends_with("dropped: 1"));
    }

    #[test]
    fn zero_interval_is_clamped() {
        let mut sink = LogSink::new(0, 6378.137);
        let snapshot = Snapshot {
            sample: TelemetrySample::new(0.0, [7000.0, 0.0, 0.0], [0.0, 7.5, 0.0], [1.0, 0.0, 0.0, 0.0]),
            energy: -28.8,
            trail: Vec::new(),
            series: Vec::new(),
            mean_energy: None,
            stats: LoopStats::default(),
        };
        assert!(sink.render(&snapshot).is_ok());
        assert!(sink.render(&snapshot).is_ok());
        assert_eq!(sink.count, 2);
    }
}

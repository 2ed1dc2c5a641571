use super::{EnergyRecord, LoopStats, TelemetrySample, Vec3};

/// 交给渲染端的只读快照
///
/// 每个周期都是一份独立拷贝，渲染端不能依赖它在下个周期之后仍然有效。
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// 当前样本（显示单位：km, km/s）
    pub sample: TelemetrySample,
    pub energy: f64,
    pub trail: Vec<Vec3>,
    pub series: Vec<EnergyRecord>,
    pub mean_energy: Option<f64>,
    /// 生成快照时的计数器
    pub stats: LoopStats,
}

impl Snapshot {
    pub fn current_position(&self) -> Vec3 {
        self.sample.position
    }

    pub fn energy_label(&self) -> String {
        format!("E = {:.4}", self.energy)
    }

    pub fn trail(&self) -> &[Vec3] {
        &self.trail
    }

    pub fn times(&self) -> Vec<f64> {
        self.series.iter().map(|r| r.time).collect()
    }

    pub fn energies(&self) -> Vec<f64> {
        self.series.iter().map(|r| r.energy).collect()
    }
}

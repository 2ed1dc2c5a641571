/// 能量序列中的一个 (时间, 能量) 记录
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyRecord {
    pub time: f64,
    pub energy: f64,
}

impl EnergyRecord {
    pub fn new(time: f64, energy: f64) -> Self {
        Self { time, energy }
    }
}

/// 三维向量，位置或速度
pub type Vec3 = [f64; 3];

/// 姿态四元数 (w, x, y, z)
pub type Quat = [f64; 4];

/// 单个遥测样本，每个有效数据报产生一个，创建后不再修改
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    pub timestamp: f64,
    pub position: Vec3,
    pub velocity: Vec3,
    pub orientation: Quat,
}

impl TelemetrySample {
    pub fn new(timestamp: f64, position: Vec3, velocity: Vec3, orientation: Quat) -> Self {
        Self {
            timestamp,
            position,
            velocity,
            orientation,
        }
    }
}

/// 欧几里得范数
pub fn norm(v: &Vec3) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

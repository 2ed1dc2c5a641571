//! 两体引力加 J2 摄动，RK4 积分（单位：m, m/s）

use crate::types::{norm, Quat, Vec3};

/// 地球引力常数 (m^3/s^2)
pub const MU_EARTH_M: f64 = 3.986004418e14;
/// 地球赤道半径 (m)
pub const R_EARTH_M: f64 = 6378137.0;
/// J2 摄动系数（地球扁率）
pub const J2: f64 = 1.08262668e-3;

fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn scale(a: Vec3, k: f64) -> Vec3 {
    [a[0] * k, a[1] * k, a[2] * k]
}

/// 模拟器的完整状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub attitude: Quat,
    /// 机体角速度 (rad/s)
    pub body_rates: Vec3,
    pub time: f64,
}

impl SimState {
    /// 赤道面内的近圆轨道
    pub fn low_earth_orbit(altitude_m: f64, speed_m_s: f64, body_rates: Vec3) -> Self {
        Self {
            position: [R_EARTH_M + altitude_m, 0.0, 0.0],
            velocity: [0.0, speed_m_s, 0.0],
            attitude: [1.0, 0.0, 0.0, 0.0],
            body_rates,
            time: 0.0,
        }
    }
}

/// 引力加速度，`with_j2` 为 false 时只有点质量项
pub fn acceleration(position: &Vec3, with_j2: bool) -> Vec3 {
    let r_sq = position[0] * position[0] + position[1] * position[1] + position[2] * position[2];
    let r = r_sq.sqrt();

    let mu_r3 = MU_EARTH_M / (r_sq * r);
    let monopole = scale(*position, -mu_r3);
    if !with_j2 {
        return monopole;
    }

    let z2_r2 = position[2] * position[2] / r_sq;
    let j2_factor = 1.5 * J2 * MU_EARTH_M * R_EARTH_M * R_EARTH_M / (r_sq * r_sq);
    let j2 = [
        j2_factor * position[0] / r * (5.0 * z2_r2 - 1.0),
        j2_factor * position[1] / r * (5.0 * z2_r2 - 1.0),
        j2_factor * position[2] / r * (5.0 * z2_r2 - 3.0),
    ];

    add(monopole, j2)
}

/// 由角速度积分姿态四元数 dq/dt = 0.5 * q * omega，之后归一化
pub fn integrate_attitude(q: Quat, omega: &Vec3, dt: f64) -> Quat {
    let [w, x, y, z] = q;
    let [ox, oy, oz] = *omega;

    let next = [
        w + 0.5 * (-x * ox - y * oy - z * oz) * dt,
        x + 0.5 * (w * ox + y * oz - z * oy) * dt,
        y + 0.5 * (w * oy - x * oz + z * ox) * dt,
        z + 0.5 * (w * oz + x * oy - y * ox) * dt,
    ];
    let mag = next.iter().map(|c| c * c).sum::<f64>().sqrt();
    next.map(|c| c / mag)
}

/// 一步 RK4
pub fn step_rk4(s: &mut SimState, dt: f64, with_j2: bool) {
    let v1 = s.velocity;
    let a1 = acceleration(&s.position, with_j2);

    let v2 = add(s.velocity, scale(a1, 0.5 * dt));
    let a2 = acceleration(&add(s.position, scale(v1, 0.5 * dt)), with_j2);

    let v3 = add(s.velocity, scale(a2, 0.5 * dt));
    let a3 = acceleration(&add(s.position, scale(v2, 0.5 * dt)), with_j2);

    let v4 = add(s.velocity, scale(a3, dt));
    let a4 = acceleration(&add(s.position, scale(v3, dt)), with_j2);

    let dv = add(add(v1, scale(v2, 2.0)), add(scale(v3, 2.0), v4));
    let da = add(add(a1, scale(a2, 2.0)), add(scale(a3, 2.0), a4));
    s.position = add(s.position, scale(dv, dt / 6.0));
    s.velocity = add(s.velocity, scale(da, dt / 6.0));

    s.attitude = integrate_attitude(s.attitude, &s.body_rates, dt);
    s.time += dt;
}

/// 高度 (m)
pub fn altitude(position: &Vec3) -> f64 {
    norm(position) - R_EARTH_M
}

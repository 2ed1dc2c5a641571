use serde::{Deserialize, Serialize};

use crate::types::{norm, Vec3};

/// 地球引力常数 μ (km^3/s^2)
pub const MU_EARTH_KM: f64 = 398600.4418;

/// 比机械能 `E = |v|^2 / 2 - mu / |r|`
///
/// `|r| == 0` 时结果不是有限值，这里不做保护。
pub fn specific_energy(position_km: &Vec3, velocity_km_s: &Vec3, mu: f64) -> f64 {
    let r = norm(position_km);
    let v = norm(velocity_km_s);
    v * v / 2.0 - mu / r
}

/// 退化样本（位置为零向量或能量非有限值）的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    /// 非有限能量直接写入历史
    #[default]
    Propagate,
    /// 丢弃该样本，与格式错误的数据报同样处理
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("degenerate sample: |r| = {radius}, energy = {energy}")]
pub struct DegenerateSample {
    pub radius: f64,
    pub energy: f64,
}

/// 能量模型：引力常数加退化样本策略
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyModel {
    pub mu: f64,
    pub policy: DegeneratePolicy,
}

impl Default for EnergyModel {
    fn default() -> Self {
        Self {
            mu: MU_EARTH_KM,
            policy: DegeneratePolicy::Propagate,
        }
    }
}

impl EnergyModel {
    pub fn new(mu: f64, policy: DegeneratePolicy) -> Self {
        Self { mu, policy }
    }

    pub fn evaluate(&self, position_km: &Vec3, velocity_km_s: &Vec3) -> Result<f64, DegenerateSample> {
        let energy = specific_energy(position_km, velocity_km_s, self.mu);
        if self.policy == DegeneratePolicy::Reject {
            let radius = norm(position_km);
            if radius == 0.0 || !energy.is_finite() {
                return Err(DegenerateSample { radius, energy });
            }
        }
        Ok(energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leo_reference_energy() {
        let e = specific_energy(&[7000.0, 0.0, 0.0], &[0.0, 7.5, 0.0], MU_EARTH_KM);
        let expected = 7.5 * 7.5 / 2.0 - 398600.4418 / 7000.0;

        assert!((e - expected).abs() < 1e-12);
        assert!((e - (-28.8179)).abs() < 1e-4);
    }

    #[test]
    fn energy_is_rotation_invariant() {
        let a = specific_energy(&[7000.0, 0.0, 0.0], &[0.0, 7.5, 0.0], MU_EARTH_KM);
        let b = specific_energy(&[0.0, 0.0, -7000.0], &[7.5, 0.0, 0.0], MU_EARTH_KM);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn zero_radius_propagates_by_default() {
        let model = EnergyModel::default();
        let e = model.evaluate(&[0.0, 0.0, 0.0], &[0.0, 7.5, 0.0]).unwrap();
        assert!(!e.is_finite());
    }

    #[test]
    fn zero_radius_rejected_when_configured() {
        let model = EnergyModel::new(MU_EARTH_KM, DegeneratePolicy::Reject);
        let err = model.evaluate(&[0.0, 0.0, 0.0], &[0.0, 7.5, 0.0]).unwrap_err();
        assert_eq!(err.radius, 0.0);

        let nan = model.evaluate(&[f64::NAN, 0.0, 0.0], &[0.0, 7.5, 0.0]);
        assert!(nan.is_err());

        let ok = model.evaluate(&[7000.0, 0.0, 0.0], &[0.0, 7.5, 0.0]);
        assert!(ok.is_ok());
    }

    #[test]
    fn policy_parses_from_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: DegeneratePolicy,
        }
        let w: Wrapper = toml::from_str("policy = \"reject\"").unwrap();
        assert_eq!(w.policy, DegeneratePolicy::Reject);
    }
}

use crate::types::TelemetrySample;

/// m -> km, m/s -> km/s
pub const METERS_PER_KM: f64 = 1000.0;

/// 把位置和速度转换为显示单位，时间戳和姿态原样保留
pub fn to_display_units(sample: TelemetrySample) -> TelemetrySample {
    TelemetrySample {
        position: sample.position.map(|c| c / METERS_PER_KM),
        velocity: sample.velocity.map(|c| c / METERS_PER_KM),
        ..sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_position_and_velocity_only() {
        let raw = TelemetrySample::new(
            12.5,
            [1000.0, 2000.0, -3000.0],
            [0.0, 7500.0, -250.0],
            [0.5, 0.5, 0.5, 0.5],
        );
        let km = to_display_units(raw);

        assert_eq!(km.position, [1.0, 2.0, -3.0]);
        assert_eq!(km.velocity, [0.0, 7.5, -0.25]);
        assert_eq!(km.timestamp, 12.5);
        assert_eq!(km.orientation, [0.5, 0.5, 0.5, 0.5]);
    }
}

use crate::types::TelemetrySample;

/// 每个数据报中的 f64 字段数量
pub const FIELD_COUNT: usize = 11;

/// 数据报长度：11 个小端 f64
pub const PACKET_SIZE: usize = FIELD_COUNT * 8;

/// 长度不符的数据报，这是唯一的校验
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("malformed packet: got {len} bytes, expected {}", PACKET_SIZE)]
pub struct MalformedPacket {
    pub len: usize,
}

/// 解码一个数据报
///
/// 字段顺序 `[t, px, py, pz, vx, vy, vz, qw, qx, qy, qz]`，不做校验和或取值检查。
pub fn decode(bytes: &[u8]) -> Result<TelemetrySample, MalformedPacket> {
    if bytes.len() != PACKET_SIZE {
        return Err(MalformedPacket { len: bytes.len() });
    }

    let mut fields = [0.0f64; FIELD_COUNT];
    for (field, chunk) in fields.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(chunk);
        *field = f64::from_le_bytes(raw);
    }

    Ok(TelemetrySample {
        timestamp: fields[0],
        position: [fields[1], fields[2], fields[3]],
        velocity: [fields[4], fields[5], fields[6]],
        orientation: [fields[7], fields[8], fields[9], fields[10]],
    })
}

/// 编码为线上格式，`decode` 的逆操作
pub fn encode(sample: &TelemetrySample) -> [u8; PACKET_SIZE] {
    let fields = [
        sample.timestamp,
        sample.position[0],
        sample.position[1],
        sample.position[2],
        sample.velocity[0],
        sample.velocity[1],
        sample.velocity[2],
        sample.orientation[0],
        sample.orientation[1],
        sample.orientation[2],
        sample.orientation[3],
    ];

    let mut packet = [0u8; PACKET_SIZE];
    for (chunk, field) in packet.chunks_exact_mut(8).zip(fields.iter()) {
        chunk.copy_from_slice(&field.to_le_bytes());
    }
    packet
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reference_packet() -> Vec<u8> {
        let fields = [0.0, 7_000_000.0, 0.0, 0.0, 0.0, 7_500.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        fields.iter().flat_map(|f: &f64| f.to_le_bytes()).collect()
    }

    #[test]
    fn packet_size_is_88() {
        assert_eq!(PACKET_SIZE, 88);
    }

    #[test]
    fn decodes_fields_in_wire_order() {
        let sample = decode(&reference_packet()).unwrap();

        assert_eq!(sample.timestamp, 0.0);
        assert_eq!(sample.position, [7_000_000.0, 0.0, 0.0]);
        assert_eq!(sample.velocity, [0.0, 7_500.0, 0.0]);
        assert_eq!(sample.orientation, [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn rejects_short_and_long_payloads() {
        assert_eq!(decode(&[]), Err(MalformedPacket { len: 0 }));
        assert_eq!(decode(&[0u8; 87]), Err(MalformedPacket { len: 87 }));
        assert_eq!(decode(&[0u8; 89]), Err(MalformedPacket { len: 89 }));
        assert_eq!(decode(&[0u8; 1024]), Err(MalformedPacket { len: 1024 }));
    }

    #[test]
    fn non_finite_fields_are_not_checked() {
        let mut packet = reference_packet();
        packet[8..16].copy_from_slice(&f64::NAN.to_le_bytes());
        let sample = decode(&packet).unwrap();
        assert!(sample.position[0].is_nan());
    }

    proptest! {
        #[test]
        fn any_other_length_is_malformed(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            prop_assume!(bytes.len() != PACKET_SIZE);
            prop_assert_eq!(decode(&bytes), Err(MalformedPacket { len: bytes.len() }));
        }

        #[test]
        fn valid_payload_reencodes_byte_exact(bytes in proptest::collection::vec(any::<u8>(), PACKET_SIZE)) {
            let sample = decode(&bytes).unwrap();
            prop_assert_eq!(encode(&sample).to_vec(), bytes);
        }
    }
}

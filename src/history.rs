use std::collections::VecDeque;

use crate::types::{EnergyRecord, Vec3};

/// 轨迹缓冲区默认容量
pub const TRAIL_CAPACITY: usize = 500;
/// 能量序列默认容量
pub const ENERGY_CAPACITY: usize = 100;

/// 固定容量的 FIFO 缓冲区，满了之后每次插入都淘汰最旧的一个
#[derive(Debug, Clone)]
pub struct BoundedBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// 追加元素，超出容量时从前面移除 - O(1)操作
    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn back(&self) -> Option<&T> {
        self.items.back()
    }

    /// 按插入顺序导出（最旧的在前）
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.iter().cloned().collect()
    }
}

/// 轨迹和能量序列两个独立的有界缓冲区
#[derive(Debug, Clone)]
pub struct BoundedHistory {
    positions: BoundedBuffer<Vec3>,
    energy: BoundedBuffer<EnergyRecord>,
}

impl Default for BoundedHistory {
    fn default() -> Self {
        Self::new(TRAIL_CAPACITY, ENERGY_CAPACITY)
    }
}

impl BoundedHistory {
    pub fn new(trail_capacity: usize, energy_capacity: usize) -> Self {
        Self {
            positions: BoundedBuffer::new(trail_capacity),
            energy: BoundedBuffer::new(energy_capacity),
        }
    }

    pub fn append_position(&mut self, position: Vec3) {
        self.positions.push(position);
    }

    pub fn append_energy_record(&mut self, record: EnergyRecord) {
        self.energy.push(record);
    }

    /// 能量序列的算术平均，空序列返回 None
    pub fn mean_energy(&self) -> Option<f64> {
        if self.energy.is_empty() {
            return None;
        }
        let sum: f64 = self.energy.iter().map(|r| r.energy).sum();
        Some(sum / self.energy.len() as f64)
    }

    pub fn positions(&self) -> &BoundedBuffer<Vec3> {
        &self.positions
    }

    pub fn energy_series(&self) -> &BoundedBuffer<EnergyRecord> {
        &self.energy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn trail_evicts_oldest_after_500() {
        let mut history = BoundedHistory::default();
        for i in 0..501 {
            history.append_position([i as f64, 0.0, 0.0]);
        }

        let trail = history.positions().to_vec();
        assert_eq!(trail.len(), 500);
        assert_eq!(trail[0], [1.0, 0.0, 0.0]);
        assert_eq!(trail[499], [500.0, 0.0, 0.0]);
    }

    #[test]
    fn energy_series_evicts_oldest_after_100() {
        let mut history = BoundedHistory::default();
        for i in 0..101 {
            history.append_energy_record(EnergyRecord::new(i as f64, -28.0 - i as f64));
        }

        let series = history.energy_series();
        assert_eq!(series.len(), 100);
        assert_eq!(series.front(), Some(&EnergyRecord::new(1.0, -29.0)));
        assert_eq!(series.back(), Some(&EnergyRecord::new(100.0, -128.0)));
        // 轨迹缓冲区不受影响
        assert!(history.positions().is_empty());
    }

    #[test]
    fn mean_energy_empty_is_none() {
        let history = BoundedHistory::default();
        assert_eq!(history.mean_energy(), None);
    }

    #[test]
    fn mean_energy_over_current_window() {
        let mut history = BoundedHistory::new(10, 2);
        history.append_energy_record(EnergyRecord::new(0.0, -100.0));
        history.append_energy_record(EnergyRecord::new(1.0, -30.0));
        history.append_energy_record(EnergyRecord::new(2.0, -28.0));

        assert_eq!(history.mean_energy(), Some(-29.0));
    }

    #[test]
    fn buffer_holds_non_clone_items() {
        #[derive(Debug, PartialEq)]
        struct Token(u32);

        let mut buffer = BoundedBuffer::new(2);
        buffer.push(Token(1));
        buffer.push(Token(2));
        buffer.push(Token(3));

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.front(), Some(&Token(2)));
        assert_eq!(buffer.back(), Some(&Token(3)));
    }

    proptest! {
        #[test]
        fn length_never_exceeds_capacity(capacity in 1usize..64, pushes in 0usize..256) {
            let mut buffer = BoundedBuffer::new(capacity);
            for i in 0..pushes {
                buffer.push(i);
                prop_assert!(buffer.len() <= capacity);
            }
            prop_assert_eq!(buffer.len(), pushes.min(capacity));
            // 保留的是最新的若干个，顺序不变
            let expected: Vec<usize> = (pushes.saturating_sub(capacity)..pushes).collect();
            prop_assert_eq!(buffer.to_vec(), expected);
        }
    }
}

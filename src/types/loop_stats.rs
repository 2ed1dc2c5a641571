/// 遥测循环维护的计数器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub received: u64,
    pub accepted: u64,
    pub malformed: u64,
    pub degenerate: u64,
}

impl LoopStats {
    /// 长度不符和被拒绝的退化样本之和
    pub fn dropped(&self) -> u64 {
        self.malformed + self.degenerate
    }
}

use std::net::SocketAddr;

use crossbeam_channel::{Receiver, TryRecvError};

use crate::types::Snapshot;

/// 界面状态管理模块
/// 界面只保存最近一次快照，不持有任何流水线状态

/// 链路状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Waiting,
    Receiving,
    Closed,
}

impl LinkStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LinkStatus::Waiting => "Waiting",
            LinkStatus::Receiving => "Receiving",
            LinkStatus::Closed => "Closed",
        }
    }
}

/// 统一的界面状态
#[derive(Debug)]
pub struct DashboardState {
    pub listen_addr: SocketAddr,
    pub status: LinkStatus,
    pub latest: Option<Snapshot>,
    pub frames_received: u64,
    snapshot_receiver: Receiver<Snapshot>,
}

impl DashboardState {
    pub fn new(listen_addr: SocketAddr, snapshot_receiver: Receiver<Snapshot>) -> Self {
        Self {
            listen_addr,
            status: LinkStatus::Waiting,
            latest: None,
            frames_received: 0,
            snapshot_receiver,
        }
    }

    /// 取走通道里所有快照，只保留最新的
    pub fn poll_snapshots(&mut self) -> usize {
        let mut count = 0;
        loop {
            match self.snapshot_receiver.try_recv() {
                Ok(snapshot) => {
                    self.latest = Some(snapshot);
                    self.status = LinkStatus::Receiving;
                    count += 1;
                }
                Err(TryRecvError::Empty) => break,
                // 发送端断开说明遥测循环已结束
                Err(TryRecvError::Disconnected) => {
                    self.status = LinkStatus::Closed;
                    break;
                }
            }
        }
        self.frames_received += count as u64;
        count
    }

    /// 获取当前状态摘要
    pub fn get_status_summary(&self) -> String {
        match &self.latest {
            Some(snapshot) => format!(
                "{} | T+{:.2}s | accepted {} | dropped {}",
                self.status.label(),
                snapshot.sample.timestamp,
                snapshot.stats.accepted,
                snapshot.stats.dropped()
            ),
            None => format!("{} | no telemetry yet", self.status.label()),
        }
    }
}

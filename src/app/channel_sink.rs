use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};

use crate::telemetry::{RenderSink, SinkClosed};
use crate::types::Snapshot;

/// 阻塞发送期间检查关闭标志的间隔
const SHUTDOWN_POLL: Duration = Duration::from_millis(50);

/// 把快照交给界面线程的渲染端
///
/// 通道容量为 1，`send` 会阻塞到界面取走上一个快照，界面刷新速度因此直接限制遥测循环的消费速度。
/// 界面停止取数据（例如窗口最小化）时，关闭标志仍然能让发送返回。
pub struct ChannelSink {
    sender: Sender<Snapshot>,
    shutdown: Arc<AtomicBool>,
}

/// 创建渲染端和界面侧的接收端
pub fn snapshot_channel(shutdown: Arc<AtomicBool>) -> (ChannelSink, Receiver<Snapshot>) {
    let (sender, receiver) = bounded(1);
    (ChannelSink { sender, shutdown }, receiver)
}

impl RenderSink for ChannelSink {
    fn render(&mut self, snapshot: &Snapshot) -> Result<(), SinkClosed> {
        let mut pending = snapshot.clone();
        loop {
            match self.sender.send_timeout(pending, SHUTDOWN_POLL) {
                Ok(()) => return Ok(()),
                // 通道断开表示界面已关闭
                Err(SendTimeoutError::Disconnected(_)) => return Err(SinkClosed),
                Err(SendTimeoutError::Timeout(unsent)) => {
                    if self.shutdown.load(Ordering::Relaxed) {
                        return Err(SinkClosed);
                    }
                    pending = unsent;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LoopStats, TelemetrySample};

    fn snapshot(t: f64) -> Snapshot {
        Snapshot {
            sample: TelemetrySample::new(t, [7000.0, 0.0, 0.0], [0.0, 7.5, 0.0], [1.0, 0.0, 0.0, 0.0]),
            energy: -28.8,
            trail: Vec::new(),
            series: Vec::new(),
            mean_energy: None,
            stats: LoopStats::default(),
        }
    }

    #[test]
    fn hands_snapshot_to_receiver() {
        let (mut sink, receiver) = snapshot_channel(Arc::new(AtomicBool::new(false)));
        sink.render(&snapshot(1.0)).unwrap();
        assert_eq!(receiver.try_recv().unwrap().sample.timestamp, 1.0);
    }

    #[test]
    fn dropped_receiver_closes_sink() {
        let (mut sink, receiver) = snapshot_channel(Arc::new(AtomicBool::new(false)));
        drop(receiver);
        assert_eq!(sink.render(&snapshot(1.0)), Err(SinkClosed));
    }

    #[test]
    fn shutdown_releases_blocked_send() {
        let flag = Arc::new(AtomicBool::new(false));
        let (mut sink, receiver) = snapshot_channel(Arc::clone(&flag));
        // 通道已满，界面没有再取数据
        sink.render(&snapshot(1.0)).unwrap();

        let trigger = {
            let flag = Arc::clone(&flag);
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(100));
                flag.store(true, Ordering::Relaxed);
            })
        };

        assert_eq!(sink.render(&snapshot(2.0)), Err(SinkClosed));
        trigger.join().unwrap();
        // 接收端仍然存在，只有第一个快照
        assert_eq!(receiver.len(), 1);
    }

    #[test]
    fn slow_receiver_still_gets_every_snapshot() {
        let (mut sink, receiver) = snapshot_channel(Arc::new(AtomicBool::new(false)));
        let consumer = std::thread::spawn(move || {
            let mut seen = Vec::new();
            for _ in 0..3 {
                std::thread::sleep(Duration::from_millis(80));
                seen.push(receiver.recv().unwrap().sample.timestamp);
            }
            seen
        });

        for t in [1.0, 2.0, 3.0] {
            sink.render(&snapshot(t)).unwrap();
        }
        assert_eq!(consumer.join().unwrap(), vec![1.0, 2.0, 3.0]);
    }
}

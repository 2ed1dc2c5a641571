use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{error, info, trace, warn};

use crate::codec::{self, MalformedPacket};
use crate::energy::{DegenerateSample, EnergyModel};
use crate::history::BoundedHistory;
use crate::types::{EnergyRecord, LoopStats, Snapshot, TelemetrySample};
use crate::units;

use super::sink::{NoPause, Pacer, RenderSink};
use super::source::DatagramSource;

/// 默认接收缓冲区大小，超长数据报会被截断，随后按长度不符丢弃
pub const RECV_BUFFER_SIZE: usize = 1024;

/// 遥测循环的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Listening,
    Processing,
    Closed,
}

/// 单个周期的结果
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// 快照已交给渲染端
    Rendered,
    /// 长度不符，已丢弃
    Malformed(MalformedPacket),
    /// 退化样本，按配置丢弃
    Degenerate(DegenerateSample),
    /// 接收被系统中断，没有数据
    Idle,
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: io::Error,
    },
    #[error("transport failure: {0}")]
    Transport(io::Error),
    #[error("telemetry thread panicked")]
    Panicked,
}

/// 等待后台遥测线程结束，线程 panic 也按失败处理
pub fn join_telemetry(
    handle: std::thread::JoinHandle<Result<LoopStats, TelemetryError>>,
) -> Result<LoopStats, TelemetryError> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => {
            error!("Telemetry thread panicked");
            Err(TelemetryError::Panicked)
        }
    }
}

/// 遥测循环：持有数据来源、渲染端、历史缓冲区和能量模型
///
/// 单线程顺序执行，唯一的挂起点是阻塞接收。
pub struct TelemetryLoop<S: DatagramSource, R: RenderSink> {
    source: S,
    sink: R,
    pacer: Box<dyn Pacer + Send>,
    energy_model: EnergyModel,
    history: BoundedHistory,
    buffer: Vec<u8>,
    shutdown: Arc<AtomicBool>,
    state: LoopState,
    stats: LoopStats,
    last_sample: Option<TelemetrySample>,
}

impl<S: DatagramSource, R: RenderSink> TelemetryLoop<S, R> {
    pub fn new(source: S, sink: R, history: BoundedHistory, energy_model: EnergyModel) -> Self {
        Self {
            source,
            sink,
            pacer: Box::new(NoPause),
            energy_model,
            history,
            buffer: vec![0u8; RECV_BUFFER_SIZE],
            shutdown: Arc::new(AtomicBool::new(false)),
            state: LoopState::Listening,
            stats: LoopStats::default(),
            last_sample: None,
        }
    }

    pub fn with_pacer(mut self, pacer: impl Pacer + Send + 'static) -> Self {
        self.pacer = Box::new(pacer);
        self
    }

    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = flag;
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer = vec![0u8; size];
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn history(&self) -> &BoundedHistory {
        &self.history
    }

    pub fn last_sample(&self) -> Option<&TelemetrySample> {
        self.last_sample.as_ref()
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    /// 运行到被中断为止，返回最终计数
    pub fn run(&mut self) -> Result<LoopStats, TelemetryError> {
        info!("Telemetry loop started");
        while self.step()? != Outcome::Closed {}
        Ok(self.stats)
    }

    /// 接收并处理一个数据报
    pub fn step(&mut self) -> Result<Outcome, TelemetryError> {
        if self.state == LoopState::Closed {
            return Ok(Outcome::Closed);
        }
        if self.shutdown_requested() {
            self.close();
            return Ok(Outcome::Closed);
        }

        self.state = LoopState::Listening;
        let received = self.source.recv(&mut self.buffer);

        // 阻塞期间收到中断请求时，不再处理这个数据报
        if self.shutdown_requested() {
            self.close();
            return Ok(Outcome::Closed);
        }

        let len = match received {
            Ok(len) => len,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(Outcome::Idle),
            Err(e) => {
                error!("Telemetry socket failed: {}", e);
                self.close();
                return Err(TelemetryError::Transport(e));
            }
        };

        self.state = LoopState::Processing;
        let decoded = codec::decode(&self.buffer[..len]);
        Ok(self.handle_decoded(decoded))
    }

    /// 处理一个已经收到的数据报（不经过数据来源）
    pub fn process_datagram(&mut self, bytes: &[u8]) -> Outcome {
        if self.state == LoopState::Closed {
            return Outcome::Closed;
        }
        self.state = LoopState::Processing;
        self.handle_decoded(codec::decode(bytes))
    }

    fn handle_decoded(&mut self, decoded: Result<TelemetrySample, MalformedPacket>) -> Outcome {
        self.stats.received += 1;

        let outcome = match decoded {
            Ok(sample) => self.ingest(sample),
            Err(malformed) => {
                trace!("Dropping datagram: {}", malformed);
                self.stats.malformed += 1;
                Outcome::Malformed(malformed)
            }
        };

        if self.state != LoopState::Closed {
            self.state = LoopState::Listening;
        }
        outcome
    }

    fn ingest(&mut self, raw: TelemetrySample) -> Outcome {
        let sample = units::to_display_units(raw);

        let energy = match self.energy_model.evaluate(&sample.position, &sample.velocity) {
            Ok(energy) => energy,
            Err(degenerate) => {
                warn!("Rejected sample at t={}: {}", sample.timestamp, degenerate);
                self.stats.degenerate += 1;
                return Outcome::Degenerate(degenerate);
            }
        };

        self.history.append_position(sample.position);
        self.history.append_energy_record(EnergyRecord::new(sample.timestamp, energy));
        self.stats.accepted += 1;
        self.last_sample = Some(sample);

        let snapshot = Snapshot {
            sample,
            energy,
            trail: self.history.positions().to_vec(),
            series: self.history.energy_series().to_vec(),
            mean_energy: self.history.mean_energy(),
            stats: self.stats,
        };

        if let Err(e) = self.sink.render(&snapshot) {
            info!("Stopping telemetry loop: {}", e);
            self.close();
            return Outcome::Closed;
        }
        self.pacer.pause();

        Outcome::Rendered
    }

    /// 进入终止状态并释放网络资源
    pub fn close(&mut self) {
        if self.state == LoopState::Closed {
            return;
        }
        self.state = LoopState::Closed;
        self.source.close();
        info!(
            "Telemetry loop closed: {} received, {} accepted, {} malformed, {} degenerate",
            self.stats.received, self.stats.accepted, self.stats.malformed, self.stats.degenerate
        );
    }
}

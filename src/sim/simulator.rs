use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use log::info;

use crate::codec;
use crate::config::SimulatorConfig;
use crate::telemetry::ShutdownSignal;
use crate::types::{norm, TelemetrySample};

use super::dynamics::{altitude, step_rk4, SimState};

/// 步数取整时允许的浮点误差（以步为单位）
const STEP_TOLERANCE: f64 = 1e-9;

/// 轨道模拟器：固定步长推进物理状态
#[derive(Debug, Clone)]
pub struct OrbitSimulator {
    state: SimState,
    dt: f64,
    with_j2: bool,
    /// 上次推进后不足一步的剩余时间
    carry: f64,
}

impl OrbitSimulator {
    pub fn new(config: &SimulatorConfig) -> Self {
        Self {
            state: SimState::low_earth_orbit(
                config.altitude_km * 1000.0,
                config.speed_m_s,
                config.body_rates,
            ),
            dt: config.physics_dt,
            with_j2: config.j2,
            carry: 0.0,
        }
    }

    pub fn from_state(state: SimState, dt: f64, with_j2: bool) -> Self {
        Self { state, dt, with_j2, carry: 0.0 }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// 推进 `duration` 秒，返回执行的物理步数
    ///
    /// 不足一步的部分累积到下一次调用，长时间运行时模拟时间不会漂移。
    pub fn advance(&mut self, duration: f64) -> usize {
        let budget = duration + self.carry;
        let steps = (budget / self.dt + STEP_TOLERANCE).floor().max(0.0) as usize;
        self.carry = (budget - steps as f64 * self.dt).max(0.0);
        for _ in 0..steps {
            step_rk4(&mut self.state, self.dt, self.with_j2);
        }
        steps
    }

    /// 当前状态对应的遥测样本（线上单位：m, m/s）
    pub fn sample(&self) -> TelemetrySample {
        TelemetrySample::new(
            self.state.time,
            self.state.position,
            self.state.velocity,
            self.state.attitude,
        )
    }
}

/// 遥测发送端
pub struct UdpSender {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpSender {
    pub fn new(target: SocketAddr) -> io::Result<Self> {
        let bind_addr: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(bind_addr)?;
        Ok(Self { socket, target })
    }

    pub fn send_sample(&self, sample: &TelemetrySample) -> io::Result<usize> {
        self.socket.send_to(&codec::encode(sample), self.target)
    }
}

/// 以固定频率推进并发送，直到收到关闭信号
pub fn run_simulator(config: &SimulatorConfig, shutdown: &ShutdownSignal) -> io::Result<u64> {
    let target = config
        .target_addr()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    let sender = UdpSender::new(target)?;
    let mut simulator = OrbitSimulator::new(config);
    let tick = 1.0 / config.telemetry_hz;
    let log_every = config.log_every.max(1);

    info!(
        "Streaming telemetry to {} at {} Hz (physics dt = {} s, J2 {})",
        target,
        config.telemetry_hz,
        config.physics_dt,
        if config.j2 { "on" } else { "off" }
    );

    let mut sent = 0u64;
    while !shutdown.is_triggered() {
        let started = Instant::now();

        simulator.advance(tick);
        let sample = simulator.sample();
        sender.send_sample(&sample)?;

        if sent % log_every == 0 {
            info!(
                "T+{:.2}s | ALT: {:.3} km | V: {:.3} m/s",
                sample.timestamp,
                altitude(&sample.position) / 1000.0,
                norm(&sample.velocity)
            );
        }
        sent += 1;

        let elapsed = started.elapsed();
        let period = Duration::from_secs_f64(tick);
        if elapsed < period {
            std::thread::sleep(period - elapsed);
        }
    }

    info!("Simulator stopped after {} packets", sent);
    Ok(sent)
}

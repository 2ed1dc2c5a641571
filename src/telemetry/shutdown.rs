use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};

use super::source::SocketWaker;

/// 关闭信号：设置共享标志，并唤醒阻塞中的接收
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    flag: Arc<AtomicBool>,
    waker: Option<SocketWaker>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_waker(mut self, waker: SocketWaker) -> Self {
        self.waker = Some(waker);
        self
    }

    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub fn trigger(&self) {
        if self.flag.swap(true, Ordering::Relaxed) {
            return;
        }
        info!("Shutdown requested");
        if let Some(waker) = &self.waker {
            if let Err(e) = waker.wake() {
                warn!("Failed to wake telemetry socket: {}", e);
            }
        }
    }

    /// 在后台线程里等待 Ctrl-C
    pub fn spawn_ctrl_c_listener(&self) -> std::io::Result<std::thread::JoinHandle<()>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let signal = self.clone();

        std::thread::Builder::new()
            .name("ctrl-c".to_string())
            .spawn(move || {
                runtime.block_on(async {
                    match tokio::signal::ctrl_c().await {
                        Ok(()) => {
                            info!("Interrupt received");
                            signal.trigger();
                        }
                        Err(e) => warn!("Unable to listen for Ctrl-C: {}", e),
                    }
                });
            })
    }
}

pub mod source;
pub mod sink;
pub mod shutdown;
pub mod telemetry_loop;

pub use source::{DatagramSource, SocketWaker, UdpSource};
pub use sink::{FixedPause, LogSink, NoPause, Pacer, RenderSink, SinkClosed};
pub use shutdown::ShutdownSignal;
pub use telemetry_loop::{
    join_telemetry, LoopState, Outcome, TelemetryError, TelemetryLoop, RECV_BUFFER_SIZE,
};

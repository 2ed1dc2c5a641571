pub mod dynamics;
pub mod simulator;

pub use dynamics::{SimState, J2, MU_EARTH_M, R_EARTH_M};
pub use simulator::{run_simulator, OrbitSimulator, UdpSender};

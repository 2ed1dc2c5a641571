use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::codec::PACKET_SIZE;
use crate::energy::{DegeneratePolicy, EnergyModel, MU_EARTH_KM};
use crate::history::{ENERGY_CAPACITY, TRAIL_CAPACITY};

/// 应用配置管理模块
/// 集中管理所有配置项，提供默认值和配置验证

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "orbitscope.toml";

/// 主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub history: HistoryConfig,
    pub physics: PhysicsConfig,
    pub display: DisplayConfig,
    pub simulator: SimulatorConfig,
}

/// UDP 监听配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub host: String,
    pub port: u16,
    pub recv_buffer_size: usize,
}

/// 历史缓冲区配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub trail_capacity: usize,
    pub energy_capacity: usize,
}

/// 能量模型配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub mu_km3_s2: f64,
    pub degenerate_policy: DegeneratePolicy,
}

/// 显示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub headless: bool,
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub vsync: bool,
    pub view_limit_km: f64,
    pub body_radius_km: f64,
    pub energy_band: f64,
    pub log_every: u64,
    /// 每次渲染后的暂停时间（毫秒）
    pub render_pause_ms: u64,
    pub colors: DisplayColors,
}

/// 绘图颜色配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayColors {
    pub body: [u8; 3],
    pub trail: [u8; 3],
    pub current: [u8; 3],
    pub energy: [u8; 3],
}

/// 轨道模拟器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub target_host: String,
    pub target_port: u16,
    pub physics_dt: f64,
    pub telemetry_hz: f64,
    pub j2: bool,
    pub altitude_km: f64,
    pub speed_m_s: f64,
    pub body_rates: [f64; 3],
    pub log_every: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            recv_buffer_size: 1024,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            trail_capacity: TRAIL_CAPACITY,
            energy_capacity: ENERGY_CAPACITY,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            mu_km3_s2: MU_EARTH_KM,
            degenerate_policy: DegeneratePolicy::Propagate,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            headless: false,
            width: 1200.0,
            height: 600.0,
            title: "OrbitScope - Telemetry Dashboard".to_string(),
            vsync: true,
            view_limit_km: 8000.0,
            body_radius_km: 6378.137,
            energy_band: 0.1,
            log_every: 50,
            render_pause_ms: 1,
            colors: DisplayColors::default(),
        }
    }
}

impl Default for DisplayColors {
    fn default() -> Self {
        Self {
            body: [128, 128, 128],  // 灰色
            trail: [0, 255, 255],   // 青色
            current: [255, 0, 0],   // 红色
            energy: [255, 255, 0],  // 黄色
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            target_host: "127.0.0.1".to_string(),
            target_port: 8080,
            physics_dt: 0.0001,
            telemetry_hz: 50.0,
            j2: true,
            altitude_km: 400.0,
            speed_m_s: 7660.0,
            body_rates: [0.01, 0.05, 0.001],
            log_every: 50,
        }
    }
}

impl NetworkConfig {
    /// 监听地址
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("Invalid listen address: {}", e)))
    }
}

impl PhysicsConfig {
    pub fn energy_model(&self) -> EnergyModel {
        EnergyModel::new(self.mu_km3_s2, self.degenerate_policy)
    }
}

impl SimulatorConfig {
    pub fn target_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.target_host, self.target_port)
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("Invalid target address: {}", e)))
    }
}

impl AppConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(ConfigError::IoError)?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)
            .map_err(ConfigError::ParseError)?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(ConfigError::SerializeError)?;

        std::fs::write(path, content)
            .map_err(ConfigError::IoError)?;

        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.port == 0 {
            return Err(ConfigError::ValidationError("Listen port must be non-zero".to_string()));
        }

        if self.network.recv_buffer_size < PACKET_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "Receive buffer must hold at least {} bytes",
                PACKET_SIZE
            )));
        }

        if self.history.trail_capacity == 0 || self.history.energy_capacity == 0 {
            return Err(ConfigError::ValidationError("History capacities must be positive".to_string()));
        }

        if !self.physics.mu_km3_s2.is_finite() || self.physics.mu_km3_s2 <= 0.0 {
            return Err(ConfigError::ValidationError("Gravitational parameter must be positive".to_string()));
        }

        if self.display.width <= 0.0 || self.display.height <= 0.0 {
            return Err(ConfigError::ValidationError("Window dimensions must be positive".to_string()));
        }

        let dt = self.simulator.physics_dt;
        let hz = self.simulator.telemetry_hz;
        if !dt.is_finite() || dt <= 0.0 || !hz.is_finite() || hz <= 0.0 {
            return Err(ConfigError::ValidationError("Simulator rates must be finite and positive".to_string()));
        }

        // 每个发送周期至少推进一个物理步
        if dt > 1.0 / hz {
            return Err(ConfigError::ValidationError(format!(
                "Simulator physics_dt ({} s) must not exceed the telemetry period ({} s)",
                dt,
                1.0 / hz
            )));
        }

        self.network.listen_addr()?;
        Ok(())
    }

    /// 用环境变量覆盖网络和显示设置
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// 按 `lookup` 给出的键值覆盖配置，然后重新验证
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("ORBITSCOPE_UDP_HOST") {
            self.network.host = host;
        }
        if let Some(port) = lookup("ORBITSCOPE_UDP_PORT") {
            self.network.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::ValidationError(format!("ORBITSCOPE_UDP_PORT: {}", e)))?;
        }
        if let Some(headless) = lookup("ORBITSCOPE_HEADLESS") {
            self.display.headless = matches!(headless.trim(), "1" | "true" | "yes");
        }
        self.validate()
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// 配置管理器
pub struct ConfigManager {
    config: AppConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 创建配置管理器
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            config_path: None,
        }
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let config = AppConfig::load_from_file(&path)?;
        Ok(Self {
            config,
            config_path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// 加载 .env 和配置文件，文件不存在时使用默认配置，最后应用环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok(); // 加载 .env 文件

        let path = std::env::var("ORBITSCOPE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let mut manager = if std::path::Path::new(&path).exists() {
            log::info!("Loading config from {}", path);
            Self::load_from_file(&path)?
        } else {
            log::info!("No config file at {}, using defaults", path);
            Self::new()
        };

        manager.config.apply_env_overrides()?;
        Ok(manager)
    }

    /// 获取当前配置
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取可变配置
    pub fn get_config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// 保存配置
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.config_path {
            self.config.save_to_file(path)?;
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 应用配置管理模块
/// 集中管理所有配置项，提供默认值和配置验证

/// 主配置结构
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub mqtt: MqttConfig,
    pub simulator: SimulatorConfig,
    pub measurement: MeasurementConfig,
    pub display: DisplayConfig,
    pub channels: ChannelConfig,
}

/// 样本数据源选择
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub mode: SourceMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// 订阅 MQTT 上的手机加速度数据
    Mqtt,
    /// 本地合成数据，联调时不依赖手机和 broker
    Simulator,
}

/// MQTT配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    pub broker: String,
    pub port: u16,
    pub client_id: String,
    pub topic: String,
    pub status_topic: String,
    pub qos: u8,
    pub keep_alive: u16,
}

/// 模拟数据源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub sample_rate_hz: u32,
    pub punch_count: usize,
    pub punch_interval_ms: u64,
}

/// 测量配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    /// 触发测量的力度阈值
    pub trigger_power: f64,
    /// 测量窗口时长（毫秒），两个历史版本分别用过 3000 和 5000
    pub window_ms: i64,
}

/// 成绩展示配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub score_scale: f64,
    pub unit: String,
}

/// 通道配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub sample_channel_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            mqtt: MqttConfig::default(),
            simulator: SimulatorConfig::default(),
            measurement: MeasurementConfig::default(),
            display: DisplayConfig::default(),
            channels: ChannelConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            // 默认走模拟数据源，开箱即可跑通整条流水线
            mode: SourceMode::Simulator,
        }
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker: "localhost".to_string(),
            port: 1883,
            client_id: "punchpower_client".to_string(),
            topic: "sensor/accelerometer".to_string(),
            status_topic: "sensor/status".to_string(),
            qos: 1,
            keep_alive: 5,
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 50,
            punch_count: 5,
            punch_interval_ms: 4000,
        }
    }
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            trigger_power: 20.0,
            window_ms: 3000,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            score_scale: 100.0,
            unit: "points".to_string(),
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            sample_channel_capacity: 5000,
        }
    }
}

impl AppConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(e))?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::IoError(e))?;

        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.measurement.trigger_power <= 0.0 {
            return Err(ConfigError::ValidationError("Trigger power must be positive".to_string()));
        }

        if self.measurement.window_ms <= 0 {
            return Err(ConfigError::ValidationError("Measurement window must be positive".to_string()));
        }

        if self.display.score_scale <= 0.0 {
            return Err(ConfigError::ValidationError("Score scale must be positive".to_string()));
        }

        if self.channels.sample_channel_capacity == 0 {
            return Err(ConfigError::ValidationError("Sample channel capacity must be positive".to_string()));
        }

        if self.simulator.sample_rate_hz == 0 {
            return Err(ConfigError::ValidationError("Simulator sample rate must be positive".to_string()));
        }

        Ok(())
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

    /// 获取当前配置
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

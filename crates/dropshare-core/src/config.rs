//! 应用配置和持久化
//!
//! 提供数据目录、上传模拟参数等设置的存储和读取。

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::upload::{DEFAULT_MAX_INCREMENT, UploadConfig};

/// 应用设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// 会话存储目录（用户记录、已上传文件列表）
    pub data_dir: PathBuf,
    /// 进度刷新间隔（毫秒）
    pub tick_interval_ms: u64,
    /// 完成后在列表中停留的时间（毫秒）
    pub removal_delay_ms: u64,
    /// 单次进度增量上限
    pub max_increment: f64,
    /// 详细日志模式
    pub verbose: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            tick_interval_ms: 200,
            removal_delay_ms: 2000,
            max_increment: DEFAULT_MAX_INCREMENT,
            verbose: false,
        }
    }
}

impl AppSettings {
    /// 获取配置文件路径
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dropshare");
        config_dir.join("settings.toml")
    }

    /// 加载设置（如果文件不存在则使用默认值）
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(settings) => {
                        debug!("Loaded settings from {:?}", path);
                        return settings;
                    }
                    Err(e) => {
                        log::warn!("Failed to parse settings: {}, using defaults", e);
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read settings file: {}, using defaults", e);
                }
            }
        }
        Self::default()
    }

    /// 保存设置
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// 上传模拟器参数
    ///
    /// `max_increment` 必须为正的有限值，否则进度永远不会增长，使用默认值代替。
    pub fn upload_config(&self) -> UploadConfig {
        let max_increment = if self.max_increment.is_finite() && self.max_increment > 0.0 {
            self.max_increment
        } else {
            log::warn!(
                "Invalid max_increment {} in settings, using {}",
                self.max_increment, DEFAULT_MAX_INCREMENT
            );
            DEFAULT_MAX_INCREMENT
        };

        UploadConfig {
            tick_interval: Duration::from_millis(self.tick_interval_ms.max(1)),
            removal_delay: Duration::from_millis(self.removal_delay_ms),
            max_increment,
        }
    }
}

/// 默认数据目录
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dropshare")
}

//! 上传模拟模块
//!
//! 包含:
//! - 每个文件独立的进度状态机 (`UploadSimulator`)
//! - 可注入的进度增量来源与时钟，便于测试
//! - 进度回调以及基于 tokio 的实时驱动

pub mod callback;
pub mod clock;
pub mod driver;
pub mod progress;
pub mod simulator;


pub use callback::{SimpleUploadCallback, UploadCallback, UploadEvent};
pub use clock::{Clock, ManualClock, SystemClock};
pub use driver::run_until_idle;
pub use progress::{FixedIncrement, ProgressSource, RandomIncrement};
pub use simulator::{UploadSimulator, UploadStatus, UploadingFile};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::storage::StoreError;

/// 进度刷新间隔
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);

/// 完成后从列表移除前的停留时间
pub const DEFAULT_REMOVAL_DELAY: Duration = Duration::from_millis(2000);

/// 单次进度增量上限（不含）
pub const DEFAULT_MAX_INCREMENT: f64 = 10.0;

/// 上传错误
#[derive(Debug, Error)]
pub enum UploadError {
    /// 列表中没有该文件
    #[error("Unknown upload: {0}")]
    UnknownFile(String),

    /// 写入元数据失败
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// 待上传的文件句柄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHandle {
    pub name: String,
    /// MIME 类型，未知时为空字符串
    pub mime_type: String,
    pub size: u64,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }

    /// 从本地文件读取名称、大小，并根据扩展名猜测 MIME 类型
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if metadata.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is a directory", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        // 猜测 MIME 类型
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.to_string())
            .unwrap_or_default();

        Ok(Self {
            name,
            mime_type,
            size: metadata.len(),
        })
    }
}

/// 模拟器参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadConfig {
    pub tick_interval: Duration,
    pub removal_delay: Duration,
    pub max_increment: f64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            removal_delay: DEFAULT_REMOVAL_DELAY,
            max_increment: DEFAULT_MAX_INCREMENT,
        }
    }
}

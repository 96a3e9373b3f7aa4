//! 本地会话存储
//!
//! 包含:
//! - 键值存储抽象 (`KeyValueStore`) 及内存/文件两种后端
//! - 持久化记录定义 (`UserRecord`, `UploadedFileRecord`)
//! - 基于两个固定键的会话存储 (`SessionStore`)

pub mod backend;
pub mod records;
pub mod session;

pub use backend::{FileStore, MemoryStore};
pub use records::{UploadedFileRecord, UserRecord};
pub use session::{SessionStore, UPLOADED_FILES_KEY, USER_DATA_KEY};

use thiserror::Error;

/// 存储后端错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 读写底层文件失败
    #[error("I/O error on key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// 序列化失败
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// 锁已中毒
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    /// 非法的键名
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 字符串键值存储
///
/// 语义与浏览器的 localStorage 一致：值均为序列化后的文本，
/// 同一个键只保存一个值。
pub trait KeyValueStore: Send + Sync {
    /// 读取键对应的值，不存在时返回 `None`
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// 覆盖写入
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// 删除键（不存在时视为成功）
    fn remove(&self, key: &str) -> StoreResult<()>;
}

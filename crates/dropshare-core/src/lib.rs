//! Dropshare Core Library
//!
//! 文件分享演示应用的核心实现：本地会话存储、登录校验和上传进度模拟。
//! 不涉及任何网络传输，所有数据只保存在本地。
//!
//! # 模块
//!
//! - **storage**: 键值存储抽象、用户记录与已上传文件列表
//! - **auth**: 基于存储的明文登录校验
//! - **upload**: 逐文件的上传进度模拟与元数据记录
//! - **config**: 应用设置
//! - **logging**: 日志级别
//!
//! # 使用示例
//!
//! ```
//! use dropshare_core::{
//!     CredentialGate, FileHandle, FixedIncrement, MemoryStore, SessionStore, SystemClock,
//!     UploadConfig, UploadSimulator,
//! };
//! use std::time::Duration;
//!
//! let session = SessionStore::new(MemoryStore::new());
//!
//! // 1. 注册并登录
//! let gate = CredentialGate::new(session.clone());
//! gate.register("Alice", "alice@example.com", "hunter2")?;
//! gate.login("alice@example.com", "hunter2")?;
//!
//! // 2. 提交文件并推进逻辑时钟
//! let mut uploads = UploadSimulator::with_parts(
//!     session.clone(),
//!     UploadConfig::default(),
//!     FixedIncrement(20.0),
//!     SystemClock,
//! );
//! uploads.submit([FileHandle::new("notes.txt", "text/plain", 42)]);
//! uploads.advance(Duration::from_secs(1));
//!
//! assert!(uploads.all_uploaded());
//! assert_eq!(session.read_uploaded_files().len(), 1);
//! # Ok::<(), dropshare_core::AuthError>(())
//! ```

pub mod auth;
pub mod config;
pub mod logging;
pub mod storage;
pub mod upload;

// Storage re-exports
pub use storage::{
    FileStore, KeyValueStore, MemoryStore, SessionStore, StoreError, UploadedFileRecord,
    UserRecord,
};

// Auth re-exports
pub use auth::{AuthError, CredentialGate};

// Upload re-exports
pub use upload::{
    Clock, FileHandle, FixedIncrement, ManualClock, ProgressSource, RandomIncrement,
    SimpleUploadCallback, SystemClock, UploadCallback, UploadConfig, UploadError, UploadEvent,
    UploadSimulator, UploadStatus, UploadingFile, run_until_idle,
};

pub use config::AppSettings;
pub use logging::LogLevel;

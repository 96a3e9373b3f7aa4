//! 会话存储
//!
//! 在任意 [`KeyValueStore`] 之上维护两个键:
//! - `userData`: 单个用户记录
//! - `uploadedFiles`: 只追加的已上传文件列表
//!
//! 读取操作从不失败：键不存在、内容为空对象或 JSON 损坏时都视为空。

use log::{debug, warn};
use std::sync::{Arc, Mutex};

use super::records::{UploadedFileRecord, UserRecord};
use super::{KeyValueStore, StoreError, StoreResult};

/// 用户记录所在的键
pub const USER_DATA_KEY: &str = "userData";

/// 已上传文件列表所在的键
pub const UPLOADED_FILES_KEY: &str = "uploadedFiles";

/// 本地会话存储
///
/// 克隆后共享同一个后端和同一把追加锁。
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
    append_lock: Arc<Mutex<()>>,
}

impl SessionStore {
    pub fn new<S: KeyValueStore + 'static>(backend: S) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    pub fn from_arc(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            append_lock: Arc::new(Mutex::new(())),
        }
    }

    /// 底层后端
    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.backend
    }

    /// 读取用户记录
    pub fn read_user(&self) -> Option<UserRecord> {
        let text = self.read_raw(USER_DATA_KEY)?;
        match serde_json::from_str::<UserRecord>(&text) {
            Ok(user) if user.is_empty() => None,
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Malformed {} in storage: {}, treating as empty", USER_DATA_KEY, e);
                None
            }
        }
    }

    /// 覆盖写入用户记录
    pub fn write_user(&self, user: &UserRecord) -> StoreResult<()> {
        let json = serde_json::to_string(user)?;
        self.backend.set(USER_DATA_KEY, &json)?;
        debug!("Stored user record for {}", user.email);
        Ok(())
    }

    /// 删除用户记录
    pub fn clear_user(&self) -> StoreResult<()> {
        self.backend.remove(USER_DATA_KEY)
    }

    /// 读取已上传文件列表
    pub fn read_uploaded_files(&self) -> Vec<UploadedFileRecord> {
        match self.read_raw(UPLOADED_FILES_KEY) {
            Some(text) => parse_uploaded_files(&text),
            None => Vec::new(),
        }
    }

    /// 追加一条已上传文件记录
    ///
    /// 读-改-写过程持有追加锁，同一个 `SessionStore`（及其克隆）上的并发追加不会丢失。
    /// 后端读取失败时直接返回错误，不会用新列表覆盖已有记录。
    pub fn append_uploaded_file(&self, record: UploadedFileRecord) -> StoreResult<()> {
        let _guard = self
            .append_lock
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;

        let mut files = match self.backend.get(UPLOADED_FILES_KEY)? {
            Some(text) => parse_uploaded_files(&text),
            None => Vec::new(),
        };
        debug!("Appending {} ({} bytes) as entry #{}", record.name, record.size, files.len());
        files.push(record);

        let json = serde_json::to_string(&files)?;
        self.backend.set(UPLOADED_FILES_KEY, &json)
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read {}: {}, treating as empty", key, e);
                None
            }
        }
    }
}

/// 解析已上传文件列表，JSON 损坏时视为空
fn parse_uploaded_files(text: &str) -> Vec<UploadedFileRecord> {
    match serde_json::from_str(text) {
        Ok(files) => files,
        Err(e) => {
            warn!(
                "Malformed {} in storage: {}, treating as empty",
                UPLOADED_FILES_KEY, e
            );
            Vec::new()
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

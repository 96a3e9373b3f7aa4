//! 上传进度回调

use tokio::sync::mpsc;

use crate::storage::UploadedFileRecord;

/// 上传进度回调
pub trait UploadCallback: Send + Sync {
    /// 进度更新
    fn on_progress(&self, id: &str, progress: f64);
    /// 单个文件上传完成（元数据已写入存储）
    fn on_complete(&self, record: &UploadedFileRecord);
    /// 单个文件上传失败
    fn on_error(&self, id: &str, error: &str);
    /// 条目已从列表中移除
    fn on_removed(&self, id: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    Progress { id: String, progress: f64 },
    Complete(UploadedFileRecord),
    Error { id: String, error: String },
    Removed(String),
}

/// 简化的回调实现，把事件转发到通道
pub struct SimpleUploadCallback {
    tx: mpsc::Sender<UploadEvent>,
}

impl SimpleUploadCallback {
    pub fn new() -> (Self, mpsc::Receiver<UploadEvent>) {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> (Self, mpsc::Receiver<UploadEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl UploadCallback for SimpleUploadCallback {
    fn on_progress(&self, id: &str, progress: f64) {
        let _ = self.tx.try_send(UploadEvent::Progress {
            id: id.to_string(),
            progress,
        });
    }

    fn on_complete(&self, record: &UploadedFileRecord) {
        let _ = self.tx.try_send(UploadEvent::Complete(record.clone()));
    }

    fn on_error(&self, id: &str, error: &str) {
        let _ = self.tx.try_send(UploadEvent::Error {
            id: id.to_string(),
            error: error.to_string(),
        });
    }

    fn on_removed(&self, id: &str) {
        let _ = self.tx.try_send(UploadEvent::Removed(id.to_string()));
    }
}

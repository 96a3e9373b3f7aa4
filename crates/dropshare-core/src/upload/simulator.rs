//! 上传模拟器
//!
//! 每个文件的状态机: `uploading -> complete`（终态），或 `uploading -> error`（终态）。
//!
//! 定时器运行在逻辑时钟上，只有调用 [`UploadSimulator::advance`] 时时间才会前进，
//! 到期的定时器按截止时间依次触发（截止时间相同则按调度顺序）。

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

use super::callback::UploadCallback;
use super::clock::{Clock, SystemClock};
use super::progress::{ProgressSource, RandomIncrement};
use super::{FileHandle, UploadConfig, UploadError};
use crate::storage::{SessionStore, UploadedFileRecord};

/// 单个文件的上传状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Uploading,
    Complete,
    Error,
}

/// 正在上传的文件（仅存在于内存中）
#[derive(Debug, Clone, PartialEq)]
pub struct UploadingFile {
    /// `文件名-毫秒时间戳`
    pub id: String,
    pub file: FileHandle,
    /// 0 ~ 100
    pub progress: f64,
    pub status: UploadStatus,
    pub error: Option<String>,
    /// 内部唯一编号，`id` 可能重复
    slot: u64,
}

impl UploadingFile {
    pub fn is_complete(&self) -> bool {
        self.status == UploadStatus::Complete
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Tick,
    Remove,
}

#[derive(Debug, PartialEq, Eq)]
struct Timer {
    due: Duration,
    seq: u64,
    slot: u64,
    kind: TimerKind,
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// 上传模拟器
pub struct UploadSimulator<P = RandomIncrement, C = SystemClock> {
    session: SessionStore,
    config: UploadConfig,
    progress: P,
    clock: C,
    files: Vec<UploadingFile>,
    timers: BinaryHeap<Reverse<Timer>>,
    elapsed: Duration,
    next_seq: u64,
    next_slot: u64,
    callback: Option<Box<dyn UploadCallback>>,
}

impl UploadSimulator<RandomIncrement, SystemClock> {
    /// 使用随机增量和系统时间创建
    pub fn new(session: SessionStore, config: UploadConfig) -> Self {
        let progress = RandomIncrement::new(config.max_increment);
        Self::with_parts(session, config, progress, SystemClock)
    }
}

impl<P: ProgressSource, C: Clock> UploadSimulator<P, C> {
    pub fn with_parts(session: SessionStore, config: UploadConfig, progress: P, clock: C) -> Self {
        Self {
            session,
            config,
            progress,
            clock,
            files: Vec::new(),
            timers: BinaryHeap::new(),
            elapsed: Duration::ZERO,
            next_seq: 0,
            next_slot: 0,
            callback: None,
        }
    }

    /// 设置进度回调
    pub fn with_callback(mut self, callback: impl UploadCallback + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// 当前列表中的所有文件（含已完成、待移除的）
    pub fn files(&self) -> &[UploadingFile] {
        &self.files
    }

    /// 逻辑时钟已走过的时间
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// 提交一批文件，返回新条目的 ID
    ///
    /// 已有条目保持不变，可以多次追加。
    pub fn submit<I>(&mut self, batch: I) -> Vec<String>
    where
        I: IntoIterator<Item = FileHandle>,
    {
        let mut ids = Vec::new();
        for file in batch {
            let id = format!("{}-{}", file.name, self.clock.now().timestamp_millis());
            let slot = self.next_slot;
            self.next_slot += 1;

            debug!("Queued {} ({} bytes) as {}", file.name, file.size, id);
            self.files.push(UploadingFile {
                id: id.clone(),
                file,
                progress: 0.0,
                status: UploadStatus::Uploading,
                error: None,
                slot,
            });
            self.schedule(
                self.elapsed.saturating_add(self.config.tick_interval),
                slot,
                TimerKind::Tick,
            );
            ids.push(id);
        }
        ids
    }

    /// 推进逻辑时钟，返回触发的定时器数量
    pub fn advance(&mut self, by: Duration) -> usize {
        let target = self.elapsed.saturating_add(by);
        let mut fired = 0;

        while let Some(Reverse(timer)) = self.timers.peek() {
            if timer.due > target {
                break;
            }
            let Some(Reverse(timer)) = self.timers.pop() else {
                break;
            };
            self.elapsed = timer.due;
            match timer.kind {
                TimerKind::Tick => self.on_tick(timer.slot, timer.due),
                TimerKind::Remove => self.on_remove_due(timer.slot),
            }
            fired += 1;
        }

        self.elapsed = target;
        fired
    }

    /// 没有任何待触发的定时器
    pub fn is_idle(&self) -> bool {
        self.timers.is_empty()
    }

    /// 距离下一个定时器到期的时间
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers
            .peek()
            .map(|Reverse(timer)| timer.due.saturating_sub(self.elapsed))
    }

    /// 手动移除条目（不会撤回已写入的元数据）
    pub fn remove(&mut self, id: &str) -> Option<UploadingFile> {
        let index = self.files.iter().position(|f| f.id == id)?;
        let removed = self.files.remove(index);
        self.cancel_timers(removed.slot);

        debug!("Removed {} from upload list", removed.id);
        if let Some(cb) = &self.callback {
            cb.on_removed(&removed.id);
        }
        Some(removed)
    }

    /// 将上传中的文件标记为失败
    ///
    /// 模拟器本身不会产生失败，真实传输实现通过此方法上报错误。
    pub fn fail(&mut self, id: &str, reason: impl Into<String>) -> Result<(), UploadError> {
        let index = self
            .files
            .iter()
            .position(|f| f.id == id && f.status == UploadStatus::Uploading)
            .ok_or_else(|| UploadError::UnknownFile(id.to_string()))?;
        let slot = self.files[index].slot;
        self.mark_failed(index, reason.into());
        self.cancel_timers(slot);
        Ok(())
    }

    /// 所有条目进度的平均值，列表为空时为 0
    pub fn aggregate_progress(&self) -> f64 {
        if self.files.is_empty() {
            return 0.0;
        }
        self.files.iter().map(|f| f.progress).sum::<f64>() / self.files.len() as f64
    }

    /// 列表非空且所有条目均已完成
    pub fn all_uploaded(&self) -> bool {
        !self.files.is_empty() && self.files.iter().all(UploadingFile::is_complete)
    }

    fn schedule(&mut self, due: Duration, slot: u64, kind: TimerKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Reverse(Timer {
            due,
            seq,
            slot,
            kind,
        }));
    }

    fn cancel_timers(&mut self, slot: u64) {
        self.timers.retain(|Reverse(timer)| timer.slot != slot);
    }

    fn on_tick(&mut self, slot: u64, due: Duration) {
        let Some(index) = self.files.iter().position(|f| f.slot == slot) else {
            return;
        };
        if self.files[index].status != UploadStatus::Uploading {
            return;
        }

        let increment = self.progress.next_increment().max(0.0);
        let entry = &mut self.files[index];
        entry.progress = (entry.progress + increment).min(100.0);
        let progress = entry.progress;

        if let Some(cb) = &self.callback {
            cb.on_progress(&entry.id, progress);
        }

        if progress < 100.0 {
            self.schedule(due.saturating_add(self.config.tick_interval), slot, TimerKind::Tick);
            return;
        }

        self.complete(index, due);
    }

    fn complete(&mut self, index: usize, due: Duration) {
        let entry = &mut self.files[index];
        entry.status = UploadStatus::Complete;

        let record = UploadedFileRecord {
            id: entry.id.clone(),
            name: entry.file.name.clone(),
            mime_type: entry.file.mime_type.clone(),
            size: entry.file.size,
            modified_at: self.clock.now(),
            is_folder: false,
        };
        let slot = entry.slot;

        if let Err(e) = self.session.append_uploaded_file(record.clone()) {
            warn!("Failed to record upload {}: {}", record.id, e);
            self.mark_failed(index, e.to_string());
            return;
        }

        info!("Uploaded {} ({} bytes)", record.name, record.size);
        if let Some(cb) = &self.callback {
            cb.on_complete(&record);
        }
        self.schedule(due.saturating_add(self.config.removal_delay), slot, TimerKind::Remove);
    }

    fn mark_failed(&mut self, index: usize, reason: String) {
        let entry = &mut self.files[index];
        entry.status = UploadStatus::Error;
        entry.error = Some(reason);

        if let (Some(cb), Some(error)) = (&self.callback, &entry.error) {
            cb.on_error(&entry.id, error);
        }
    }

    fn on_remove_due(&mut self, slot: u64) {
        let Some(index) = self.files.iter().position(|f| f.slot == slot) else {
            return;
        };
        let removed = self.files.remove(index);
        debug!("Dropped completed upload {} from list", removed.id);
        if let Some(cb) = &self.callback {
            cb.on_removed(&removed.id);
        }
    }
}

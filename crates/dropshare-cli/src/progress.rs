//! 终端进度输出

use dropshare_core::UploadEvent;
use std::io::Write;
use tokio::sync::mpsc;

/// 把上传事件渲染成一行进度条，完成时逐个打印文件
///
/// 每个提交的文件占一个槽位，同名同毫秒产生的重复 id 也各自计入平均值。
pub struct ProgressPrinter {
    slots: Vec<(String, f64)>,
}

impl ProgressPrinter {
    pub fn new(ids: Vec<String>) -> Self {
        Self {
            slots: ids.into_iter().map(|id| (id, 0.0)).collect(),
        }
    }

    /// 消费事件直到通道关闭
    ///
    /// 事件通道可能丢弃消息，这里只负责显示，不做计数。
    pub async fn run(mut self, mut events: mpsc::Receiver<UploadEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                UploadEvent::Progress { id, progress } => {
                    self.update(&id, progress);
                    self.render();
                }
                UploadEvent::Complete(record) => {
                    self.update(&record.id, 100.0);
                    println!("\r   ✔ {} ({} bytes){:20}", record.name, record.size, "");
                }
                UploadEvent::Error { id, error } => {
                    println!("\r   ✘ {}: {}{:20}", id, error, "");
                }
                UploadEvent::Removed(_) => {}
            }
        }
    }

    /// 更新同 id 中第一个尚未到达该进度的槽位
    fn update(&mut self, id: &str, progress: f64) {
        let slot = self
            .slots
            .iter_mut()
            .filter(|(slot_id, _)| slot_id == id)
            .find(|(_, current)| *current < progress);
        if let Some((_, current)) = slot {
            *current = progress;
        }
    }

    fn mean(&self) -> f64 {
        if self.slots.is_empty() {
            return 0.0;
        }
        self.slots.iter().map(|(_, p)| p).sum::<f64>() / self.slots.len() as f64
    }

    fn render(&self) {
        const WIDTH: usize = 30;
        let percent = self.mean();
        let filled = ((percent / 100.0) * WIDTH as f64).round() as usize;
        print!(
            "\r   [{}{}] {:5.1}%",
            "#".repeat(filled.min(WIDTH)),
            "-".repeat(WIDTH - filled.min(WIDTH)),
            percent
        );
        let _ = std::io::stdout().flush();
    }
}

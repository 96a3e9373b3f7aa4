//! 实时驱动
//!
//! 按 `tick_interval` 的真实时间节奏推进模拟器的逻辑时钟。

use tokio::time::{self, MissedTickBehavior};

use super::clock::Clock;
use super::progress::ProgressSource;
use super::simulator::UploadSimulator;

/// 驱动模拟器直到没有待触发的定时器（所有文件完成并移出列表）
pub async fn run_until_idle<P: ProgressSource, C: Clock>(simulator: &mut UploadSimulator<P, C>) {
    let step = simulator.config().tick_interval;
    let mut interval = time::interval(step);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // 第一次 tick 立即返回
    interval.tick().await;

    while !simulator.is_idle() {
        interval.tick().await;
        simulator.advance(step);
    }
}

//! 推薦APIの呼び出し間隔制御
//!
//! 呼び出し開始の間隔を一定以上に保つ。同時実行時も全呼び出しで共有する。

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

pub struct Pacer {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// 次の呼び出し枠まで待つ
    pub async fn wait(&self) {
        // ロックを保持したまま待つことで、待機者は順番に枠を得る
        let mut next_slot = self.next_slot.lock().await;
        if let Some(slot) = *next_slot {
            tokio::time::sleep_until(slot).await;
        }
        *next_slot = Some(Instant::now() + self.interval);
    }
}

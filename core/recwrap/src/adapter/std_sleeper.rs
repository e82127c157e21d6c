//! 標準スリープ実装（std::thread::sleep を委譲）

use crate::ports::outbound::Sleeper;
use std::time::Duration;

/// 呼び出しスレッドをブロックする Sleeper 実装
#[derive(Debug, Clone, Default)]
pub struct StdSleeper;

impl Sleeper for StdSleeper {
    fn sleep_ms(&self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

//! 標準時刻実装（chrono を委譲）

use crate::ports::outbound::Clock;

/// 標準の時刻実装
#[derive(Debug, Clone, Default)]
pub struct StdClock;

impl Clock for StdClock {
    fn now_ms(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

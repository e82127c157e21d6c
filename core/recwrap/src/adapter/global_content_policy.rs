//! プロセス全体で共有する CSP 設定の実装
//!
//! 元の値は環境変数 RECWRAP_CSP から一度だけ読み込み、以後はプロセス内の
//! グローバル文字列として保持する。widen は冪等（has_media_src を見てから追記）だが、
//! check-then-set 自体は非アトミック。同一ホスト上の無関係な録画との競合は
//! widen-only の変更として許容する。

use crate::ports::outbound::ContentPolicy;
use common::error::Error;
use std::sync::{Mutex, OnceLock};

static CSP: OnceLock<Mutex<String>> = OnceLock::new();

fn cell() -> &'static Mutex<String> {
    CSP.get_or_init(|| Mutex::new(std::env::var("RECWRAP_CSP").unwrap_or_default()))
}

fn read() -> String {
    match cell().lock() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// グローバル CSP 文字列を操作する ContentPolicy 実装
#[derive(Debug, Clone, Default)]
pub struct GlobalContentPolicy;

impl ContentPolicy for GlobalContentPolicy {
    fn has_media_src(&self) -> bool {
        read().contains("media-src")
    }

    fn current(&self) -> String {
        read()
    }

    fn append_media_src(&self) -> Result<String, Error> {
        let mut guard = match cell().lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !guard.contains("media-src") {
            guard.push_str(";media-src 'self';");
        }
        Ok(guard.clone())
    }
}

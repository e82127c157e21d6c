//! 標準ビルド環境解決実装（std::env を委譲）

use crate::ports::outbound::build_env::MACRO_KEYS;
use crate::ports::outbound::BuildEnv;
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

/// 環境変数からマクロ値を解決する BuildEnv 実装
#[derive(Debug, Clone, Default)]
pub struct StdBuildEnv;

impl BuildEnv for StdBuildEnv {
    fn macro_map(&self) -> BTreeMap<String, String> {
        let mut m = BTreeMap::new();
        for key in MACRO_KEYS {
            if let Ok(v) = env::var(key) {
                if !v.is_empty() {
                    m.insert(key.to_string(), v);
                }
            }
        }
        m
    }

    fn workspace_dir(&self) -> PathBuf {
        env::var("WORKSPACE")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .or_else(|| env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn build_number(&self) -> String {
        env::var("BUILD_NUMBER")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "0".to_string())
    }
}

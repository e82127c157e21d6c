//! 標準出力へのビルドコンソール実装

use crate::ports::outbound::BuildLog;

/// stdout/stderr に出力する BuildLog 実装
#[derive(Debug, Clone, Default)]
pub struct ConsoleBuildLog;

impl BuildLog for ConsoleBuildLog {
    fn println(&self, line: &str) {
        println!("{}", line);
    }

    fn error(&self, line: &str) {
        eprintln!("{}", line);
    }

    fn hyperlink(&self, url: &str, label: &str) {
        println!("{}: {}", label, url);
    }
}

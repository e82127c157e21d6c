//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。メッセージと sysexits 互換の終了コードを持つ。
//! teardown 経路のエラーは呼び出し側でログに変換し、境界の外へは伝播させない。

use thiserror::Error as ThisError;

/// 共通エラー型
///
/// `exit_code()` が sysexits 互換のプロセス終了コードを返す。
#[derive(Debug, Clone, ThisError)]
pub enum Error {
    /// 引数不正（usage エラー、終了コード 64）
    #[error("{0}")]
    InvalidArgument(String),

    /// I/O エラー（終了コード 74）
    #[error("{0}")]
    Io(String),

    /// 環境変数の欠落・不正（終了コード 78）
    #[error("{0}")]
    Env(String),

    /// 内部エラー（終了コード 70）
    #[error("{0}")]
    System(String),

    /// キャプチャプロセスの起動失敗（終了コード 70）
    #[error("{0}")]
    Launch(String),

    /// JSON シリアライズ失敗（終了コード 70）
    #[error("JSON error: {0}")]
    Json(String),

    /// アーカイブ後のサイズ不一致。ローカルコピーは削除しない（唯一の正常コピーを守る）
    #[error("archive size mismatch for '{logical_name}': archived {archived_len} bytes != workspace {workspace_len} bytes")]
    ArchiveSizeMismatch {
        logical_name: String,
        archived_len: u64,
        workspace_len: u64,
    },
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Error::Env(msg.into())
    }

    pub fn system(msg: impl Into<String>) -> Self {
        Error::System(msg.into())
    }

    pub fn launch(msg: impl Into<String>) -> Self {
        Error::Launch(msg.into())
    }

    /// sysexits 互換の終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) => 64,
            Error::Io(_) => 74,
            Error::Env(_) => 78,
            Error::System(_) | Error::Launch(_) | Error::Json(_) => 70,
            Error::ArchiveSizeMismatch { .. } => 74,
        }
    }

    /// usage エラーか（main で usage 表示に使う）
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

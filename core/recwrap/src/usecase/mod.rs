//! ユースケース
//!
//! - supervisor: キャプチャプロセスの起動と graceful stop（状態機械）
//! - finalize: アーティファクトのアーカイブ・検証・ビューワー生成
//! - record: ラップ対象コマンドの前後で上記を束ねるオーケストレーション

pub mod finalize;
pub mod record;
pub mod supervisor;

pub use finalize::ArtifactFinalizer;
pub use record::RecordUseCase;
pub use supervisor::{Supervisor, SupervisorState};

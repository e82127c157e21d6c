//! Policy Gate（純粋判定）
//!
//! TeardownOutcome と fail-on-error フラグから、ビルド全体を失敗させるかを決める。
//! メッセージの出力は usecase 側の責務。

use super::TeardownOutcome;

/// ビルド全体を失敗扱いにするか
///
/// - `ArchivedArtifact` はフラグに関係なく常に成功。
/// - それ以外はフラグが立っている場合のみ失敗。
pub fn build_should_fail(outcome: &TeardownOutcome, fail_on_error: bool) -> bool {
    match outcome {
        TeardownOutcome::ArchivedArtifact(_) => false,
        TeardownOutcome::NoArtifactProduced | TeardownOutcome::NeverStarted { .. } => fail_on_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ArchiveRecord;

    fn archived() -> TeardownOutcome {
        TeardownOutcome::ArchivedArtifact(ArchiveRecord {
            logical_name: "a.mp4".to_string(),
            archived_len: 1,
            workspace_len: 1,
        })
    }

    #[test]
    fn test_archived_is_success_regardless_of_flag() {
        assert!(!build_should_fail(&archived(), true));
        assert!(!build_should_fail(&archived(), false));
    }

    #[test]
    fn test_no_artifact_fails_only_with_flag() {
        assert!(build_should_fail(&TeardownOutcome::NoArtifactProduced, true));
        assert!(!build_should_fail(&TeardownOutcome::NoArtifactProduced, false));
    }

    #[test]
    fn test_never_started_fails_only_with_flag() {
        let outcome = TeardownOutcome::NeverStarted {
            diagnostics: "boom".to_string(),
        };
        assert!(build_should_fail(&outcome, true));
        assert!(!build_should_fail(&outcome, false));
    }
}

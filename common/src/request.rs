//! アクションごとのリクエスト状態
//!
//! ボタンの無効化やローディング表示はこの状態から導出する。

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState<T> {
    #[default]
    Idle,
    Pending,
    Success(T),
    Error(String),
}

impl<T> RequestState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, RequestState::Idle)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            RequestState::Success(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Error(e) => Some(e),
            _ => None,
        }
    }

    /// 実行中でなければPendingにしてtrue（二重送信防止）
    pub fn try_begin(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        *self = RequestState::Pending;
        true
    }

    /// 結果を反映
    pub fn settle<E: std::fmt::Display>(&mut self, result: Result<T, E>) {
        *self = match result {
            Ok(v) => RequestState::Success(v),
            Err(e) => RequestState::Error(e.to_string()),
        };
    }

    pub fn reset(&mut self) {
        *self = RequestState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_begin_blocks_duplicate() {
        let mut state: RequestState<u32> = RequestState::Idle;
        assert!(state.try_begin());
        assert!(state.is_pending());
        assert!(!state.try_begin());
    }

    #[test]
    fn test_settle_success_and_error() {
        let mut state: RequestState<u32> = RequestState::Pending;
        state.settle::<String>(Ok(3));
        assert_eq!(state.value(), Some(&3));

        state.settle::<String>(Err("boom".to_string()));
        assert_eq!(state.error(), Some("boom"));
        assert!(state.value().is_none());

        // 失敗後は再実行可能
        assert!(state.try_begin());
    }

    #[test]
    fn test_reset() {
        let mut state: RequestState<()> = RequestState::Error("x".into());
        state.reset();
        assert!(state.is_idle());
    }
}

//! ランタイム状態管理（Application層）
//!
//! ジェスチャー入力の有効/無効切り替えを管理します。
//! `Arc<AtomicBool>`を使用したロックフリー設計により、
//! フレームループは数CPUサイクルで状態を確認できます。

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// ランタイム状態（スレッド間で共有、ロックフリー）
///
/// 無効化中のフレームは「手なし」として解釈される（タイマーは進み続ける）。
///
/// # パフォーマンス特性
/// - 読み取り: `Ordering::Relaxed` - 数CPUサイクル、ロック不要
/// - メモリオーダー: Relaxed - 厳密な順序保証は不要（少し古い値でも無害）
#[derive(Clone)]
pub struct RuntimeState {
    /// ジェスチャー入力の有効/無効
    enabled: Arc<AtomicBool>,
}

impl RuntimeState {
    /// 新しいRuntimeStateを作成（デフォルトで有効）
    pub fn new() -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    /// ジェスチャー入力が有効かどうかを確認（ロックフリー、超高速）
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// 有効/無効をトグル（新しい状態を返す）
    pub fn toggle_enabled(&self) -> bool {
        let current = self.enabled.load(Ordering::Relaxed);
        let new_value = !current;
        self.enabled.store(new_value, Ordering::Relaxed);
        new_value
    }
}

impl Default for RuntimeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_state_toggle() {
        let state = RuntimeState::new();
        assert!(state.is_enabled());

        let new_state = state.toggle_enabled();
        assert!(!new_state);
        assert!(!state.is_enabled());

        let new_state = state.toggle_enabled();
        assert!(new_state);
        assert!(state.is_enabled());
    }

    #[test]
    fn test_clones_share_state() {
        let state = RuntimeState::new();
        let clone = state.clone();

        state.toggle_enabled();
        assert!(!clone.is_enabled());
    }
}

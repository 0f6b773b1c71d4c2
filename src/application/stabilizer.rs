//! ジェスチャー安定化
//!
//! 分類器の出力は1フレーム単位では揺らぐため、
//! 「同じジェスチャーがスコア閾値以上で連続Nフレーム観測された」
//! ときに初めて確定扱いとする。

use crate::domain::{GestureCandidate, StabilizerConfig};

/// 連続観測中のジェスチャー
///
/// 不変条件: `name` がNoneのとき `count` は必ず0。
#[derive(Debug, Clone, Default)]
pub struct GestureHold {
    pub name: Option<String>,
    pub count: u32,
}

/// ジェスチャー安定化器
#[derive(Debug)]
pub struct GestureStabilizer {
    config: StabilizerConfig,
    hold: GestureHold,
}

impl GestureStabilizer {
    pub fn new(config: StabilizerConfig) -> Self {
        Self {
            config,
            hold: GestureHold::default(),
        }
    }

    /// 1フレーム分の最上位候補を観測する
    ///
    /// - 候補なし、またはスコアが閾値未満 → ホールドをリセット
    /// - 継続中と同名 → カウントを加算
    /// - 別名 → その名前でカウント1から開始
    pub fn observe(&mut self, candidate: Option<&GestureCandidate>) {
        let Some(candidate) = candidate else {
            self.reset();
            return;
        };

        if candidate.score < self.config.threshold_for(&candidate.name) {
            self.reset();
            return;
        }

        match &self.hold.name {
            Some(held) if held == &candidate.name => {
                self.hold.count = self.hold.count.saturating_add(1);
            }
            _ => {
                self.hold.name = Some(candidate.name.clone());
                self.hold.count = 1;
            }
        }
    }

    /// 今フレームで閾値を超えているジェスチャー名
    pub fn current(&self) -> Option<&str> {
        self.hold.name.as_deref()
    }

    /// 指定ジェスチャーが必要ホールドフレーム数に達しているか
    pub fn meets_hold(&self, name: &str) -> bool {
        self.hold.name.as_deref() == Some(name)
            && self.hold.count >= self.config.hold_frames_for(name)
    }

    /// ホールドを初期状態に戻す（アクション発火後・手消失時）
    pub fn reset(&mut self) {
        self.hold.name = None;
        self.hold.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gesture_names;

    fn stabilizer() -> GestureStabilizer {
        GestureStabilizer::new(StabilizerConfig::default())
    }

    fn candidate(name: &str, score: f32) -> GestureCandidate {
        GestureCandidate::new(name, score)
    }

    #[test]
    fn test_hold_requires_consecutive_frames() {
        let mut s = stabilizer();
        let v = candidate(gesture_names::VICTORY, 0.9);

        // Victoryのホールド要件は6フレーム
        for i in 1..6 {
            s.observe(Some(&v));
            assert!(!s.meets_hold(gesture_names::VICTORY), "frame {}", i);
        }
        s.observe(Some(&v));
        assert!(s.meets_hold(gesture_names::VICTORY));
    }

    #[test]
    fn test_low_score_resets_hold() {
        let mut s = stabilizer();
        let strong = candidate(gesture_names::VICTORY, 0.9);
        let weak = candidate(gesture_names::VICTORY, 0.5); // 閾値0.6未満

        for _ in 0..5 {
            s.observe(Some(&strong));
        }
        s.observe(Some(&weak));
        assert!(s.current().is_none());

        // リセット後は再度6フレーム必要
        s.observe(Some(&strong));
        assert!(!s.meets_hold(gesture_names::VICTORY));
    }

    #[test]
    fn test_name_change_restarts_count() {
        let mut s = stabilizer();
        let victory = candidate(gesture_names::VICTORY, 0.9);
        let thumb = candidate(gesture_names::THUMB_UP, 0.9);

        for _ in 0..5 {
            s.observe(Some(&victory));
        }
        s.observe(Some(&thumb));
        assert_eq!(s.current(), Some(gesture_names::THUMB_UP));
        assert!(!s.meets_hold(gesture_names::THUMB_UP));

        // Thumb_Upは4フレームで確定（今1なのであと3）
        for _ in 0..3 {
            s.observe(Some(&thumb));
        }
        assert!(s.meets_hold(gesture_names::THUMB_UP));
    }

    #[test]
    fn test_absent_candidate_resets() {
        let mut s = stabilizer();
        let v = candidate(gesture_names::VICTORY, 0.9);
        for _ in 0..6 {
            s.observe(Some(&v));
        }
        assert!(s.meets_hold(gesture_names::VICTORY));

        s.observe(None);
        assert!(s.current().is_none());
        assert!(!s.meets_hold(gesture_names::VICTORY));
    }

    #[test]
    fn test_per_gesture_thresholds() {
        let mut s = stabilizer();
        // Closed_Fistの閾値は0.45なので0.5で通る
        let fist = candidate(gesture_names::CLOSED_FIST, 0.5);
        s.observe(Some(&fist));
        assert_eq!(s.current(), Some(gesture_names::CLOSED_FIST));

        // Victoryの閾値は0.6なので0.5では通らない
        let weak_victory = candidate(gesture_names::VICTORY, 0.5);
        s.observe(Some(&weak_victory));
        assert!(s.current().is_none());
    }
}

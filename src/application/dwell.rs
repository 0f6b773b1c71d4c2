//! Dwellクリック追跡
//!
//! ポインタ条件が有効な間、滞留時間を加算する。
//! 閾値に達した時点でクリック成立（発火判定とクールダウンは呼び出し側）。

use crate::domain::DwellConfig;

/// 滞留時間トラッカー
///
/// 蓄積はf64で行う。フレーム毎のf32逐次加算では丸め誤差が積もり、
/// ちょうど閾値ぶんのフレーム数を与えても境界を跨げないことがある。
#[derive(Debug)]
pub struct DwellTracker {
    threshold_secs: f32,
    elapsed: f64,
}

impl DwellTracker {
    pub fn new(config: &DwellConfig) -> Self {
        Self {
            threshold_secs: config.threshold_secs,
            elapsed: 0.0,
        }
    }

    /// 滞留時間を加算する
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += f64::from(dt);
    }

    /// クリック成立条件（閾値到達）を満たしているか
    pub fn is_complete(&self) -> bool {
        self.elapsed >= f64::from(self.threshold_secs)
    }

    /// ホバー進捗 [0,1]
    pub fn progress(&self) -> f32 {
        (self.elapsed / f64::from(self.threshold_secs)).min(1.0) as f32
    }

    /// 滞留時間を0に戻す（クリック発火後・条件解除時・手消失時）
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> DwellTracker {
        DwellTracker::new(&DwellConfig::default())
    }

    #[test]
    fn test_completes_at_threshold() {
        let mut t = tracker();
        // 60fps相当で1.2秒 = 72フレーム
        let dt = 1.0 / 60.0;
        for _ in 0..71 {
            t.advance(dt);
        }
        assert!(!t.is_complete());

        t.advance(dt);
        assert!(t.is_complete());
    }

    #[test]
    fn test_progress_clamped_to_one() {
        let mut t = tracker();
        assert_eq!(t.progress(), 0.0);

        t.advance(0.6);
        assert!((t.progress() - 0.5).abs() < 1e-6);

        t.advance(10.0);
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn test_reset() {
        let mut t = tracker();
        t.advance(2.0);
        assert!(t.is_complete());

        t.reset();
        assert!(!t.is_complete());
        assert_eq!(t.progress(), 0.0);
    }
}

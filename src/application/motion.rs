//! モーションデルタ追跡
//!
//! 手掌位置・両手間距離・単手スケールの前回サンプルを保持し、
//! フレーム間の差分を算出する。サンプルはそれぞれ独立に管理され、
//! 該当する手の構成が消えたらNoneに戻す（再出現時の偽デルタを防ぐ）。

use crate::domain::MotionConfig;

/// 微小デルタの非線形増幅
///
/// `d * (1 + |d| * k)`。小さい動きはほぼそのまま、
/// 大きい動きほど強く増幅される（符号は保存）。
fn amplify(delta: f32, gain: f32) -> f32 {
    delta * (1.0 + delta.abs() * gain)
}

/// モーショントラッカー
#[derive(Debug)]
pub struct MotionTracker {
    config: MotionConfig,
    last_palm: Option<(f32, f32)>,
    last_two_hand_distance: Option<f32>,
    last_scale: Option<f32>,
    last_delta: Option<(f32, f32)>,
}

impl MotionTracker {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            last_palm: None,
            last_two_hand_distance: None,
            last_scale: None,
            last_delta: None,
        }
    }

    /// 手掌位置を観測し、ミラー済み移動デルタを返す
    ///
    /// 映像は左右反転表示されるため dx = (1-x) - (1-last_x)。
    /// 初回サンプル（前回値なし）はNone。
    pub fn observe_palm(&mut self, palm: (f32, f32)) -> Option<(f32, f32)> {
        let delta = self.last_palm.map(|last| {
            let dx = (1.0 - palm.0) - (1.0 - last.0);
            let dy = palm.1 - last.1;
            (dx, dy)
        });
        self.last_palm = Some(palm);
        self.last_delta = delta;
        delta
    }

    /// 移動中とみなすか（どちらかの軸が閾値超え）
    pub fn is_moving(&self, delta: (f32, f32)) -> bool {
        delta.0.abs() > self.config.move_threshold || delta.1.abs() > self.config.move_threshold
    }

    /// 両手間距離を観測し、増幅済みズームデルタを返す
    ///
    /// 距離の縮小（負のデルタ）は負のズームデルタになる。初回サンプルはNone。
    pub fn observe_two_hand_distance(&mut self, distance: f32) -> Option<f32> {
        let delta = self
            .last_two_hand_distance
            .map(|last| amplify(distance - last, self.config.two_hand_gain) * self.config.two_hand_zoom_scale);
        self.last_two_hand_distance = Some(distance);
        delta
    }

    /// 単手スケールを観測し、増幅済みズームデルタを返す
    pub fn observe_scale(&mut self, scale: f32) -> Option<f32> {
        let delta = self
            .last_scale
            .map(|last| amplify(scale - last, self.config.single_hand_gain) * self.config.single_hand_zoom_scale);
        self.last_scale = Some(scale);
        delta
    }

    /// 直近の移動デルタ（デバッグ表示用）
    pub fn last_movement(&self) -> Option<(f32, f32)> {
        self.last_delta
    }

    /// 手掌サンプルを破棄する
    pub fn reset_palm(&mut self) {
        self.last_palm = None;
        self.last_delta = None;
    }

    /// 両手距離サンプルを破棄する（両手が揃っていないフレームで呼ぶ）
    pub fn reset_two_hand(&mut self) {
        self.last_two_hand_distance = None;
    }

    /// 単手スケールサンプルを破棄する（五指ズーム条件が外れたフレームで呼ぶ）
    pub fn reset_scale(&mut self) {
        self.last_scale = None;
    }
}

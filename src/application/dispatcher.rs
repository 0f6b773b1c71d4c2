//! アクションディスパッチャ
//!
//! 安定化済みジェスチャー・指ポーズ・モーションデルタを統合し、
//! モード遷移と各アクションを発火させる解釈器の中核。
//! 全状態はこの構造体が所有し、毎フレーム`InterpreterOutput`を出力する。

use tracing::{debug, info};

use crate::application::cooldown::CooldownBank;
use crate::application::dwell::DwellTracker;
use crate::application::extractor::{extract, hand_scale, palm_center};
use crate::application::motion::MotionTracker;
use crate::application::stabilizer::GestureStabilizer;
use crate::domain::{
    gesture_names, landmark_index as li, ActionFlags, ActionKind, AppConfig, ApplicationMode,
    DebugSnapshot, Hand, InterpreterOutput, LandmarkFrame, PointerCoords, RandomPort,
};

/// ジェスチャー解釈器
///
/// 呼び出し規約: フレームごとに`step()`を1回、映像更新がないフレームでは
/// `idle()`を呼ぶ（クールダウンだけが進む）。
pub struct Interpreter {
    config: AppConfig,
    stabilizer: GestureStabilizer,
    cooldowns: CooldownBank,
    dwell: DwellTracker,
    motion: MotionTracker,
    rng: Box<dyn RandomPort>,

    /// 写真インデックス（起動時に一度だけ取得、以後読み取り専用）
    photos: Vec<String>,
    /// 直前にランダム選択したインデックス（連続重複の回避用）
    last_pick: Option<usize>,

    mode: ApplicationMode,
    pointer: Option<PointerCoords>,
    pan_offset: (f32, f32),
    zoom_offset: f32,
    rotation_boost: f32,
    selected_photo: Option<usize>,
    ornament_theme: u32,
    click_token: u64,
    light_pulse_token: u64,
    debug: DebugSnapshot,
}

impl Interpreter {
    pub fn new(config: AppConfig, photos: Vec<String>, rng: Box<dyn RandomPort>) -> Self {
        Self {
            stabilizer: GestureStabilizer::new(config.stabilizer.clone()),
            cooldowns: CooldownBank::new(config.actions),
            dwell: DwellTracker::new(&config.dwell),
            motion: MotionTracker::new(config.motion),
            config,
            rng,
            photos,
            last_pick: None,
            mode: ApplicationMode::default(),
            pointer: None,
            pan_offset: (0.0, 0.0),
            zoom_offset: 0.0,
            rotation_boost: 0.0,
            selected_photo: None,
            ornament_theme: 0,
            click_token: 0,
            light_pulse_token: 0,
            debug: DebugSnapshot::default(),
        }
    }

    /// 1フレーム分の推論結果を解釈する
    pub fn step(&mut self, frame: &LandmarkFrame, dt: f32) -> InterpreterOutput {
        self.cooldowns.tick(dt);

        match frame.usable_hands() {
            Some(hands) => self.step_hands(hands, dt),
            None => self.step_no_hands(),
        }

        self.make_output()
    }

    /// 映像更新のないフレーム（クールダウンのみ進める）
    pub fn idle(&mut self, dt: f32) -> InterpreterOutput {
        self.cooldowns.tick(dt);
        self.make_output()
    }

    /// 手が1つも検出されなかったフレームの処理
    fn step_no_hands(&mut self) {
        self.stabilizer.reset();
        self.dwell.reset();
        self.motion.reset_two_hand();
        self.motion.reset_scale();

        // ポインタはクリック直後のフィードバック表示のために
        // クールダウンが切れるまで残し、切れた時点で消す
        if self.cooldowns.is_ready(ActionKind::Click) {
            self.pointer = None;
            self.motion.reset_palm();
        }

        if self.mode == ApplicationMode::Formed {
            self.decay_rotation();
        }

        self.debug = DebugSnapshot::default();
    }

    /// 手が検出されたフレームの処理
    ///
    /// 各ルールの前提条件（モード・写真の開閉）はフレーム開始時点の
    /// スナップショットに対して評価する。同一フレーム内で先行ルールが
    /// 状態を変えても、後続ルールの判定は揺らがない。
    fn step_hands(&mut self, hands: &[Hand], dt: f32) {
        let entry_mode = self.mode;
        let photo_open = self.selected_photo.is_some();

        let primary = &hands[0];
        self.stabilizer.observe(primary.gestures.first());
        let pose = extract(primary, &self.config.extractor);
        let palm = palm_center(primary);
        let delta = self.motion.observe_palm(palm);
        let moving = delta.map(|d| self.motion.is_moving(d)).unwrap_or(false);

        let victory_raw = self.stabilizer.current() == Some(gesture_names::VICTORY);
        let pointing = pose.is_pointing();
        let mut zoomed = false;

        // --- 単手ズーム（CHAOS・五指・片手のみ） ---
        if hands.len() == 1 && pose.is_five_fingers() && entry_mode == ApplicationMode::Chaos {
            if let Some(zoom_delta) = self.motion.observe_scale(hand_scale(primary)) {
                self.apply_zoom(zoom_delta);
                zoomed = true;
            }
        } else {
            self.motion.reset_scale();
        }

        // --- シャカサインでパン（写真を開いていないとき） ---
        let panning = pose.is_shaka && !photo_open;
        if panning {
            self.pan_offset = (
                (0.5 - palm.0) * self.config.control.pan_half_width * 2.0,
                (0.5 - palm.1) * self.config.control.pan_half_height * 2.0,
            );
            self.dwell.reset();
        }

        // --- ポインタ・Dwellクリック（CHAOSのみ） ---
        let pointer_active = entry_mode == ApplicationMode::Chaos
            && (victory_raw
                || (!pose.is_five_fingers()
                    && !pose.is_shaka
                    && (pointing || pose.is_pinching)));
        if pointer_active {
            let tip = primary.landmark(li::INDEX_TIP);
            self.pointer = Some(PointerCoords::new(1.0 - tip.x, tip.y));

            // 滞留はポインタ条件が続く限り蓄積する（手の移動では中断しない）
            self.dwell.advance(dt);
            if self.dwell.is_complete() && self.cooldowns.is_ready(ActionKind::Click) {
                self.click_token = self.click_token.wrapping_add(1);
                self.cooldowns.fire(ActionKind::Click);
                self.dwell.reset();
                debug!(token = self.click_token, "Dwell click fired");
            }
        } else {
            self.dwell.reset();
            self.pointer = None;
        }

        // --- Victoryホールド: 写真選択（CHAOS）/ ライトパルス（FORMED） ---
        if self.stabilizer.meets_hold(gesture_names::VICTORY) {
            match entry_mode {
                ApplicationMode::Chaos => {
                    if self.cooldowns.is_ready(ActionKind::Victory) {
                        self.pick_random_photo();
                        self.cooldowns.fire(ActionKind::Victory);
                        self.dwell.reset();
                    }
                }
                ApplicationMode::Formed => {
                    if self.cooldowns.is_ready(ActionKind::LightPulse) {
                        self.rotation_boost =
                            self.rotation_boost.max(self.config.control.pulse_boost);
                        self.light_pulse_token = self.light_pulse_token.wrapping_add(1);
                        self.cooldowns.fire(ActionKind::LightPulse);
                        info!("Light pulse triggered");
                    }
                }
            }
        }

        // --- モード遷移（Victory検出中・ポインティング中は抑止） ---
        if !victory_raw && !pointing {
            let fist_active = self.stabilizer.meets_hold(gesture_names::CLOSED_FIST)
                || self.stabilizer.current() == Some(gesture_names::CLOSED_FIST)
                || pose.is_all_folded;

            if fist_active {
                if entry_mode != ApplicationMode::Formed {
                    info!(from = entry_mode.as_str(), "Mode transition to FORMED");
                }
                self.mode = ApplicationMode::Formed;
                self.selected_photo = None;
                self.stabilizer.reset();
            } else if self.stabilizer.meets_hold(gesture_names::OPEN_PALM)
                && entry_mode == ApplicationMode::Formed
                && !moving
            {
                info!("Mode transition to CHAOS");
                self.mode = ApplicationMode::Chaos;
                self.stabilizer.reset();
            }
        }

        // --- サムズアップ: テーマ切替（FORMED・フリック） ---
        let thumb_active = self.stabilizer.current() == Some(gesture_names::THUMB_UP);
        if thumb_active && entry_mode == ApplicationMode::Formed {
            if let Some((dx, _)) = delta {
                if dx.abs() > self.config.actions.theme_flick_dx
                    && self.cooldowns.is_ready(ActionKind::ThemeCycle)
                {
                    let count = self.config.actions.theme_count as i64;
                    let step = if dx > 0.0 { 1 } else { -1 };
                    self.ornament_theme =
                        (self.ornament_theme as i64 + step).rem_euclid(count) as u32;
                    self.cooldowns.fire(ActionKind::ThemeCycle);
                    debug!(theme = self.ornament_theme, "Ornament theme cycled");
                }
            }
        }

        // --- サムズアップ: 写真クローズ ---
        if thumb_active && self.cooldowns.is_ready(ActionKind::ThumbDismiss) {
            self.selected_photo = None;
            if entry_mode == ApplicationMode::Chaos {
                // CHAOS中はモードを再確定する（FORMEDへの誤遷移からの復帰）
                self.mode = ApplicationMode::Chaos;
            }
            self.cooldowns.fire(ActionKind::ThumbDismiss);
            self.stabilizer.reset();
        }

        // --- 回転ブースト（FORMED・五指横振り） ---
        if entry_mode == ApplicationMode::Formed {
            let mut swung = false;
            if hands.len() == 1 && pose.is_five_fingers() {
                if let Some((dx, _)) = delta {
                    if dx.abs() > self.config.control.rotation_min_dx {
                        let limit = self.config.control.rotation_limit;
                        self.rotation_boost = (self.rotation_boost
                            - dx * self.config.control.rotation_gain)
                            .clamp(-limit, limit);
                        swung = true;
                    }
                }
            }
            if !swung && !(hands.len() == 1 && pose.is_five_fingers()) {
                self.decay_rotation();
            }
        }

        // --- 両手ズーム（モード不問） ---
        if hands.len() == 2 {
            let distance = hands[0]
                .landmark(li::WRIST)
                .planar_distance(hands[1].landmark(li::WRIST));
            if let Some(zoom_delta) = self.motion.observe_two_hand_distance(distance) {
                self.apply_zoom(zoom_delta);
                zoomed = true;
            }
        } else {
            self.motion.reset_two_hand();
        }

        // --- 五指スワイプ: 隣の写真へ（写真を開いているとき） ---
        if photo_open && pose.is_five_fingers() && self.cooldowns.is_ready(ActionKind::Swipe) {
            if let (Some((dx, _)), Some(idx)) = (delta, self.selected_photo) {
                if dx.abs() > self.config.actions.swipe_min_dx && !self.photos.is_empty() {
                    let len = self.photos.len() as i64;
                    let step = if dx > 0.0 { 1 } else { -1 };
                    let next = (idx as i64 + step).rem_euclid(len) as usize;
                    self.selected_photo = Some(next);
                    self.last_pick = Some(next);
                    self.cooldowns.fire(ActionKind::Swipe);
                    debug!(index = next, "Photo swiped");
                }
            }
        }

        self.debug = DebugSnapshot {
            hands_detected: hands.len(),
            gestures: primary.gestures.clone(),
            finger_pose: Some(pose),
            actions: ActionFlags {
                is_pointing: pointing,
                is_panning: panning,
                is_zooming: zoomed,
                is_pinching: pose.is_pinching,
                is_five_fingers: pose.is_five_fingers(),
                is_shaka: pose.is_shaka,
            },
            palm_position: Some(palm),
            movement: delta,
        };
    }

    /// 写真インデックスからランダムに1枚選ぶ
    ///
    /// リストが2枚以上あるとき、直前と同じ写真は選ばない（隣にずらす）。
    /// リストが空なら何もしない。
    fn pick_random_photo(&mut self) {
        let len = self.photos.len();
        if len == 0 {
            return;
        }

        let mut idx = self.rng.pick(len);
        if len > 1 && self.last_pick == Some(idx) {
            idx = (idx + 1) % len;
        }
        self.selected_photo = Some(idx);
        self.last_pick = Some(idx);
        info!(photo = %self.photos[idx], "Photo selected");
    }

    /// ズームデルタを加算してクランプする
    fn apply_zoom(&mut self, delta: f32) {
        self.zoom_offset = (self.zoom_offset + delta)
            .clamp(self.config.control.zoom_min, self.config.control.zoom_max);
    }

    /// 回転ブーストを減衰させ、微小値は0にスナップする
    fn decay_rotation(&mut self) {
        self.rotation_boost *= self.config.control.rotation_decay;
        if self.rotation_boost.abs() < self.config.control.rotation_epsilon {
            self.rotation_boost = 0.0;
        }
    }

    fn make_output(&self) -> InterpreterOutput {
        InterpreterOutput {
            mode: self.mode,
            pointer: self.pointer,
            hover_progress: self.dwell.progress(),
            click_token: self.click_token,
            pan_offset: self.pan_offset,
            zoom_offset: self.zoom_offset,
            rotation_boost: self.rotation_boost,
            selected_photo: self.selected_photo.map(|i| self.photos[i].clone()),
            ornament_theme: self.ornament_theme,
            light_pulse_token: self.light_pulse_token,
            debug: self.debug.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock_vision::{
        fist_hand, hand_with_gesture, open_hand, pointing_hand,
    };
    use crate::infrastructure::rng::SequenceRandom;

    const DT: f32 = 1.0 / 60.0;

    fn photos() -> Vec<String> {
        vec!["a.jpg".into(), "b.jpg".into(), "c.jpg".into()]
    }

    fn interpreter(picks: Vec<usize>) -> Interpreter {
        Interpreter::new(
            AppConfig::default(),
            photos(),
            Box::new(SequenceRandom::new(picks)),
        )
    }

    fn frame(hand: Hand) -> LandmarkFrame {
        LandmarkFrame::with_hands(vec![hand])
    }

    #[test]
    fn test_fist_enters_formed_and_clears_photo() {
        let mut interp = interpreter(vec![0]);

        // Victoryホールドで写真を開く
        for _ in 0..6 {
            interp.step(
                &frame(hand_with_gesture(open_hand(), "Victory", 0.9)),
                DT,
            );
        }
        let out = interp.idle(DT);
        assert_eq!(out.selected_photo.as_deref(), Some("a.jpg"));

        // こぶし（分類なしでも全指折りで成立）
        let out = interp.step(&frame(fist_hand()), DT);
        assert_eq!(out.mode, ApplicationMode::Formed);
        assert!(out.selected_photo.is_none());
    }

    #[test]
    fn test_open_palm_returns_to_chaos_only_when_still() {
        let mut interp = interpreter(vec![]);
        interp.step(&frame(fist_hand()), DT);
        assert_eq!(interp.mode, ApplicationMode::Formed);

        // Open_Palmのホールド要件は12フレーム
        for _ in 0..12 {
            interp.step(&frame(hand_with_gesture(open_hand(), "Open_Palm", 0.9)), DT);
        }
        assert_eq!(interp.mode, ApplicationMode::Chaos);
    }

    #[test]
    fn test_victory_pick_avoids_immediate_repeat() {
        let mut interp = interpreter(vec![1, 1]);

        for _ in 0..6 {
            interp.step(&frame(hand_with_gesture(open_hand(), "Victory", 0.9)), DT);
        }
        assert_eq!(interp.selected_photo, Some(1));

        // クールダウン明けに同じインデックスが返ると隣へずれる
        interp.idle(1.1);
        for _ in 0..6 {
            interp.step(&frame(hand_with_gesture(open_hand(), "Victory", 0.9)), DT);
        }
        assert_eq!(interp.selected_photo, Some(2));
    }

    #[test]
    fn test_victory_pick_rate_limited() {
        let mut interp = interpreter(vec![0, 1]);

        // ホールド成立後もクールダウン中は再選択しない
        for _ in 0..20 {
            interp.step(&frame(hand_with_gesture(open_hand(), "Victory", 0.9)), DT);
        }
        assert_eq!(interp.selected_photo, Some(0));
    }

    #[test]
    fn test_victory_pulse_in_formed() {
        let mut interp = interpreter(vec![]);
        interp.step(&frame(fist_hand()), DT);
        assert_eq!(interp.mode, ApplicationMode::Formed);

        let before = interp.light_pulse_token;
        for _ in 0..6 {
            interp.step(&frame(hand_with_gesture(open_hand(), "Victory", 0.9)), DT);
        }
        assert_eq!(interp.light_pulse_token, before + 1);
        assert!(interp.rotation_boost >= 2.0);
        // FORMEDのままで写真も開かない
        assert_eq!(interp.mode, ApplicationMode::Formed);
        assert!(interp.selected_photo.is_none());
    }

    #[test]
    fn test_dwell_click_fires_exactly_once() {
        let mut interp = interpreter(vec![]);

        // 静止ポインティングで1.2秒 = 72フレーム
        let mut clicks = 0u64;
        for _ in 0..72 {
            let out = interp.step(&frame(pointing_hand()), DT);
            clicks = out.click_token;
        }
        assert_eq!(clicks, 1);

        // クリック直後は進捗0、クールダウン中は再発火しない
        let out = interp.step(&frame(pointing_hand()), DT);
        assert_eq!(out.click_token, 1);
        assert!(out.hover_progress < 0.1);
    }

    #[test]
    fn test_pointing_blocks_fist_fallback() {
        // ポインティング形状は全指折りではないが、
        // Victory検出中のモード遷移抑止も合わせて確認する
        let mut interp = interpreter(vec![0]);
        let out = interp.step(
            &frame(hand_with_gesture(fist_hand(), "Victory", 0.9)),
            DT,
        );
        // Victoryが閾値超えで検出されている間はこぶし遷移しない
        assert_eq!(out.mode, ApplicationMode::Chaos);
    }

    #[test]
    fn test_no_hands_clears_pointer_after_click_cooldown() {
        let mut interp = interpreter(vec![]);

        for _ in 0..72 {
            interp.step(&frame(pointing_hand()), DT);
        }
        assert_eq!(interp.click_token, 1);

        // 手を外してもクリッククールダウン中はポインタが残る
        let out = interp.step(&LandmarkFrame::empty(), DT);
        assert!(out.pointer.is_some());

        // クールダウン（2.0秒）が切れたら消える
        interp.step(&LandmarkFrame::empty(), 2.0);
        let out = interp.step(&LandmarkFrame::empty(), DT);
        assert!(out.pointer.is_none());
        assert_eq!(out.hover_progress, 0.0);
    }

    #[test]
    fn test_empty_photo_list_pick_is_noop() {
        let mut interp = Interpreter::new(
            AppConfig::default(),
            Vec::new(),
            Box::new(SequenceRandom::new(vec![])),
        );

        for _ in 0..6 {
            interp.step(&frame(hand_with_gesture(open_hand(), "Victory", 0.9)), DT);
        }
        assert!(interp.selected_photo.is_none());
    }

    #[test]
    fn test_rotation_decays_to_exact_zero_in_formed() {
        let mut interp = interpreter(vec![]);
        interp.step(&frame(fist_hand()), DT);
        interp.rotation_boost = 2.0;

        // こぶし継続（五指でない）で毎フレーム減衰
        let mut prev = interp.rotation_boost;
        for _ in 0..200 {
            interp.step(&frame(fist_hand()), DT);
            let current = interp.rotation_boost;
            assert!(current.abs() <= prev.abs());
            prev = current;
        }
        assert_eq!(interp.rotation_boost, 0.0);
    }
}

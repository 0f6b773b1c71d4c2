//! スクリプト駆動のエンドツーエンドシナリオテスト
//!
//! ランドマークフレーム列を解釈器に流し込み、公開出力
//! （`InterpreterOutput`）だけを観測して一連の振る舞いを検証する。

use memory_tree::application::dispatcher::Interpreter;
use memory_tree::domain::{AppConfig, ApplicationMode, Hand, InterpreterOutput, LandmarkFrame};
use memory_tree::infrastructure::mock_vision::{
    build_hand, fist_hand, hand_with_gesture, offset_hand, open_hand, pointing_hand, scaled_hand,
    shaka_hand,
};
use memory_tree::infrastructure::rng::SequenceRandom;

/// 60fps相当のフレーム間隔
const DT: f32 = 1.0 / 60.0;

fn interpreter(picks: Vec<usize>) -> Interpreter {
    Interpreter::new(
        AppConfig::default(),
        vec!["a.jpg".into(), "b.jpg".into(), "c.jpg".into()],
        Box::new(SequenceRandom::new(picks)),
    )
}

fn single(hand: Hand) -> LandmarkFrame {
    LandmarkFrame::with_hands(vec![hand])
}

fn pair(left: Hand, right: Hand) -> LandmarkFrame {
    LandmarkFrame::with_hands(vec![left, right])
}

/// Victoryを必要フレームだけホールドして写真を開く
fn open_photo(interp: &mut Interpreter) -> InterpreterOutput {
    let mut last = interp.idle(0.0);
    for _ in 0..6 {
        last = interp.step(
            &single(hand_with_gesture(
                build_hand(false, true, true, false, false),
                "Victory",
                0.9,
            )),
            DT,
        );
    }
    last
}

#[test]
fn victory_hold_opens_photo_and_second_pick_skips_repeat() {
    let mut interp = interpreter(vec![1, 1]);

    let out = open_photo(&mut interp);
    assert_eq!(out.mode, ApplicationMode::Chaos);
    assert_eq!(out.selected_photo.as_deref(), Some("b.jpg"));

    // クールダウンを明けてもう一度。乱数が同じ1を返しても隣にずれる
    interp.idle(1.1);
    let out = open_photo(&mut interp);
    assert_eq!(out.selected_photo.as_deref(), Some("c.jpg"));
}

#[test]
fn fist_enters_formed_and_closes_photo() {
    let mut interp = interpreter(vec![0]);
    open_photo(&mut interp);

    // 分類ラベルなしでも全指屈曲の幾何で成立する
    let out = interp.step(&single(fist_hand()), DT);
    assert_eq!(out.mode, ApplicationMode::Formed);
    assert!(out.selected_photo.is_none());
}

#[test]
fn open_palm_hold_returns_to_chaos() {
    let mut interp = interpreter(vec![]);
    interp.step(&single(fist_hand()), DT);

    let palm = hand_with_gesture(open_hand(), "Open_Palm", 0.9);
    let mut out = interp.idle(0.0);
    for _ in 0..12 {
        out = interp.step(&single(palm.clone()), DT);
    }
    assert_eq!(out.mode, ApplicationMode::Chaos);
}

#[test]
fn moving_open_palm_does_not_leave_formed() {
    let mut interp = interpreter(vec![]);
    interp.step(&single(fist_hand()), DT);

    // 毎フレーム手を大きく動かしながらのOpen_Palmでは遷移しない
    let palm = hand_with_gesture(open_hand(), "Open_Palm", 0.9);
    let mut out = interp.idle(0.0);
    for i in 0..20 {
        let moved = offset_hand(&palm, 0.01 * i as f32, 0.0);
        out = interp.step(&single(moved), DT);
    }
    assert_eq!(out.mode, ApplicationMode::Formed);
}

#[test]
fn dwell_click_fires_once_and_resets_progress() {
    let mut interp = interpreter(vec![]);

    let mut out = interp.idle(0.0);
    for _ in 0..71 {
        out = interp.step(&single(pointing_hand()), DT);
        assert_eq!(out.click_token, 0);
        assert!(out.pointer.is_some());
    }

    // 72フレーム目（1.2秒）でクリック成立、進捗は0に戻る
    out = interp.step(&single(pointing_hand()), DT);
    assert_eq!(out.click_token, 1);
    assert!(out.hover_progress < 0.1);

    // クールダウン中は再発火しない
    for _ in 0..30 {
        out = interp.step(&single(pointing_hand()), DT);
    }
    assert_eq!(out.click_token, 1);
}

#[test]
fn dwell_click_fires_even_while_pointer_drifts() {
    let mut interp = interpreter(vec![]);

    // 移動判定の閾値（0.005）を超えるドリフトを続けてもポインタ条件が
    // 保たれている限り滞留は蓄積し、1.2秒でクリックが成立する
    let mut out = interp.idle(0.0);
    for i in 0..144 {
        let drifted = offset_hand(&pointing_hand(), 0.006 * i as f32, 0.0);
        out = interp.step(&single(drifted), DT);
        assert!(out.pointer.is_some());
    }
    assert_eq!(out.click_token, 1);
}

#[test]
fn pointer_survives_hand_loss_until_click_cooldown_drains() {
    let mut interp = interpreter(vec![]);

    for _ in 0..72 {
        interp.step(&single(pointing_hand()), DT);
    }

    // 手が消えてもクリッククールダウン中はポインタ保持
    let out = interp.step(&LandmarkFrame::empty(), DT);
    assert!(out.pointer.is_some());
    assert_eq!(out.hover_progress, 0.0);

    // クールダウン満了で消える
    interp.step(&LandmarkFrame::empty(), 2.0);
    let out = interp.step(&LandmarkFrame::empty(), DT);
    assert!(out.pointer.is_none());
}

#[test]
fn two_hand_shrink_zooms_out_and_clamps() {
    let mut interp = interpreter(vec![]);

    // 両手の手首距離: 0.5 → 0.45 → 0.40
    let base = open_hand();
    interp.step(&pair(base.clone(), offset_hand(&base, 0.5, 0.0)), DT);
    let out = interp.step(&pair(base.clone(), offset_hand(&base, 0.45, 0.0)), DT);

    // 増幅式: -0.05 * (1 + 0.05*30) * 100 = -12.5
    assert!((out.zoom_offset - (-12.5)).abs() < 1e-2);

    let out = interp.step(&pair(base.clone(), offset_hand(&base, 0.40, 0.0)), DT);
    // さらに-12.5で合計-25だが、下限-20でクランプ
    assert_eq!(out.zoom_offset, -20.0);
}

#[test]
fn two_hand_spread_clamps_at_zoom_max() {
    let mut interp = interpreter(vec![]);

    let base = open_hand();
    interp.step(&pair(base.clone(), offset_hand(&base, 0.1, 0.0)), DT);
    let mut out = interp.idle(0.0);
    for i in 2..6 {
        out = interp.step(
            &pair(base.clone(), offset_hand(&base, 0.1 * i as f32, 0.0)),
            DT,
        );
    }
    assert!(out.zoom_offset <= 40.0);
    assert_eq!(out.zoom_offset, 40.0);
}

#[test]
fn single_hand_scale_zooms_with_amplification_and_clamps() {
    let mut interp = interpreter(vec![]);

    // CHAOS・五指・片手: 手のスケール（手首〜中指付け根）変化でズーム
    let base = open_hand();
    let out = interp.step(&single(base.clone()), DT);
    assert_eq!(out.zoom_offset, 0.0);

    // スケール0.1 → 0.15: amplify(0.05, 50) * 200 = 35.0
    let out = interp.step(&single(scaled_hand(&base, 1.5)), DT);
    assert!((out.zoom_offset - 35.0).abs() < 1e-2);

    // さらに拡大すると合計155相当だが、上限40でクランプ
    let out = interp.step(&single(scaled_hand(&base, 2.5)), DT);
    assert_eq!(out.zoom_offset, 40.0);
}

#[test]
fn hand_vanishing_between_zooms_yields_no_spurious_delta() {
    let mut interp = interpreter(vec![]);

    let base = open_hand();
    interp.step(&pair(base.clone(), offset_hand(&base, 0.5, 0.0)), DT);
    interp.step(&LandmarkFrame::empty(), DT);

    // 再出現時の距離が大きく違っても、サンプルが破棄されているためズームしない
    let out = interp.step(&pair(base.clone(), offset_hand(&base, 0.1, 0.0)), DT);
    assert_eq!(out.zoom_offset, 0.0);
}

#[test]
fn five_finger_swing_boosts_rotation_within_limits() {
    let mut interp = interpreter(vec![]);
    interp.step(&single(fist_hand()), DT);

    // 物理座標で左へ振る → ミラー後dx正 → ブーストは負方向へ
    let mut out = interp.idle(0.0);
    for i in 0..10 {
        let moved = offset_hand(&open_hand(), -0.1 * i as f32, 0.0);
        out = interp.step(&single(moved), DT);
    }
    assert_eq!(out.rotation_boost, -3.0);
}

#[test]
fn rotation_boost_decays_strictly_to_zero() {
    let mut interp = interpreter(vec![]);
    interp.step(&single(fist_hand()), DT);

    for i in 0..5 {
        let moved = offset_hand(&open_hand(), -0.1 * i as f32, 0.0);
        interp.step(&single(moved), DT);
    }
    let mut prev = interp.step(&single(fist_hand()), DT).rotation_boost;
    assert!(prev != 0.0);

    // 五指条件が外れている間、毎フレーム厳密に減衰し最終的にちょうど0
    let mut out = interp.idle(0.0);
    for _ in 0..200 {
        out = interp.step(&single(fist_hand()), DT);
        assert!(out.rotation_boost.abs() <= prev.abs());
        prev = out.rotation_boost;
    }
    assert_eq!(out.rotation_boost, 0.0);
}

#[test]
fn shaka_pans_from_palm_position() {
    let mut interp = interpreter(vec![]);

    let out = interp.step(&single(shaka_hand()), DT);
    let (palm_x, palm_y) = out.debug.palm_position.unwrap();
    assert!((out.pan_offset.0 - (0.5 - palm_x) * 20.0).abs() < 1e-4);
    assert!((out.pan_offset.1 - (0.5 - palm_y) * 12.0).abs() < 1e-4);
    assert!(out.debug.actions.is_panning);
    // シャカ中はポインタ条件が成立しない
    assert!(out.pointer.is_none());
}

#[test]
fn thumbs_up_closes_photo_in_chaos() {
    let mut interp = interpreter(vec![2]);
    open_photo(&mut interp);

    let thumb = hand_with_gesture(
        build_hand(true, false, false, false, false),
        "Thumb_Up",
        0.9,
    );
    let out = interp.step(&single(thumb), DT);
    assert!(out.selected_photo.is_none());
    assert_eq!(out.mode, ApplicationMode::Chaos);
}

#[test]
fn thumbs_up_flick_cycles_theme_in_formed() {
    let mut interp = interpreter(vec![]);
    interp.step(&single(fist_hand()), DT);

    let thumb = hand_with_gesture(
        build_hand(true, false, false, false, false),
        "Thumb_Up",
        0.9,
    );

    // 1フレーム目でサンプル確立、2フレーム目のフリックで切り替わる
    let out = interp.step(&single(thumb.clone()), DT);
    assert_eq!(out.ornament_theme, 0);

    let out = interp.step(&single(offset_hand(&thumb, -0.01, 0.0)), DT);
    assert_eq!(out.ornament_theme, 1);

    // テーマ切替クールダウン中はさらに動かしても変わらない
    let out = interp.step(&single(offset_hand(&thumb, -0.02, 0.0)), DT);
    assert_eq!(out.ornament_theme, 1);
}

#[test]
fn five_finger_swipe_advances_photo_with_wraparound() {
    let mut interp = interpreter(vec![2]);
    let out = open_photo(&mut interp);
    assert_eq!(out.selected_photo.as_deref(), Some("c.jpg"));

    // 五指で大きく左へ（ミラー後dx正）→ 次の写真へ巡回
    interp.step(&single(open_hand()), DT);
    let out = interp.step(&single(offset_hand(&open_hand(), -0.03, 0.0)), DT);
    assert_eq!(out.selected_photo.as_deref(), Some("a.jpg"));

    // スワイプクールダウンが明けたら逆方向へ
    interp.idle(0.9);
    interp.step(&single(open_hand()), DT);
    let out = interp.step(&single(offset_hand(&open_hand(), 0.03, 0.0)), DT);
    assert_eq!(out.selected_photo.as_deref(), Some("c.jpg"));
}

#[test]
fn disabled_photo_index_degrades_to_noop() {
    let mut interp = Interpreter::new(
        AppConfig::default(),
        Vec::new(),
        Box::new(SequenceRandom::new(vec![0])),
    );

    let out = open_photo(&mut interp);
    assert!(out.selected_photo.is_none());
    // モードやポインタなど他の機能は生きている
    assert_eq!(out.mode, ApplicationMode::Chaos);
}

//! モック推論アダプタ（開発・テスト用）
//!
//! 事前に用意したランドマークフレーム列を順番に返す`VisionPort`実装と、
//! 幾何学的に正しいポーズを持つモック手のビルダー群。
//! ビルダーは解釈器のテスト全般から利用される。

use std::collections::VecDeque;

use crate::domain::{
    DomainResult, GestureCandidate, Hand, Landmark, LandmarkFrame, VisionPort, LANDMARK_COUNT,
};

/// スクリプト駆動のVisionPort実装
///
/// フレーム列を使い切った後は`Ok(None)`（映像更新なし）を返し続ける。
pub struct ScriptedVision {
    frames: VecDeque<LandmarkFrame>,
}

impl ScriptedVision {
    pub fn new(frames: Vec<LandmarkFrame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }
}

impl VisionPort for ScriptedVision {
    fn next_frame(&mut self) -> DomainResult<Option<LandmarkFrame>> {
        Ok(self.frames.pop_front())
    }
}

// ===== モック手のビルダー =====
//
// 手首を(0.5, 0.8)に置き、各指を固有の方向へ伸ばす。
// 付け根（MCP）は手首から0.1、指先は伸展時0.2 / 屈曲時0.11。
// 伸展判定の比率1.3に対して 0.2 > 0.13 > 0.11 となるよう選んである。

const WRIST: (f32, f32) = (0.5, 0.8);
const MCP_RADIUS: f32 = 0.1;
const EXTENDED_TIP_RADIUS: f32 = 0.2;
const FOLDED_TIP_RADIUS: f32 = 0.11;

/// 各指の方向ベクトル（正規化前）
const FINGER_DIRECTIONS: [(f32, f32); 5] = [
    (-0.9, -0.4), // 親指
    (-0.3, -1.0), // 人差し指
    (0.0, -1.0),  // 中指
    (0.3, -1.0),  // 薬指
    (0.8, -0.6),  // 小指
];

fn place(direction: (f32, f32), radius: f32) -> Landmark {
    let norm = (direction.0 * direction.0 + direction.1 * direction.1).sqrt();
    Landmark::new(
        WRIST.0 + direction.0 / norm * radius,
        WRIST.1 + direction.1 / norm * radius,
        0.0,
    )
}

/// 指ごとの伸展状態を指定して手を構築する
pub fn build_hand(
    thumb: bool,
    index: bool,
    middle: bool,
    ring: bool,
    pinky: bool,
) -> Hand {
    let mut landmarks = vec![Landmark::new(WRIST.0, WRIST.1, 0.0); LANDMARK_COUNT];

    let states = [thumb, index, middle, ring, pinky];
    for (finger, (&extended, &dir)) in states.iter().zip(FINGER_DIRECTIONS.iter()).enumerate() {
        let tip_radius = if extended {
            EXTENDED_TIP_RADIUS
        } else {
            FOLDED_TIP_RADIUS
        };

        // 親指は1..=4（CMC, MCP, IP, TIP）、他の指はMCPから4点
        let base = finger * 4 + 1;
        if finger == 0 {
            landmarks[base] = place(dir, MCP_RADIUS * 0.5);
            landmarks[base + 1] = place(dir, MCP_RADIUS);
            landmarks[base + 2] = place(dir, (MCP_RADIUS + tip_radius) * 0.5);
            landmarks[base + 3] = place(dir, tip_radius);
        } else {
            landmarks[base] = place(dir, MCP_RADIUS);
            landmarks[base + 1] = place(dir, MCP_RADIUS + (tip_radius - MCP_RADIUS) * 0.4);
            landmarks[base + 2] = place(dir, MCP_RADIUS + (tip_radius - MCP_RADIUS) * 0.7);
            landmarks[base + 3] = place(dir, tip_radius);
        }
    }

    Hand {
        landmarks,
        gestures: Vec::new(),
    }
}

/// 五指すべて伸展（パー）
pub fn open_hand() -> Hand {
    build_hand(true, true, true, true, true)
}

/// 全指屈曲（グー）
pub fn fist_hand() -> Hand {
    build_hand(false, false, false, false, false)
}

/// 人差し指のみ伸展（ポインティング）
pub fn pointing_hand() -> Hand {
    build_hand(false, true, false, false, false)
}

/// 親指と小指のみ伸展（シャカサイン）
pub fn shaka_hand() -> Hand {
    build_hand(true, false, false, false, true)
}

/// 親指先を人差し指先に重ねたピンチ
pub fn pinch_hand() -> Hand {
    let mut hand = fist_hand();
    hand.landmarks[crate::domain::landmark_index::THUMB_TIP] =
        hand.landmarks[crate::domain::landmark_index::INDEX_TIP];
    hand
}

/// ジェスチャー分類結果を付与する
pub fn hand_with_gesture(mut hand: Hand, name: &str, score: f32) -> Hand {
    hand.gestures.push(GestureCandidate::new(name, score));
    hand
}

/// 手全体を手首中心に拡大縮小する（単手ズームテスト用）
///
/// 手首からの距離が一様に`factor`倍になるため、手のスケール
/// （手首〜中指付け根）だけが変わり、伸展判定の比率は保たれる。
pub fn scaled_hand(hand: &Hand, factor: f32) -> Hand {
    let wrist = hand.landmarks[crate::domain::landmark_index::WRIST];
    Hand {
        landmarks: hand
            .landmarks
            .iter()
            .map(|lm| {
                Landmark::new(
                    wrist.x + (lm.x - wrist.x) * factor,
                    wrist.y + (lm.y - wrist.y) * factor,
                    lm.z,
                )
            })
            .collect(),
        gestures: hand.gestures.clone(),
    }
}

/// 手全体を平行移動する（モーションテスト用）
pub fn offset_hand(hand: &Hand, dx: f32, dy: f32) -> Hand {
    Hand {
        landmarks: hand
            .landmarks
            .iter()
            .map(|lm| Landmark::new(lm.x + dx, lm.y + dy, lm.z))
            .collect(),
        gestures: hand.gestures.clone(),
    }
}

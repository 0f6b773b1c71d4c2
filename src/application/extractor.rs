//! 指・ポーズ抽出
//!
//! 1つの手の21点ランドマークから、指ごとの伸展フラグと
//! ピンチ・シャカなどのポーズ述語を算出する。
//! 状態を持たない純粋関数のみで構成される。

use crate::domain::{landmark_index as li, ExtractorConfig, FingerPose, Hand};

/// 手掌中心を算出（手首・人差し指付け根・小指付け根の平均）
///
/// 指の開閉に影響されにくい3点を使う。戻り値は正規化座標（ミラーなし）。
pub fn palm_center(hand: &Hand) -> (f32, f32) {
    let wrist = hand.landmark(li::WRIST);
    let index_mcp = hand.landmark(li::INDEX_MCP);
    let pinky_mcp = hand.landmark(li::PINKY_MCP);

    (
        (wrist.x + index_mcp.x + pinky_mcp.x) / 3.0,
        (wrist.y + index_mcp.y + pinky_mcp.y) / 3.0,
    )
}

/// 単手スケール（手首〜中指付け根の距離）を算出
///
/// 手の開閉に左右されないため、カメラへの接近・後退の指標に使う。
pub fn hand_scale(hand: &Hand) -> f32 {
    hand.landmark(li::WRIST)
        .planar_distance(hand.landmark(li::MIDDLE_MCP))
}

/// 指・ポーズ述語を抽出
///
/// 伸展判定は「指先〜手首の距離 > 付け根〜手首の距離 × extend_ratio」。
/// 比率ベースなのでカメラからの距離（手の大きさ）に依存しない。
pub fn extract(hand: &Hand, config: &ExtractorConfig) -> FingerPose {
    let wrist = hand.landmark(li::WRIST);

    let extended = |tip: usize, mcp: usize| -> bool {
        let tip_dist = hand.landmark(tip).planar_distance(wrist);
        let mcp_dist = hand.landmark(mcp).planar_distance(wrist);
        tip_dist > mcp_dist * config.extend_ratio
    };

    let thumb_extended = extended(li::THUMB_TIP, li::THUMB_MCP);
    let index_extended = extended(li::INDEX_TIP, li::INDEX_MCP);
    let middle_extended = extended(li::MIDDLE_TIP, li::MIDDLE_MCP);
    let ring_extended = extended(li::RING_TIP, li::RING_MCP);
    let pinky_extended = extended(li::PINKY_TIP, li::PINKY_MCP);

    let pinch_distance = hand
        .landmark(li::THUMB_TIP)
        .planar_distance(hand.landmark(li::INDEX_TIP));

    FingerPose {
        thumb_extended,
        index_extended,
        middle_extended,
        ring_extended,
        pinky_extended,
        is_pinching: pinch_distance < config.pinch_max_distance,
        is_shaka: thumb_extended
            && pinky_extended
            && !index_extended
            && !middle_extended
            && !ring_extended,
        is_all_folded: !thumb_extended
            && !index_extended
            && !middle_extended
            && !ring_extended
            && !pinky_extended,
    }
}

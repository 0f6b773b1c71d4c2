/// コア型定義
///
/// Domain層の中心となるデータ構造。
/// 推論サービスから受け取るランドマークフレームと、
/// 解釈器が毎フレーム出力するコマンド群を定義します。

use std::time::Instant;

/// 1つの手を構成するランドマーク数（MediaPipe Hand Landmark準拠）
pub const LANDMARK_COUNT: usize = 21;

/// ランドマークのインデックス定義（MediaPipe Hand Landmark準拠）
pub mod landmark_index {
    pub const WRIST: usize = 0;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_TIP: usize = 20;
}

/// 分類器が返すジェスチャー名（カテゴリ名は推論モデル準拠）
pub mod gesture_names {
    pub const VICTORY: &str = "Victory";
    pub const THUMB_UP: &str = "Thumb_Up";
    pub const OPEN_PALM: &str = "Open_Palm";
    pub const CLOSED_FIST: &str = "Closed_Fist";
}

/// 正規化済みの手ランドマーク（x, y, z はおおむね [0,1]）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    /// 新しいランドマークを作成
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// 画像平面上（x, y）のユークリッド距離
    ///
    /// 指の伸展判定・ピンチ判定・両手距離はすべて2D距離で行います
    /// （z は深度推定のノイズが大きいため使用しない）。
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// 分類器が出力したジェスチャー候補（スコア降順で並ぶ）
#[derive(Debug, Clone, PartialEq)]
pub struct GestureCandidate {
    /// カテゴリ名（例: "Victory", "Closed_Fist"）
    pub name: String,
    /// 信頼度スコア [0,1]
    pub score: f32,
}

impl GestureCandidate {
    pub fn new(name: impl Into<String>, score: f32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// 検出された1つの手
#[derive(Debug, Clone, Default)]
pub struct Hand {
    /// 21点の正規化ランドマーク
    pub landmarks: Vec<Landmark>,
    /// この手に対するジェスチャー候補（スコア降順）
    pub gestures: Vec<GestureCandidate>,
}

impl Hand {
    /// ランドマークが21点そろっているか
    ///
    /// そろっていない手は安全のため「検出なし」として扱われる。
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() == LANDMARK_COUNT
    }

    /// インデックス指定でランドマークを取得（is_complete()確認済みの前提）
    pub fn landmark(&self, idx: usize) -> &Landmark {
        &self.landmarks[idx]
    }
}

/// 推論サービスから受け取る1フレーム分の検出結果
#[derive(Debug, Clone)]
pub struct LandmarkFrame {
    /// フレーム取得時刻（単調増加）
    pub timestamp: Instant,
    /// 検出された手（0〜2）
    pub hands: Vec<Hand>,
}

impl LandmarkFrame {
    /// 手なしの空フレームを作成
    pub fn empty() -> Self {
        Self {
            timestamp: Instant::now(),
            hands: Vec::new(),
        }
    }

    /// 手のリストからフレームを作成
    pub fn with_hands(hands: Vec<Hand>) -> Self {
        Self {
            timestamp: Instant::now(),
            hands,
        }
    }

    /// 解釈に使用できる手のリストを取得
    ///
    /// 1つでも不完全な手（21点未満）があればフレーム全体を
    /// 「手なし」として棄却する（部分計算は行わない）。
    pub fn usable_hands(&self) -> Option<&[Hand]> {
        if self.hands.is_empty() || self.hands.iter().any(|h| !h.is_complete()) {
            None
        } else {
            Some(&self.hands)
        }
    }
}

/// アプリケーションモード
///
/// CHAOS = 写真が散らばった選択モード、FORMED = ツリーに整列したナビゲーションモード。
/// 常にどちらか一方のみがアクティブ。遷移はジェスチャー駆動。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplicationMode {
    /// 散乱・選択モード
    #[default]
    Chaos,
    /// 整列・ナビゲーションモード
    Formed,
}

impl ApplicationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chaos => "CHAOS",
            Self::Formed => "FORMED",
        }
    }
}

/// ポインタ座標（[0,1]、左右ミラー済み）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerCoords {
    pub x: f32,
    pub y: f32,
}

impl PointerCoords {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// クールダウン対象のアクション種別
///
/// タイマーは種別ごとに独立。1つのテーブル（Map）で管理し、
/// アクション追加時のフィールド増殖を避ける。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Victoryジェスチャーによる写真選択
    Victory,
    /// サムズアップによる写真クローズ
    ThumbDismiss,
    /// 五指スワイプによる写真送り
    Swipe,
    /// Dwellクリック
    Click,
    /// Victory長押しによるライトパルス
    LightPulse,
    /// サムズアップ・フリックによるテーマ切替
    ThemeCycle,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Victory => "victory",
            Self::ThumbDismiss => "thumb",
            Self::Swipe => "swipe",
            Self::Click => "click",
            Self::LightPulse => "pulse",
            Self::ThemeCycle => "theme",
        }
    }

    /// 全アクション種別（テーブル初期化用）
    pub const ALL: [ActionKind; 6] = [
        ActionKind::Victory,
        ActionKind::ThumbDismiss,
        ActionKind::Swipe,
        ActionKind::Click,
        ActionKind::LightPulse,
        ActionKind::ThemeCycle,
    ];
}

/// 1フレームのランドマークから導出した指・ポーズ述語
///
/// 副作用なし。Extractorが純粋関数として算出する。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FingerPose {
    pub thumb_extended: bool,
    pub index_extended: bool,
    pub middle_extended: bool,
    pub ring_extended: bool,
    pub pinky_extended: bool,
    /// 親指先と人差し指先が接近している
    pub is_pinching: bool,
    /// 親指・小指のみ伸展（シャカサイン）
    pub is_shaka: bool,
    /// 全指とも伸展していない（握りこぶし相当）
    pub is_all_folded: bool,
}

impl FingerPose {
    /// 人差し指のみ伸展（ポインティング）
    pub fn is_pointing(&self) -> bool {
        self.index_extended && !self.middle_extended && !self.ring_extended && !self.pinky_extended
    }

    /// 五指すべて伸展
    pub fn is_five_fingers(&self) -> bool {
        self.thumb_extended
            && self.index_extended
            && self.middle_extended
            && self.ring_extended
            && self.pinky_extended
    }
}

/// デバッグ用の派生アクションフラグ
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActionFlags {
    pub is_pointing: bool,
    pub is_panning: bool,
    pub is_zooming: bool,
    pub is_pinching: bool,
    pub is_five_fingers: bool,
    pub is_shaka: bool,
}

/// デバッグパネル向けのスナップショット
///
/// 毎フレーム更新される。描画側が読み取り専用で表示する。
#[derive(Debug, Clone, Default)]
pub struct DebugSnapshot {
    /// 検出された手の数
    pub hands_detected: usize,
    /// 生のジェスチャー候補（名前・スコア）
    pub gestures: Vec<GestureCandidate>,
    /// 指ごとの伸展フラグ（手がない場合はNone）
    pub finger_pose: Option<FingerPose>,
    /// 派生アクションフラグ
    pub actions: ActionFlags,
    /// 手掌中心の最新位置（正規化座標）
    pub palm_position: Option<(f32, f32)>,
    /// 直近の移動量（ミラー済みdx, dy）
    pub movement: Option<(f32, f32)>,
}

/// 解釈器が毎フレーム出力するコマンド群
///
/// 描画・UI層はこの構造体のみを読み取る（解釈器の内部状態には触れない）。
#[derive(Debug, Clone, Default)]
pub struct InterpreterOutput {
    /// 現在のアプリケーションモード
    pub mode: ApplicationMode,
    /// ポインタ座標（該当ジェスチャーがないときはNone）
    pub pointer: Option<PointerCoords>,
    /// Dwellクリックの進捗 [0,1]
    pub hover_progress: f32,
    /// クリック発火トークン（クリック時のみ値が変わる）
    pub click_token: u64,
    /// パンオフセット（ワールド座標、手掌位置から絶対設定）
    pub pan_offset: (f32, f32),
    /// ズームオフセット（クランプ済み）
    pub zoom_offset: f32,
    /// 回転ブースト（クランプ済み）
    pub rotation_boost: f32,
    /// 開いている写真のファイル名（閉じているときはNone）
    pub selected_photo: Option<String>,
    /// 装飾テーマのインデックス（0..theme_count）
    pub ornament_theme: u32,
    /// ライトパルス発火トークン（パルス時のみ値が変わる）
    pub light_pulse_token: u64,
    /// デバッグ情報
    pub debug: DebugSnapshot,
}

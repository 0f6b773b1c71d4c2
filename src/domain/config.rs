//! 設定管理
//!
//! TOML設定ファイルの読み込みとDomain型への変換。
//! 閾値・ホールドフレーム数・クールダウン秒などの調整値はすべてここに集約します。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::domain::{gesture_names, ActionKind, DomainError, DomainResult};

/// アプリケーション設定のルート構造
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AppConfig {
    /// ジェスチャー安定化設定（スコア閾値・ホールドフレーム数）
    #[serde(default)]
    pub stabilizer: StabilizerConfig,
    /// 指・ポーズ抽出設定
    #[serde(default)]
    pub extractor: ExtractorConfig,
    /// Dwellクリック設定
    #[serde(default)]
    pub dwell: DwellConfig,
    /// モーション追跡設定
    #[serde(default)]
    pub motion: MotionConfig,
    /// 連続制御（パン/ズーム/回転）設定
    #[serde(default)]
    pub control: ControlConfig,
    /// アクションごとのクールダウンとトリガー閾値
    #[serde(default)]
    pub actions: ActionConfig,
    /// 写真インデックスの取得元
    #[serde(default)]
    pub photos: PhotosConfig,
    /// フレームループ設定
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// 1ジェスチャー分の安定化パラメータ
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct GestureGate {
    /// 信頼度スコアの下限 [0,1]
    ///
    /// 見た目が似たジェスチャーがあるため、感度はジェスチャーごとに調整する
    pub score_threshold: f32,

    /// 連続して条件を満たす必要があるフレーム数
    ///
    /// 即応性が欲しいジェスチャーは少なく、誤発火を避けたいものは多くする
    pub hold_frames: u32,
}

/// ジェスチャー安定化設定
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StabilizerConfig {
    /// 未知のジェスチャー名に適用するスコア閾値
    pub default_threshold: f32,
    /// Victory（写真選択 / ライトパルス）
    pub victory: GestureGate,
    /// Thumb_Up（写真クローズ / テーマ切替）
    pub thumb_up: GestureGate,
    /// Open_Palm（FORMED → CHAOS遷移）
    pub open_palm: GestureGate,
    /// Closed_Fist（→ FORMED遷移）
    pub closed_fist: GestureGate,
}

impl StabilizerConfig {
    /// 未知ジェスチャーのデフォルト閾値
    pub const DEFAULT_THRESHOLD: f32 = 0.5;

    /// ジェスチャー名からスコア閾値を引く
    pub fn threshold_for(&self, name: &str) -> f32 {
        match name {
            gesture_names::VICTORY => self.victory.score_threshold,
            gesture_names::THUMB_UP => self.thumb_up.score_threshold,
            gesture_names::OPEN_PALM => self.open_palm.score_threshold,
            gesture_names::CLOSED_FIST => self.closed_fist.score_threshold,
            _ => self.default_threshold,
        }
    }

    /// ジェスチャー名から必要ホールドフレーム数を引く
    ///
    /// 未知のジェスチャーは0（ホールド要件なし）。
    pub fn hold_frames_for(&self, name: &str) -> u32 {
        match name {
            gesture_names::VICTORY => self.victory.hold_frames,
            gesture_names::THUMB_UP => self.thumb_up.hold_frames,
            gesture_names::OPEN_PALM => self.open_palm.hold_frames,
            gesture_names::CLOSED_FIST => self.closed_fist.hold_frames,
            _ => 0,
        }
    }
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            default_threshold: Self::DEFAULT_THRESHOLD,
            victory: GestureGate {
                score_threshold: 0.6,
                hold_frames: 6,
            },
            // 閾値をやや下げてトリガーを速くしている
            thumb_up: GestureGate {
                score_threshold: 0.55,
                hold_frames: 4,
            },
            open_palm: GestureGate {
                score_threshold: 0.5,
                hold_frames: 12,
            },
            // 握りこぶしは認識が不安定なので閾値を下げ、ホールドも短め
            closed_fist: GestureGate {
                score_threshold: 0.45,
                hold_frames: 6,
            },
        }
    }
}

/// 指・ポーズ抽出設定
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct ExtractorConfig {
    /// 伸展判定の比率
    ///
    /// 指先〜手首の距離が、付け根〜手首の距離のこの倍数を超えたら「伸展」。
    /// 比率判定なのでカメラからの距離に依存しない。
    pub extend_ratio: f32,

    /// ピンチ判定の最大距離（正規化座標）
    pub pinch_max_distance: f32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            extend_ratio: 1.3,
            pinch_max_distance: 0.05,
        }
    }
}

/// Dwellクリック設定
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct DwellConfig {
    /// クリック成立までの滞留時間（秒）
    pub threshold_secs: f32,
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self {
            threshold_secs: 1.2,
        }
    }
}

/// モーション追跡設定
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct MotionConfig {
    /// 「移動中」とみなす手掌移動量の閾値（正規化座標/フレーム）
    ///
    /// Dwellの安定性を上げるためやや緩めにしている
    pub move_threshold: f32,

    /// 両手距離デルタの非線形増幅係数
    pub two_hand_gain: f32,

    /// 単手スケールデルタの非線形増幅係数
    pub single_hand_gain: f32,

    /// 増幅後の両手デルタをズームへ変換する倍率
    pub two_hand_zoom_scale: f32,

    /// 増幅後の単手デルタをズームへ変換する倍率
    pub single_hand_zoom_scale: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            move_threshold: 0.005,
            two_hand_gain: 30.0,
            single_hand_gain: 50.0,
            two_hand_zoom_scale: 100.0,
            single_hand_zoom_scale: 200.0,
        }
    }
}

/// 連続制御（パン/ズーム/回転）設定
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct ControlConfig {
    /// ズームオフセットの下限
    pub zoom_min: f32,
    /// ズームオフセットの上限
    pub zoom_max: f32,
    /// 回転ブーストの絶対値上限
    pub rotation_limit: f32,
    /// 手掌dxから回転ブーストへの変換係数
    pub rotation_gain: f32,
    /// 回転ブーストを反映する最小dx（微小ノイズの除去）
    pub rotation_min_dx: f32,
    /// 五指条件が外れたときの減衰率（毎フレーム乗算）
    pub rotation_decay: f32,
    /// この絶対値を下回ったら回転ブーストを0にスナップ
    pub rotation_epsilon: f32,
    /// ライトパルス時に保証する回転ブースト下限
    pub pulse_boost: f32,
    /// パンの水平ワールド範囲（±この値）
    pub pan_half_width: f32,
    /// パンの垂直ワールド範囲（±この値）
    pub pan_half_height: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            zoom_min: -20.0,
            zoom_max: 40.0,
            rotation_limit: 3.0,
            rotation_gain: 8.0,
            rotation_min_dx: 0.001,
            rotation_decay: 0.95,
            rotation_epsilon: 0.001,
            pulse_boost: 2.0,
            pan_half_width: 10.0,
            pan_half_height: 6.0,
        }
    }
}

/// アクションごとのクールダウンとトリガー閾値
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct ActionConfig {
    /// Victory写真選択のクールダウン（秒）
    pub victory_cooldown_secs: f32,
    /// サムズアップ・クローズのクールダウン（秒）
    pub thumb_cooldown_secs: f32,
    /// スワイプのクールダウン（秒）
    pub swipe_cooldown_secs: f32,
    /// Dwellクリックのクールダウン（秒）
    pub click_cooldown_secs: f32,
    /// ライトパルスのクールダウン（秒）
    pub pulse_cooldown_secs: f32,
    /// テーマ切替のクールダウン（秒）
    pub theme_cooldown_secs: f32,

    /// スワイプ成立に必要な横移動量（正規化座標/フレーム）
    pub swipe_min_dx: f32,

    /// テーマ切替フリックの横移動閾値
    ///
    /// 軽い左右の振りで切り替わるよう低めにしている
    pub theme_flick_dx: f32,

    /// 装飾テーマの数（インデックスは 0..theme_count を循環）
    pub theme_count: u32,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            victory_cooldown_secs: 1.0,
            thumb_cooldown_secs: 1.0,
            swipe_cooldown_secs: 0.8,
            click_cooldown_secs: 2.0,
            pulse_cooldown_secs: 1.2,
            theme_cooldown_secs: 0.9,
            swipe_min_dx: 0.02,
            theme_flick_dx: 0.004,
            theme_count: 3,
        }
    }
}

impl ActionConfig {
    /// アクション種別からクールダウン秒を引く
    pub fn cooldown_for(&self, kind: ActionKind) -> f32 {
        match kind {
            ActionKind::Victory => self.victory_cooldown_secs,
            ActionKind::ThumbDismiss => self.thumb_cooldown_secs,
            ActionKind::Swipe => self.swipe_cooldown_secs,
            ActionKind::Click => self.click_cooldown_secs,
            ActionKind::LightPulse => self.pulse_cooldown_secs,
            ActionKind::ThemeCycle => self.theme_cooldown_secs,
        }
    }
}

/// 写真インデックスの取得元設定
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PhotosConfig {
    /// 写真一覧JSONのURL（例: "http://localhost:3001/photos/photos.json"）
    ///
    /// 起動時に一度だけ取得する。取得失敗時は写真選択・スワイプが無効化される
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_url: Option<String>,

    /// 写真一覧JSONのローカルパス（index_urlが未設定の場合のフォールバック）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_path: Option<String>,
}

/// フレームループ設定
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub struct PipelineConfig {
    /// 統計情報の出力間隔（秒）
    pub stats_interval_sec: u64,

    /// 目標フレーム間隔（ミリ秒）
    ///
    /// 実測した経過時間をタイマーに使うため、この値はスリープの目安にすぎない
    /// （フレームレート非依存の挙動は経過時間計測で保証される）
    pub target_frame_interval_ms: u64,
}

impl PipelineConfig {
    pub const DEFAULT_STATS_INTERVAL_SEC: u64 = 10;
    /// 約60fps相当
    pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_sec)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.target_frame_interval_ms)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stats_interval_sec: Self::DEFAULT_STATS_INTERVAL_SEC,
            target_frame_interval_ms: Self::DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}

impl AppConfig {
    /// TOMLファイルから設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> DomainResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Configuration(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| DomainError::Configuration(format!("Failed to parse config file: {}", e)))
    }

    /// デフォルト設定をTOMLファイルに書き出す
    #[allow(dead_code)]
    pub fn write_default<P: AsRef<Path>>(path: P) -> DomainResult<()> {
        let config = Self::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| DomainError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| DomainError::Configuration(format!("Failed to write config file: {}", e)))
    }

    /// 設定の妥当性を検証
    pub fn validate(&self) -> DomainResult<()> {
        // スコア閾値の検証
        for (name, gate) in [
            ("victory", &self.stabilizer.victory),
            ("thumb_up", &self.stabilizer.thumb_up),
            ("open_palm", &self.stabilizer.open_palm),
            ("closed_fist", &self.stabilizer.closed_fist),
        ] {
            if !(0.0..=1.0).contains(&gate.score_threshold) {
                return Err(DomainError::Configuration(format!(
                    "Score threshold for {} must be within [0,1]",
                    name
                )));
            }
            if gate.hold_frames == 0 {
                return Err(DomainError::Configuration(format!(
                    "Hold frames for {} must be greater than 0",
                    name
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.stabilizer.default_threshold) {
            return Err(DomainError::Configuration(
                "Default score threshold must be within [0,1]".to_string(),
            ));
        }

        // 抽出設定の検証
        if self.extractor.extend_ratio <= 1.0 {
            return Err(DomainError::Configuration(
                "Extend ratio must be greater than 1.0".to_string(),
            ));
        }
        if self.extractor.pinch_max_distance <= 0.0 {
            return Err(DomainError::Configuration(
                "Pinch distance must be positive".to_string(),
            ));
        }

        // Dwell設定の検証
        if self.dwell.threshold_secs <= 0.0 {
            return Err(DomainError::Configuration(
                "Dwell threshold must be positive".to_string(),
            ));
        }

        // クールダウンの検証
        for kind in ActionKind::ALL {
            if self.actions.cooldown_for(kind) <= 0.0 {
                return Err(DomainError::Configuration(format!(
                    "Cooldown for {} must be positive",
                    kind.as_str()
                )));
            }
        }
        if self.actions.theme_count == 0 {
            return Err(DomainError::Configuration(
                "Theme count must be greater than 0".to_string(),
            ));
        }

        // 連続制御の検証
        if self.control.zoom_min >= self.control.zoom_max {
            return Err(DomainError::Configuration(
                "zoom_min must be less than zoom_max".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.control.rotation_decay) {
            return Err(DomainError::Configuration(
                "Rotation decay must be within (0,1)".to_string(),
            ));
        }
        if self.control.rotation_limit <= 0.0 {
            return Err(DomainError::Configuration(
                "Rotation limit must be positive".to_string(),
            ));
        }

        // フレームループの検証
        if self.pipeline.target_frame_interval_ms == 0 {
            return Err(DomainError::Configuration(
                "Frame interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

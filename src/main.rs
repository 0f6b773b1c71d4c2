mod application;
mod domain;
mod infrastructure;
mod logging;

use crate::application::dispatcher::Interpreter;
use crate::application::pipeline::FrameLoop;
use crate::application::runtime_state::RuntimeState;
use crate::domain::config::AppConfig;
use crate::domain::ports::PhotoIndexPort;
use crate::domain::types::LandmarkFrame;
use crate::infrastructure::mock_photos::FixedPhotoIndex;
use crate::infrastructure::mock_vision::{
    build_hand, fist_hand, hand_with_gesture, open_hand, pointing_hand, ScriptedVision,
};
use crate::infrastructure::photo_index::{HttpPhotoIndex, JsonFilePhotoIndex};
use crate::infrastructure::rng::ThreadRandom;
use crate::logging::init_logging;

use anyhow::Context;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;

fn main() {
    // ログシステムの初期化（非同期ファイル出力）
    let log_dir = PathBuf::from("logs");
    let _guard = init_logging("info", false, Some(log_dir));
    // 注意: _guardはmain終了まで保持する必要がある（Dropでログスレッドが終了）

    tracing::info!("memory-tree gesture interpreter starting...");

    match run() {
        Ok(_) => {
            tracing::info!("memory-tree terminated gracefully.");
        }
        Err(e) => {
            tracing::error!("Fatal error: {:?}", e);
            std::process::exit(1);
        }
    }
}

/// アプリケーションのメイン処理
fn run() -> anyhow::Result<()> {
    // 設定ファイルの読み込み（存在しない場合はデフォルト設定を使用）
    let config = match AppConfig::from_file("config.toml") {
        Ok(config) => {
            tracing::info!("Loaded configuration from config.toml");
            config
        }
        Err(e) => {
            tracing::warn!("Failed to load config.toml: {:?}, using defaults", e);
            AppConfig::default()
        }
    };

    // 設定の検証
    config.validate().context("Invalid configuration")?;

    tracing::info!("Configuration validated successfully");
    tracing::info!(
        "Stabilizer: victory={}/{}f, fist={}/{}f",
        config.stabilizer.victory.score_threshold,
        config.stabilizer.victory.hold_frames,
        config.stabilizer.closed_fist.score_threshold,
        config.stabilizer.closed_fist.hold_frames,
    );
    tracing::info!(
        "Dwell: {}s, click cooldown: {}s",
        config.dwell.threshold_secs,
        config.actions.click_cooldown_secs,
    );

    // 写真インデックスの取得（起動時に一度だけ）
    let photos = load_photo_index(&config);
    tracing::info!("Photo index: {} entries", photos.len());

    // 解釈器の構築
    let interpreter = Interpreter::new(config.clone(), photos, Box::new(ThreadRandom));

    // 推論アダプタ（実際の推論サービスが未接続のためスクリプト駆動のモック）
    let vision = ScriptedVision::new(demo_frames());

    let runtime = RuntimeState::new();
    let (frame_loop, rx, stop) =
        FrameLoop::new(vision, interpreter, config.pipeline, runtime);

    tracing::info!("Starting frame loop...");

    // フレームループは専用スレッドで回し、メインスレッドは出力を監視する
    let loop_handle = std::thread::spawn(move || frame_loop.run());

    // 出力変化のログ（デモ動作の確認用）
    let mut last_mode = None;
    let mut last_photo = None;
    let mut last_click = 0u64;
    let mut last_pulse = 0u64;
    // デモシナリオ一巡ぶんの固定実行時間。実運用の推論アダプタを接続する
    // 場合はこのデッドラインを外してループを常駐させる
    let deadline = std::time::Instant::now() + Duration::from_secs(15);

    while std::time::Instant::now() < deadline {
        let Ok(output) = rx.recv_timeout(Duration::from_millis(100)) else {
            continue;
        };

        if last_mode != Some(output.mode) {
            tracing::info!(mode = output.mode.as_str(), "Mode changed");
            last_mode = Some(output.mode);
        }
        if last_photo != output.selected_photo {
            match &output.selected_photo {
                Some(photo) => tracing::info!(%photo, "Photo opened"),
                None => tracing::info!("Photo closed"),
            }
            last_photo = output.selected_photo.clone();
        }
        if output.click_token != last_click {
            tracing::info!(pointer = ?output.pointer, "Click");
            last_click = output.click_token;
        }
        if output.light_pulse_token != last_pulse {
            tracing::info!("Light pulse");
            last_pulse = output.light_pulse_token;
        }
    }

    stop.store(true, Ordering::Relaxed);
    loop_handle
        .join()
        .map_err(|_| anyhow::anyhow!("Frame loop thread panicked"))?
        .context("Frame loop failed")?;

    Ok(())
}

/// 設定に応じた写真インデックスアダプタを選択して取得する
///
/// 取得失敗時は空リストで続行する（写真選択・スワイプが無効になるだけ）。
fn load_photo_index(config: &AppConfig) -> Vec<String> {
    let mut adapter: Box<dyn PhotoIndexPort> = if let Some(url) = &config.photos.index_url {
        tracing::info!(%url, "Using HTTP photo index");
        Box::new(HttpPhotoIndex::new(url.clone()))
    } else if let Some(path) = &config.photos.index_path {
        tracing::info!(%path, "Using JSON file photo index");
        Box::new(JsonFilePhotoIndex::new(path.clone()))
    } else {
        tracing::info!("No photo index configured, using built-in sample list");
        Box::new(FixedPhotoIndex::sample())
    };

    match adapter.fetch_index() {
        Ok(photos) => photos,
        Err(e) => {
            tracing::warn!("Photo index unavailable: {}, picks/swipes disabled", e);
            Vec::new()
        }
    }
}

/// デモ用のジェスチャーシナリオ
///
/// Victory選択 → Dwellクリック → こぶしでFORMED → Victoryでライトパルス、
/// という一連の操作を60fps相当のフレーム列として再生する。
fn demo_frames() -> Vec<LandmarkFrame> {
    let mut frames = Vec::new();

    let repeat = |frames: &mut Vec<LandmarkFrame>, hand: crate::domain::types::Hand, n: usize| {
        for _ in 0..n {
            frames.push(LandmarkFrame::with_hands(vec![hand.clone()]));
        }
    };

    // 人差し指と中指のみ伸展（ピースサイン形状）
    let victory_hand = build_hand(false, true, true, false, false);

    // しばらく手を映すだけ
    repeat(&mut frames, open_hand(), 30);

    // Victoryホールドで写真を選択
    repeat(
        &mut frames,
        hand_with_gesture(victory_hand.clone(), "Victory", 0.9),
        10,
    );

    // ポインティングで静止（Dwellクリック）
    repeat(&mut frames, pointing_hand(), 80);

    // こぶしでFORMEDへ
    repeat(&mut frames, fist_hand(), 10);

    // VictoryホールドでライトパルスとFORMED維持
    repeat(
        &mut frames,
        hand_with_gesture(victory_hand, "Victory", 0.9),
        10,
    );

    // 手を外す
    for _ in 0..30 {
        frames.push(LandmarkFrame::empty());
    }

    frames
}

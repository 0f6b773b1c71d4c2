//! フレームループ制御モジュール
//!
//! 推論結果のポーリングとジェスチャー解釈を単一スレッドで回し、
//! `InterpreterOutput`を「最新のみ上書き」ポリシーで配信します。
//! 解釈器の状態はすべてこのループが所有し、ロックは使いません。

use crate::application::dispatcher::Interpreter;
use crate::application::runtime_state::RuntimeState;
use crate::application::stats::{StatKind, StatsCollector};
use crate::domain::{DomainResult, InterpreterOutput, LandmarkFrame, PipelineConfig, VisionPort};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Instant;

/// フレームループ実行コンテキスト
pub struct FrameLoop<V>
where
    V: VisionPort,
{
    vision: V,
    interpreter: Interpreter,
    config: PipelineConfig,
    runtime: RuntimeState,
    stats: StatsCollector,
    stop: Arc<AtomicBool>,
    tx: Sender<InterpreterOutput>,
}

impl<V> FrameLoop<V>
where
    V: VisionPort,
{
    /// 新しいFrameLoopを作成
    ///
    /// 戻り値の`Receiver`から最新の解釈結果を取得できる。
    /// stopフラグを立てるとループが終了する。
    pub fn new(
        vision: V,
        interpreter: Interpreter,
        config: PipelineConfig,
        runtime: RuntimeState,
    ) -> (Self, Receiver<InterpreterOutput>, Arc<AtomicBool>) {
        let (tx, rx) = bounded::<InterpreterOutput>(1);
        let stop = Arc::new(AtomicBool::new(false));

        let frame_loop = Self {
            vision,
            interpreter,
            stats: StatsCollector::new(config.stats_interval()),
            config,
            runtime,
            stop: Arc::clone(&stop),
            tx,
        };

        (frame_loop, rx, stop)
    }

    /// フレームループを起動（ブロッキング）
    ///
    /// stopフラグが立つまで戻らない。
    pub fn run(mut self) -> DomainResult<()> {
        let mut last_tick = Instant::now();

        while !self.stop.load(Ordering::Relaxed) {
            let loop_start = Instant::now();

            // 経過時間は実測する（フレームレート非依存の挙動を保証）
            let dt = loop_start.duration_since(last_tick).as_secs_f32();
            last_tick = loop_start;

            let poll_result = self.vision.next_frame();
            let inference_time = loop_start.elapsed();

            let output = match poll_result {
                Ok(Some(frame)) => {
                    let frame = if self.runtime.is_enabled() {
                        frame
                    } else {
                        // 無効化中は「手なし」として解釈する
                        LandmarkFrame::empty()
                    };

                    let interpret_start = Instant::now();
                    let output = self.interpreter.step(&frame, dt);
                    self.stats
                        .record_duration(StatKind::Interpret, interpret_start.elapsed());
                    self.stats.record_duration(StatKind::Inference, inference_time);
                    self.stats.record_frame();
                    output
                }
                Ok(None) => {
                    // 映像が進んでいない。クールダウンだけ進めて待つ
                    self.interpreter.idle(dt)
                }
                Err(e) => {
                    #[cfg(debug_assertions)]
                    tracing::warn!("Vision error: {:?}", e);
                    #[cfg(not(debug_assertions))]
                    let _ = e;

                    // 推論失敗は「手なし」として劣化動作する
                    self.interpreter.step(&LandmarkFrame::empty(), dt)
                }
            };

            self.stats
                .record_duration(StatKind::EndToEnd, loop_start.elapsed());
            Self::send_latest_only(&self.tx, output);

            // 定期的に統計出力
            if self.stats.should_report() {
                self.stats.report_and_reset();
            }

            // 目標フレーム間隔までスリープ
            let elapsed = loop_start.elapsed();
            if let Some(remaining) = self.config.frame_interval().checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }

        tracing::info!("Frame loop stopped");
        Ok(())
    }

    /// 最新のみ上書きポリシーで送信
    fn send_latest_only(tx: &Sender<InterpreterOutput>, value: InterpreterOutput) {
        match tx.try_send(value) {
            Ok(_) => {}
            Err(TrySendError::Full(value)) => {
                // 受信側が追いついていない。滞留している古い値を捨てて入れ直す
                // （try_sendが再び満杯で失敗したら、その値は次フレームに任せる）
                let _ = tx.try_send(value);
            }
            Err(TrySendError::Disconnected(_)) => {
                // Channel closed
            }
        }
    }
}

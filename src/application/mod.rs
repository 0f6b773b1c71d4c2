//! Application層: ユースケースの調整
//!
//! Domain層の型とポートを使い、ジェスチャー解釈のユースケースを組み立てる。
//! 外部リソースへの直接依存は持たない（ポート経由で注入される）。

pub mod cooldown;
pub mod dispatcher;
pub mod dwell;
pub mod extractor;
pub mod motion;
pub mod pipeline;
pub mod runtime_state;
pub mod stabilizer;
pub mod stats;

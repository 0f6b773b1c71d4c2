//! 乱数アダプタ
//!
//! 本番用の`rand`実装と、テストで決定的な選択を注入するための
//! シーケンス実装を提供する。

use rand::Rng;

use crate::domain::RandomPort;

/// スレッドローカル乱数生成器を使うRandomPort実装（本番用）
pub struct ThreadRandom;

impl RandomPort for ThreadRandom {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// 事前に与えた値を順番に返すRandomPort実装（テスト用）
///
/// 値は`len`で剰余を取るため常に範囲内。使い切った後は0を返す。
pub struct SequenceRandom {
    values: Vec<usize>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: Vec<usize>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomPort for SequenceRandom {
    fn pick(&mut self, len: usize) -> usize {
        let value = self.values.get(self.cursor).copied().unwrap_or(0);
        self.cursor += 1;
        value % len
    }
}

//! クールダウン管理
//!
//! アクション種別ごとの残り秒数を1つのテーブルで管理する。
//! タイマーは毎フレームの経過時間で減算され、0のときだけ発火可能。

use std::collections::HashMap;

use crate::domain::{ActionConfig, ActionKind};

/// アクション種別ごとのクールダウンテーブル
#[derive(Debug)]
pub struct CooldownBank {
    config: ActionConfig,
    timers: HashMap<ActionKind, f32>,
}

impl CooldownBank {
    pub fn new(config: ActionConfig) -> Self {
        let timers = ActionKind::ALL.iter().map(|k| (*k, 0.0)).collect();
        Self { config, timers }
    }

    /// 経過時間ぶん全タイマーを減算する（下限0）
    pub fn tick(&mut self, dt: f32) {
        for timer in self.timers.values_mut() {
            *timer = (*timer - dt).max(0.0);
        }
    }

    /// 発火可能か（残り時間がちょうど0か）
    pub fn is_ready(&self, kind: ActionKind) -> bool {
        self.remaining(kind) == 0.0
    }

    /// 発火を記録し、設定されたクールダウン秒で再装填する
    pub fn fire(&mut self, kind: ActionKind) {
        self.timers.insert(kind, self.config.cooldown_for(kind));
    }

    /// 残り秒数を取得
    pub fn remaining(&self, kind: ActionKind) -> f32 {
        self.timers.get(&kind).copied().unwrap_or(0.0)
    }
}

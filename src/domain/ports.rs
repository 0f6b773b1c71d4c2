/// Port定義（Clean Architectureのインターフェース）
///
/// Domain層が外部実装に依存するための抽象trait。
/// Infrastructure層がこれらを実装し、Application層がDIで注入する。

use crate::domain::{DomainResult, LandmarkFrame};

/// 推論ポート: 手ランドマーク・ジェスチャー推論結果の取得を抽象化
pub trait VisionPort: Send {
    /// 次のランドマークフレームを取得する
    ///
    /// # Returns
    /// - `Ok(Some(LandmarkFrame))`: 新しい推論結果（手が映っていない場合はhandsが空）
    /// - `Ok(None)`: 映像更新なし（前フレームから変化なし）
    /// - `Err(DomainError)`: 推論エラー（呼び出し側は「手なし」として劣化動作する）
    fn next_frame(&mut self) -> DomainResult<Option<LandmarkFrame>>;
}

/// 写真インデックスポート: 表示対象の写真一覧取得を抽象化
///
/// 起動時に一度だけ呼び出される。失敗した場合、写真選択・スワイプは
/// 空リストに対して動作する（アクション自体は無効化されない）。
pub trait PhotoIndexPort: Send {
    /// 写真URLの一覧を取得する
    fn fetch_index(&mut self) -> DomainResult<Vec<String>>;
}

/// 乱数ポート: 写真のランダム選択を抽象化
///
/// テストで決定的な選択を注入するために分離している。
pub trait RandomPort: Send {
    /// `0..len` の範囲からインデックスを1つ選ぶ
    ///
    /// `len` は1以上であることを呼び出し側が保証する。
    fn pick(&mut self, len: usize) -> usize;
}

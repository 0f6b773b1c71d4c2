/// エラー型定義
///
/// Domain層の統一エラー型。thiserrorを使用して型安全なエラー処理を提供します。
///
/// # 設計方針
/// - unwrap()の使用を禁止し、明示的なエラーハンドリングを強制
/// - Result型でエラー伝播を明示化
/// - 推論の失敗は致命的エラーにしない（「手なし」として劣化動作する）

use thiserror::Error;

/// Domain層の統一エラー型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 手ランドマーク推論関連のエラー
    #[error("Vision error: {0}")]
    Vision(String),

    /// 写真インデックス取得関連のエラー
    #[error("Photo index error: {0}")]
    PhotoIndex(String),

    /// 設定関連のエラー
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 初期化エラー
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// その他のエラー
    #[error("Unexpected error: {0}")]
    Other(String),
}

/// Domain層の統一Result型
pub type DomainResult<T> = Result<T, DomainError>;

//! Infrastructure層: 外部リソースとの接続
//!
//! Domain層のポートを実装するアダプタ群。
//! モック実装は開発時の動作確認とテストの両方で使用する。

pub mod mock_photos;
pub mod mock_vision;
pub mod photo_index;
pub mod rng;

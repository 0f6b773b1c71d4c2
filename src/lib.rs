//! memory-tree - Library
//!
//! このライブラリは、バイナリターゲット（schema生成など）と
//! 統合テストからプロジェクトのモジュールにアクセスするために提供されています。

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod logging;

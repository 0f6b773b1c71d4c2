//! モック写真インデックス（開発・テスト用）
//!
//! 固定リストを返すPhotoIndexPort実装。ストレージAPIなしで動かすときに使う。

use crate::domain::{DomainResult, PhotoIndexPort};

/// 固定の写真リストを返すPhotoIndexPort実装
pub struct FixedPhotoIndex {
    photos: Vec<String>,
}

impl FixedPhotoIndex {
    pub fn new(photos: Vec<String>) -> Self {
        Self { photos }
    }

    /// デモ用のサンプルリスト
    pub fn sample() -> Self {
        Self::new(vec![
            "christmas_tree.jpg".to_string(),
            "snowman.jpg".to_string(),
            "family_dinner.jpg".to_string(),
            "fireplace.jpg".to_string(),
            "presents.jpg".to_string(),
        ])
    }
}

impl PhotoIndexPort for FixedPhotoIndex {
    fn fetch_index(&mut self) -> DomainResult<Vec<String>> {
        Ok(self.photos.clone())
    }
}

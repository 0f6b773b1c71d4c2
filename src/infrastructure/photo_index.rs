//! 写真インデックス取得アダプタ
//!
//! 表示対象の写真一覧JSONを起動時に一度だけ取得する。
//! HTTP（写真ストレージAPI）とローカルJSONファイルの2実装を提供する。
//! 一覧は単純なファイル名の配列（例: `["tree.jpg", "snow.jpg"]`）。

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::domain::{DomainError, DomainResult, PhotoIndexPort};

/// HTTP経由で写真一覧を取得するPhotoIndexPort実装
pub struct HttpPhotoIndex {
    url: String,
}

impl HttpPhotoIndex {
    /// リクエストタイムアウト（起動をブロックするため短め）
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl PhotoIndexPort for HttpPhotoIndex {
    fn fetch_index(&mut self) -> DomainResult<Vec<String>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::PhotoIndex(format!("HTTP client build failed: {}", e)))?;

        let photos: Vec<String> = client
            .get(&self.url)
            .send()
            .map_err(|e| DomainError::PhotoIndex(format!("Request to {} failed: {}", self.url, e)))?
            .error_for_status()
            .map_err(|e| DomainError::PhotoIndex(format!("Photo index HTTP error: {}", e)))?
            .json()
            .map_err(|e| DomainError::PhotoIndex(format!("Photo index parse failed: {}", e)))?;

        info!(count = photos.len(), url = %self.url, "Photo index fetched");
        Ok(photos)
    }
}

/// ローカルJSONファイルから写真一覧を読むPhotoIndexPort実装
///
/// HTTPサーバーなしで動かす開発用のフォールバック。
pub struct JsonFilePhotoIndex {
    path: PathBuf,
}

impl JsonFilePhotoIndex {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PhotoIndexPort for JsonFilePhotoIndex {
    fn fetch_index(&mut self) -> DomainResult<Vec<String>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            DomainError::PhotoIndex(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let photos: Vec<String> = serde_json::from_str(&content)
            .map_err(|e| DomainError::PhotoIndex(format!("Photo index parse failed: {}", e)))?;

        info!(count = photos.len(), path = %self.path.display(), "Photo index loaded");
        Ok(photos)
    }
}

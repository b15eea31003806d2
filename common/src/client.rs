//! 解析APIクライアント
//!
//! 画像コレクションを1つのmultipartリクエストにまとめて `{base}/api/analyze` へ送る。
//! HTTPの実装はフロントエンドごとに `HttpClient` として差し替える
//! （CLIはreqwest、Webはfetch）。

use crate::error::{Error, Result};
use crate::parser::{ensure_aligned, parse_analyze_response};
use crate::types::{AnalysisResult, Image};
use tracing::debug;

/// API URL未設定時のフォールバック
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// 解析エンドポイントのパス
pub const ANALYZE_PATH: &str = "/api/analyze";

/// 画像を載せるmultipartフィールド名（画像ごとに繰り返す）
pub const IMAGE_FIELD: &str = "images";

/// multipartのファイルパート1件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub field: &'static str,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    /// 画像を順番通りに `images` パートとして詰める
    pub fn from_images(images: &[Image]) -> Self {
        let parts = images
            .iter()
            .enumerate()
            .map(|(index, image)| FormPart {
                field: IMAGE_FIELD,
                file_name: image.upload_file_name(index),
                mime_type: image.mime_type().to_string(),
                bytes: image.bytes().to_vec(),
            })
            .collect();
        Self { parts }
    }

    pub fn total_bytes(&self) -> usize {
        self.parts.iter().map(|p| p.bytes.len()).sum()
    }
}

/// HTTPレスポンス（本文はテキストとして受け取る）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

/// HTTP送信の抽象
///
/// `Err` は通信自体の失敗（接続不可など）を表す。ステータス異常は `Ok` で返すこと。
#[allow(async_fn_in_trait)]
pub trait HttpClient {
    async fn post_multipart(&self, url: &str, form: MultipartForm) -> Result<HttpResponse>;
}

pub struct AnalysisClient<H: HttpClient> {
    base_url: String,
    http: H,
}

impl<H: HttpClient> AnalysisClient<H> {
    pub fn new(base_url: impl Into<String>, http: H) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, ANALYZE_PATH)
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    /// 画像を送信し、画像と同じ順序の解析結果を返す
    pub async fn analyze(&self, images: &[Image]) -> Result<Vec<AnalysisResult>> {
        if images.is_empty() {
            return Err(Error::Validation("No images to analyze".into()));
        }

        let form = MultipartForm::from_images(images);
        let url = self.endpoint();
        debug!("POST {} ({} images, {} bytes)", url, form.parts.len(), form.total_bytes());

        let response = self.http.post_multipart(&url, form).await?;
        debug!("response {} ({} bytes)", response.status, response.body.len());

        let results = parse_analyze_response(response.status, &response.status_text, &response.body)?;
        ensure_aligned(images.len(), results)
    }
}

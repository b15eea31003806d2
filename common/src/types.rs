//! データモデル
//!
//! CLIとWeb(WASM)で共有される型:
//! - Image: 撮影またはアップロードされた画像1枚
//! - AnalysisResult: 画像1枚ごとの解析結果
//! - AnalyzeResponse: `/api/analyze` のレスポンス本体

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// 結果メーターの色分けに使う閾値（人間らしさ%）
pub const LIKELY_HUMAN_THRESHOLD: f64 = 70.0;

/// 撮影・アップロードされた画像
///
/// 識別子は持たず、ImageCollection内の位置だけが参照キーになる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    bytes: Vec<u8>,
    mime_type: String,
    file_name: Option<String>,
}

impl Image {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// `data:image/jpeg;base64,...` 形式のData URLから生成
    ///
    /// canvasのスナップショットはこの形式で返ってくる。
    pub fn from_data_url(data_url: &str) -> Option<Self> {
        let rest = data_url.strip_prefix("data:")?;
        let (meta, payload) = rest.split_once(',')?;
        let mime_type = meta.strip_suffix(";base64")?;
        let bytes = STANDARD.decode(payload.trim()).ok()?;
        let mime_type = if mime_type.is_empty() { "application/octet-stream" } else { mime_type };
        Some(Self::new(bytes, mime_type))
    }

    /// プレビュー表示用のData URL
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// multipart送信時のファイル名（元の名前がなければ `image-{index}.jpg`）
    pub fn upload_file_name(&self, index: usize) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| format!("image-{}.jpg", index))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// AI解析結果（画像1枚につき1件）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub human_percentage: f64,       // 人間が書いた確からしさ

    pub ai_percentage: f64,          // AI生成の確からしさ

    #[serde(default)]
    pub extracted_text: String,      // OCRテキスト
}

impl AnalysisResult {
    pub fn is_likely_human(&self) -> bool {
        self.human_percentage > LIKELY_HUMAN_THRESHOLD
    }

    /// メーターの塗りつぶし幅（0.0〜1.0）
    pub fn human_meter_fraction(&self) -> f64 {
        if self.human_percentage.is_nan() {
            return 0.0;
        }
        (self.human_percentage / 100.0).clamp(0.0, 1.0)
    }

    /// サーバーは合計100を保証しないので診断用にのみ使う
    pub fn sums_to_hundred(&self) -> bool {
        ((self.human_percentage + self.ai_percentage) - 100.0).abs() <= 0.5
    }
}

/// `/api/analyze` のレスポンス本体
///
/// 成功時: `{ "success": true, "results": [...] }`
/// 失敗時: `{ "success": false, "error": "..." }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,

    #[serde(default)]
    pub results: Vec<AnalysisResult>,

    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_upload_file_name_fallback() {
        let captured = Image::new(vec![1, 2, 3], "image/jpeg");
        assert_eq!(captured.upload_file_name(2), "image-2.jpg");

        let uploaded = Image::new(vec![1], "image/png").with_file_name("scan.png");
        assert_eq!(uploaded.upload_file_name(0), "scan.png");
    }

    #[test]
    fn test_image_from_data_url() {
        let image = Image::from_data_url("data:image/jpeg;base64,AQID").unwrap();
        assert_eq!(image.bytes(), &[1, 2, 3]);
        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(image.to_data_url(), "data:image/jpeg;base64,AQID");
    }

    #[test]
    fn test_image_from_data_url_rejects_non_base64() {
        assert!(Image::from_data_url("data:text/plain,hello").is_none());
        assert!(Image::from_data_url("not a data url").is_none());
        assert!(Image::from_data_url("data:image/png;base64,@@@").is_none());
    }

    #[test]
    fn test_analysis_result_deserialize() {
        let json = r#"{"humanPercentage": 82, "aiPercentage": 18, "extractedText": "fn main() {}"}"#;
        let result: AnalysisResult = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(result.human_percentage, 82.0);
        assert_eq!(result.ai_percentage, 18.0);
        assert_eq!(result.extracted_text, "fn main() {}");
        assert!(result.is_likely_human());
        assert!(result.sums_to_hundred());
    }

    #[test]
    fn test_analysis_result_serialize_camel_case() {
        let result = AnalysisResult {
            human_percentage: 40.5,
            ai_percentage: 59.5,
            extracted_text: "hello".to_string(),
        };
        let json = serde_json::to_string(&result).expect("シリアライズ失敗");
        assert!(json.contains("\"humanPercentage\":40.5"));
        assert!(json.contains("\"aiPercentage\":59.5"));
        assert!(json.contains("\"extractedText\":\"hello\""));
        assert!(!result.is_likely_human());
    }

    #[test]
    fn test_human_meter_fraction_clamped() {
        let over = AnalysisResult { human_percentage: 130.0, ..Default::default() };
        assert_eq!(over.human_meter_fraction(), 1.0);

        let under = AnalysisResult { human_percentage: -5.0, ..Default::default() };
        assert_eq!(under.human_meter_fraction(), 0.0);

        let half = AnalysisResult { human_percentage: 50.0, ..Default::default() };
        assert_eq!(half.human_meter_fraction(), 0.5);
    }

    #[test]
    fn test_percentages_not_summing_pass_through() {
        let json = r#"{"humanPercentage": 60, "aiPercentage": 60, "extractedText": ""}"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.human_percentage, 60.0);
        assert!(!result.sums_to_hundred());
    }

    #[test]
    fn test_analyze_response_failure_shape() {
        let json = r#"{"success": false, "error": "quota exceeded"}"#;
        let response: AnalyzeResponse = serde_json::from_str(json).unwrap();
        assert!(!response.success);
        assert!(response.results.is_empty());
        assert_eq!(response.error.as_deref(), Some("quota exceeded"));
    }
}

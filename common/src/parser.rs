//! APIレスポンスパーサー
//!
//! `/api/analyze` のレスポンスを段階的に検査する:
//! 1. ステータスが2xx以外 → Network
//! 2. 本文が空 → EmptyResponse
//! 3. JSONとして解釈できない → Parse
//! 4. `success: false` → Application
//! 5. それ以外 → 結果配列

use crate::error::{Error, Result};
use crate::types::{AnalysisResult, AnalyzeResponse};

/// HTTPレスポンスをパースして解析結果を取り出す
///
/// # Arguments
/// * `status` - HTTPステータスコード
/// * `status_text` - ステータス理由句（エラーメッセージ用）
/// * `body` - レスポンス本文
///
/// # Examples
/// ```
/// use codesage_common::parse_analyze_response;
///
/// let body = r#"{"success": true, "results": [{"humanPercentage": 90, "aiPercentage": 10, "extractedText": "hi"}]}"#;
/// let results = parse_analyze_response(200, "OK", body).unwrap();
/// assert_eq!(results.len(), 1);
/// ```
pub fn parse_analyze_response(status: u16, status_text: &str, body: &str) -> Result<Vec<AnalysisResult>> {
    if !(200..300).contains(&status) {
        return Err(Error::Network {
            status: Some(status),
            message: status_text.to_string(),
        });
    }

    if body.trim().is_empty() {
        return Err(Error::EmptyResponse);
    }

    let response: AnalyzeResponse =
        serde_json::from_str(body).map_err(|e| Error::Parse(e.to_string()))?;

    if !response.success {
        let message = response
            .error
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Unknown error".to_string());
        return Err(Error::Application(message));
    }

    Ok(response.results)
}

/// 送信した画像数と結果数が一致するか検査
///
/// 件数がずれると画像と結果のインデックス対応が崩れるため、Parseエラーとして扱う。
pub fn ensure_aligned(submitted: usize, results: Vec<AnalysisResult>) -> Result<Vec<AnalysisResult>> {
    if results.len() != submitted {
        return Err(Error::Parse(format!(
            "expected {} results, got {}",
            submitted,
            results.len()
        )));
    }
    Ok(results)
}

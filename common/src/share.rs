//! 結果の共有・クリップボードコピー
//!
//! 共有シートが使えない環境ではクリップボードへのコピーにフォールバックする。
//! ユーザーによる共有キャンセルはエラーとして扱わない。

use crate::notice::Notice;
use crate::types::AnalysisResult;
use tracing::warn;

pub const SHARE_TITLE: &str = "CodeSage Analysis Result";

#[allow(async_fn_in_trait)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    /// ユーザーが共有シートを閉じた
    Cancelled,
    Failed(String),
}

#[allow(async_fn_in_trait)]
pub trait ShareSheet {
    fn is_available(&self) -> bool;

    async fn share(&self, title: &str, text: &str) -> Result<(), ShareError>;
}

/// 共有シートを持たない環境用
pub struct NoShareSheet;

impl ShareSheet for NoShareSheet {
    fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, _title: &str, _text: &str) -> Result<(), ShareError> {
        Err(ShareError::Failed("sharing is not supported".into()))
    }
}

/// 共有用テキスト
pub fn share_text(result: &AnalysisResult) -> String {
    format!(
        "CodeSage AI Detection: {}% human, {}% AI\n\n{}",
        result.human_percentage, result.ai_percentage, result.extracted_text
    )
}

pub async fn copy_text<C: Clipboard>(clipboard: &C, text: &str) -> Notice {
    match clipboard.write_text(text).await {
        Ok(()) => Notice::success("Text copied to clipboard"),
        Err(e) => {
            warn!("clipboard write failed: {}", e);
            Notice::error("Failed to copy text")
        }
    }
}

/// 結果を共有する。キャンセル時は通知なし（None）
pub async fn share_result<S: ShareSheet, C: Clipboard>(
    sheet: &S,
    clipboard: &C,
    result: &AnalysisResult,
) -> Option<Notice> {
    let text = share_text(result);

    if !sheet.is_available() {
        return Some(copy_text(clipboard, &text).await);
    }

    match sheet.share(SHARE_TITLE, &text).await {
        Ok(()) => Some(Notice::success("Shared successfully")),
        Err(ShareError::Cancelled) => None,
        Err(ShareError::Failed(e)) => {
            warn!("share failed: {}", e);
            Some(Notice::error("Failed to share result"))
        }
    }
}

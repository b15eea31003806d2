//! エラー型定義
//!
//! どのエラーも発生した境界で捕捉され、通知(Notice)1件としてユーザーに表示される。
//! 致命的なものはなく、自動リトライも行わない。

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// カメラ権限が拒否された（再試行で回復可能）
    #[error("Camera access denied: {0}")]
    Permission(String),

    /// 権限以外の理由でカメラを取得できなかった
    #[error("Camera unavailable: {0}")]
    Device(String),

    /// 入力が不正（画像以外のファイルのみ、空のコレクションなど）
    #[error("{0}")]
    Validation(String),

    /// HTTPステータスが2xx以外、または通信自体に失敗
    #[error("{}", network_message(.status, .message))]
    Network { status: Option<u16>, message: String },

    #[error("Empty response from server")]
    EmptyResponse,

    #[error("Invalid JSON response from server: {0}")]
    Parse(String),

    /// サーバーが `success: false` を返した
    #[error("Analysis failed: {0}")]
    Application(String),

    /// 現在の画面では実行できない操作
    #[error("Cannot {action} while {state}")]
    InvalidTransition { action: &'static str, state: String },

    #[error("Config error: {0}")]
    Config(String),
}

fn network_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Server returned {}: {}", code, message),
        None => format!("Network error: {}", message),
    }
}

impl Error {
    /// トランスポート層の失敗（ステータスなし）
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Network { status: None, message: message.into() }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Network { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

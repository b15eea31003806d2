use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodesageError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("解析に失敗しました")]
    AnalysisFailed,

    #[error(transparent)]
    Common(#[from] codesage_common::Error),
}

pub type Result<T> = std::result::Result<T, CodesageError>;

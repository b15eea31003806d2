//! CodeSage Common Library
//!
//! CLIとWeb(WASM)で共有される型と画面ロジック。
//! カメラ・ファイル・HTTP・クリップボードへのアクセスはトレイト越しに行い、
//! このクレート自体はI/Oを持たない。

pub mod types;
pub mod collection;
pub mod error;
pub mod notice;
pub mod parser;
pub mod capture;
pub mod client;
pub mod share;
pub mod view;

pub use types::{AnalysisResult, AnalyzeResponse, Image};
pub use collection::ImageCollection;
pub use error::{Error, Result};
pub use notice::{Notice, NoticeLevel, Notices};
pub use parser::{ensure_aligned, parse_analyze_response};
pub use capture::{
    read_batch, CameraDevice, CameraOverlay, CameraSession, CameraStatus, CameraStream, FacingMode,
    PermissionState, SelectedFile, UploadBatch,
};
pub use client::{AnalysisClient, FormPart, HttpClient, HttpResponse, MultipartForm, DEFAULT_API_URL};
pub use share::{copy_text, share_result, share_text, Clipboard, NoShareSheet, ShareError, ShareSheet};
pub use view::{AnalysisCompletion, AnalysisTicket, CaptureMode, ViewController, ViewState};

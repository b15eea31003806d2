//! 画像の取得元
//!
//! - camera: カメラのライブ映像から撮影
//! - upload: ファイル選択・ドラッグ&ドロップ

pub mod camera;
pub mod upload;

pub use camera::{CameraDevice, CameraOverlay, CameraSession, CameraStatus, CameraStream, FacingMode, PermissionState};
pub use upload::{is_image_mime, read_batch, SelectedFile, UploadBatch};

//! コマンドライン引数のパスをアップロード対象ファイルに展開する
//!
//! フォルダは直下のみ走査する。画像以外もそのまま渡し、
//! 除外と通知はアップロード処理（read_batch）に任せる。

use crate::error::{CodesageError, Result};
use codesage_common::{Error, SelectedFile};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// ファイルシステム上の選択ファイル
#[derive(Debug, Clone)]
pub struct FsImageFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: String,
}

impl FsImageFile {
    pub fn new(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            path: path.to_path_buf(),
            file_name,
            mime_type: mime_type_for(path).to_string(),
        }
    }
}

impl SelectedFile for FsImageFile {
    fn name(&self) -> &str {
        &self.file_name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn read(&self) -> std::result::Result<Vec<u8>, Error> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| Error::Validation(format!("{} を読み込めません: {}", self.path.display(), e)))
    }
}

/// 拡張子からMIMEタイプを推定（画像以外は application/octet-stream）
pub fn mime_type_for(path: &Path) -> &'static str {
    image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// パス（ファイルまたはフォルダ）を選択ファイルの一覧に展開する
///
/// 指定順を保ち、フォルダ内はファイル名順に並べる。1件もなければ NoImagesFound。
pub fn collect_files(paths: &[PathBuf]) -> Result<Vec<FsImageFile>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            files.extend(scan_folder(path)?);
        } else if path.is_file() {
            files.push(FsImageFile::new(path));
        } else {
            return Err(CodesageError::FileNotFound(path.display().to_string()));
        }
    }

    if files.is_empty() {
        let joined = paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ");
        return Err(CodesageError::NoImagesFound(joined));
    }

    Ok(files)
}

pub fn scan_folder(folder: &Path) -> Result<Vec<FsImageFile>> {
    if !folder.exists() {
        return Err(CodesageError::FileNotFound(folder.display().to_string()));
    }

    let mut files: Vec<FsImageFile> = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| FsImageFile::new(e.path()))
        .collect();

    // ファイル名でソート
    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(files)
}

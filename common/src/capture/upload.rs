//! ファイル選択・ドラッグ&ドロップによるアップロード
//!
//! 1回の選択（バッチ）ごとに画像ファイルだけを全件読み込み、
//! 読み込みが全て終わってから1回でコレクションに追加する。

use crate::error::{Error, Result};
use crate::types::Image;
use futures::future::try_join_all;
use tracing::debug;

/// 選択されたファイル1件（ブラウザなら File、CLIならパス）
#[allow(async_fn_in_trait)]
pub trait SelectedFile {
    fn name(&self) -> &str;

    fn mime_type(&self) -> &str;

    /// ファイル全体をメモリに読み込む
    async fn read(&self) -> Result<Vec<u8>>;
}

/// 読み込み済みのバッチ
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadBatch {
    /// 選択順に並んだ画像
    pub images: Vec<Image>,
    /// 画像でないため除外したファイル名
    pub skipped: Vec<String>,
}

impl UploadBatch {
    /// バッチ追加時に表示する通知文
    pub fn summary(&self) -> String {
        let count = self.images.len();
        let mut message = format!("{} image{} added", count, if count == 1 { "" } else { "s" });
        if !self.skipped.is_empty() {
            let skipped = self.skipped.len();
            message.push_str(&format!(
                " ({} non-image file{} skipped)",
                skipped,
                if skipped == 1 { "" } else { "s" }
            ));
        }
        message
    }
}

pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// バッチを読み込む
///
/// 画像が1件もなければ `Error::Validation`。読み込みの完了順に関わらず、
/// 結果は選択順に並ぶ。1件でも読み込みに失敗したらバッチ全体を破棄する。
pub async fn read_batch<F: SelectedFile>(files: &[F]) -> Result<UploadBatch> {
    let (accepted, rejected): (Vec<&F>, Vec<&F>) =
        files.iter().partition(|f| is_image_mime(f.mime_type()));

    if accepted.is_empty() {
        return Err(Error::Validation("Please select image files only".into()));
    }

    let contents = try_join_all(accepted.iter().map(|f| f.read())).await?;

    let images = accepted
        .iter()
        .zip(contents)
        .map(|(file, bytes)| Image::new(bytes, file.mime_type()).with_file_name(file.name()))
        .collect::<Vec<_>>();

    let skipped = rejected.iter().map(|f| f.name().to_string()).collect::<Vec<_>>();

    debug!("upload batch read: {} images, {} skipped", images.len(), skipped.len());

    Ok(UploadBatch { images, skipped })
}

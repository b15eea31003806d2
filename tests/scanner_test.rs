//! ファイル選択 → アップロードバッチの結合テスト

use codesage::scanner::{collect_files, FsImageFile};
use codesage_common::{read_batch, CaptureMode, SelectedFile, ViewController};
use std::path::Path;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, bytes: &[u8]) {
    std::fs::write(dir.join(name), bytes).expect("write test file");
}

/// フォルダ内はファイル名順
#[test]
fn test_collect_files_sorted_by_name() {
    let dir = tempdir().unwrap();
    write(dir.path(), "b.png", b"b");
    write(dir.path(), "a.jpg", b"a");
    write(dir.path(), "c.txt", b"c");

    let files = collect_files(&[dir.path().to_path_buf()]).unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.name()).collect();

    assert_eq!(names, vec!["a.jpg", "b.png", "c.txt"]);
    assert_eq!(files[0].mime_type(), "image/jpeg");
    assert_eq!(files[2].mime_type(), "application/octet-stream");
}

/// サブフォルダは走査しない
#[test]
fn test_collect_files_is_not_recursive() {
    let dir = tempdir().unwrap();
    write(dir.path(), "top.png", b"t");
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    write(&dir.path().join("nested"), "deep.png", b"d");

    let files = collect_files(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name(), "top.png");
}

/// 指定順（ファイル → フォルダ）が保たれる
#[test]
fn test_collect_files_keeps_argument_order() {
    let dir = tempdir().unwrap();
    let folder = dir.path().join("folder");
    std::fs::create_dir(&folder).unwrap();
    write(&folder, "inner.png", b"i");
    write(dir.path(), "z.png", b"z");

    let files = collect_files(&[dir.path().join("z.png"), folder]).unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["z.png", "inner.png"]);
}

/// 画像以外は除外され、通知に件数が出る
#[tokio::test]
async fn test_read_batch_skips_non_images() {
    let dir = tempdir().unwrap();
    write(dir.path(), "one.png", &[1, 2, 3]);
    write(dir.path(), "notes.txt", b"hello");

    let files = collect_files(&[dir.path().to_path_buf()]).unwrap();
    let batch = read_batch(&files).await.unwrap();

    assert_eq!(batch.images.len(), 1);
    assert_eq!(batch.images[0].bytes(), &[1, 2, 3]);
    assert_eq!(batch.images[0].file_name(), Some("one.png"));
    assert_eq!(batch.skipped, vec!["notes.txt".to_string()]);

    let mut controller = ViewController::new();
    controller.select_mode(CaptureMode::Upload).unwrap();
    assert_eq!(controller.apply_upload(Ok(batch)).unwrap(), 1);

    let notices = controller.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "1 image added (1 non-image file skipped)");
}

/// 画像が1件もなければバッチ全体がエラー
#[tokio::test]
async fn test_read_batch_without_images() {
    let dir = tempdir().unwrap();
    write(dir.path(), "readme.md", b"#");

    let files = collect_files(&[dir.path().to_path_buf()]).unwrap();
    let result = read_batch(&files).await;

    assert_eq!(
        result.unwrap_err(),
        codesage_common::Error::Validation("Please select image files only".into())
    );
}

/// 読み込み中にファイルが消えた場合
#[tokio::test]
async fn test_read_removed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gone.png");
    write(dir.path(), "gone.png", b"x");

    let file = FsImageFile::new(&path);
    std::fs::remove_file(&path).unwrap();

    assert!(file.read().await.is_err());
}

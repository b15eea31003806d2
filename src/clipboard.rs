//! OSのクリップボードコマンド経由でテキストをコピーする
//!
//! Windows: clip / macOS: pbcopy / Linux: wl-copy → xclip の順に試す

use codesage_common::Clipboard;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

pub struct SystemClipboard;

#[cfg(windows)]
const CANDIDATES: &[(&str, &[&str])] = &[("cmd", &["/c", "clip"])];

#[cfg(target_os = "macos")]
const CANDIDATES: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(all(unix, not(target_os = "macos")))]
const CANDIDATES: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
];

#[cfg(not(any(windows, unix)))]
const CANDIDATES: &[(&str, &[&str])] = &[];

async fn pipe_to(program: &str, args: &[&str], text: &str) -> Result<(), String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("{} を起動できません: {}", program, e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .await
            .map_err(|e| format!("{} への書き込みエラー: {}", program, e))?;
    }

    let status = child.wait().await.map_err(|e| e.to_string())?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("{} failed (code {:?})", program, status.code()))
    }
}

impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), String> {
        let mut last_error = String::from("クリップボードコマンドが見つかりません");

        for (program, args) in CANDIDATES {
            match pipe_to(program, args, text).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    debug!("clipboard via {} failed: {}", program, e);
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

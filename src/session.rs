//! ターミナル上の解析セッション
//!
//! 画面状態は ViewController が持ち、このモジュールは入力の受付と表示だけを行う。
//! カメラ撮影はブラウザ版のみ対応。

use crate::error::Result;
use crate::report::{print_notices, print_results};
use crate::scanner::collect_files;
use codesage_common::{
    copy_text, read_batch, share_result, AnalysisClient, AnalysisCompletion, CaptureMode,
    Clipboard, Error, HttpClient, NoShareSheet, Notice, ViewController, ViewState,
};
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// モード選択画面の操作
#[derive(Debug, PartialEq)]
pub enum ModeAction {
    Select(CaptureMode),
    Quit,
    Unknown(String),
}

/// 撮影画面の操作
#[derive(Debug, PartialEq)]
pub enum CaptureAction {
    /// 画像を追加
    Add(Vec<PathBuf>),
    /// 画像を削除（0始まり）
    Remove(usize),
    Analyze,
    Back,
    Quit,
    Unknown(String),
}

/// 結果画面の操作
#[derive(Debug, PartialEq)]
pub enum ResultsAction {
    /// テキストをコピー（0始まり）
    Copy(usize),
    Share(usize),
    Back,
    NewAnalysis,
    Quit,
    Unknown(String),
}

pub fn parse_mode_action(input: &str) -> ModeAction {
    match input.trim() {
        "c" | "camera" => ModeAction::Select(CaptureMode::Camera),
        "u" | "upload" => ModeAction::Select(CaptureMode::Upload),
        "q" | "Q" => ModeAction::Quit,
        other => ModeAction::Unknown(other.to_string()),
    }
}

/// 1始まりの番号（省略時は1件目）を0始まりに変換
fn parse_index(arg: Option<&str>) -> Option<usize> {
    match arg {
        None => Some(0),
        Some(s) => s.parse::<usize>().ok().filter(|&n| n >= 1).map(|n| n - 1),
    }
}

pub fn parse_capture_action(input: &str) -> CaptureAction {
    let trimmed = input.trim();
    let mut words = trimmed.split_whitespace();
    let command = words.next().unwrap_or("");

    match command {
        "a" => {
            let paths: Vec<PathBuf> = words.map(PathBuf::from).collect();
            if paths.is_empty() {
                CaptureAction::Unknown(trimmed.to_string())
            } else {
                CaptureAction::Add(paths)
            }
        }
        "d" => match words.next().and_then(|n| parse_index(Some(n))) {
            Some(index) => CaptureAction::Remove(index),
            None => CaptureAction::Unknown(trimmed.to_string()),
        },
        "" | "z" => CaptureAction::Analyze,
        "b" => CaptureAction::Back,
        "q" | "Q" => CaptureAction::Quit,
        _ => CaptureAction::Unknown(trimmed.to_string()),
    }
}

pub fn parse_results_action(input: &str) -> ResultsAction {
    let trimmed = input.trim();
    let mut words = trimmed.split_whitespace();
    let command = words.next().unwrap_or("");
    let index = parse_index(words.next());

    match (command, index) {
        ("c", Some(i)) => ResultsAction::Copy(i),
        ("s", Some(i)) => ResultsAction::Share(i),
        ("b", _) => ResultsAction::Back,
        ("n", _) => ResultsAction::NewAnalysis,
        ("q", _) | ("Q", _) => ResultsAction::Quit,
        _ => ResultsAction::Unknown(trimmed.to_string()),
    }
}

pub struct Session<H: HttpClient, C: Clipboard> {
    controller: ViewController,
    client: AnalysisClient<H>,
    clipboard: C,
}

impl<H: HttpClient, C: Clipboard> Session<H, C> {
    pub fn new(client: AnalysisClient<H>, clipboard: C) -> Self {
        Self {
            controller: ViewController::new(),
            client,
            clipboard,
        }
    }

    pub fn controller(&self) -> &ViewController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ViewController {
        &mut self.controller
    }

    /// パス群をアップロードとして追加する。失敗は通知として残る
    pub async fn add_files(&mut self, paths: &[PathBuf]) -> Result<usize> {
        let files = match collect_files(paths) {
            Ok(files) => files,
            Err(e) => {
                self.controller.push_notice(Notice::error(e.to_string()));
                return Ok(0);
            }
        };
        debug!("selected {} files", files.len());

        let batch = read_batch(&files).await;
        match self.controller.apply_upload(batch) {
            Ok(added) => Ok(added),
            Err(e @ Error::InvalidTransition { .. }) => Err(e.into()),
            // 通知済み
            Err(_) => Ok(0),
        }
    }

    /// 解析を実行（スピナー表示付き）
    pub async fn analyze(&mut self) -> AnalysisCompletion {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!(
            "Analyzing {} image(s) via {}...",
            self.controller.images().len(),
            self.client.endpoint()
        ));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let completion = self.controller.analyze_with(&self.client).await;

        spinner.finish_and_clear();
        completion
    }

    /// 非対話: アップロードして解析
    pub async fn analyze_paths(&mut self, paths: &[PathBuf]) -> Result<AnalysisCompletion> {
        self.controller = ViewController::new();
        self.controller.select_mode(CaptureMode::Upload)?;

        let added = self.add_files(paths).await?;
        print_notices(self.controller.drain_notices());
        if added == 0 {
            return Ok(AnalysisCompletion::Failed);
        }

        let completion = self.analyze().await;
        print_notices(self.controller.drain_notices());
        Ok(completion)
    }

    /// 対話モード
    pub async fn run_interactive(&mut self) -> Result<()> {
        loop {
            print_notices(self.controller.drain_notices());

            let keep_going = match self.controller.state() {
                ViewState::SelectingMode => self.mode_selection_step()?,
                ViewState::Capturing(mode) => self.capture_step(mode).await?,
                ViewState::ShowingResults(_) => self.results_step().await?,
            };

            if !keep_going {
                print_notices(self.controller.drain_notices());
                return Ok(());
            }
        }
    }

    fn mode_selection_step(&mut self) -> Result<bool> {
        println!("\nSelect Mode");
        let input: String = Input::new()
            .with_prompt("モード (c:カメラ u:アップロード q:終了)")
            .interact_text()?;

        match parse_mode_action(&input) {
            ModeAction::Select(CaptureMode::Camera) => {
                self.controller.push_notice(Notice::error(
                    "Camera capture is only available in the web app",
                ));
            }
            ModeAction::Select(mode) => self.controller.select_mode(mode)?,
            ModeAction::Quit => return Ok(false),
            ModeAction::Unknown(other) => {
                self.controller.push_notice(Notice::error(format!("不明な操作: {}", other)));
            }
        }
        Ok(true)
    }

    async fn capture_step(&mut self, mode: CaptureMode) -> Result<bool> {
        let images = self.controller.images();
        println!("\n{} - Selected Images ({})", mode.title(), images.len());
        if images.is_empty() {
            println!("  No images selected yet");
        }
        for (index, image) in images.iter().enumerate() {
            println!("  {}. {} ({} bytes)", index + 1, image.upload_file_name(index), image.len());
        }

        let input: String = Input::new()
            .with_prompt("操作 (a <パス...>:追加 d <番号>:削除 Enter:解析 b:戻る q:終了)")
            .allow_empty(true)
            .interact_text()?;

        match parse_capture_action(&input) {
            CaptureAction::Add(paths) => {
                self.add_files(&paths).await?;
            }
            CaptureAction::Remove(index) => {
                if self.controller.remove_image(index)?.is_none() {
                    self.controller
                        .push_notice(Notice::error(format!("画像 {} はありません", index + 1)));
                }
            }
            CaptureAction::Analyze => {
                if self.controller.can_analyze() {
                    self.analyze().await;
                } else {
                    self.controller
                        .push_notice(Notice::error("Add at least one image before analyzing"));
                }
            }
            CaptureAction::Back => self.controller.back()?,
            CaptureAction::Quit => return Ok(false),
            CaptureAction::Unknown(other) => {
                self.controller.push_notice(Notice::error(format!("不明な操作: {}", other)));
            }
        }
        Ok(true)
    }

    async fn results_step(&mut self) -> Result<bool> {
        println!();
        print_results(&self.controller);

        let input: String = Input::new()
            .with_prompt("操作 (c [番号]:テキストをコピー s [番号]:共有 b:戻る n:新しい解析 q:終了)")
            .interact_text()?;

        match parse_results_action(&input) {
            ResultsAction::Copy(index) => match self.controller.results().get(index) {
                Some(result) => {
                    let notice = copy_text(&self.clipboard, &result.extracted_text).await;
                    self.controller.push_notice(notice);
                }
                None => self.report_missing_result(index),
            },
            ResultsAction::Share(index) => match self.controller.results().get(index) {
                Some(result) => {
                    if let Some(notice) = share_result(&NoShareSheet, &self.clipboard, result).await {
                        self.controller.push_notice(notice);
                    }
                }
                None => self.report_missing_result(index),
            },
            ResultsAction::Back => self.controller.back()?,
            ResultsAction::NewAnalysis => self.controller.new_analysis()?,
            ResultsAction::Quit => return Ok(false),
            ResultsAction::Unknown(other) => {
                self.controller.push_notice(Notice::error(format!("不明な操作: {}", other)));
            }
        }
        Ok(true)
    }

    fn report_missing_result(&mut self, index: usize) {
        self.controller
            .push_notice(Notice::error(format!("結果 {} はありません", index + 1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codesage_common::{HttpResponse, MultipartForm};
    use std::cell::RefCell;

    struct FixedHttp {
        body: &'static str,
        sent_files: RefCell<Vec<String>>,
    }

    impl HttpClient for FixedHttp {
        async fn post_multipart(
            &self,
            _url: &str,
            form: MultipartForm,
        ) -> codesage_common::Result<HttpResponse> {
            self.sent_files
                .borrow_mut()
                .extend(form.parts.into_iter().map(|p| p.file_name));
            Ok(HttpResponse {
                status: 200,
                status_text: "OK".into(),
                body: self.body.to_string(),
            })
        }
    }

    struct NullClipboard;

    impl Clipboard for NullClipboard {
        async fn write_text(&self, _text: &str) -> std::result::Result<(), String> {
            Ok(())
        }
    }

    fn session(body: &'static str) -> Session<FixedHttp, NullClipboard> {
        let http = FixedHttp { body, sent_files: RefCell::new(Vec::new()) };
        Session::new(AnalysisClient::new("http://localhost:3000", http), NullClipboard)
    }

    #[tokio::test]
    async fn test_analyze_paths_shows_results() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), [1u8, 2]).unwrap();
        std::fs::write(dir.path().join("b.txt"), b"skip").unwrap();

        let mut session = session(
            r#"{"success":true,"results":[{"humanPercentage":90,"aiPercentage":10,"extractedText":"x"}]}"#,
        );
        let completion = session.analyze_paths(&[dir.path().to_path_buf()]).await.unwrap();

        assert_eq!(completion, AnalysisCompletion::Shown);
        assert_eq!(session.controller().state(), ViewState::ShowingResults(CaptureMode::Upload));
        assert_eq!(session.controller().results().len(), 1);
        assert_eq!(*session.client.http().sent_files.borrow(), vec!["a.png".to_string()]);
    }

    #[tokio::test]
    async fn test_analyze_paths_without_images() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"skip").unwrap();

        let mut session = session(r#"{"success":true,"results":[]}"#);
        let completion = session.analyze_paths(&[dir.path().to_path_buf()]).await.unwrap();

        assert_eq!(completion, AnalysisCompletion::Failed);
        assert_eq!(session.controller().state(), ViewState::Capturing(CaptureMode::Upload));
        assert!(session.client.http().sent_files.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_add_files_missing_path_is_notice() {
        let mut session = session("{}");
        session.controller_mut().select_mode(CaptureMode::Upload).unwrap();

        let added = session.add_files(&[PathBuf::from("/nonexistent/x.png")]).await.unwrap();

        assert_eq!(added, 0);
        let notices = session.controller_mut().drain_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].is_error());
    }

    #[test]
    fn test_parse_mode_action() {
        assert_eq!(parse_mode_action("u"), ModeAction::Select(CaptureMode::Upload));
        assert_eq!(parse_mode_action(" camera "), ModeAction::Select(CaptureMode::Camera));
        assert_eq!(parse_mode_action("q"), ModeAction::Quit);
        assert_eq!(parse_mode_action("x"), ModeAction::Unknown("x".into()));
    }

    #[test]
    fn test_parse_capture_action() {
        assert_eq!(
            parse_capture_action("a one.png two.jpg"),
            CaptureAction::Add(vec![PathBuf::from("one.png"), PathBuf::from("two.jpg")])
        );
        assert_eq!(parse_capture_action("d 2"), CaptureAction::Remove(1));
        assert_eq!(parse_capture_action(""), CaptureAction::Analyze);
        assert_eq!(parse_capture_action("z"), CaptureAction::Analyze);
        assert_eq!(parse_capture_action("b"), CaptureAction::Back);
        assert_eq!(parse_capture_action("q"), CaptureAction::Quit);
    }

    #[test]
    fn test_parse_capture_action_invalid() {
        assert!(matches!(parse_capture_action("a"), CaptureAction::Unknown(_)));
        assert!(matches!(parse_capture_action("d"), CaptureAction::Unknown(_)));
        assert!(matches!(parse_capture_action("d 0"), CaptureAction::Unknown(_)));
        assert!(matches!(parse_capture_action("d x"), CaptureAction::Unknown(_)));
    }

    #[test]
    fn test_parse_results_action() {
        assert_eq!(parse_results_action("c"), ResultsAction::Copy(0));
        assert_eq!(parse_results_action("c 3"), ResultsAction::Copy(2));
        assert_eq!(parse_results_action("s 2"), ResultsAction::Share(1));
        assert_eq!(parse_results_action("b"), ResultsAction::Back);
        assert_eq!(parse_results_action("n"), ResultsAction::NewAnalysis);
        assert_eq!(parse_results_action("q"), ResultsAction::Quit);
        assert!(matches!(parse_results_action("c 0"), ResultsAction::Unknown(_)));
    }
}

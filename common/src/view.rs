//! 画面状態マシン
//!
//! 画面遷移:
//! - モード選択 → 撮影(X): モード選択時。画像はリセット
//! - 撮影(X) → モード選択: 戻る。画像はリセット
//! - 撮影(X) → 結果(X): 解析成功時
//! - 結果(X) → 撮影(X): 戻る。結果は破棄、画像は保持
//! - 結果(X) → モード選択: 新しい解析。画像・結果ともリセット
//!
//! 結果は常に画像と同数で、結果画面でのみ保持される。

use crate::capture::upload::UploadBatch;
use crate::client::{AnalysisClient, HttpClient};
use crate::collection::ImageCollection;
use crate::error::{Error, Result};
use crate::notice::{Notice, Notices};
use crate::parser::ensure_aligned;
use crate::types::{AnalysisResult, Image};
use tracing::{debug, warn};

/// 撮影方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Camera,
    Upload,
}

impl CaptureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureMode::Camera => "camera",
            CaptureMode::Upload => "upload",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CaptureMode::Camera => "Camera Mode",
            CaptureMode::Upload => "Upload Mode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    SelectingMode,
    Capturing(CaptureMode),
    ShowingResults(CaptureMode),
}

impl ViewState {
    pub fn mode(&self) -> Option<CaptureMode> {
        match self {
            ViewState::SelectingMode => None,
            ViewState::Capturing(mode) | ViewState::ShowingResults(mode) => Some(*mode),
        }
    }

    /// 画面名（"mode-selection", "camera", "upload-results" など）
    pub fn view_name(&self) -> String {
        match self {
            ViewState::SelectingMode => "mode-selection".to_string(),
            ViewState::Capturing(mode) => mode.as_str().to_string(),
            ViewState::ShowingResults(mode) => format!("{}-results", mode.as_str()),
        }
    }

    fn describe(&self) -> String {
        match self {
            ViewState::SelectingMode => "selecting mode".to_string(),
            ViewState::Capturing(mode) => format!("capturing ({})", mode.as_str()),
            ViewState::ShowingResults(mode) => format!("showing results ({})", mode.as_str()),
        }
    }
}

/// 実行中の解析リクエスト
///
/// 送信時点の画像と状態を保持し、完了時に古くなっていないかを判定する。
#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    mode: CaptureMode,
    revision: u64,
    images: Vec<Image>,
}

impl AnalysisTicket {
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }
}

/// 解析完了時の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisCompletion {
    /// 結果画面へ遷移した
    Shown,
    /// 失敗を通知し、撮影画面に留まった
    Failed,
    /// 送信後に画面や画像が変わっていたため破棄した
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct ViewController {
    state: ViewState,
    images: ImageCollection,
    results: Vec<AnalysisResult>,
    analyzing: bool,
    /// 解析中に同じ画面で画像が変わった
    interrupted: bool,
    revision: u64,
    notices: Notices,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn images(&self) -> &ImageCollection {
        &self.images
    }

    /// 結果画面でのみ空でない
    pub fn results(&self) -> &[AnalysisResult] {
        &self.results
    }

    /// 画像と結果をインデックスで対にしたもの
    pub fn pairs(&self) -> impl Iterator<Item = (&Image, &AnalysisResult)> {
        self.images.iter().zip(self.results.iter())
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    /// 解析ボタンを押せるか
    pub fn can_analyze(&self) -> bool {
        matches!(self.state, ViewState::Capturing(_)) && !self.images.is_empty() && !self.analyzing
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// 境界で捕捉したエラーを通知する
    pub fn report(&mut self, error: &Error) {
        self.notices.push(Notice::from(error));
    }

    // =============================================
    // 画面遷移
    // =============================================

    pub fn select_mode(&mut self, mode: CaptureMode) -> Result<()> {
        match self.state {
            ViewState::SelectingMode => {
                self.images.clear();
                self.results.clear();
                self.transition(ViewState::Capturing(mode));
                Ok(())
            }
            other => Err(self.invalid("select a mode", other)),
        }
    }

    pub fn back(&mut self) -> Result<()> {
        match self.state {
            ViewState::Capturing(_) => {
                self.images.clear();
                self.results.clear();
                self.transition(ViewState::SelectingMode);
                Ok(())
            }
            ViewState::ShowingResults(mode) => {
                self.results.clear();
                self.transition(ViewState::Capturing(mode));
                Ok(())
            }
            other => Err(self.invalid("go back", other)),
        }
    }

    pub fn new_analysis(&mut self) -> Result<()> {
        match self.state {
            ViewState::ShowingResults(_) => {
                self.images.clear();
                self.results.clear();
                self.transition(ViewState::SelectingMode);
                Ok(())
            }
            other => Err(self.invalid("start a new analysis", other)),
        }
    }

    // =============================================
    // 画像の追加・削除（撮影画面のみ）
    // =============================================

    /// カメラで撮影した画像を追加
    pub fn add_image(&mut self, image: Image) -> Result<()> {
        self.ensure_capturing("add an image")?;
        self.images.push(image);
        self.images_changed();
        self.notices.push(Notice::success("Photo captured!"));
        Ok(())
    }

    /// アップロードバッチの結果を反映する
    ///
    /// 成功・失敗どちらの場合も通知はちょうど1件。
    pub fn apply_upload(&mut self, outcome: Result<UploadBatch>) -> Result<usize> {
        self.ensure_capturing("upload images")?;
        match outcome {
            Ok(batch) => {
                let summary = batch.summary();
                let added = batch.images.len();
                self.images.append_batch(batch.images);
                self.images_changed();
                self.notices.push(Notice::success(summary));
                Ok(added)
            }
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    pub fn remove_image(&mut self, index: usize) -> Result<Option<Image>> {
        self.ensure_capturing("remove an image")?;
        let removed = self.images.remove(index);
        if removed.is_some() {
            self.images_changed();
        }
        Ok(removed)
    }

    // =============================================
    // 解析
    // =============================================

    /// 解析を開始する。送信する画像のスナップショットを返す
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket> {
        let mode = match self.state {
            ViewState::Capturing(mode) => mode,
            other => return Err(self.invalid("analyze", other)),
        };
        if self.images.is_empty() {
            return Err(Error::Validation("No images to analyze".into()));
        }
        if self.analyzing {
            return Err(Error::InvalidTransition {
                action: "analyze",
                state: "an analysis is already running".to_string(),
            });
        }

        self.analyzing = true;
        self.interrupted = false;
        Ok(AnalysisTicket {
            mode,
            revision: self.revision,
            images: self.images.as_slice().to_vec(),
        })
    }

    /// 解析結果を反映する
    pub fn finish_analysis(
        &mut self,
        ticket: AnalysisTicket,
        outcome: Result<Vec<AnalysisResult>>,
    ) -> AnalysisCompletion {
        if ticket.revision != self.revision || self.state != ViewState::Capturing(ticket.mode) {
            debug!("ignoring stale analysis response (revision {} != {})", ticket.revision, self.revision);
            if self.interrupted && self.state == ViewState::Capturing(ticket.mode) {
                self.interrupted = false;
                self.notices
                    .push(Notice::info("Images changed during analysis. Please analyze again."));
            }
            return AnalysisCompletion::Stale;
        }

        self.analyzing = false;

        let outcome = outcome.and_then(|results| ensure_aligned(ticket.images.len(), results));

        match outcome {
            Ok(results) => {
                for (index, result) in results.iter().enumerate() {
                    if !result.sums_to_hundred() {
                        warn!(
                            "result {}: percentages sum to {}",
                            index,
                            result.human_percentage + result.ai_percentage
                        );
                    }
                }
                self.results = results;
                self.transition(ViewState::ShowingResults(ticket.mode));
                AnalysisCompletion::Shown
            }
            Err(e) => {
                let message = match &e {
                    Error::Application(_) => e.to_string(),
                    other => format!("Error analyzing images: {}", other),
                };
                self.notices.push(Notice::error(message));
                AnalysisCompletion::Failed
            }
        }
    }

    /// 開始から完了までをまとめて行う
    pub async fn analyze_with<H: HttpClient>(&mut self, client: &AnalysisClient<H>) -> AnalysisCompletion {
        let ticket = match self.begin_analysis() {
            Ok(ticket) => ticket,
            Err(e) => {
                self.report(&e);
                return AnalysisCompletion::Failed;
            }
        };
        let outcome = client.analyze(ticket.images()).await;
        self.finish_analysis(ticket, outcome)
    }

    /// 結果が画像と対応しているか
    pub fn is_consistent(&self) -> bool {
        match self.state {
            ViewState::ShowingResults(_) => {
                !self.results.is_empty() && self.results.len() == self.images.len()
            }
            _ => self.results.is_empty(),
        }
    }

    fn transition(&mut self, next: ViewState) {
        debug!("view {} -> {}", self.state.view_name(), next.view_name());
        self.state = next;
        self.interrupted = false;
        self.touch();
        debug_assert!(self.is_consistent());
    }

    fn images_changed(&mut self) {
        if self.analyzing {
            self.interrupted = true;
        }
        self.touch();
    }

    /// 画面か画像が変わった。実行中の解析は古くなる
    fn touch(&mut self) {
        self.revision += 1;
        self.analyzing = false;
    }

    fn ensure_capturing(&self, action: &'static str) -> Result<()> {
        match self.state {
            ViewState::Capturing(_) => Ok(()),
            other => Err(self.invalid(action, other)),
        }
    }

    fn invalid(&self, action: &'static str, state: ViewState) -> Error {
        Error::InvalidTransition { action, state: state.describe() }
    }
}

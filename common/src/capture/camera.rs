//! カメラ撮影セッション
//!
//! カメラストリームは排他的なハードウェア資源。同時に有効なストリームは常に1本以下で、
//! 向きの切替（停止→再開）、明示的な停止、セッション破棄のいずれでも必ず解放する。

use crate::error::{Error, Result};
use crate::types::Image;
use crate::view::ViewController;
use tracing::{debug, warn};

/// カメラの向き
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    /// 背面カメラ
    #[default]
    Environment,
    /// 前面カメラ
    User,
}

impl FacingMode {
    pub fn toggled(self) -> Self {
        match self {
            FacingMode::Environment => FacingMode::User,
            FacingMode::User => FacingMode::Environment,
        }
    }

    /// `getUserMedia` の facingMode 制約値
    pub fn as_constraint(&self) -> &'static str {
        match self {
            FacingMode::Environment => "environment",
            FacingMode::User => "user",
        }
    }
}

/// カメラ権限の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    /// まだ確認していない
    #[default]
    Prompt,
    Granted,
    Denied,
}

/// カメラデバイス（ブラウザなら navigator.mediaDevices）
#[allow(async_fn_in_trait)]
pub trait CameraDevice {
    type Stream: CameraStream;

    async fn query_permission(&self) -> Result<PermissionState>;

    /// 指定した向きでストリームを開く
    ///
    /// 権限拒否は `Error::Permission`、それ以外の失敗は `Error::Device` を返すこと。
    async fn open_stream(&self, facing: FacingMode) -> Result<Self::Stream>;
}

/// 開いているカメラストリーム
pub trait CameraStream {
    /// 現在のフレームを画像として切り出す
    fn snapshot(&self) -> Result<Image>;

    fn stop(&mut self);
}

/// セッションの表示用スナップショット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CameraStatus {
    pub permission: PermissionState,
    pub active: bool,
    pub facing: FacingMode,
}

/// プレビューの上に重ねる表示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraOverlay {
    /// 「カメラを有効化」ボタン
    Enable,
    /// 権限拒否。再試行ボタン付き
    Denied,
    /// 許可済みだがストリームが無い（デバイス使用中・切替失敗など）。再試行ボタン付き
    Unavailable,
    /// プレビューと撮影操作
    Live,
}

impl CameraStatus {
    /// 停止中は必ず何らかの操作手段が出る
    pub fn overlay(&self) -> CameraOverlay {
        if self.active {
            return CameraOverlay::Live;
        }
        match self.permission {
            PermissionState::Prompt => CameraOverlay::Enable,
            PermissionState::Denied => CameraOverlay::Denied,
            PermissionState::Granted => CameraOverlay::Unavailable,
        }
    }
}

pub struct CameraSession<D: CameraDevice> {
    device: D,
    stream: Option<D::Stream>,
    permission: PermissionState,
    facing: FacingMode,
}

impl<D: CameraDevice> CameraSession<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            stream: None,
            permission: PermissionState::Prompt,
            facing: FacingMode::default(),
        }
    }

    /// 画面表示時の処理: 権限を確認し、許可済みならそのまま開始する
    pub async fn activate(&mut self) -> Result<()> {
        match self.device.query_permission().await {
            Ok(PermissionState::Granted) => {
                self.permission = PermissionState::Granted;
                self.start().await
            }
            Ok(PermissionState::Prompt) => {
                self.permission = PermissionState::Prompt;
                Ok(())
            }
            Ok(PermissionState::Denied) => {
                self.permission = PermissionState::Denied;
                Err(Error::Permission("Please enable camera permissions.".into()))
            }
            Err(e) => {
                // 権限APIが使えない環境では直接開始を試みる
                debug!("camera permission query failed: {}", e);
                self.start().await
            }
        }
    }

    /// 「カメラを有効化」ボタン
    pub async fn enable(&mut self) -> Result<()> {
        self.start().await
    }

    /// 拒否後の「再試行」ボタン
    pub async fn retry(&mut self) -> Result<()> {
        self.activate().await
    }

    async fn start(&mut self) -> Result<()> {
        self.stop();

        match self.device.open_stream(self.facing).await {
            Ok(stream) => {
                self.stream = Some(stream);
                self.permission = PermissionState::Granted;
                debug!("camera stream started ({})", self.facing.as_constraint());
                Ok(())
            }
            Err(e @ Error::Permission(_)) => {
                self.permission = PermissionState::Denied;
                Err(e)
            }
            Err(e) => {
                warn!("camera stream failed: {}", e);
                Err(e)
            }
        }
    }

    /// 前面/背面を切り替える。稼働中なら停止してから開き直す
    pub async fn toggle_facing(&mut self) -> Result<()> {
        self.facing = self.facing.toggled();
        if self.stream.is_some() {
            self.start().await
        } else {
            Ok(())
        }
    }

    pub fn snapshot(&self) -> Result<Image> {
        match &self.stream {
            Some(stream) => stream.snapshot(),
            None => Err(Error::Device("camera is not active".into())),
        }
    }

    /// 撮影して撮影画面の画像一覧に追加する
    pub fn capture(&self, controller: &mut ViewController) -> Result<()> {
        let image = self.snapshot()?;
        controller.add_image(image)
    }

    /// ストリームを解放する（何度呼んでもよい）
    pub fn stop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            debug!("camera stream stopped");
        }
    }

    pub fn status(&self) -> CameraStatus {
        CameraStatus {
            permission: self.permission,
            active: self.is_active(),
            facing: self.facing,
        }
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }
}

impl<D: CameraDevice> Drop for CameraSession<D> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// 開いているストリーム数を数えるモックデバイス
    struct MockCamera {
        permission: Result<PermissionState>,
        open_error: RefCell<Option<Error>>,
        active: Rc<Cell<usize>>,
        opened: Rc<RefCell<Vec<FacingMode>>>,
    }

    impl MockCamera {
        fn new(permission: Result<PermissionState>) -> Self {
            Self {
                permission,
                open_error: RefCell::new(None),
                active: Rc::new(Cell::new(0)),
                opened: Rc::new(RefCell::new(Vec::new())),
            }
        }
    }

    struct MockStream {
        facing: FacingMode,
        active: Rc<Cell<usize>>,
        stopped: bool,
    }

    impl CameraStream for MockStream {
        fn snapshot(&self) -> Result<Image> {
            let tag = match self.facing {
                FacingMode::Environment => 0xE,
                FacingMode::User => 0xF,
            };
            Ok(Image::new(vec![tag], "image/jpeg"))
        }

        fn stop(&mut self) {
            if !self.stopped {
                self.stopped = true;
                self.active.set(self.active.get() - 1);
            }
        }
    }

    impl CameraDevice for MockCamera {
        type Stream = MockStream;

        async fn query_permission(&self) -> Result<PermissionState> {
            self.permission.clone()
        }

        async fn open_stream(&self, facing: FacingMode) -> Result<MockStream> {
            if let Some(error) = self.open_error.borrow_mut().take() {
                return Err(error);
            }
            self.active.set(self.active.get() + 1);
            self.opened.borrow_mut().push(facing);
            Ok(MockStream { facing, active: self.active.clone(), stopped: false })
        }
    }

    #[test]
    fn test_activate_granted_starts_stream() {
        let camera = MockCamera::new(Ok(PermissionState::Granted));
        let active = camera.active.clone();
        let mut session = CameraSession::new(camera);

        block_on(session.activate()).unwrap();

        assert!(session.is_active());
        assert_eq!(session.permission(), PermissionState::Granted);
        assert_eq!(active.get(), 1);
    }

    #[test]
    fn test_activate_prompt_waits_for_enable() {
        let camera = MockCamera::new(Ok(PermissionState::Prompt));
        let mut session = CameraSession::new(camera);

        block_on(session.activate()).unwrap();
        assert!(!session.is_active());
        assert_eq!(session.permission(), PermissionState::Prompt);

        block_on(session.enable()).unwrap();
        assert!(session.is_active());
        assert_eq!(session.permission(), PermissionState::Granted);
    }

    #[test]
    fn test_activate_denied_reports_permission_error() {
        let camera = MockCamera::new(Ok(PermissionState::Denied));
        let mut session = CameraSession::new(camera);

        let result = block_on(session.activate());
        assert!(matches!(result, Err(Error::Permission(_))));
        assert_eq!(session.permission(), PermissionState::Denied);
        assert!(!session.is_active());
    }

    #[test]
    fn test_query_failure_falls_back_to_direct_start() {
        let camera = MockCamera::new(Err(Error::Device("permissions API missing".into())));
        let mut session = CameraSession::new(camera);

        block_on(session.activate()).unwrap();
        assert!(session.is_active());
    }

    #[test]
    fn test_open_denied_then_retry() {
        let camera = MockCamera::new(Ok(PermissionState::Granted));
        *camera.open_error.borrow_mut() = Some(Error::Permission("NotAllowedError".into()));
        let mut session = CameraSession::new(camera);

        assert!(block_on(session.activate()).is_err());
        assert_eq!(session.permission(), PermissionState::Denied);

        block_on(session.retry()).unwrap();
        assert!(session.is_active());
        assert_eq!(session.permission(), PermissionState::Granted);
    }

    #[test]
    fn test_device_error_keeps_permission() {
        let camera = MockCamera::new(Ok(PermissionState::Prompt));
        *camera.open_error.borrow_mut() = Some(Error::Device("NotReadableError".into()));
        let mut session = CameraSession::new(camera);

        let result = block_on(session.enable());
        assert!(matches!(result, Err(Error::Device(_))));
        assert_eq!(session.permission(), PermissionState::Prompt);
        assert!(!session.is_active());
    }

    #[test]
    fn test_toggle_facing_keeps_single_stream() {
        let camera = MockCamera::new(Ok(PermissionState::Granted));
        let active = camera.active.clone();
        let opened = camera.opened.clone();
        let mut session = CameraSession::new(camera);

        block_on(session.activate()).unwrap();
        assert_eq!(active.get(), 1);

        for _ in 0..5 {
            block_on(session.toggle_facing()).unwrap();
            assert_eq!(active.get(), 1);
        }

        assert_eq!(session.facing(), FacingMode::User);
        assert_eq!(opened.borrow().first(), Some(&FacingMode::Environment));
        assert_eq!(opened.borrow().len(), 6);
    }

    #[test]
    fn test_toggle_facing_while_inactive_does_not_open() {
        let camera = MockCamera::new(Ok(PermissionState::Prompt));
        let active = camera.active.clone();
        let mut session = CameraSession::new(camera);

        block_on(session.toggle_facing()).unwrap();
        assert_eq!(active.get(), 0);
        assert_eq!(session.facing(), FacingMode::User);

        // 次に開くときは切替後の向きが使われる
        block_on(session.enable()).unwrap();
        assert_eq!(session.snapshot().unwrap().bytes(), &[0xF]);
    }

    #[test]
    fn test_enable_twice_does_not_leak() {
        let camera = MockCamera::new(Ok(PermissionState::Prompt));
        let active = camera.active.clone();
        let mut session = CameraSession::new(camera);

        block_on(session.enable()).unwrap();
        block_on(session.enable()).unwrap();
        assert_eq!(active.get(), 1);
    }

    #[test]
    fn test_snapshot_uses_current_stream() {
        let camera = MockCamera::new(Ok(PermissionState::Granted));
        let mut session = CameraSession::new(camera);

        block_on(session.activate()).unwrap();
        assert_eq!(session.snapshot().unwrap().bytes(), &[0xE]);
        assert_eq!(session.snapshot().unwrap().mime_type(), "image/jpeg");
    }

    #[test]
    fn test_capture_appends_to_view() {
        use crate::view::CaptureMode;

        let camera = MockCamera::new(Ok(PermissionState::Granted));
        let mut session = CameraSession::new(camera);
        let mut controller = ViewController::new();
        controller.select_mode(CaptureMode::Camera).unwrap();

        block_on(session.activate()).unwrap();
        session.capture(&mut controller).unwrap();
        session.capture(&mut controller).unwrap();

        assert_eq!(controller.images().len(), 2);
        assert_eq!(controller.images().get(0).unwrap().bytes(), &[0xE]);
        assert_eq!(controller.notices().last().unwrap().message, "Photo captured!");
    }

    #[test]
    fn test_capture_without_stream_leaves_view() {
        use crate::view::CaptureMode;

        let camera = MockCamera::new(Ok(PermissionState::Prompt));
        let session = CameraSession::new(camera);
        let mut controller = ViewController::new();
        controller.select_mode(CaptureMode::Camera).unwrap();

        assert!(matches!(session.capture(&mut controller), Err(Error::Device(_))));
        assert!(controller.images().is_empty());
    }

    #[test]
    fn test_snapshot_without_stream_fails() {
        let camera = MockCamera::new(Ok(PermissionState::Prompt));
        let session = CameraSession::new(camera);

        assert!(matches!(session.snapshot(), Err(Error::Device(_))));
    }

    #[test]
    fn test_device_busy_after_grant_offers_retry() {
        let camera = MockCamera::new(Ok(PermissionState::Granted));
        *camera.open_error.borrow_mut() = Some(Error::Device("NotReadableError".into()));
        let mut session = CameraSession::new(camera);

        assert!(matches!(block_on(session.activate()), Err(Error::Device(_))));
        assert!(!session.is_active());
        assert_eq!(session.permission(), PermissionState::Granted);
        assert_eq!(session.status().overlay(), CameraOverlay::Unavailable);

        // デバイスが空けば再試行で開ける
        block_on(session.retry()).unwrap();
        assert_eq!(session.status().overlay(), CameraOverlay::Live);
    }

    #[test]
    fn test_failed_toggle_offers_retry() {
        let camera = MockCamera::new(Ok(PermissionState::Granted));
        let mut session = CameraSession::new(camera);
        block_on(session.activate()).unwrap();

        *session.device.open_error.borrow_mut() = Some(Error::Device("OverconstrainedError".into()));
        assert!(block_on(session.toggle_facing()).is_err());
        assert!(!session.is_active());
        assert_eq!(session.status().overlay(), CameraOverlay::Unavailable);

        block_on(session.retry()).unwrap();
        assert!(session.is_active());
        assert_eq!(session.facing(), FacingMode::User);
    }

    #[test]
    fn test_overlay_for_each_status() {
        let status = |permission, active| CameraStatus { permission, active, facing: FacingMode::default() };

        assert_eq!(status(PermissionState::Prompt, false).overlay(), CameraOverlay::Enable);
        assert_eq!(status(PermissionState::Denied, false).overlay(), CameraOverlay::Denied);
        assert_eq!(status(PermissionState::Granted, false).overlay(), CameraOverlay::Unavailable);
        assert_eq!(status(PermissionState::Granted, true).overlay(), CameraOverlay::Live);
    }

    #[test]
    fn test_drop_releases_stream() {
        let camera = MockCamera::new(Ok(PermissionState::Granted));
        let active = camera.active.clone();
        {
            let mut session = CameraSession::new(camera);
            block_on(session.activate()).unwrap();
            assert_eq!(active.get(), 1);
        }
        assert_eq!(active.get(), 0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let camera = MockCamera::new(Ok(PermissionState::Granted));
        let active = camera.active.clone();
        let mut session = CameraSession::new(camera);

        block_on(session.activate()).unwrap();
        session.stop();
        session.stop();
        assert_eq!(active.get(), 0);
        assert!(!session.is_active());
    }
}

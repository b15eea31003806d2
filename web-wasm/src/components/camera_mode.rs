//! カメラモードコンポーネント
//!
//! 画面表示中だけカメラセッションを持ち、アンマウント時に必ずストリームを止める。
//! カメラ操作は非同期Mutexで直列化する（切替中に開始が割り込まないように）。

use super::analyze_button::AnalyzeButton;
use super::image_strip::ImageStrip;
use crate::platform::camera::{BrowserCamera, VIDEO_ID};
use crate::platform::log_error;
use codesage_common::{CameraOverlay, CameraSession, CameraStatus, Result, ViewController};
use futures::lock::Mutex;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;
use std::rc::Rc;

type SharedSession = Rc<Mutex<CameraSession<BrowserCamera>>>;

/// セッションに対する操作を1つ実行し、状態表示とエラー通知を更新する
fn run_camera_task<F, Fut>(
    session: StoredValue<SharedSession, LocalStorage>,
    status: RwSignal<CameraStatus>,
    controller: RwSignal<ViewController>,
    task: F,
) where
    F: FnOnce(SharedSession) -> Fut + 'static,
    Fut: Future<Output = Result<()>> + 'static,
{
    let Some(session) = session.try_get_value() else {
        return;
    };

    spawn_local(async move {
        let result = task(session.clone()).await;
        status.set(session.lock().await.status());

        if let Err(e) = result {
            log_error("camera:", &e.to_string());
            controller.update(|c| c.report(&e));
        }
    });
}

#[component]
pub fn CameraMode<FB, FA>(controller: RwSignal<ViewController>, on_back: FB, on_analyze: FA) -> impl IntoView
where
    FB: Fn() + 'static + Clone,
    FA: Fn() + 'static + Clone,
{
    let session: StoredValue<SharedSession, LocalStorage> =
        StoredValue::new_local(Rc::new(Mutex::new(CameraSession::new(BrowserCamera))));
    let status = RwSignal::new(CameraStatus::default());

    // 表示時に権限確認 → 許可済みなら開始
    Effect::new(move |_| {
        run_camera_task(session, status, controller, |s| async move { s.lock().await.activate().await });
    });

    on_cleanup(move || {
        if let Some(session) = session.try_get_value() {
            spawn_local(async move {
                session.lock().await.stop();
            });
        }
    });

    let enable = move |_| {
        run_camera_task(session, status, controller, |s| async move { s.lock().await.enable().await });
    };

    let retry = move |_| {
        run_camera_task(session, status, controller, |s| async move { s.lock().await.retry().await });
    };

    let toggle = move |_| {
        run_camera_task(session, status, controller, |s| async move { s.lock().await.toggle_facing().await });
    };

    let capture = move |_| {
        run_camera_task(session, status, controller, move |s| async move {
            let session = s.lock().await;
            let added = controller.try_update(|c| session.capture(c)).unwrap_or(Ok(()));
            added
        });
    };

    let overlay = move || status.with(|s| s.overlay());

    view! {
        <div class="camera-mode">
            <div class="view-header">
                <button class="btn-icon" on:click=move |_| on_back()>"←"</button>
                <h2>"Camera Mode"</h2>
            </div>

            <div class="camera-frame">
                <video
                    id=VIDEO_ID
                    class:hidden=move || !status.with(|s| s.active)
                    autoplay=true
                    playsinline=true
                ></video>

                <Show when=move || overlay() == CameraOverlay::Denied>
                    <div class="camera-overlay">
                        <h3>"Camera Access Denied"</h3>
                        <p>"Please enable camera access in your browser settings to use this feature."</p>
                        <button class="btn btn-primary" on:click=retry>"Try Again"</button>
                    </div>
                </Show>

                <Show when=move || overlay() == CameraOverlay::Unavailable>
                    <div class="camera-overlay">
                        <h3>"Camera Unavailable"</h3>
                        <p>"The camera could not be started. It may be in use by another app."</p>
                        <button class="btn btn-primary" on:click=retry>"Try Again"</button>
                    </div>
                </Show>

                <Show when=move || overlay() == CameraOverlay::Enable>
                    <div class="camera-overlay">
                        <h3>"Camera Access"</h3>
                        <p>"We need access to your camera to capture images for analysis."</p>
                        <button class="btn btn-primary" on:click=enable>"Enable Camera"</button>
                    </div>
                </Show>

                <Show when=move || overlay() == CameraOverlay::Live>
                    <div class="camera-controls">
                        <button class="btn-round" title="Switch camera" on:click=toggle>"🔄"</button>
                        <button class="btn-shutter" title="Capture" on:click=capture>"📷"</button>
                    </div>
                </Show>
            </div>

            <ImageStrip controller=controller heading="Captured Images" empty_text="No images captured yet" />

            <AnalyzeButton controller=controller on_analyze=on_analyze />
        </div>
    }
}

//! メインアプリケーションコンポーネント
//!
//! 画面状態・画像・結果は ViewController がまとめて持ち、App が唯一の所有者になる。
//! 各画面は RwSignal<ViewController> を通して操作する。

use crate::components::{
    camera_mode::CameraMode,
    header::Header,
    mode_selection::ModeSelection,
    results_view::ResultsView,
    toasts::{push_toast, Toast, Toasts},
    upload_mode::UploadMode,
};
use crate::platform::fetch::FetchHttp;
use crate::platform::{api_url, log_error};
use codesage_common::{AnalysisClient, CaptureMode, ViewController, ViewState};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 解析を開始する
///
/// 送信中に画面や画像が変わった場合、完了時のレスポンスは捨てられる。
pub fn start_analysis(controller: RwSignal<ViewController>) {
    let Some(ticket) = controller.try_update(|c| c.begin_analysis()) else {
        return;
    };
    let ticket = match ticket {
        Ok(ticket) => ticket,
        Err(e) => {
            controller.update(|c| c.report(&e));
            return;
        }
    };

    spawn_local(async move {
        let client = AnalysisClient::new(api_url(), FetchHttp);
        let outcome = client.analyze(ticket.images()).await;
        if let Err(e) = &outcome {
            log_error("analyze:", &e.to_string());
        }
        controller.update(|c| {
            c.finish_analysis(ticket, outcome);
        });
    });
}

/// 状態遷移の失敗を通知に変える
fn apply(controller: RwSignal<ViewController>, action: impl FnOnce(&mut ViewController) -> codesage_common::Result<()>) {
    controller.update(|c| {
        if let Err(e) = action(c) {
            c.report(&e);
        }
    });
}

#[component]
pub fn App() -> impl IntoView {
    let controller = RwSignal::new(ViewController::new());
    let toasts = RwSignal::new(Vec::<Toast>::new());
    let next_toast_id = StoredValue::new(0u64);

    // 画面の切替だけを監視（画像の追加ではカメラを作り直さない）
    let state = Memo::new(move |_| controller.with(|c| c.state()));

    // 通知をトーストへ移す
    Effect::new(move |_| {
        if controller.with(|c| c.notices().is_empty()) {
            return;
        }
        let notices = controller.try_update(|c| c.drain_notices()).unwrap_or_default();
        for notice in notices {
            push_toast(toasts, next_toast_id, notice);
        }
    });

    let on_select = move |mode: CaptureMode| apply(controller, |c| c.select_mode(mode));
    let on_back = move || apply(controller, |c| c.back());
    let on_new_analysis = move || apply(controller, |c| c.new_analysis());
    let on_analyze = move || start_analysis(controller);

    view! {
        <div class="container" data-view=move || state.get().view_name()>
            <Header />

            {move || match state.get() {
                ViewState::SelectingMode => view! { <ModeSelection on_select=on_select /> }.into_any(),
                ViewState::Capturing(CaptureMode::Camera) => view! {
                    <CameraMode controller=controller on_back=on_back on_analyze=on_analyze />
                }
                .into_any(),
                ViewState::Capturing(CaptureMode::Upload) => view! {
                    <UploadMode controller=controller on_back=on_back on_analyze=on_analyze />
                }
                .into_any(),
                ViewState::ShowingResults(_) => view! {
                    <ResultsView controller=controller on_back=on_back on_new_analysis=on_new_analysis />
                }
                .into_any(),
            }}

            <Toasts toasts=toasts />
        </div>
    }
}

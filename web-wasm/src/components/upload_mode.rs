//! アップロードモードコンポーネント
//!
//! クリックでファイル選択、またはドラッグ&ドロップ。1回の選択がそのまま1バッチになる。

use super::analyze_button::AnalyzeButton;
use super::image_strip::ImageStrip;
use crate::platform::files::files_from_list;
use crate::platform::log_error;
use codesage_common::{read_batch, ViewController};
use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::{DragEvent, FileList};

fn handle_files(controller: RwSignal<ViewController>, list: FileList) {
    let files = files_from_list(&list);
    if files.is_empty() {
        return;
    }

    spawn_local(async move {
        let outcome = read_batch(&files).await;
        controller.update(|c| {
            // 失敗時の通知は apply_upload が出す
            if let Err(e) = c.apply_upload(outcome) {
                log_error("upload:", &e.to_string());
            }
        });
    });
}

#[component]
pub fn UploadMode<FB, FA>(controller: RwSignal<ViewController>, on_back: FB, on_analyze: FA) -> impl IntoView
where
    FB: Fn() + 'static + Clone,
    FA: Fn() + 'static + Clone,
{
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref = NodeRef::<Input>::new();

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);

        if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
            handle_files(controller, files);
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    // 非表示のinputでファイル選択ダイアログを開く
    let on_click = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let on_change = move |_: leptos::ev::Event| {
        let Some(input) = input_ref.get() else {
            return;
        };
        if let Some(files) = input.files() {
            handle_files(controller, files);
        }
        // 同じファイルを続けて選べるようにする
        input.set_value("");
    };

    view! {
        <div class="upload-mode">
            <div class="view-header">
                <button class="btn-icon" on:click=move |_| on_back()>"←"</button>
                <h2>"Upload Mode"</h2>
            </div>

            <div
                class=move || if is_dragover.get() { "upload-area dragover" } else { "upload-area" }
                on:drop=on_drop
                on:dragover=on_dragover
                on:dragleave=on_dragleave
                on:click=on_click
            >
                <div class="upload-icon">"📁"</div>
                <p>"Drag & drop images here, or click to select"</p>
                <p class="text-muted">"JPEG, PNG, WebP and other image formats"</p>
            </div>

            <input
                node_ref=input_ref
                type="file"
                accept="image/*"
                multiple=true
                class="hidden"
                on:change=on_change
            />

            <ImageStrip controller=controller heading="Selected Images" empty_text="No images selected yet" />

            <AnalyzeButton controller=controller on_analyze=on_analyze />
        </div>
    }
}

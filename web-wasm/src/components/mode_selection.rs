//! モード選択コンポーネント

use codesage_common::CaptureMode;
use leptos::prelude::*;

#[component]
pub fn ModeSelection<F>(on_select: F) -> impl IntoView
where
    F: Fn(CaptureMode) + 'static + Clone,
{
    let card = move |mode: CaptureMode, icon: &'static str, description: &'static str| {
        let on_select = on_select.clone();
        view! {
            <div class="mode-card" on:click=move |_| on_select(mode)>
                <div class="mode-icon">{icon}</div>
                <h3>{mode.title()}</h3>
                <p class="text-muted">{description}</p>
            </div>
        }
    };

    view! {
        <div class="mode-selection">
            <h2>"Select Mode"</h2>
            <p class="text-muted">"Choose how you want to capture text for AI detection"</p>

            <div class="mode-grid">
                {card(CaptureMode::Camera, "📷", "Take photos using your device's camera")}
                {card(CaptureMode::Upload, "📁", "Select images from your device storage")}
            </div>
        </div>
    }
}

//! 解析ボタンコンポーネント

use codesage_common::ViewController;
use leptos::prelude::*;

#[component]
pub fn AnalyzeButton<F>(controller: RwSignal<ViewController>, on_analyze: F) -> impl IntoView
where
    F: Fn() + 'static + Clone,
{
    let is_analyzing = move || controller.with(|c| c.is_analyzing());

    view! {
        <div class="analyze-row">
            <button
                class="btn btn-primary"
                disabled=move || !controller.with(|c| c.can_analyze())
                on:click=move |_| on_analyze()
            >
                {move || if is_analyzing() { "Analyzing..." } else { "Analyze Images" }}
            </button>
        </div>
    }
}

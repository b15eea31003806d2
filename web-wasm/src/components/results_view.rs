//! 解析結果コンポーネント
//!
//! 画像と結果はインデックスで対応する。

use crate::platform::share::{BrowserClipboard, BrowserShareSheet};
use codesage_common::{copy_text, share_result, AnalysisResult, ViewController};
use leptos::prelude::*;
use leptos::task::spawn_local;

fn copy_result_text(controller: RwSignal<ViewController>, text: String) {
    spawn_local(async move {
        let notice = copy_text(&BrowserClipboard, &text).await;
        controller.update(|c| c.push_notice(notice));
    });
}

fn share(controller: RwSignal<ViewController>, result: AnalysisResult) {
    spawn_local(async move {
        if let Some(notice) = share_result(&BrowserShareSheet, &BrowserClipboard, &result).await {
            controller.update(|c| c.push_notice(notice));
        }
    });
}

#[component]
fn ResultCard(controller: RwSignal<ViewController>, index: usize, image_src: String, result: AnalysisResult) -> impl IntoView {
    let meter_class = if result.is_likely_human() { "meter-fill likely-human" } else { "meter-fill possibly-ai" };
    let meter_width = format!("{:.1}%", result.human_meter_fraction() * 100.0);
    let text = result.extracted_text.clone();
    let shared = result.clone();

    view! {
        <div class="result-card">
            <div class="result-image">
                <img src=image_src alt=format!("Result {}", index + 1) />
            </div>

            <div class="result-body">
                <h3>"AI Detection Result"</h3>

                <div class="meter-labels">
                    <span class="human">{format!("Human: {}%", result.human_percentage)}</span>
                    <span class="ai">{format!("AI: {}%", result.ai_percentage)}</span>
                </div>
                <div class="meter">
                    <div class=meter_class style:width=meter_width></div>
                </div>

                <h4>"Extracted Text"</h4>
                <pre class="extracted-text">{result.extracted_text}</pre>

                <div class="result-actions">
                    <button class="btn btn-secondary" on:click=move |_| copy_result_text(controller, text.clone())>
                        "Copy Text"
                    </button>
                    <button class="btn btn-secondary" on:click=move |_| share(controller, shared.clone())>
                        "Share"
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn ResultsView<FB, FN>(controller: RwSignal<ViewController>, on_back: FB, on_new_analysis: FN) -> impl IntoView
where
    FB: Fn() + 'static + Clone,
    FN: Fn() + 'static + Clone,
{
    let cards = move || {
        controller.with_untracked(|c| {
            c.pairs()
                .enumerate()
                .map(|(index, (image, result))| (index, image.to_data_url(), result.clone()))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="results-view">
            <div class="view-header">
                <button class="btn-icon" on:click=move |_| on_back()>"←"</button>
                <h2>"Analysis Results"</h2>
                <button class="btn btn-secondary" on:click=move |_| on_new_analysis()>"New Analysis"</button>
            </div>

            <div class="results">
                {cards()
                    .into_iter()
                    .map(|(index, image_src, result)| {
                        view! { <ResultCard controller=controller index=index image_src=image_src result=result /> }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

//! 撮影・選択済み画像のサムネイル一覧（削除ボタン付き）

use codesage_common::ViewController;
use leptos::prelude::*;

#[component]
pub fn ImageStrip(
    controller: RwSignal<ViewController>,
    /// 見出し（"Captured Images" など）
    heading: &'static str,
    /// 画像がないときの表示
    empty_text: &'static str,
) -> impl IntoView {
    let thumbnails = move || {
        controller.with(|c| {
            c.images()
                .iter()
                .enumerate()
                .map(|(index, image)| (index, image.to_data_url()))
                .collect::<Vec<_>>()
        })
    };

    let remove = move |index: usize| {
        controller.update(|c| {
            if let Err(e) = c.remove_image(index) {
                c.report(&e);
            }
        });
    };

    view! {
        <div class="image-strip">
            <h3>{heading} " (" {move || controller.with(|c| c.images().len())} ")"</h3>

            <Show
                when=move || controller.with(|c| !c.images().is_empty())
                fallback=move || view! { <p class="text-muted">{empty_text}</p> }
            >
                <div class="thumbnails">
                    {move || {
                        thumbnails()
                            .into_iter()
                            .map(|(index, src)| {
                                view! {
                                    <div class="thumbnail">
                                        <img src=src alt=format!("Image {}", index + 1) />
                                        <button
                                            class="thumbnail-remove"
                                            disabled=move || controller.with(|c| c.is_analyzing())
                                            on:click=move |_| remove(index)
                                        >
                                            "×"
                                        </button>
                                    </div>
                                }
                            })
                            .collect_view()
                    }}
                </div>
            </Show>
        </div>
    }
}

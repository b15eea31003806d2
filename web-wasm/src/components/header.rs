//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"CodeSage"</h1>
            <p class="text-muted">"AI text detection for code and handwriting"</p>
        </header>
    }
}
